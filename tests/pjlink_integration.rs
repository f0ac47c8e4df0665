// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the PJLink transport against an in-process fake
//! projector listening on a loopback TCP port.

use std::sync::Arc;
use std::time::Duration;

use epson_pjlink::protocol::{PjLinkClient, PjLinkConfig, Protocol, auth_digest};
use epson_pjlink::{
    DeviceConfig, PollingConfig, PowerState, Projector, ProtocolError, Subscribable,
};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// Fake projector
// ============================================================================

/// What the fake projector observed during one connection.
#[derive(Debug)]
struct Observed {
    /// Bytes received from the client, up to and including the terminator.
    frame: String,
    /// Whether the client closed the connection afterwards.
    closed_by_client: bool,
}

/// Accepts exactly one connection, sends `greeting`, reads one frame, sends
/// `reply` if any, then waits for the client to hang up.
async fn fake_projector(
    greeting: &'static str,
    reply: Option<&'static str>,
) -> (u16, JoinHandle<Observed>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(greeting.as_bytes()).await.unwrap();

        let mut frame = Vec::new();
        let mut buf = [0u8; 256];
        while !frame.contains(&b'\r') {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            frame.extend_from_slice(&buf[..n]);
        }

        if let Some(reply) = reply {
            socket.write_all(reply.as_bytes()).await.unwrap();
        }

        let mut rest = Vec::new();
        let closed_by_client = tokio::time::timeout(
            Duration::from_secs(5),
            socket.read_to_end(&mut rest),
        )
        .await
        .is_ok();

        Observed {
            frame: String::from_utf8_lossy(&frame).into_owned(),
            closed_by_client,
        }
    });

    (port, handle)
}

fn client(port: u16) -> PjLinkClient {
    PjLinkConfig::new("127.0.0.1")
        .with_port(port)
        .with_read_timeout(Duration::from_millis(300))
        .into_client()
}

fn authenticated_client(port: u16, password: &str) -> PjLinkClient {
    PjLinkConfig::new("127.0.0.1")
        .with_port(port)
        .with_password(password)
        .with_read_timeout(Duration::from_millis(300))
        .into_client()
}

fn projector(client: PjLinkClient) -> Projector {
    Projector::from_parts(
        DeviceConfig::new("Test Bench", "127.0.0.1"),
        client,
        PollingConfig::default(),
    )
}

/// Returns a loopback port with nothing listening on it.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

// ============================================================================
// PjLinkClient
// ============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn open_greeting_sends_bare_command() {
        let (port, server) = fake_projector("PJLINK 0\r", Some("%1POWR=1\r")).await;

        let response = client(port).send_raw("%1POWR ?").await.unwrap();

        assert_eq!(response.body(), "%1POWR=1");
        let observed = server.await.unwrap();
        assert_eq!(observed.frame, "%1POWR ?\r");
    }

    #[tokio::test]
    async fn challenge_prefixes_hash() {
        let (port, server) = fake_projector("PJLINK 1 498e328\r", Some("%1POWR=OK\r")).await;

        let response = authenticated_client(port, "secret")
            .send_raw("%1POWR 1")
            .await
            .unwrap();

        assert_eq!(response.body(), "%1POWR=OK");
        let observed = server.await.unwrap();
        assert_eq!(observed.frame, "b4578c28b7d74a8422d32d1d8b605bff%1POWR 1\r");
        assert_eq!(auth_digest("secret", "498e328"), "b4578c28b7d74a8422d32d1d8b605bff");
    }

    #[tokio::test]
    async fn challenge_without_password_hashes_nonce_alone() {
        let (port, server) = fake_projector("PJLINK 1 498e328\r", Some("%1POWR=0\r")).await;

        client(port).send_raw("%1POWR ?").await.unwrap();

        let observed = server.await.unwrap();
        assert_eq!(observed.frame, "e9986e40805c5d31557bc1d5ad3c52d3%1POWR ?\r");
    }

    #[tokio::test]
    async fn rejected_hash_is_authentication_failure() {
        let (port, server) = fake_projector("PJLINK 1 498e328\r", Some("PJLINK ERRA\r")).await;

        let result = authenticated_client(port, "wrong").send_raw("%1POWR ?").await;

        assert!(matches!(result, Err(ProtocolError::AuthenticationFailed)));
        assert!(server.await.unwrap().closed_by_client);
    }

    #[tokio::test]
    async fn socket_is_closed_after_success() {
        let (port, server) = fake_projector("PJLINK 0\r", Some("%1POWR=1\r")).await;

        client(port).send_raw("%1POWR ?").await.unwrap();

        assert!(server.await.unwrap().closed_by_client);
    }

    #[tokio::test]
    async fn silent_projector_times_out_and_closes() {
        let (port, server) = fake_projector("PJLINK 0\r", None).await;

        let result = client(port).send_raw("%1POWR ?").await;

        assert!(matches!(result, Err(ProtocolError::Timeout(300))));
        let observed = server.await.unwrap();
        assert_eq!(observed.frame, "%1POWR ?\r");
        assert!(observed.closed_by_client);
    }

    #[tokio::test]
    async fn missing_greeting_times_out_without_sending() {
        let (port, server) = fake_projector("", None).await;

        let result = client(port).send_raw("%1POWR ?").await;

        assert!(matches!(result, Err(ProtocolError::Timeout(300))));
        let observed = server.await.unwrap();
        assert_eq!(observed.frame, "");
        assert!(observed.closed_by_client);
    }

    #[tokio::test]
    async fn refused_connection_fails() {
        let port = closed_port().await;

        let result = client(port).send_raw("%1POWR ?").await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }
}

// ============================================================================
// Projector over TCP
// ============================================================================

mod projector_over_tcp {
    use super::*;

    #[tokio::test]
    async fn power_on_reply_reads_as_on() {
        let (port, _server) = fake_projector("PJLINK 0\r", Some("%1POWR=1\r")).await;
        let projector = projector(client(port));

        assert_eq!(projector.update().await, PowerState::On);
        assert_eq!(projector.state(), PowerState::On);
    }

    #[tokio::test]
    async fn power_off_reply_reads_as_standby() {
        let (port, _server) = fake_projector("PJLINK 0\r", Some("%1POWR=0\r")).await;
        let projector = projector(client(port));

        assert_eq!(projector.update().await, PowerState::Standby);
    }

    #[tokio::test]
    async fn silent_projector_reads_as_standby() {
        let (port, _server) = fake_projector("PJLINK 0\r", None).await;
        let projector = projector(client(port));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        projector.on_state_changed(move |identifier, update| {
            seen_clone.lock().push((identifier.to_string(), update.state));
        });

        assert_eq!(projector.update().await, PowerState::Standby);
        assert_eq!(
            *seen.lock(),
            vec![("test-bench".to_string(), PowerState::Standby)]
        );
    }

    #[tokio::test]
    async fn unreachable_projector_reads_as_standby() {
        let port = closed_port().await;
        let projector = projector(client(port));

        assert_eq!(projector.update().await, PowerState::Standby);
        assert!(projector.send_raw("%1POWR ?").await.is_none());
    }

    #[tokio::test]
    async fn wrong_password_collapses_to_no_response() {
        let (port, _server) = fake_projector("PJLINK 1 498e328\r", Some("PJLINK ERRA\r")).await;
        let projector = projector(authenticated_client(port, "wrong"));

        assert!(projector.set_power(true).await.is_none());
        assert_eq!(projector.state(), PowerState::Unknown);
    }

    #[tokio::test]
    async fn raw_command_passes_through() {
        let (port, server) = fake_projector("PJLINK 0\r", Some("%1INPT=OK\r")).await;
        let projector = projector(client(port));

        let reply = projector.send_raw("%1INPT 32").await.unwrap();

        assert_eq!(reply.body(), "%1INPT=OK");
        assert_eq!(server.await.unwrap().frame, "%1INPT 32\r");
        assert_eq!(projector.state(), PowerState::Unknown);
    }
}
