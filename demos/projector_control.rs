// SPDX-License-Identifier: MPL-2.0

//! Demo program: control one projector from the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example projector_control -- <host> [password] <on|off|status|raw CMD|poll>
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example projector_control -- 192.168.1.20 secret on
//! RUST_LOG=epson_pjlink=debug cargo run --example projector_control -- 192.168.1.20 raw "%1LAMP ?"
//! ```

use std::env;
use std::time::Duration;

use epson_pjlink::{DeviceConfig, PollingConfig, Projector, Subscribable};
use tracing_subscriber::EnvFilter;

const ACTIONS: [&str; 5] = ["on", "off", "status", "raw", "poll"];

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <host> [password] <on|off|status|raw CMD|poll>");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  cargo run --example projector_control -- 192.168.1.20 secret status");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
    }

    let host = &args[1];
    let (password, rest) = if ACTIONS.contains(&args[2].as_str()) {
        (None, &args[2..])
    } else {
        (Some(args[2].as_str()), &args[3..])
    };
    let Some(action) = rest.first() else {
        usage(&args[0]);
    };

    let mut config = DeviceConfig::new("Demo Projector", host.as_str());
    if let Some(password) = password {
        config = config.with_password(password);
    }
    config.validate()?;

    let projector = Projector::with_polling(
        config,
        PollingConfig::new().with_interval(Duration::from_secs(5)),
    );

    projector.on_state_changed(|identifier, update| {
        println!("{identifier}: power is now {}", update.state);
    });

    match action.as_str() {
        "on" | "off" => {
            let state = projector.switch_power(action == "on").await;
            println!("Confirmed state: {state}");
        }
        "status" => {
            let state = projector.update().await;
            println!("Power state: {state}");
        }
        "raw" => {
            let Some(command) = rest.get(1) else {
                usage(&args[0]);
            };
            match projector.send_raw(command).await {
                Some(response) => println!("Reply: {}", response.body()),
                None => println!("No response"),
            }
        }
        "poll" => {
            println!("Polling every 5 seconds, press Ctrl+C to stop...");
            projector.start_polling();
            tokio::signal::ctrl_c().await?;
            projector.stop_polling();
        }
        _ => usage(&args[0]),
    }

    Ok(())
}
