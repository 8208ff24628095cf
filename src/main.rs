// Copyright (c) 2026 greenguard
// Licensed under the MIT License. See LICENSE file in the project root.

//! GreenGuard - Autonomous Greenhouse Environmental Controller
//!
//! Keeps a greenhouse inside configured temperature, humidity and light
//! bands, guards it against nighttime intrusion, and exposes telemetry and
//! remote control over MQTT.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use greenguard::{
    core::Engine, display, sensors::DemoSensors, Config, EventBus, SensorSource,
    StreamingManager, NAME, VERSION,
};

/// GreenGuard - Autonomous Greenhouse Environmental Controller
#[derive(Parser, Debug)]
#[command(name = "greenguard")]
#[command(author = "GreenGuard Project")]
#[command(version = VERSION)]
#[command(about = "Greenhouse climate, irrigation, lighting and security controller")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Demo mode with synthesized sensors
    #[arg(long)]
    demo: bool,

    /// Disable the console display task
    #[arg(long)]
    no_display: bool,

    /// MQTT broker address (enables MQTT)
    #[arg(long)]
    mqtt_broker: Option<String>,

    /// MQTT topic namespace
    #[arg(long)]
    topic_root: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🌱 {} v{} - Greenhouse Environmental Controller", NAME, VERSION);

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if args.demo {
        config.demo_mode = true;
    }
    if args.no_display {
        config.display.enabled = false;
    }
    if let Some(mqtt) = args.mqtt_broker {
        config.streaming.mqtt_enabled = true;
        config.streaming.mqtt_broker = mqtt;
    }
    if let Some(root) = args.topic_root {
        config.streaming.topic_root = root;
    }

    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.demo_mode);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    use tokio::sync::mpsc;

    let bus = Arc::new(EventBus::new(256));
    let (command_tx, command_rx) = mpsc::channel(64);

    // Streaming bridge: MQTT in/out, no-op when disabled.
    let mut streaming = StreamingManager::new(config.streaming.clone());
    streaming.start(bus.clone(), command_tx.clone()).await?;

    // Console display collaborator.
    let display_tx = if config.display.enabled {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(display::run(rx));
        Some(tx)
    } else {
        None
    };

    // Sensor source. Only synthesized sensors exist on a plain host; a
    // hardware-backed SensorSource would slot in here.
    if !config.demo_mode {
        warn!("no hardware sensor backend on this host, using demo sensors");
    }
    let sensors: Box<dyn SensorSource> = Box::new(DemoSensors::new());

    let engine = Engine::new(&config.control, sensors, bus.clone(), display_tx);

    info!("🚀 {} running, press Ctrl+C to shutdown", NAME);

    tokio::select! {
        result = engine.run(command_rx) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, cleaning up...");
        }
    }

    info!("{} shutdown complete", NAME);
    Ok(())
}
