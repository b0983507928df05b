//! # Glove Bridge
//!
//! Recognize sign-language gestures from a flex-sensor glove and drive servos
//! over the same serial link.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration (built-in defaults if the file is missing)
//!    - Set up logging
//!    - Load the gesture model, training it on first start
//!
//! 2. **Running**
//!    - Recognizer task polls the glove and reports gestures
//!    - Sender task writes a servo frame every 800 ms
//!    - Console thread reads `save`, `clear` and `quit`
//!
//! 3. **Graceful Shutdown**
//!    - Ctrl+C or `quit` signals both tasks through a watch channel
//!    - Sending is disabled before the tasks are awaited
//!
//! # Examples
//!
//! ```bash
//! glove-bridge --config config/default.toml run
//! glove-bridge encode 331,303,479,959
//! glove-bridge decode "A5 5A 0A 5C 07 F6 04 66 07 66 07 F2 06 2F"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use glove_bridge::config::Config;
use glove_bridge::console::{self, Command};
use glove_bridge::frame::decoder::{decode_frame, parse_hex};
use glove_bridge::frame::encoder::{encode_frame, test_pattern_frame};
use glove_bridge::gesture::classifier::GestureClassifier;
use glove_bridge::gesture::{self, training};
use glove_bridge::logging;
use glove_bridge::recognizer::{LogDisplay, PollSchedule, Recognizer, SequenceCommand};
use glove_bridge::sensor::sample::RawSample;
use glove_bridge::sensor::transform::ValueTransformer;
use glove_bridge::serial::SerialChannel;
use glove_bridge::state::SharedState;
use glove_bridge::telemetry::sender::{FrameSource, TelemetrySender};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "PATH", default_value = "config/default.toml")]
    config: PathBuf,

    /// Display more information on the console. Can be used multiple times.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recognize gestures and send servo frames (default action)
    Run,

    /// Train the gesture model on the built-in recordings and save it
    Train,

    /// Send the fixed bench test frame until Ctrl+C
    TestPattern {
        /// Append CR LF after each frame
        #[arg(long)]
        crlf: bool,
    },

    /// Print the servo frame for one sensor reading
    Encode {
        /// Sensor values as A1,A2,A3,A4
        #[arg(value_name = "A1,A2,A3,A4")]
        sample: String,
    },

    /// Verify and print the payload of a hex-encoded frame
    Decode {
        /// Frame bytes, e.g. "A5 5A 0A ..." or "A55A0A..."
        hex: String,
    },
}

/// Load the config file, or defaults plus a warning to log once logging is up
fn load_config(path: &Path) -> Result<(Config, Option<String>)> {
    if !path.exists() {
        let warning = format!("Config file {} not found, using defaults", path.display());
        return Ok((Config::default(), Some(warning)));
    }

    let config = Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))?;
    Ok((config, None))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_warning) = load_config(&cli.config)?;

    let _log_guard = logging::init(cli.verbose, &config.logging);
    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config).await,
        Commands::Train => train(&config),
        Commands::TestPattern { crlf } => test_pattern(config, crlf).await,
        Commands::Encode { sample } => encode(&sample),
        Commands::Decode { hex } => decode(&hex),
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Glove Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let (model, mapping) = gesture::load_or_train(&config.gesture).context("Failed to prepare gesture model")?;

    let state = SharedState::shared(config.telemetry.enabled);
    let channel = SerialChannel::open_native(&config.serial, Arc::clone(&state)).into_shared();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sender = TelemetrySender::new(Arc::clone(&channel), Arc::clone(&state), &config.telemetry);
    let sender_task = tokio::spawn(sender.run(shutdown_rx.clone()));
    if !config.telemetry.enabled {
        info!("Servo frame sending disabled in configuration");
    }

    let (sequence_tx, sequence_rx) = mpsc::channel(8);
    let recognizer = Recognizer::new(
        channel,
        Box::new(model),
        mapping,
        Box::new(LogDisplay::new()),
        config.gesture.output_path.clone(),
        PollSchedule::from(&config.recognizer),
    );
    let recognizer_task = tokio::spawn(recognizer.run(sequence_rx, shutdown_rx));

    let (console_tx, mut console_rx) = mpsc::channel(8);
    console::spawn_stdin_reader(console_tx).context("Failed to start console reader")?;
    info!("Commands: save, clear, quit (or Ctrl+C)");

    let mut console_open = true;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
            command = console_rx.recv(), if console_open => {
                match command {
                    Some(Command::Save) => {
                        let _ = sequence_tx.send(SequenceCommand::Save).await;
                    }
                    Some(Command::Clear) => {
                        let _ = sequence_tx.send(SequenceCommand::Clear).await;
                    }
                    Some(Command::Quit) => {
                        info!("Quit requested, shutting down...");
                        break;
                    }
                    None => console_open = false,
                }
            }
        }
    }

    state.set_send_enabled(false);
    let _ = shutdown_tx.send(true);

    let frames_sent = sender_task.await.context("Sender task failed")?;
    let sequence = recognizer_task.await.context("Recognizer task failed")?;
    info!("Total servo frames sent: {}", frames_sent);
    if !sequence.is_empty() {
        info!("Final sequence: {}", sequence);
    }

    Ok(())
}

fn train(config: &Config) -> Result<()> {
    let (model, mapping) = gesture::train_and_save(&config.gesture).context("Failed to train gesture model")?;

    let correct = training::builtin_samples()
        .iter()
        .filter(|(id, sample)| model.predict(sample).ok() == Some(*id))
        .count();

    println!("Model saved to {}", config.gesture.model_path.display());
    println!("Gesture names saved to {}", config.gesture.mapping_path.display());
    println!("Training accuracy: {}/{}", correct, model.len());
    for (id, _) in training::GESTURE_NAMES {
        println!("  {} => {}", id, mapping.label(id));
    }

    Ok(())
}

async fn test_pattern(mut config: Config, crlf: bool) -> Result<()> {
    config.telemetry.append_crlf |= crlf;
    let frame = test_pattern_frame();
    info!("Sending test pattern {} to {} every {} ms", frame, config.serial.port, config.telemetry.send_interval_ms);
    info!("Press Ctrl+C to exit");

    let state = SharedState::shared(true);
    let channel = SerialChannel::open_native(&config.serial, Arc::clone(&state)).into_shared();
    let sender = TelemetrySender::new(channel, state, &config.telemetry).with_source(FrameSource::Fixed(frame));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sender_task = tokio::spawn(sender.run(shutdown_rx));

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;
    info!("Received Ctrl+C, shutting down...");
    let _ = shutdown_tx.send(true);

    let frames_sent = sender_task.await.context("Sender task failed")?;
    info!("Total test frames sent: {}", frames_sent);
    Ok(())
}

fn encode(text: &str) -> Result<()> {
    let sample: RawSample = text.parse().context("Expected four integers: A1,A2,A3,A4")?;
    let values = ValueTransformer::new().transform_sample(&sample);
    let frame = encode_frame(&values);

    println!("Sensor:   {}", sample);
    println!("Actuator: {:?}", values);
    println!("Frame:    {}", frame);
    Ok(())
}

fn decode(text: &str) -> Result<()> {
    let bytes = parse_hex(text)?;
    let values = decode_frame(&bytes)?;

    println!("Payload:  {:?}", values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_subcommand_is_none() {
        let cli = Cli::parse_from(["glove-bridge"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_encode_and_verbosity() {
        let cli = Cli::parse_from(["glove-bridge", "-vv", "--config", "glove.toml", "encode", "331,303,479,959"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("glove.toml"));
        assert!(matches!(cli.command, Some(Commands::Encode { ref sample }) if sample == "331,303,479,959"));
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let (config, warning) = load_config(Path::new("/nonexistent/glove-bridge.toml")).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyS1");
        assert!(warning.is_some());
    }

    #[test]
    fn test_encode_and_decode_commands() {
        assert!(encode("331,303,479,959").is_ok());
        assert!(encode("331,303,479").is_err());
        assert!(decode("A55A0A5C07F60466076607F2062F").is_ok());
        assert!(decode("A55A0A5C07F60466076607F20600").is_err());
    }
}
