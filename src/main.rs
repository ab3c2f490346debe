//! Sends one text message through the bot configured in the environment.
//!
//! ```text
//! lineworks-bot user@example.com "Hello from the bot."
//! ```

// std
use std::path::{Path, PathBuf};
// crates.io
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use lineworks_bot::{bot, config::BotConfig};

const LOG_FILE_PREFIX: &str = "lineworks_bot";
const LOG_FILES_KEPT: usize = 5;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Recipient user identifier, for example `user@example.com`.
	recipient: String,
	/// Message text.
	message: String,
	/// Directory for rotating log files; file logging is skipped when it does not exist.
	#[arg(long, env = "LOG_DIR", default_value = "logs")]
	log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();
	let _guard = init_logging(&cli.log_dir)?;
	let config = BotConfig::from_env()?;

	if bot::send_bot_message(&config, &cli.recipient, &cli.message).await {
		Ok(())
	} else {
		Err(eyre!("Message delivery to {} failed.", cli.recipient))
	}
}

fn init_logging(log_dir: &Path) -> Result<Option<WorkerGuard>> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let console = fmt::layer().with_writer(std::io::stdout);

	if !log_dir.is_dir() {
		tracing_subscriber::registry().with(filter).with(console).try_init()?;

		return Ok(None);
	}

	let appender = RollingFileAppender::builder()
		.rotation(Rotation::DAILY)
		.filename_prefix(LOG_FILE_PREFIX)
		.filename_suffix("log")
		.max_log_files(LOG_FILES_KEPT)
		.build(log_dir)?;
	let (writer, guard) = tracing_appender::non_blocking(appender);

	tracing_subscriber::registry()
		.with(filter)
		.with(console)
		.with(fmt::layer().with_ansi(false).with_writer(writer))
		.try_init()?;

	Ok(Some(guard))
}
