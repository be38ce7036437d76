use anyhow::Result;
use clap::Parser;
use lodestone_core::config::SettingsHandle;
use lodestone_core::console::Console;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Interactive console for the lodestone command system
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file. Missing keys are filled in with defaults.
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,

    /// Act as this player instead of the console.
    #[arg(long)]
    player: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "lodestone.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("LODESTONE_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(io::stdout))
        .with_env_filter(env_filter)
        .init();

    let settings = SettingsHandle::load(&args.config)?;
    info!("Loaded configuration from {}", args.config.display());

    let mut console = Console::new(settings);
    if let Some(player) = &args.player {
        for line in console.handle_line(&format!(":as {player}")) {
            println!("{line}");
        }
    }
    console.run(io::stdin().lock(), io::stdout().lock())
}
