//! tone - volume and three-band tone control for WAV files
use clap::Parser;
use tone_cli::{Cli, ToneConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tone=debug,tone_cli=debug,tone_dsp=debug,tone_io=debug"
    } else {
        "tone=info,tone_cli=info,tone_dsp=info,tone_io=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ToneConfig::load(cli.config.as_deref())?;
    tone_cli::run(&cli, &config)
}
