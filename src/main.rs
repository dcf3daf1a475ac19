// main.rs - CLI entry point

use seqconvert::cli::{log_level, usage, Config};
use seqconvert::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG wins, then the configured level
fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();

    if args.version {
        println!("{}", seqconvert::VERSION);
        return Ok(());
    }

    if args.generate_config {
        print!("{}", Config::generate_sample());
        eprintln!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    if args.paths.len() < 4 {
        eprint!("{}", usage(&FormatRegistry::new()));
        std::process::exit(1);
    }

    setup_logging(log_level(&args));
    debug!("{}", seqconvert::get_info());
    if let Some(config_path) = &args.config {
        info!("Loaded configuration from: {}", config_path);
    }

    let validated = validate_args(&args)?;
    let summary = validated.converter.convert(&validated.request)?;
    info!(
        "Converted {} record(s) into {} item(s) across {} file(s)",
        summary.records_read,
        summary.items_written,
        summary.files.len()
    );
    Ok(())
}
