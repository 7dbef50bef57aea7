use clap::Parser;
use env_logger::Env;
use fractal_animator::{EngineConfig, run_gui};

/// Interactive animated fractal viewer.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Initial window size as WIDTHxHEIGHT.
    #[arg(long, default_value = "800x800")]
    size: String,

    /// Engine settings as key=value, applied in order.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = EngineConfig::default();
    config.apply_override("size", &args.size)?;
    config.apply_overrides(args.overrides.iter().map(String::as_str));

    run_gui(config)?;
    Ok(())
}
