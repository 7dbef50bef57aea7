use clap::Parser;
use env_logger::Env;
use fractal_animator::{
    AnimationMode, EngineConfig, FractalEngine, FractalKinds, FrameSink, RenderEvent,
};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Renders and animates an escape-time fractal without a window, logging
/// each finished frame.
#[derive(Parser, Debug, Clone)]
#[command(name = "fractal_animator", version, about)]
pub(crate) struct Cli {
    /// Output size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1000x1000")]
    pub(crate) size: String,

    #[arg(long, default_value_t = FractalKinds::Julia)]
    pub(crate) fractal: FractalKinds,

    #[arg(long, default_value_t = AnimationMode::Oscillation)]
    pub(crate) animation: AnimationMode,

    /// Animation ticks to run after the first frame, one cadence apart.
    #[arg(long, default_value_t = 10)]
    pub(crate) ticks: u32,

    /// Iteration cap; values below one are raised to one.
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) iterations: Option<i64>,

    /// Worker threads; 0 uses every hardware thread.
    #[arg(long)]
    pub(crate) workers: Option<usize>,

    /// Extra engine settings as key=value, applied in order after the flags.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub(crate) overrides: Vec<String>,
}

impl Cli {
    pub(crate) fn engine_config(&self) -> Result<EngineConfig, fractal_animator::ConfigError> {
        let mut config = EngineConfig::default();
        config.apply_override("size", &self.size)?;
        config.fractal = self.fractal;
        config.animation_mode = self.animation;
        if let Some(iterations) = self.iterations {
            config.apply_override("iterations", &iterations.to_string())?;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.apply_overrides(self.overrides.iter().map(String::as_str));

        Ok(config)
    }
}

struct LoggingSink;

impl FrameSink for LoggingSink {
    fn submit(&self, event: RenderEvent) {
        match event {
            RenderEvent::Frame(frame) => info!(
                "generation {} ready: {}x{} in {:.2?}, {} fault(s)",
                frame.generation,
                frame.frame.width(),
                frame.frame.height(),
                frame.render_duration,
                frame.faults
            ),
            RenderEvent::Fault(fault) => {
                warn!("generation {} lost tile {:?}: {}", fault.generation, fault.tile, fault.message);
            }
            RenderEvent::Tile(_) => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;
    let cadence = config.cadence;

    let mut engine = FractalEngine::new(config, Arc::new(LoggingSink))?;
    wait_for_idle(&engine);

    for _ in 0..cli.ticks {
        engine.tick(cadence)?;
        wait_for_idle(&engine);
    }

    info!(
        "finished at generation {} ({} completed)",
        engine.latest_generation(),
        engine.last_completed_generation()
    );
    engine.shutdown();

    Ok(())
}

fn wait_for_idle(engine: &FractalEngine) {
    if !engine.wait_until_idle(IDLE_TIMEOUT) {
        warn!("render still running after {IDLE_TIMEOUT:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_defaults_are_stable() {
        let cli = Cli::try_parse_from(["fractal_animator"]).unwrap();
        let config = cli.engine_config().unwrap();

        assert_eq!((config.width, config.height), (1000, 1000));
        assert_eq!(config.fractal, FractalKinds::Julia);
        assert_eq!(config.animation_mode, AnimationMode::Oscillation);
        assert_eq!(cli.ticks, 10);
    }

    #[test]
    fn parse_args_overrides_work() {
        let cli = Cli::try_parse_from([
            "fractal_animator",
            "--size",
            "320x200",
            "--fractal",
            "mandelbrot",
            "--animation",
            "rotation",
            "--iterations",
            "-4",
            "--workers",
            "3",
            "--set",
            "tile_size=20",
            "--set",
            "notify=batched",
        ])
        .unwrap();
        let config = cli.engine_config().unwrap();

        assert_eq!((config.width, config.height), (320, 200));
        assert_eq!(config.fractal, FractalKinds::Mandelbrot);
        assert_eq!(config.animation_mode, AnimationMode::Rotation);
        assert_eq!(config.max_iterations, 1);
        assert_eq!(config.workers, 3);
        assert_eq!(config.tile_size.get(), 20);
    }

    #[test]
    fn zero_size_is_rejected() {
        let cli = Cli::try_parse_from(["fractal_animator", "--size", "0x10"]).unwrap();

        assert!(cli.engine_config().is_err());
    }

    #[test]
    fn unknown_fractal_is_rejected() {
        assert!(Cli::try_parse_from(["fractal_animator", "--fractal", "newton"]).is_err());
    }
}
