use crate::core::actions::partition::partition::DEFAULT_TILE_SIZE;
use crate::core::animation::driver::{AnimationMode, DEFAULT_CADENCE, DEFAULT_MAX_STEPS_PER_TICK};
use crate::core::fractals::colour_mapping::kinds::ColourMapKinds;
use crate::core::fractals::params::{DEFAULT_MAX_ITERATIONS, clamp_max_iterations};
use crate::core::fractals::variant::FractalKinds;
use crate::core::viewport::pixel_mapping::PixelMapping;
use crate::core::viewport::view_transform::ScaleReference;
use log::warn;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown setting '{key}'")]
    UnknownKey { key: String },
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("expected key=value, got '{entry}'")]
    MalformedOverride { entry: String },
}

/// When frame-ready fires for tile-composed renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// After every tile write, and once more when the generation completes.
    #[default]
    Progressive,
    /// Only when the generation completes.
    Batched,
}

impl NotifyMode {
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Progressive => "Progressive",
            Self::Batched => "Batched",
        }
    }
}

impl std::fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub fractal: FractalKinds,
    /// `None` keeps the fractal's own colour map.
    pub colour_map: Option<ColourMapKinds>,
    /// `None` keeps the fractal's own pixel mapping.
    pub pixel_mapping: Option<PixelMapping>,
    pub scale_reference: ScaleReference,
    pub animation_mode: AnimationMode,
    pub cadence: Duration,
    pub max_steps_per_tick: u32,
    pub tile_size: NonZeroU32,
    pub notify_mode: NotifyMode,
    /// Zero means one worker per hardware thread.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            fractal: FractalKinds::default(),
            colour_map: None,
            pixel_mapping: None,
            scale_reference: ScaleReference::default(),
            animation_mode: AnimationMode::default(),
            cadence: DEFAULT_CADENCE,
            max_steps_per_tick: DEFAULT_MAX_STEPS_PER_TICK,
            tile_size: NonZeroU32::new(DEFAULT_TILE_SIZE).unwrap_or(NonZeroU32::MIN),
            notify_mode: NotifyMode::default(),
            workers: 0,
        }
    }
}

impl EngineConfig {
    pub const KEYS: &'static [&'static str] = &[
        "width",
        "height",
        "size",
        "iterations",
        "fractal",
        "colour_map",
        "mapping",
        "scale",
        "animation",
        "cadence_ms",
        "max_steps_per_tick",
        "tile_size",
        "notify",
        "workers",
    ];

    /// Applies one textual setting. On error the configuration is unchanged.
    ///
    /// `iterations` accepts any integer and clamps it into `1..=u32::MAX`;
    /// text that is not an integer is rejected.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "width" => self.width = parse_dimension(value).map_err(|e| invalid(e.as_str()))?,
            "height" => self.height = parse_dimension(value).map_err(|e| invalid(e.as_str()))?,
            "size" => {
                let (width, height) = value
                    .split_once(|c: char| c.eq_ignore_ascii_case(&'x'))
                    .ok_or_else(|| invalid("expected WIDTHxHEIGHT"))?;
                let width = parse_dimension(width).map_err(|e| invalid(e.as_str()))?;
                let height = parse_dimension(height).map_err(|e| invalid(e.as_str()))?;
                self.width = width;
                self.height = height;
            }
            "iterations" => {
                let requested: i64 = value.parse().map_err(|_| invalid("not an integer"))?;
                self.max_iterations = clamp_max_iterations(requested);
            }
            "fractal" => self.fractal = value.parse().map_err(|e: String| invalid(e.as_str()))?,
            "colour_map" => {
                self.colour_map = if value.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    Some(value.parse().map_err(|e: String| invalid(e.as_str()))?)
                }
            }
            "mapping" => {
                self.pixel_mapping = match value.to_ascii_lowercase().as_str() {
                    "auto" => None,
                    "standard" => Some(PixelMapping::Standard),
                    "warped" | "warped-julia" => Some(PixelMapping::WarpedJulia),
                    _ => return Err(invalid("expected auto, standard or warped")),
                }
            }
            "scale" => {
                self.scale_reference = match value.to_ascii_lowercase().as_str() {
                    "width" => ScaleReference::Width,
                    "short-side" | "short_side" => ScaleReference::ShortSide,
                    _ => return Err(invalid("expected width or short-side")),
                }
            }
            "animation" => self.animation_mode = value.parse().map_err(|e: String| invalid(e.as_str()))?,
            "cadence_ms" => {
                let millis: u64 = value.parse().map_err(|_| invalid("not a whole number"))?;
                if millis == 0 {
                    return Err(invalid("must be positive"));
                }
                self.cadence = Duration::from_millis(millis);
            }
            "max_steps_per_tick" => {
                let steps: u32 = value.parse().map_err(|_| invalid("not a whole number"))?;
                if steps == 0 {
                    return Err(invalid("must be positive"));
                }
                self.max_steps_per_tick = steps;
            }
            "tile_size" => {
                let size: u32 = value.parse().map_err(|_| invalid("not a whole number"))?;
                self.tile_size = NonZeroU32::new(size).ok_or_else(|| invalid("must be positive"))?;
            }
            "notify" => {
                self.notify_mode = match value.to_ascii_lowercase().as_str() {
                    "progressive" => NotifyMode::Progressive,
                    "batched" => NotifyMode::Batched,
                    _ => return Err(invalid("expected progressive or batched")),
                }
            }
            "workers" => self.workers = value.parse().map_err(|_| invalid("not a whole number"))?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Applies `key=value` entries in order, keeping the last good value for
    /// any entry that fails. Rejected entries are logged and returned.
    pub fn apply_overrides<'a, I>(&mut self, entries: I) -> Vec<ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rejected = Vec::new();

        for entry in entries {
            let result = split_override(entry).and_then(|(key, value)| self.apply_override(key, value));

            if let Err(err) = result {
                warn!("ignoring setting: {err}");
                rejected.push(err);
            }
        }

        rejected
    }
}

pub fn split_override(entry: &str) -> Result<(&str, &str), ConfigError> {
    entry
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::MalformedOverride {
            entry: entry.to_string(),
        })
}

fn parse_dimension(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err("must be positive".to_string()),
        Ok(dimension) => Ok(dimension),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!((config.width, config.height), (1000, 1000));
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.fractal, FractalKinds::Julia);
        assert_eq!(config.animation_mode, AnimationMode::Oscillation);
        assert_eq!(config.tile_size.get(), 50);
        assert_eq!(config.cadence, Duration::from_millis(33));
        assert_eq!(config.notify_mode, NotifyMode::Progressive);
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_apply_override_sets_values() {
        let mut config = EngineConfig::default();

        config.apply_override("size", "640x480").unwrap();
        config.apply_override("fractal", "mandelbrot").unwrap();
        config.apply_override("iterations", "300").unwrap();
        config.apply_override("colour_map", "banded").unwrap();
        config.apply_override("notify", "batched").unwrap();
        config.apply_override("scale", "short-side").unwrap();

        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.fractal, FractalKinds::Mandelbrot);
        assert_eq!(config.max_iterations, 300);
        assert_eq!(config.colour_map, Some(ColourMapKinds::Banded));
        assert_eq!(config.notify_mode, NotifyMode::Batched);
        assert_eq!(config.scale_reference, ScaleReference::ShortSide);
    }

    #[test]
    fn test_iterations_clamp_non_positive_to_one() {
        let mut config = EngineConfig::default();

        config.apply_override("iterations", "-20").unwrap();
        assert_eq!(config.max_iterations, 1);

        config.apply_override("iterations", "0").unwrap();
        assert_eq!(config.max_iterations, 1);
    }

    #[test]
    fn test_non_numeric_iterations_keep_last_good_value() {
        let mut config = EngineConfig::default();
        config.apply_override("iterations", "250").unwrap();

        let result = config.apply_override("iterations", "lots");

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(config.max_iterations, 250);
    }

    #[test]
    fn test_half_valid_size_leaves_both_dimensions() {
        let mut config = EngineConfig::default();

        assert!(config.apply_override("size", "800x0").is_err());
        assert_eq!((config.width, config.height), (1000, 1000));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let mut config = EngineConfig::default();

        assert!(config.apply_override("width", "0").is_err());
        assert_eq!(config.width, 1000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut config = EngineConfig::default();

        assert_eq!(
            config.apply_override("colour", "red"),
            Err(ConfigError::UnknownKey {
                key: "colour".to_string()
            })
        );
    }

    #[test]
    fn test_apply_overrides_keeps_going_after_rejects() {
        let mut config = EngineConfig::default();

        let rejected = config.apply_overrides([
            "tile_size=32",
            "tile_size=0",
            "nonsense",
            "workers=3",
            "animation=rotation",
        ]);

        assert_eq!(rejected.len(), 2);
        assert!(matches!(rejected[1], ConfigError::MalformedOverride { .. }));
        assert_eq!(config.tile_size.get(), 32);
        assert_eq!(config.workers, 3);
        assert_eq!(config.animation_mode, AnimationMode::Rotation);
    }

    #[test]
    fn test_every_listed_key_is_known() {
        for key in EngineConfig::KEYS {
            let mut config = EngineConfig::default();
            let result = config.apply_override(key, "");
            assert!(
                !matches!(result, Err(ConfigError::UnknownKey { .. })),
                "{key} is listed but not handled"
            );
        }
    }
}
