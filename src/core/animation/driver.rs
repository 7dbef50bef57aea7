use crate::core::animation::errors::AnimationError;
use crate::core::animation::oscillation::{
    BoundedOscillation, DEFAULT_MAX, DEFAULT_MIN, DEFAULT_SPEED_IM, DEFAULT_SPEED_RE,
};
use crate::core::animation::rotation::{DEFAULT_ANGULAR_SPEED, Rotation};
use crate::core::data::complex::Complex;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CADENCE: Duration = Duration::from_millis(33);
pub const DEFAULT_MAX_STEPS_PER_TICK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationMode {
    #[default]
    Oscillation,
    Rotation,
}

impl AnimationMode {
    pub const ALL: &'static [Self] = &[Self::Oscillation, Self::Rotation];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Oscillation => "Oscillation",
            Self::Rotation => "Rotation",
        }
    }
}

impl std::fmt::Display for AnimationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).display_name())
    }
}

impl FromStr for AnimationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown animation mode '{s}'"))
    }
}

/// The parameter-update rule applied on every animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    Oscillation(BoundedOscillation),
    Rotation(Rotation),
}

impl AnimationState {
    #[must_use]
    pub fn from_mode(mode: AnimationMode) -> Self {
        match mode {
            AnimationMode::Oscillation => Self::Oscillation(BoundedOscillation::default()),
            AnimationMode::Rotation => Self::Rotation(Rotation::default()),
        }
    }

    /// A fresh rule for `mode` whose next step continues from `c`.
    ///
    /// Oscillation clamps `c` into its bounds; rotation takes the radius
    /// and angle of `c`.
    pub fn seeded(mode: AnimationMode, c: Complex) -> Result<Self, AnimationError> {
        match mode {
            AnimationMode::Oscillation => Ok(Self::Oscillation(BoundedOscillation::new(
                c,
                DEFAULT_SPEED_RE,
                DEFAULT_SPEED_IM,
                DEFAULT_MIN,
                DEFAULT_MAX,
            )?)),
            AnimationMode::Rotation => Ok(Self::Rotation(Rotation::new(
                c.imag.atan2(c.real),
                c.magnitude_squared().sqrt(),
                DEFAULT_ANGULAR_SPEED,
            )?)),
        }
    }

    #[must_use]
    pub fn mode(&self) -> AnimationMode {
        match self {
            Self::Oscillation(_) => AnimationMode::Oscillation,
            Self::Rotation(_) => AnimationMode::Rotation,
        }
    }

    #[must_use]
    pub fn c(&self) -> Complex {
        match self {
            Self::Oscillation(oscillation) => oscillation.c(),
            Self::Rotation(rotation) => rotation.c(),
        }
    }

    pub fn step(&mut self) -> Complex {
        match self {
            Self::Oscillation(oscillation) => oscillation.step(),
            Self::Rotation(rotation) => rotation.step(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub steps_run: u32,
    pub dropped_excess: bool,
    /// The constant after the last step, if any step ran.
    pub c: Option<Complex>,
}

/// Turns wall-clock ticks into fixed-cadence animation steps.
///
/// Leftover time carries over to the next tick. When more than
/// `max_steps_per_tick` steps are owed the surplus is dropped, so a stalled
/// caller does not trigger a burst of catch-up frames.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    state: AnimationState,
    cadence: Duration,
    max_steps_per_tick: u32,
    accumulator: Duration,
    paused: bool,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self {
            state: AnimationState::from_mode(AnimationMode::default()),
            cadence: DEFAULT_CADENCE,
            max_steps_per_tick: DEFAULT_MAX_STEPS_PER_TICK,
            accumulator: Duration::ZERO,
            paused: false,
        }
    }
}

impl AnimationDriver {
    pub fn new(
        state: AnimationState,
        cadence: Duration,
        max_steps_per_tick: u32,
    ) -> Result<Self, AnimationError> {
        if cadence.is_zero() {
            return Err(AnimationError::ZeroCadence);
        }

        Ok(Self {
            state,
            cadence,
            max_steps_per_tick: max_steps_per_tick.max(1),
            accumulator: Duration::ZERO,
            paused: false,
        })
    }

    #[must_use]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> AnimationMode {
        self.state.mode()
    }

    #[must_use]
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replaces the rule with a fresh one for `mode` and clears owed time.
    pub fn set_mode(&mut self, mode: AnimationMode) {
        self.state = AnimationState::from_mode(mode);
        self.accumulator = Duration::ZERO;
    }

    pub fn set_state(&mut self, state: AnimationState) {
        self.state = state;
        self.accumulator = Duration::ZERO;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.accumulator = Duration::ZERO;
    }

    pub fn advance(&mut self, elapsed: Duration) -> AnimationStep {
        if self.paused {
            return AnimationStep {
                steps_run: 0,
                dropped_excess: false,
                c: None,
            };
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);

        let steps_available = self.accumulator.as_nanos() / self.cadence.as_nanos();
        let max_steps = u128::from(self.max_steps_per_tick);
        let dropped_excess = steps_available > max_steps;
        let steps_run = steps_available.min(max_steps) as u32;

        let mut c = None;
        for _ in 0..steps_run {
            c = Some(self.state.step());
        }

        if dropped_excess {
            self.accumulator = Duration::ZERO;
        } else {
            self.accumulator = self
                .accumulator
                .saturating_sub(self.cadence.saturating_mul(steps_run));
        }

        AnimationStep {
            steps_run,
            dropped_excess,
            c,
        }
    }
}
