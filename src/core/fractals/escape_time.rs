use crate::core::data::complex::Complex;

pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Iterates `z <- z^2 + c` from `z0` and returns the number of steps taken
/// before `|z|^2` reached the escape radius, capped at `max_iterations`.
///
/// A result equal to `max_iterations` means the point is treated as inside
/// the set.
#[inline]
#[must_use]
pub fn escape_time(z0: Complex, c: Complex, max_iterations: u32) -> u32 {
    let mut z = z0;
    let mut iterations = 0;

    while z.magnitude_squared() < ESCAPE_RADIUS_SQUARED && iterations < max_iterations {
        z = z * z + c;
        iterations += 1;
    }

    iterations
}
