//! # Scalar Quantizers
//!
//! Fixed-point conversion of continuous world values to `i16`.
//!
//! - **Coordinates**: scaled by the tile dimension and truncated toward zero,
//!   so decoding is off by strictly less than one wire unit (`1 / tile_dim`).
//! - **Velocities**: mapped linearly onto the full `i16` range against the
//!   configured maximum. Magnitudes at or above the maximum are a simulation
//!   bug and fail instead of clamping.

use crate::error::{EncodeError, EncodeResult};

/// Wire units per unit of normalized velocity.
const VELOCITY_SCALE: f64 = 32768.0;

/// Converts a world X coordinate to wire units.
///
/// Out-of-range results saturate at the `i16` bounds.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_coord_x(value: f64, tile_width: f64) -> i16 {
    (value * tile_width) as i16
}

/// Converts a world Y coordinate to wire units.
///
/// Out-of-range results saturate at the `i16` bounds.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_coord_y(value: f64, tile_height: f64) -> i16 {
    (value * tile_height) as i16
}

/// Converts wire units back to a world X coordinate.
#[inline]
#[must_use]
pub fn decode_coord_x(raw: i16, tile_width: f64) -> f64 {
    f64::from(raw) / tile_width
}

/// Converts wire units back to a world Y coordinate.
#[inline]
#[must_use]
pub fn decode_coord_y(raw: i16, tile_height: f64) -> f64 {
    f64::from(raw) / tile_height
}

/// Converts one velocity component to wire units.
///
/// # Errors
///
/// Returns [`EncodeError::VelocityOutOfRange`] if `|value| >= max_velocity`
/// or `value` is NaN.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_velocity(value: f64, max_velocity: f64) -> EncodeResult<i16> {
    // Written so that NaN lands in the error branch.
    if !(value.abs() < max_velocity) {
        return Err(EncodeError::VelocityOutOfRange { value, max: max_velocity });
    }
    Ok((value * VELOCITY_SCALE / max_velocity) as i16)
}

/// Converts wire units back to one velocity component.
#[inline]
#[must_use]
pub fn decode_velocity(raw: i16, max_velocity: f64) -> f64 {
    f64::from(raw) * max_velocity / VELOCITY_SCALE
}
