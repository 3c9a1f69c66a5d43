//! Small geometry and sampling helpers used throughout drawing scripts.
//!
//! Angles exposed to callers are in degrees.

use crate::error::{GraphicsError, GraphicsResult};
use kurbo::{Point, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Convert degrees to radians.
pub fn radians(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees.
pub fn degrees(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Angle in degrees of the line joining two points.
pub fn angle(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    degrees((y1 - y0).atan2(x1 - x0))
}

/// Distance between two points.
pub fn distance(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    Vec2::new(x1 - x0, y1 - y0).hypot()
}

/// Point at the given distance and angle (degrees) from a starting point.
pub fn coordinates(x0: f64, y0: f64, distance: f64, angle: f64) -> Point {
    let rad = radians(angle);
    Point::new(x0 + rad.cos() * distance, y0 + rad.sin() * distance)
}

/// Restrict a value to `[min, max]`.
pub fn in_range(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Uniform sample in `[lo, hi]`. Bounds may be given in either order.
///
/// Returns NaN when either bound is not finite; drawing calls reject it.
pub fn random<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if !lo.is_finite() || !hi.is_finite() {
        return f64::NAN;
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo == hi {
        return lo;
    }
    if (hi - lo).is_finite() {
        return rng.gen_range(lo..=hi);
    }
    // Width overflows: interpolate between the bounds instead.
    let t: f64 = rng.gen_range(0.0..=1.0);
    in_range(lo * (1.0 - t) + hi * t, lo, hi)
}

/// Reflect `(x1, y1)` through `(x0, y0)`, scaling the distance by `d` and
/// rotating by `a` degrees (180 is a straight mirror).
pub fn reflect(x0: f64, y0: f64, x1: f64, y1: f64, d: f64, a: f64) -> Point {
    let d = d * distance(x0, y0, x1, y1);
    let a = a + angle(x0, y0, x1, y1);
    coordinates(x0, y0, d, a)
}

/// Anchor location of a box, used by [`reorient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    BottomLeft,
    CenterLeft,
    TopLeft,
    BottomRight,
    CenterRight,
    TopRight,
    BottomCenter,
    #[default]
    Center,
    TopCenter,
}

impl FromStr for Location {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom_left" => Ok(Location::BottomLeft),
            "center_left" => Ok(Location::CenterLeft),
            "top_left" => Ok(Location::TopLeft),
            "bottom_right" => Ok(Location::BottomRight),
            "center_right" => Ok(Location::CenterRight),
            "top_right" => Ok(Location::TopRight),
            "bottom_center" => Ok(Location::BottomCenter),
            "center" => Ok(Location::Center),
            "top_center" => Ok(Location::TopCenter),
            other => Err(GraphicsError::Configuration(format!(
                "origin locator not recognized: {other}"
            ))),
        }
    }
}

/// Offset needed to move a box at `(x, y)` with size `w`×`h` so that the
/// given anchor lands on the origin.
pub fn reorient(x: f64, y: f64, w: f64, h: f64, location: Location) -> Vec2 {
    let (dx, dy) = match location {
        Location::BottomLeft => (-x, -y),
        Location::CenterLeft => (-x, -y - h / 2.0),
        Location::TopLeft => (-x, -y - h),
        Location::BottomRight => (-x - w, -y),
        Location::CenterRight => (-x - w, -y - h / 2.0),
        Location::TopRight => (-x - w, -y - h),
        Location::BottomCenter => (-x - w / 2.0, -y),
        Location::Center => (-x - w / 2.0, -y - h / 2.0),
        Location::TopCenter => (-x - w / 2.0, -y - h),
    };
    Vec2::new(dx, dy)
}

/// Reject non-finite numbers passed to drawing calls.
pub fn ensure_finite(name: &str, values: &[f64]) -> GraphicsResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GraphicsError::InvalidArgument(format!("{name}: coordinates must be finite")))
    }
}
