//! RGBA color value with a hue/saturation/brightness view.
//!
//! [`ColorValue`] is a plain `Copy` type: every mutation returns a new value,
//! so a color picked from a palette can never alias the palette entry.

use crate::geom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Channel level at or above which a color counts as white.
const WHITE_THRESHOLD: f64 = 0.95;

/// Channel level at or below which a color counts as black.
const BLACK_THRESHOLD: f64 = 0.05;

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RgbaComponents")]
pub struct ColorValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Unchecked components as they appear in serialized data.
#[derive(Deserialize)]
struct RgbaComponents {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl From<RgbaComponents> for ColorValue {
    fn from(c: RgbaComponents) -> Self {
        ColorValue::new(c.r, c.g, c.b, c.a)
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::black()
    }
}

impl ColorValue {
    /// Create a color from RGBA components. Components are clamped to `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
            a: clamp_unit(a),
        }
    }

    /// Opaque color from RGB components.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    /// Create a color from hue, saturation, brightness and alpha.
    ///
    /// Hue wraps into `[0, 1)`; the other channels are clamped.
    pub fn from_hsba(hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        let (r, g, b) = hsb_to_rgb(hue.rem_euclid(1.0), clamp_unit(saturation), clamp_unit(brightness));
        Self::new(r, g, b, alpha)
    }

    /// Opaque gray at the given level.
    pub fn gray_level(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    pub fn gray() -> Self {
        Self::gray_level(0.5)
    }

    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Self {
        Self::rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Self {
        Self::rgb(0.0, 0.0, 1.0)
    }

    pub fn cyan() -> Self {
        Self::rgb(0.0, 1.0, 1.0)
    }

    pub fn magenta() -> Self {
        Self::rgb(1.0, 0.0, 1.0)
    }

    pub fn yellow() -> Self {
        Self::rgb(1.0, 1.0, 0.0)
    }

    pub fn orange() -> Self {
        Self::rgb(1.0, 0.6, 0.0)
    }

    pub fn beige() -> Self {
        Self::from_rgba8(245, 245, 220, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Random opaque color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
            rng.gen_range(0.0..=1.0),
        )
    }

    /// Hue in `[0, 1)`. Achromatic colors report 0.
    pub fn hue(&self) -> f64 {
        self.hsb().0
    }

    pub fn saturation(&self) -> f64 {
        self.hsb().1
    }

    pub fn brightness(&self) -> f64 {
        self.hsb().2
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Hue, saturation, brightness and alpha.
    pub fn hsba(&self) -> (f64, f64, f64, f64) {
        let (h, s, b) = self.hsb();
        (h, s, b, self.a)
    }

    fn hsb(&self) -> (f64, f64, f64) {
        rgb_to_hsb(self.r, self.g, self.b)
    }

    /// Same color with the hue replaced (wrapped into `[0, 1)`).
    pub fn with_hue(&self, hue: f64) -> Self {
        let (_, s, b) = self.hsb();
        Self::from_hsba(hue, s, b, self.a)
    }

    /// Same color with the saturation replaced (clamped).
    pub fn with_saturation(&self, saturation: f64) -> Self {
        let (h, _, b) = self.hsb();
        Self::from_hsba(h, saturation, b, self.a)
    }

    /// Same color with the brightness replaced (clamped).
    pub fn with_brightness(&self, brightness: f64) -> Self {
        let (h, s, _) = self.hsb();
        Self::from_hsba(h, s, brightness, self.a)
    }

    /// Same color with the alpha replaced (clamped).
    pub fn with_alpha(&self, alpha: f64) -> Self {
        Self { a: clamp_unit(alpha), ..*self }
    }

    /// Shift every HSB channel and alpha by a delta. Hue wraps, the rest clamp.
    ///
    /// A zero shift returns the color untouched, with no conversion round-trip.
    pub fn shifted(&self, hue: f64, saturation: f64, brightness: f64, alpha: f64) -> Self {
        if hue == 0.0 && saturation == 0.0 && brightness == 0.0 {
            return self.with_alpha(self.a + alpha);
        }
        let (h, s, b) = self.hsb();
        Self::from_hsba(h + hue, s + saturation, b + brightness, self.a + alpha)
    }

    /// Color on the opposite side of the hue wheel.
    pub fn complementary(&self) -> Self {
        self.shifted(0.5, 0.0, 0.0, 0.0)
    }

    /// Nearby color: hue shifted by a random amount in `[-degrees, degrees]`,
    /// saturation and brightness each varied by a random amount in
    /// `[-variance, variance]`.
    pub fn analog<R: Rng + ?Sized>(&self, rng: &mut R, degrees: f64, variance: f64) -> Self {
        let hue = geom::random(rng, -degrees, degrees) / 360.0;
        let saturation = geom::random(rng, -variance, variance);
        let brightness = geom::random(rng, -variance, variance);
        self.shifted(hue, saturation, brightness, 0.0)
    }

    /// Reduce brightness by the given fraction of its current value.
    pub fn darken(&self, amount: f64) -> Self {
        if amount == 0.0 {
            return *self;
        }
        let b = self.brightness();
        self.with_brightness(b * (1.0 - clamp_unit(amount)))
    }

    /// Move brightness toward 1 by the given fraction of the remaining headroom.
    pub fn lighten(&self, amount: f64) -> Self {
        if amount == 0.0 {
            return *self;
        }
        let b = self.brightness();
        self.with_brightness(b + (1.0 - b) * clamp_unit(amount))
    }

    /// Polar angles `(theta, psi)` of the RGB vector, used to sort palettes.
    pub fn spherical_coordinates(&self) -> (f64, f64) {
        let rho = (self.r * self.r + self.g * self.g + self.b * self.b).sqrt();
        let theta = self.g.atan2(self.r);
        let psi = if rho > 0.0 { (self.b / rho).acos() } else { 0.0 };
        (theta, psi)
    }

    pub fn is_white(&self) -> bool {
        self.r >= WHITE_THRESHOLD && self.g >= WHITE_THRESHOLD && self.b >= WHITE_THRESHOLD
    }

    pub fn is_black(&self) -> bool {
        self.r <= BLACK_THRESHOLD && self.g <= BLACK_THRESHOLD && self.b <= BLACK_THRESHOLD
    }

    /// Total ordering by brightness, ties broken on the raw components.
    pub fn cmp_brightness(&self, other: &Self) -> Ordering {
        self.brightness()
            .total_cmp(&other.brightness())
            .then_with(|| self.cmp_components(other))
    }

    /// Total ordering by `psi` then `theta` of [`spherical_coordinates`](Self::spherical_coordinates).
    pub fn cmp_spherical(&self, other: &Self) -> Ordering {
        let (t0, p0) = self.spherical_coordinates();
        let (t1, p1) = other.spherical_coordinates();
        p0.total_cmp(&p1)
            .then_with(|| t0.total_cmp(&t1))
            .then_with(|| self.cmp_components(other))
    }

    fn cmp_components(&self, other: &Self) -> Ordering {
        self.r
            .total_cmp(&other.r)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| self.b.total_cmp(&other.b))
            .then_with(|| self.a.total_cmp(&other.a))
    }

    /// Component-wise comparison within a tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.r - other.r).abs() <= tolerance
            && (self.g - other.g).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.a - other.a).abs() <= tolerance
    }
}

impl From<ColorValue> for peniko::Color {
    fn from(c: ColorValue) -> Self {
        peniko::Color::new([c.r as f32, c.g as f32, c.b as f32, c.a as f32])
    }
}

impl From<peniko::Color> for ColorValue {
    fn from(c: peniko::Color) -> Self {
        let [r, g, b, a] = c.components;
        ColorValue::new(f64::from(r), f64::from(g), f64::from(b), f64::from(a))
    }
}

fn clamp_unit(v: f64) -> f64 {
    geom::in_range(v, 0.0, 1.0)
}

/// Standard RGB to HSB (HSV) conversion. All values in `[0, 1]`.
fn rgb_to_hsb(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { delta / max } else { 0.0 };
    let hue = if delta <= 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    (hue, saturation, max)
}

/// Standard HSB (HSV) to RGB conversion. Hue in `[0, 1)`.
fn hsb_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let h6 = h * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as i64 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_deserialize_clamps_components() {
        let c: ColorValue = serde_json::from_str(r#"{"r":5.0,"g":-1.0,"b":0.5,"a":2.0}"#).unwrap();
        assert_eq!(c, ColorValue::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_primary_hues() {
        assert!(ColorValue::red().hue().abs() < EPS);
        assert!((ColorValue::green().hue() - 1.0 / 3.0).abs() < EPS);
        assert!((ColorValue::blue().hue() - 2.0 / 3.0).abs() < EPS);
        assert!((ColorValue::red().saturation() - 1.0).abs() < EPS);
        assert!((ColorValue::gray().brightness() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_hsb_roundtrip() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let color = ColorValue::new(
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
                rng.gen_range(0.0..=1.0),
            );
            let (h, s, b, a) = color.hsba();
            let back = ColorValue::from_hsba(h, s, b, a);
            assert!(back.approx_eq(&color, EPS), "{color:?} -> {back:?}");

            let (h2, s2, b2, a2) = back.hsba();
            assert!((s2 - s).abs() < EPS);
            assert!((b2 - b).abs() < EPS);
            assert!((a2 - a).abs() < EPS);
            if s > EPS {
                let dh = (h2 - h).abs();
                assert!(dh < EPS || (1.0 - dh) < EPS);
            }
        }
    }

    #[test]
    fn test_hue_wraps() {
        let c = ColorValue::red().with_hue(1.25);
        assert!((c.hue() - 0.25).abs() < EPS);
        let c = ColorValue::red().with_hue(-0.25);
        assert!((c.hue() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_channels_clamp() {
        let c = ColorValue::red().with_saturation(1.5).with_alpha(-0.2);
        assert!((c.saturation() - 1.0).abs() < EPS);
        assert_eq!(c.a, 0.0);
        let c = ColorValue::gray().shifted(0.0, 0.0, 0.9, 0.0);
        assert!((c.brightness() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_analog_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let color = ColorValue::new(0.2, 0.4, 0.6, 0.8);
        assert_eq!(color.analog(&mut rng, 0.0, 0.0), color);
    }

    #[test]
    fn test_analog_stays_near() {
        let mut rng = StdRng::seed_from_u64(3);
        let color = ColorValue::from_hsba(0.5, 0.5, 0.5, 1.0);
        for _ in 0..50 {
            let near = color.analog(&mut rng, 36.0, 0.1);
            assert!((near.hue() - 0.5).abs() <= 0.1 + EPS);
            assert!((near.saturation() - 0.5).abs() <= 0.1 + EPS);
            assert!((near.brightness() - 0.5).abs() <= 0.1 + EPS);
        }
    }

    #[test]
    fn test_complementary() {
        let c = ColorValue::red().complementary();
        assert!(c.approx_eq(&ColorValue::cyan(), EPS));
    }

    #[test]
    fn test_darken_lighten() {
        let c = ColorValue::gray_level(0.8).darken(0.5);
        assert!((c.brightness() - 0.4).abs() < EPS);
        let c = ColorValue::gray_level(0.6).lighten(0.5);
        assert!((c.brightness() - 0.8).abs() < EPS);
        let c = ColorValue::new(0.1, 0.2, 0.3, 1.0);
        assert_eq!(c.darken(0.0), c);
    }

    #[test]
    fn test_sorting_is_total_and_stable() {
        let mut colors = vec![
            ColorValue::white(),
            ColorValue::black(),
            ColorValue::gray(),
            ColorValue::red(),
            ColorValue::blue(),
        ];
        colors.sort_by(|a, b| a.cmp_brightness(b));
        assert_eq!(colors[0], ColorValue::black());
        assert_eq!(colors[1], ColorValue::gray());
        // Blue, red and white share brightness 1; components break the tie.
        assert_eq!(colors[2], ColorValue::blue());
        assert_eq!(colors[3], ColorValue::red());
        assert_eq!(colors[4], ColorValue::white());

        colors.sort_by(|a, b| a.cmp_spherical(b));
        assert_eq!(colors[0], ColorValue::black());
        assert_eq!(colors[1], ColorValue::blue());
    }

    #[test]
    fn test_white_black_predicates() {
        assert!(ColorValue::white().is_white());
        assert!(!ColorValue::beige().is_white());
        assert!(ColorValue::black().is_black());
    }

    #[test]
    fn test_peniko_conversion() {
        let color = ColorValue::new(0.25, 0.5, 0.75, 1.0);
        let peniko_color: peniko::Color = color.into();
        let back = ColorValue::from(peniko_color);
        assert!(back.approx_eq(&color, 1e-6));
    }
}
