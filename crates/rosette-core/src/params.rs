//! Declarative parameter specs resolved at render time.
//!
//! A [`Path`](crate::Path) carries two [`ParamMap`]s, one for per-iteration
//! random perturbation and one for cumulative drift. Each entry maps an
//! [`Attribute`] to a [`ParamSpec`] that is sampled with [`ParamSpec::choose_number`]
//! or [`ParamSpec::choose_color`].

use crate::color::ColorValue;
use crate::error::{GraphicsError, GraphicsResult};
use crate::geom;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute names a parameter spec can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    /// Rotation in degrees.
    Rotation,
    Hue,
    Saturation,
    Brightness,
    Alpha,
    StrokeWidth,
    Fill,
    Stroke,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::X,
        Attribute::Y,
        Attribute::Scale,
        Attribute::ScaleX,
        Attribute::ScaleY,
        Attribute::Rotation,
        Attribute::Hue,
        Attribute::Saturation,
        Attribute::Brightness,
        Attribute::Alpha,
        Attribute::StrokeWidth,
        Attribute::Fill,
        Attribute::Stroke,
    ];

    /// Whether this attribute takes colors rather than numbers.
    pub fn is_color(self) -> bool {
        matches!(self, Attribute::Fill | Attribute::Stroke)
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::X => "x",
            Attribute::Y => "y",
            Attribute::Scale => "scale",
            Attribute::ScaleX => "scale_x",
            Attribute::ScaleY => "scale_y",
            Attribute::Rotation => "rotation",
            Attribute::Hue => "hue",
            Attribute::Saturation => "saturation",
            Attribute::Brightness => "brightness",
            Attribute::Alpha => "alpha",
            Attribute::StrokeWidth => "stroke_width",
            Attribute::Fill => "fill",
            Attribute::Stroke => "stroke",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| GraphicsError::Configuration(format!("unknown attribute: {s}")))
    }
}

/// Whether a numeric range samples reals or integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    #[default]
    Continuous,
    Discrete,
}

/// How an attribute's value is chosen at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSpec {
    /// Always the same number.
    Constant(f64),
    /// Uniform sample in `[lo, hi]`, integers only when `kind` is discrete.
    Range { lo: f64, hi: f64, kind: RangeKind },
    /// Uniform pick from a list of numbers.
    Choice(Vec<f64>),
    /// Always the same color.
    Color(ColorValue),
    /// Uniform pick from a list of colors (cycled in order when incremented).
    Palette(Vec<ColorValue>),
}

impl ParamSpec {
    /// Continuous range. Bounds may be given in either order.
    pub fn range(lo: f64, hi: f64) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        ParamSpec::Range {
            lo,
            hi,
            kind: RangeKind::Continuous,
        }
    }

    /// Inclusive integer range. Bounds may be given in either order.
    pub fn int_range(lo: i64, hi: i64) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        ParamSpec::Range {
            lo: lo as f64,
            hi: hi as f64,
            kind: RangeKind::Discrete,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, ParamSpec::Color(_) | ParamSpec::Palette(_))
    }

    /// Colors listed by this spec, in declaration order.
    pub fn colors(&self) -> &[ColorValue] {
        match self {
            ParamSpec::Color(c) => std::slice::from_ref(c),
            ParamSpec::Palette(list) => list,
            _ => &[],
        }
    }

    /// Check that the spec is usable for `attr`.
    pub fn validate(&self, attr: Attribute) -> GraphicsResult<()> {
        if attr.is_color() != self.is_color() {
            let expected = if attr.is_color() { "a color" } else { "a number" };
            return Err(GraphicsError::Configuration(format!(
                "{attr} expects {expected} spec, got {self:?}"
            )));
        }
        match self {
            ParamSpec::Constant(v) if !v.is_finite() => Err(GraphicsError::Configuration(format!(
                "{attr}: constant must be finite"
            ))),
            ParamSpec::Range { lo, hi, .. } if !(hi - lo).is_finite() || lo > hi => {
                Err(GraphicsError::Configuration(format!(
                    "{attr}: invalid range {lo}..{hi}"
                )))
            }
            ParamSpec::Choice(list) if list.is_empty() => Err(GraphicsError::Configuration(
                format!("{attr}: empty choice list"),
            )),
            ParamSpec::Palette(list) if list.is_empty() => Err(GraphicsError::Configuration(
                format!("{attr}: empty palette"),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve a numeric spec.
    pub fn choose_number<R: Rng + ?Sized>(&self, rng: &mut R) -> GraphicsResult<f64> {
        match self {
            ParamSpec::Constant(v) => Ok(*v),
            ParamSpec::Range { lo, hi, kind } => {
                if lo == hi {
                    return Ok(*lo);
                }
                match kind {
                    RangeKind::Continuous => Ok(geom::random(rng, *lo, *hi)),
                    RangeKind::Discrete => {
                        let (lo, hi) = (lo.ceil() as i64, hi.floor() as i64);
                        if lo > hi {
                            return Err(GraphicsError::Configuration(format!(
                                "discrete range {lo}..{hi} contains no integers"
                            )));
                        }
                        Ok(rng.gen_range(lo..=hi) as f64)
                    }
                }
            }
            ParamSpec::Choice(list) => list
                .choose(rng)
                .copied()
                .ok_or_else(|| GraphicsError::Configuration("empty choice list".to_string())),
            ParamSpec::Color(_) | ParamSpec::Palette(_) => Err(GraphicsError::Configuration(
                format!("expected a numeric spec, got {self:?}"),
            )),
        }
    }

    /// Resolve a color spec.
    pub fn choose_color<R: Rng + ?Sized>(&self, rng: &mut R) -> GraphicsResult<ColorValue> {
        match self {
            ParamSpec::Color(c) => Ok(*c),
            ParamSpec::Palette(list) => list
                .choose(rng)
                .copied()
                .ok_or_else(|| GraphicsError::Configuration("empty palette".to_string())),
            _ => Err(GraphicsError::Configuration(format!(
                "expected a color spec, got {self:?}"
            ))),
        }
    }
}

impl From<f64> for ParamSpec {
    fn from(v: f64) -> Self {
        ParamSpec::Constant(v)
    }
}

impl From<std::ops::RangeInclusive<f64>> for ParamSpec {
    fn from(r: std::ops::RangeInclusive<f64>) -> Self {
        ParamSpec::range(*r.start(), *r.end())
    }
}

impl From<std::ops::RangeInclusive<i64>> for ParamSpec {
    fn from(r: std::ops::RangeInclusive<i64>) -> Self {
        ParamSpec::int_range(*r.start(), *r.end())
    }
}

impl From<Vec<f64>> for ParamSpec {
    fn from(list: Vec<f64>) -> Self {
        ParamSpec::Choice(list)
    }
}

impl From<ColorValue> for ParamSpec {
    fn from(c: ColorValue) -> Self {
        ParamSpec::Color(c)
    }
}

impl From<Vec<ColorValue>> for ParamSpec {
    fn from(list: Vec<ColorValue>) -> Self {
        ParamSpec::Palette(list)
    }
}

impl From<&[ColorValue]> for ParamSpec {
    fn from(list: &[ColorValue]) -> Self {
        ParamSpec::Palette(list.to_vec())
    }
}

/// Attribute-keyed spec map. Setting an attribute overwrites its spec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    specs: BTreeMap<Attribute, ParamSpec>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity defaults for the random map.
    pub fn randomized_defaults() -> Self {
        let mut map = Self::new();
        for (attr, v) in [
            (Attribute::X, 0.0),
            (Attribute::Y, 0.0),
            (Attribute::Scale, 1.0),
            (Attribute::ScaleX, 1.0),
            (Attribute::ScaleY, 1.0),
            (Attribute::Rotation, 0.0),
            (Attribute::StrokeWidth, 1.0),
        ] {
            map.specs.insert(attr, ParamSpec::Constant(v));
        }
        map
    }

    /// Identity defaults for the incremental map.
    pub fn incremental_defaults() -> Self {
        let mut map = Self::new();
        for (attr, v) in [
            (Attribute::Rotation, 0.0),
            (Attribute::X, 0.0),
            (Attribute::Y, 0.0),
            (Attribute::Scale, 1.0),
            (Attribute::ScaleX, 1.0),
            (Attribute::ScaleY, 1.0),
        ] {
            map.specs.insert(attr, ParamSpec::Constant(v));
        }
        map
    }

    /// Validate and store a spec, replacing any previous one.
    pub fn set(&mut self, attr: Attribute, spec: ParamSpec) -> GraphicsResult<()> {
        spec.validate(attr)?;
        self.specs.insert(attr, spec);
        Ok(())
    }

    pub fn remove(&mut self, attr: Attribute) -> Option<ParamSpec> {
        self.specs.remove(&attr)
    }

    pub fn get(&self, attr: Attribute) -> Option<&ParamSpec> {
        self.specs.get(&attr)
    }

    pub fn contains(&self, attr: Attribute) -> bool {
        self.specs.contains_key(&attr)
    }

    /// Sample a numeric attribute, `None` when absent.
    pub fn sample<R: Rng + ?Sized>(&self, attr: Attribute, rng: &mut R) -> GraphicsResult<Option<f64>> {
        self.get(attr).map(|spec| spec.choose_number(rng)).transpose()
    }

    /// Sample a numeric attribute, falling back to `default` when absent.
    pub fn sample_or<R: Rng + ?Sized>(
        &self,
        attr: Attribute,
        default: f64,
        rng: &mut R,
    ) -> GraphicsResult<f64> {
        Ok(self.sample(attr, rng)?.unwrap_or(default))
    }

    /// Whether any of the HSB+alpha channels has a spec.
    pub fn has_color_channels(&self) -> bool {
        [
            Attribute::Hue,
            Attribute::Saturation,
            Attribute::Brightness,
            Attribute::Alpha,
        ]
        .into_iter()
        .any(|attr| self.contains(attr))
    }

    /// Re-check every entry, e.g. after deserialization.
    pub fn validate(&self) -> GraphicsResult<()> {
        self.specs
            .iter()
            .try_for_each(|(attr, spec)| spec.validate(*attr))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &ParamSpec)> {
        self.specs.iter().map(|(attr, spec)| (*attr, spec))
    }
}
