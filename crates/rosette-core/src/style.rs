//! Paint and placement options shared by paths and canvases.

use crate::color::ColorValue;
use crate::error::{GraphicsError, GraphicsResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn unknown(kind: &str, name: &str) -> GraphicsError {
    GraphicsError::Configuration(format!("{kind} not recognized: {name}"))
}

/// Where a primitive's `(x, y)` sits relative to its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    /// `(x, y)` is the top-left corner.
    #[default]
    Corner,
    /// `(x, y)` is the center.
    Center,
}

impl Registration {
    /// Top-left corner of a `w`×`h` box registered at `(x, y)`.
    pub fn origin(self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
        match self {
            Registration::Corner => (x, y),
            Registration::Center => (x - w / 2.0, y - h / 2.0),
        }
    }
}

impl FromStr for Registration {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corner" => Ok(Registration::Corner),
            "center" => Ok(Registration::Center),
            other => Err(unknown("registration mode", other)),
        }
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl FromStr for LineCap {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            other => Err(unknown("line cap style", other)),
        }
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl FromStr for LineJoin {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            other => Err(unknown("line join style", other)),
        }
    }
}

/// Compositing mode for subsequent drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl FromStr for BlendMode {
    type Err = GraphicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s {
            "normal" => BlendMode::Normal,
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            "overlay" => BlendMode::Overlay,
            "darken" => BlendMode::Darken,
            "lighten" => BlendMode::Lighten,
            "colordodge" | "color_dodge" => BlendMode::ColorDodge,
            "colorburn" | "color_burn" => BlendMode::ColorBurn,
            "softlight" | "soft_light" => BlendMode::SoftLight,
            "hardlight" | "hard_light" => BlendMode::HardLight,
            "difference" => BlendMode::Difference,
            "exclusion" => BlendMode::Exclusion,
            "hue" => BlendMode::Hue,
            "saturation" => BlendMode::Saturation,
            "color" => BlendMode::Color,
            "luminosity" => BlendMode::Luminosity,
            other => return Err(unknown("blend mode", other)),
        };
        Ok(mode)
    }
}

/// Drop shadow (or glow) applied to subsequent drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub dx: f64,
    pub dy: f64,
    pub blur: f64,
    pub color: ColorValue,
}

impl Shadow {
    /// Black shadow with the given offset, alpha and blur radius.
    pub fn new(dx: f64, dy: f64, alpha: f64, blur: f64) -> Self {
        Self {
            dx,
            dy,
            blur,
            color: ColorValue::black().with_alpha(alpha),
        }
    }

    /// Yellow glow with the given offset, alpha and blur radius.
    pub fn glow(dx: f64, dy: f64, alpha: f64, blur: f64) -> Self {
        Self {
            dx,
            dy,
            blur,
            color: ColorValue::yellow().with_alpha(alpha),
        }
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::new(0.0, 0.0, 2.0 / 3.0, 5.0)
    }
}

/// A color gradient with ordered stops in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    stops: Vec<(f64, ColorValue)>,
    /// Extend the first color before the start point.
    pub extend_before: bool,
    /// Extend the last color past the end point.
    pub extend_after: bool,
}

impl Gradient {
    /// Evenly spaced stops. Needs at least two colors.
    pub fn new(colors: &[ColorValue]) -> GraphicsResult<Self> {
        if colors.len() < 2 {
            return Err(GraphicsError::InvalidArgument(
                "a gradient needs at least two colors".to_string(),
            ));
        }
        let last = (colors.len() - 1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64 / last, *c))
            .collect();
        Ok(Self {
            stops,
            extend_before: true,
            extend_after: true,
        })
    }

    /// Explicit stops. Offsets must lie in `[0, 1]` and be non-decreasing.
    pub fn with_stops(stops: Vec<(f64, ColorValue)>) -> GraphicsResult<Self> {
        if stops.len() < 2 {
            return Err(GraphicsError::InvalidArgument(
                "a gradient needs at least two stops".to_string(),
            ));
        }
        let ordered = stops.windows(2).all(|w| w[0].0 <= w[1].0);
        let in_unit = stops.iter().all(|(t, _)| (0.0..=1.0).contains(t));
        if !ordered || !in_unit {
            return Err(GraphicsError::InvalidArgument(
                "gradient stops must be ordered offsets in [0, 1]".to_string(),
            ));
        }
        Ok(Self {
            stops,
            extend_before: true,
            extend_after: true,
        })
    }

    pub fn stops(&self) -> &[(f64, ColorValue)] {
        &self.stops
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            stops: vec![(0.0, ColorValue::black()), (1.0, ColorValue::white())],
            extend_before: true,
            extend_after: true,
        }
    }
}

/// Handle to an image owned by the graphics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Backend lookup key.
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_options_are_rejected() {
        assert!(matches!("dotted".parse::<LineCap>(), Err(GraphicsError::Configuration(_))));
        assert!(matches!("sharp".parse::<LineJoin>(), Err(GraphicsError::Configuration(_))));
        assert!(matches!("add".parse::<BlendMode>(), Err(GraphicsError::Configuration(_))));
        assert!(matches!("middle".parse::<Registration>(), Err(GraphicsError::Configuration(_))));
    }

    #[test]
    fn test_known_options_parse() {
        assert_eq!("round".parse::<LineCap>().unwrap(), LineCap::Round);
        assert_eq!("bevel".parse::<LineJoin>().unwrap(), LineJoin::Bevel);
        assert_eq!("colordodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert_eq!("center".parse::<Registration>().unwrap(), Registration::Center);
    }

    #[test]
    fn test_registration_origin() {
        assert_eq!(Registration::Corner.origin(10.0, 10.0, 20.0, 40.0), (10.0, 10.0));
        assert_eq!(Registration::Center.origin(10.0, 10.0, 20.0, 40.0), (0.0, -10.0));
    }

    #[test]
    fn test_gradient_even_stops() {
        let g = Gradient::new(&[ColorValue::red(), ColorValue::green(), ColorValue::blue()]).unwrap();
        let offsets: Vec<f64> = g.stops().iter().map(|(t, _)| *t).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert!(Gradient::new(&[ColorValue::red()]).is_err());
        assert!(Gradient::with_stops(vec![(0.6, ColorValue::red()), (0.2, ColorValue::blue())]).is_err());
    }
}
