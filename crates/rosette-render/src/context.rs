//! Graphics context capability.
//!
//! This is the only seam between rosette and a drawing backend. Arcs and
//! primitive outlines are flattened to cubic and quadratic segments before
//! they reach a context, so backends only need the basic path verbs.

use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use rosette_core::{BlendMode, ColorValue, Gradient, ImageRef, LineCap, LineJoin, Shadow};
use serde::{Deserialize, Serialize};

/// Which parts of the current path a paint call draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintMode {
    Fill,
    Stroke,
    FillStroke,
}

impl PaintMode {
    /// Mode for the given fill/stroke switches, `None` when both are off.
    pub fn from_flags(fill: bool, stroke: bool) -> Option<Self> {
        match (fill, stroke) {
            (true, true) => Some(PaintMode::FillStroke),
            (true, false) => Some(PaintMode::Fill),
            (false, true) => Some(PaintMode::Stroke),
            (false, false) => None,
        }
    }

    pub fn fills(self) -> bool {
        matches!(self, PaintMode::Fill | PaintMode::FillStroke)
    }

    pub fn strokes(self) -> bool {
        matches!(self, PaintMode::Stroke | PaintMode::FillStroke)
    }
}

/// A 2D graphics context with a save/restore state stack.
///
/// Coordinates passed to path verbs are in user space and are mapped through
/// the current transform when the path is painted or clipped. Failures inside
/// a backend are not reported through this trait.
pub trait GraphicsContext {
    /// Discard the current path.
    fn begin_path(&mut self);

    fn move_to(&mut self, p: Point);

    fn line_to(&mut self, p: Point);

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point);

    fn quad_to(&mut self, c: Point, p: Point);

    fn close_path(&mut self);

    /// Append every element of `path` to the current path.
    fn add_path(&mut self, path: &BezPath) {
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.move_to(p),
                PathEl::LineTo(p) => self.line_to(p),
                PathEl::QuadTo(c, p) => self.quad_to(c, p),
                PathEl::CurveTo(c1, c2, p) => self.curve_to(c1, c2, p),
                PathEl::ClosePath => self.close_path(),
            }
        }
    }

    /// Whether the current path has no drawable segments.
    fn is_path_empty(&self) -> bool;

    /// Paint the current path and clear it.
    fn fill_and_stroke_path(&mut self, mode: PaintMode);

    /// Intersect the clip with the current path and clear it.
    fn clip_to_path(&mut self);

    /// Push a copy of the graphics state.
    fn save_state(&mut self);

    /// Pop the graphics state.
    fn restore_state(&mut self);

    /// Post-multiply the current transform: `ctm = ctm * transform`.
    fn concat_transform(&mut self, transform: Affine);

    fn set_fill_color(&mut self, color: ColorValue);

    fn set_stroke_color(&mut self, color: ColorValue);

    fn set_line_width(&mut self, width: f64);

    /// Global alpha applied to everything drawn afterwards.
    fn set_alpha(&mut self, alpha: f64);

    fn set_line_cap(&mut self, cap: LineCap);

    fn set_line_join(&mut self, join: LineJoin);

    /// Dash lengths and starting phase. An empty slice means solid lines.
    fn set_line_dash(&mut self, lengths: &[f64], phase: f64);

    fn set_antialias(&mut self, enabled: bool);

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, image: &ImageRef, rect: Rect);

    /// Fill the clip region with a linear gradient from `start` to `end`.
    fn draw_linear_gradient(&mut self, gradient: &Gradient, start: Point, end: Point);

    /// Fill the clip region with a two-point radial gradient.
    fn draw_radial_gradient(
        &mut self,
        gradient: &Gradient,
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
    );

    fn select_font(&mut self, name: &str, size: f64);

    /// Draw `text` with its baseline starting at `at`, using the fill color.
    fn show_text(&mut self, text: &str, at: Point);
}
