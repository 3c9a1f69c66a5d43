//! A graphics context that records every call.
//!
//! [`RecordingContext`] keeps a real graphics-state stack, so each paint
//! records the transform and colors in force at the time. The command list is
//! serializable and doubles as a display list for tools and tests.

use crate::context::{GraphicsContext, PaintMode};
use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use rosette_core::{BlendMode, ColorValue, Gradient, ImageRef, LineCap, LineJoin, Shadow};
use serde::Serialize;

/// Snapshot of the state a paint was issued under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintRecord {
    pub mode: PaintMode,
    /// Path in user space.
    pub path: BezPath,
    /// Transform from user space to device space.
    pub ctm: Affine,
    pub fill: ColorValue,
    pub stroke: ColorValue,
    pub line_width: f64,
    pub alpha: f64,
    pub blend: BlendMode,
}

/// One recorded graphics call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Save { depth: usize },
    Restore { depth: usize },
    Concat { transform: Affine },
    Paint(PaintRecord),
    Clip { path: BezPath, ctm: Affine },
    Image { name: String, rect: Rect, ctm: Affine, alpha: f64 },
    LinearGradient { gradient: Gradient, start: Point, end: Point, ctm: Affine },
    RadialGradient {
        gradient: Gradient,
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
        ctm: Affine,
    },
    Text { text: String, at: Point, font: String, size: f64, fill: ColorValue, ctm: Affine },
    LineCap { cap: LineCap },
    LineJoin { join: LineJoin },
    LineDash { lengths: Vec<f64>, phase: f64 },
    Antialias { enabled: bool },
    Blend { mode: BlendMode },
    Shadow { shadow: Option<Shadow> },
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    ctm: Affine,
    fill: ColorValue,
    stroke: ColorValue,
    line_width: f64,
    alpha: f64,
    blend: BlendMode,
    font: String,
    font_size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Affine::IDENTITY,
            fill: ColorValue::black(),
            stroke: ColorValue::black(),
            line_width: 1.0,
            alpha: 1.0,
            blend: BlendMode::Normal,
            font: "Helvetica".to_string(),
            font_size: 20.0,
        }
    }
}

/// In-memory [`GraphicsContext`] that keeps a display list.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<Command>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: BezPath,
    saves: usize,
    restores: usize,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far, in call order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Take the recorded commands, leaving the state untouched.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded paint calls, in call order.
    pub fn paints(&self) -> impl Iterator<Item = &PaintRecord> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::Paint(paint) => Some(paint),
            _ => None,
        })
    }

    /// Number of `save_state` calls.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Number of `restore_state` calls that popped a state.
    pub fn restore_count(&self) -> usize {
        self.restores
    }

    /// Current state stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_transform(&self) -> Affine {
        self.state.ctm
    }

    pub fn fill_color(&self) -> ColorValue {
        self.state.fill
    }

    pub fn stroke_color(&self) -> ColorValue {
        self.state.stroke
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    pub fn alpha(&self) -> f64 {
        self.state.alpha
    }

    /// The path under construction.
    pub fn current_path(&self) -> &BezPath {
        &self.path
    }
}

impl GraphicsContext for RecordingContext {
    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, p: Point) {
        self.path.push(PathEl::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.path.push(PathEl::LineTo(p));
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.path.push(PathEl::CurveTo(c1, c2, p));
    }

    fn quad_to(&mut self, c: Point, p: Point) {
        self.path.push(PathEl::QuadTo(c, p));
    }

    fn close_path(&mut self) {
        self.path.push(PathEl::ClosePath);
    }

    fn is_path_empty(&self) -> bool {
        self.path
            .elements()
            .iter()
            .all(|el| matches!(el, PathEl::MoveTo(_)))
    }

    fn fill_and_stroke_path(&mut self, mode: PaintMode) {
        let path = std::mem::take(&mut self.path);
        self.commands.push(Command::Paint(PaintRecord {
            mode,
            path,
            ctm: self.state.ctm,
            fill: self.state.fill,
            stroke: self.state.stroke,
            line_width: self.state.line_width,
            alpha: self.state.alpha,
            blend: self.state.blend,
        }));
    }

    fn clip_to_path(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.commands.push(Command::Clip {
            path,
            ctm: self.state.ctm,
        });
    }

    fn save_state(&mut self) {
        self.stack.push(self.state.clone());
        self.saves += 1;
        self.commands.push(Command::Save {
            depth: self.stack.len(),
        });
    }

    fn restore_state(&mut self) {
        match self.stack.pop() {
            Some(state) => {
                self.state = state;
                self.restores += 1;
                self.commands.push(Command::Restore {
                    depth: self.stack.len(),
                });
            }
            None => log::warn!("restore_state on an empty state stack"),
        }
    }

    fn concat_transform(&mut self, transform: Affine) {
        self.state.ctm = self.state.ctm * transform;
        self.commands.push(Command::Concat { transform });
    }

    fn set_fill_color(&mut self, color: ColorValue) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: ColorValue) {
        self.state.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(Command::LineCap { cap });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(Command::LineJoin { join });
    }

    fn set_line_dash(&mut self, lengths: &[f64], phase: f64) {
        self.commands.push(Command::LineDash {
            lengths: lengths.to_vec(),
            phase,
        });
    }

    fn set_antialias(&mut self, enabled: bool) {
        self.commands.push(Command::Antialias { enabled });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
        self.commands.push(Command::Blend { mode });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.commands.push(Command::Shadow { shadow });
    }

    fn draw_image(&mut self, image: &ImageRef, rect: Rect) {
        self.commands.push(Command::Image {
            name: image.name.clone(),
            rect,
            ctm: self.state.ctm,
            alpha: self.state.alpha,
        });
    }

    fn draw_linear_gradient(&mut self, gradient: &Gradient, start: Point, end: Point) {
        self.commands.push(Command::LinearGradient {
            gradient: gradient.clone(),
            start,
            end,
            ctm: self.state.ctm,
        });
    }

    fn draw_radial_gradient(
        &mut self,
        gradient: &Gradient,
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
    ) {
        self.commands.push(Command::RadialGradient {
            gradient: gradient.clone(),
            start,
            start_radius,
            end,
            end_radius,
            ctm: self.state.ctm,
        });
    }

    fn select_font(&mut self, name: &str, size: f64) {
        self.state.font = name.to_string();
        self.state.font_size = size;
    }

    fn show_text(&mut self, text: &str, at: Point) {
        self.commands.push(Command::Text {
            text: text.to_string(),
            at,
            font: self.state.font.clone(),
            size: self.state.font_size,
            fill: self.state.fill,
            ctm: self.state.ctm,
        });
    }
}
