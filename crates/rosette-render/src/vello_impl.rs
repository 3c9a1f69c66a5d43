//! Vello-based graphics context.
//!
//! Builds a [`vello::Scene`] from canvas calls. Clips are scene layers owned by
//! the graphics state that pushed them and are popped on restore.

use crate::context::{GraphicsContext, PaintMode};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Point, Rect, Stroke};
use peniko::color::DynamicColor;
use peniko::{Color, ColorStop, Extend, Fill, Mix};
use rosette_core::{BlendMode, ColorValue, Gradient, ImageRef, LineCap, LineJoin, Shadow};
use std::collections::HashMap;
use vello::Scene;

#[derive(Debug, Clone)]
struct VelloState {
    ctm: Affine,
    fill: Color,
    stroke: Color,
    stroke_style: Stroke,
    alpha: f32,
    blend: Mix,
    /// Layers pushed by clips at this save level.
    clip_layers: usize,
}

impl Default for VelloState {
    fn default() -> Self {
        Self {
            ctm: Affine::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_style: Stroke::new(1.0),
            alpha: 1.0,
            blend: Mix::Normal,
            clip_layers: 0,
        }
    }
}

/// [`GraphicsContext`] that encodes drawing into a Vello scene.
pub struct VelloContext {
    /// The Vello scene being built.
    scene: Scene,
    /// Device-space drawing area.
    viewport: Rect,
    state: VelloState,
    stack: Vec<VelloState>,
    path: BezPath,
    /// Decoded images by [`ImageRef::name`].
    images: HashMap<String, peniko::ImageData>,
}

impl VelloContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scene: Scene::new(),
            viewport: Rect::new(0.0, 0.0, width, height),
            state: VelloState::default(),
            stack: Vec::new(),
            path: BezPath::new(),
            images: HashMap::new(),
        }
    }

    /// Get the scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Make decoded pixels available to [`GraphicsContext::draw_image`].
    pub fn register_image(&mut self, name: impl Into<String>, data: peniko::ImageData) {
        self.images.insert(name.into(), data);
    }

    fn with_alpha(&self, color: Color) -> Color {
        color.multiply_alpha(self.state.alpha)
    }

    /// Viewport mapped back into user space, used to fill the clip region.
    fn user_viewport(&self) -> Rect {
        if self.state.ctm.determinant().abs() < f64::EPSILON {
            return Rect::ZERO;
        }
        self.state.ctm.inverse().transform_rect_bbox(self.viewport)
    }

    fn begin_blend(&mut self) -> bool {
        if self.state.blend == Mix::Normal {
            return false;
        }
        self.scene
            .push_layer(self.state.blend, 1.0, Affine::IDENTITY, &self.viewport);
        true
    }

    fn end_blend(&mut self, pushed: bool) {
        if pushed {
            self.scene.pop_layer();
        }
    }

    fn gradient_stops(gradient: &Gradient) -> Vec<ColorStop> {
        gradient
            .stops()
            .iter()
            .map(|(offset, color)| ColorStop {
                offset: *offset as f32,
                color: DynamicColor::from_alpha_color(Color::from(*color)),
            })
            .collect()
    }

    // Vello has no unextended gradient mode.
    fn gradient_extend(_gradient: &Gradient) -> Extend {
        Extend::Pad
    }

    fn fill_region(&mut self, brush: &peniko::Gradient) {
        let region = self.user_viewport();
        let pushed = self.begin_blend();
        self.scene
            .fill(Fill::NonZero, self.state.ctm, brush, None, &region);
        self.end_blend(pushed);
    }
}

fn mix(mode: BlendMode) -> Mix {
    match mode {
        BlendMode::Normal => Mix::Normal,
        BlendMode::Multiply => Mix::Multiply,
        BlendMode::Screen => Mix::Screen,
        BlendMode::Overlay => Mix::Overlay,
        BlendMode::Darken => Mix::Darken,
        BlendMode::Lighten => Mix::Lighten,
        BlendMode::ColorDodge => Mix::ColorDodge,
        BlendMode::ColorBurn => Mix::ColorBurn,
        BlendMode::SoftLight => Mix::SoftLight,
        BlendMode::HardLight => Mix::HardLight,
        BlendMode::Difference => Mix::Difference,
        BlendMode::Exclusion => Mix::Exclusion,
        BlendMode::Hue => Mix::Hue,
        BlendMode::Saturation => Mix::Saturation,
        BlendMode::Color => Mix::Color,
        BlendMode::Luminosity => Mix::Luminosity,
    }
}

impl GraphicsContext for VelloContext {
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
        let pushed = self.begin_blend();
        if mode.fills() {
            let color = self.with_alpha(self.state.fill);
            self.scene
                .fill(Fill::NonZero, self.state.ctm, color, None, &path);
        }
        if mode.strokes() {
            let color = self.with_alpha(self.state.stroke);
            self.scene.stroke(
                &self.state.stroke_style,
                self.state.ctm,
                color,
                None,
                &path,
            );
        }
        self.end_blend(pushed);
    }

    fn clip_to_path(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.scene
            .push_layer(Mix::Normal, 1.0, self.state.ctm, &path);
        self.state.clip_layers += 1;
    }

    fn save_state(&mut self) {
        self.stack.push(self.state.clone());
        self.state.clip_layers = 0;
    }

    fn restore_state(&mut self) {
        let Some(state) = self.stack.pop() else {
            log::warn!("restore_state on an empty state stack");
            return;
        };
        for _ in 0..self.state.clip_layers {
            self.scene.pop_layer();
        }
        self.state = state;
    }

    fn concat_transform(&mut self, transform: Affine) {
        self.state.ctm = self.state.ctm * transform;
    }

    fn set_fill_color(&mut self, color: ColorValue) {
        self.state.fill = color.into();
    }

    fn set_stroke_color(&mut self, color: ColorValue) {
        self.state.stroke = color.into();
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.stroke_style.width = width;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0) as f32;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        let cap = match cap {
            LineCap::Butt => Cap::Butt,
            LineCap::Round => Cap::Round,
            LineCap::Square => Cap::Square,
        };
        let style = std::mem::replace(&mut self.state.stroke_style, Stroke::new(1.0));
        self.state.stroke_style = style.with_caps(cap);
    }

    fn set_line_join(&mut self, join: LineJoin) {
        let join = match join {
            LineJoin::Miter => Join::Miter,
            LineJoin::Round => Join::Round,
            LineJoin::Bevel => Join::Bevel,
        };
        let style = std::mem::replace(&mut self.state.stroke_style, Stroke::new(1.0));
        self.state.stroke_style = style.with_join(join);
    }

    fn set_line_dash(&mut self, lengths: &[f64], phase: f64) {
        let style = std::mem::replace(&mut self.state.stroke_style, Stroke::new(1.0));
        self.state.stroke_style = style.with_dashes(phase, lengths.iter().copied());
    }

    fn set_antialias(&mut self, enabled: bool) {
        if !enabled {
            log::debug!("vello always antialiases");
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mix(mode);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        if shadow.is_some() {
            log::debug!("shadows are not supported by the vello context");
        }
    }

    fn draw_image(&mut self, image: &ImageRef, rect: Rect) {
        let Some(image_data) = self.images.get(&image.name).cloned() else {
            log::warn!("image not registered: {}", image.name);
            return;
        };
        if image_data.width == 0 || image_data.height == 0 {
            return;
        }
        let scale_x = rect.width() / image_data.width as f64;
        let scale_y = rect.height() / image_data.height as f64;
        let image_transform = self.state.ctm
            * Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);
        let pushed = self.begin_blend();
        self.scene.draw_image(&image_data.into(), image_transform);
        self.end_blend(pushed);
    }

    fn draw_linear_gradient(&mut self, gradient: &Gradient, start: Point, end: Point) {
        let stops = Self::gradient_stops(gradient);
        let brush = peniko::Gradient::new_linear(start, end)
            .with_stops(stops.as_slice())
            .with_extend(Self::gradient_extend(gradient));
        self.fill_region(&brush);
    }

    fn draw_radial_gradient(
        &mut self,
        gradient: &Gradient,
        start: Point,
        start_radius: f64,
        end: Point,
        end_radius: f64,
    ) {
        let stops = Self::gradient_stops(gradient);
        let brush = peniko::Gradient::new_two_point_radial(
            start,
            start_radius as f32,
            end,
            end_radius as f32,
        )
        .with_stops(stops.as_slice())
        .with_extend(Self::gradient_extend(gradient));
        self.fill_region(&brush);
    }

    fn select_font(&mut self, name: &str, size: f64) {
        log::trace!("font {name} {size}");
    }

    fn show_text(&mut self, text: &str, _at: Point) {
        log::debug!("text needs a font backend, skipped: {text}");
    }
}
