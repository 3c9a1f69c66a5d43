//! The drawing canvas.
//!
//! [`Canvas`] wraps a [`GraphicsContext`] with a script-friendly API: paint
//! settings, immediate primitives, a path under construction, clipping and
//! the iterative [`draw`](Canvas::draw) entry point. Construction saves a
//! pristine state and a user state so [`reset`](Canvas::reset) can get back to
//! the defaults.

use crate::context::{GraphicsContext, PaintMode};
use crate::iterate;
use crate::surface::RenderSurface;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as KurboShape};
use rand::RngCore;
use rand::rngs::StdRng;
use rosette_core::geom;
use rosette_core::{
    BlendMode, CanvasConfig, ColorValue, Gradient, GraphicsError, GraphicsResult, ImageRef,
    LineCap, LineJoin, Path, Registration, Shadow,
};

/// Flattening tolerance for canvas primitives.
const TOLERANCE: f64 = 0.1;

/// Default font selected at construction.
const DEFAULT_FONT: &str = "Helvetica";
const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Rough advance width of a glyph as a fraction of the font size, used to
/// center text without font metrics.
const APPROX_GLYPH_WIDTH: f64 = 0.6;

/// Something the canvas knows how to draw.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Path(&'a Path),
    Image(&'a ImageRef),
}

impl<'a> From<&'a Path> for Drawable<'a> {
    fn from(path: &'a Path) -> Self {
        Drawable::Path(path)
    }
}

impl<'a> From<&'a ImageRef> for Drawable<'a> {
    fn from(image: &'a ImageRef) -> Self {
        Drawable::Image(image)
    }
}

/// Fill and stroke switches. Saved and restored with the graphics state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PaintFlags {
    fill: bool,
    stroke: bool,
}

/// A drawing canvas over a graphics context.
pub struct Canvas<G: GraphicsContext> {
    ctx: G,
    config: CanvasConfig,
    rng: StdRng,
    flags: PaintFlags,
    saved_flags: Vec<PaintFlags>,
    registration: Registration,
    autoclose: bool,
    font_name: String,
    font_size: f64,
    /// Path started by `begin_path`, painted by `end_path`.
    current: Option<Path>,
}

impl<G: GraphicsContext> Canvas<G> {
    /// Create a canvas drawing into `ctx`.
    pub fn new(ctx: G, config: CanvasConfig) -> Self {
        let rng = config.rng();
        let mut canvas = Self {
            ctx,
            rng,
            flags: PaintFlags {
                fill: true,
                stroke: false,
            },
            saved_flags: Vec::new(),
            registration: config.registration,
            autoclose: config.autoclose_path,
            font_name: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            current: None,
            config,
        };
        log::debug!(
            "canvas {}x{} (seed: {:?})",
            canvas.config.width,
            canvas.config.height,
            canvas.config.seed
        );
        canvas.ctx.set_antialias(canvas.config.antialias);
        canvas.fill(ColorValue::black());
        canvas.no_stroke();
        canvas.stroke_width(1.0);
        canvas.font(DEFAULT_FONT, DEFAULT_FONT_SIZE);
        // Pristine state for `reset`, then the state user code changes.
        canvas.push();
        canvas.push();
        canvas
    }

    pub fn context(&self) -> &G {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut G {
        &mut self.ctx
    }

    /// Consume the canvas and return its graphics context.
    pub fn into_context(self) -> G {
        self.ctx
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    /// Uniform random number in `[lo, hi]` from the canvas random source.
    pub fn random(&mut self, lo: f64, hi: f64) -> f64 {
        geom::random(&mut self.rng, lo, hi)
    }

    fn trace(&self, message: impl FnOnce() -> String) {
        if self.config.verbose {
            log::debug!("{}", message());
        }
    }

    // --- state ------------------------------------------------------------

    /// Save the graphics state.
    pub fn push(&mut self) -> &mut Self {
        self.ctx.save_state();
        self.saved_flags.push(self.flags);
        self
    }

    /// Restore the last saved graphics state. Popping an empty stack is ignored.
    pub fn pop(&mut self) -> &mut Self {
        match self.saved_flags.pop() {
            Some(flags) => {
                self.ctx.restore_state();
                self.flags = flags;
            }
            None => log::warn!("pop called with an empty state stack"),
        }
        self
    }

    /// Number of saved states.
    pub fn stack_size(&self) -> usize {
        self.saved_flags.len()
    }

    /// Return to the pristine state saved at construction.
    pub fn reset(&mut self) -> &mut Self {
        while self.stack_size() > 1 {
            self.pop();
        }
        self.push()
    }

    /// Run `f` inside a saved state. The state is restored even when `f` fails.
    pub fn new_state<F>(&mut self, f: F) -> GraphicsResult<()>
    where
        F: FnOnce(&mut Self) -> GraphicsResult<()>,
    {
        self.push();
        let result = f(self);
        self.pop();
        result
    }

    // --- canvas settings --------------------------------------------------

    pub fn set_registration(&mut self, registration: Registration) -> &mut Self {
        self.registration = registration;
        self
    }

    /// Set the registration mode by name (`corner` or `center`).
    pub fn registration(&mut self, mode: &str) -> GraphicsResult<&mut Self> {
        Ok(self.set_registration(mode.parse()?))
    }

    pub fn autoclose_path(&mut self, enabled: bool) -> &mut Self {
        self.autoclose = enabled;
        self
    }

    pub fn antialias(&mut self, enabled: bool) -> &mut Self {
        self.ctx.set_antialias(enabled);
        self
    }

    /// Global alpha for subsequent drawing.
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        self.ctx.set_alpha(alpha);
        self
    }

    /// Set the export quality (0.0 = max compression, 1.0 = none).
    pub fn quality(&mut self, quality: f64) -> &mut Self {
        self.config.quality = quality.clamp(0.0, 1.0);
        self
    }

    // --- paint ------------------------------------------------------------

    pub fn fill(&mut self, color: ColorValue) -> &mut Self {
        self.ctx.set_fill_color(color);
        self.flags.fill = true;
        self
    }

    pub fn no_fill(&mut self) -> &mut Self {
        self.ctx.set_fill_color(ColorValue::transparent());
        self.flags.fill = false;
        self
    }

    pub fn stroke(&mut self, color: ColorValue) -> &mut Self {
        self.ctx.set_stroke_color(color);
        self.flags.stroke = true;
        self
    }

    pub fn no_stroke(&mut self) -> &mut Self {
        self.ctx.set_stroke_color(ColorValue::transparent());
        self.flags.stroke = false;
        self
    }

    pub fn stroke_width(&mut self, width: f64) -> &mut Self {
        self.ctx.set_line_width(width);
        self
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.ctx.set_line_cap(cap);
        self
    }

    /// Set the line cap by name (`butt`, `round` or `square`).
    pub fn line_cap(&mut self, style: &str) -> GraphicsResult<&mut Self> {
        Ok(self.set_line_cap(style.parse()?))
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        self.ctx.set_line_join(join);
        self
    }

    /// Set the line join by name (`miter`, `round` or `bevel`).
    pub fn line_join(&mut self, style: &str) -> GraphicsResult<&mut Self> {
        Ok(self.set_line_join(style.parse()?))
    }

    /// Dash pattern of alternating dash and gap lengths.
    pub fn line_dash(&mut self, lengths: &[f64], phase: f64) -> &mut Self {
        self.ctx.set_line_dash(lengths, phase);
        self
    }

    /// Back to solid lines.
    pub fn no_dash(&mut self) -> &mut Self {
        self.ctx.set_line_dash(&[], 0.0);
        self
    }

    pub fn set_blend(&mut self, mode: BlendMode) -> &mut Self {
        self.ctx.set_blend_mode(mode);
        self
    }

    /// Set the blend mode by name, e.g. `multiply` or `colordodge`.
    pub fn blend(&mut self, mode: &str) -> GraphicsResult<&mut Self> {
        Ok(self.set_blend(mode.parse()?))
    }

    pub fn shadow(&mut self, shadow: Shadow) -> &mut Self {
        self.ctx.set_shadow(Some(shadow));
        self
    }

    /// Yellow glow with the given offset, alpha and blur.
    pub fn glow(&mut self, dx: f64, dy: f64, alpha: f64, blur: f64) -> &mut Self {
        self.shadow(Shadow::glow(dx, dy, alpha, blur))
    }

    pub fn no_shadow(&mut self) -> &mut Self {
        self.ctx.set_shadow(None);
        self
    }

    // --- transforms -------------------------------------------------------

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.ctx.concat_transform(Affine::translate((x, y)));
        self
    }

    /// Rotate by `deg` degrees (clockwise on screen).
    pub fn rotate(&mut self, deg: f64) -> &mut Self {
        self.ctx.concat_transform(Affine::rotate(geom::radians(deg)));
        self
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.ctx.concat_transform(Affine::scale_non_uniform(sx, sy));
        self
    }

    /// Skew by `x` and `y` degrees.
    pub fn skew(&mut self, x: f64, y: f64) -> &mut Self {
        let (tx, ty) = (geom::radians(x).tan(), geom::radians(y).tan());
        self.ctx
            .concat_transform(Affine::new([1.0, ty, tx, 1.0, 0.0, 0.0]));
        self
    }

    // --- immediate primitives ---------------------------------------------

    fn paint_mode(&self) -> Option<PaintMode> {
        PaintMode::from_flags(self.flags.fill, self.flags.stroke)
    }

    /// Replace the context path with `path` and paint it in `mode`.
    fn paint_outline(&mut self, path: &BezPath, mode: Option<PaintMode>) {
        self.ctx.begin_path();
        self.ctx.add_path(path);
        match mode {
            Some(mode) => self.ctx.fill_and_stroke_path(mode),
            None => self.ctx.begin_path(),
        }
    }

    fn stroke_mode(&self) -> Option<PaintMode> {
        self.flags.stroke.then_some(PaintMode::Stroke)
    }

    /// Rectangle of `w`×`h` at `(x, y)` under the current registration.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("rect", &[x, y, w, h])?;
        let (x, y) = self.registration.origin(x, y, w, h);
        self.trace(|| format!("rect at [{x},{y}] with {w}x{h}"));
        let path = Rect::new(x, y, x + w, y + h).to_path(TOLERANCE);
        self.paint_outline(&path, self.paint_mode());
        Ok(self)
    }

    /// Ellipse inscribed in the `w`×`h` box at `(x, y)`.
    pub fn oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("oval", &[x, y, w, h])?;
        let (x, y) = self.registration.origin(x, y, w, h);
        self.trace(|| format!("oval at [{x},{y}] with {w}x{h}"));
        let path = kurbo::Ellipse::from_rect(Rect::new(x, y, x + w, y + h)).to_path(TOLERANCE);
        self.paint_outline(&path, self.paint_mode());
        Ok(self)
    }

    /// Filled and stroked circle.
    pub fn circle(&mut self, x: f64, y: f64, radius: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("circle", &[x, y, radius])?;
        let path = Circle::new((x, y), radius).to_path(TOLERANCE);
        self.paint_outline(&path, self.paint_mode());
        Ok(self)
    }

    /// Stroked line segment.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("line", &[x1, y1, x2, y2])?;
        let mut path = BezPath::new();
        path.move_to((x1, y1));
        path.line_to((x2, y2));
        self.paint_outline(&path, self.stroke_mode());
        Ok(self)
    }

    /// Stroked polyline through `points`.
    pub fn lines(&mut self, points: &[Point]) -> GraphicsResult<&mut Self> {
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        geom::ensure_finite("lines", &coords)?;
        let mut path = Path::new();
        path.lines(points);
        self.paint_outline(path.geometry(), self.stroke_mode());
        Ok(self)
    }

    /// Stroked circular arc; 0° is 12 o'clock and angles run clockwise.
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("arc", &[x, y, radius, start_angle, end_angle])?;
        let mut path = Path::new();
        path.arc(x, y, radius, start_angle, end_angle);
        self.paint_outline(path.geometry(), self.stroke_mode());
        Ok(self)
    }

    /// Cubic curve from `(x1, y1)` to `(x2, y2)` through two control points.
    #[allow(clippy::too_many_arguments)]
    pub fn curve(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> GraphicsResult<&mut Self> {
        self.begin_path(x1, y1)?;
        self.curve_to(cp1x, cp1y, cp2x, cp2y, x2, y2)?;
        self.end_path();
        Ok(self)
    }

    /// Quadratic curve from `(x1, y1)` to `(x2, y2)` through one control point.
    pub fn qcurve(
        &mut self,
        cpx: f64,
        cpy: f64,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> GraphicsResult<&mut Self> {
        self.begin_path(x1, y1)?;
        self.qcurve_to(cpx, cpy, x2, y2)?;
        self.end_path();
        Ok(self)
    }

    /// Cover the whole canvas with `color`. Paint settings are left untouched.
    pub fn background(&mut self, color: ColorValue) -> &mut Self {
        let area = Rect::new(0.0, 0.0, self.config.width, self.config.height).to_path(TOLERANCE);
        self.push();
        self.ctx.set_fill_color(color);
        self.paint_outline(&area, Some(PaintMode::Fill));
        self.pop()
    }

    // --- path under construction ------------------------------------------

    fn current_path(&mut self) -> &mut Path {
        self.current.get_or_insert_with(Path::new)
    }

    /// Start a new path with the pen at `(x, y)`.
    pub fn begin_path(&mut self, x: f64, y: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("begin_path", &[x, y])?;
        self.current = Some(Path::starting_at(x, y));
        Ok(self)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("move_to", &[x, y])?;
        self.current_path().move_to(x, y);
        Ok(self)
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("line_to", &[x, y])?;
        self.current_path().line_to(x, y);
        Ok(self)
    }

    pub fn curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("curve_to", &[cp1x, cp1y, cp2x, cp2y, x, y])?;
        self.current_path().curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        Ok(self)
    }

    pub fn qcurve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("qcurve_to", &[cpx, cpy, x, y])?;
        self.current_path().qcurve_to(cpx, cpy, x, y);
        Ok(self)
    }

    /// Arc tangent to the lines pen→`(x1, y1)` and `(x1, y1)`→`(x2, y2)`.
    pub fn arc_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    ) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("arc_to", &[x1, y1, x2, y2, radius])?;
        self.current_path().arc_to(x1, y1, x2, y2, radius);
        Ok(self)
    }

    /// Paint the path under construction. Nothing is drawn for an empty path.
    pub fn end_path(&mut self) -> &mut Self {
        let Some(mut path) = self.current.take() else {
            return self;
        };
        if path.is_empty() {
            self.trace(|| "end_path: empty path skipped".to_string());
            return self;
        }
        if self.autoclose {
            path.end_path();
        }
        self.paint_outline(path.geometry(), self.paint_mode());
        self
    }

    /// Begin a path at `(x, y)`, let `f` build it, then paint it.
    pub fn new_path<F>(&mut self, x: f64, y: f64, f: F) -> GraphicsResult<&mut Self>
    where
        F: FnOnce(&mut Self) -> GraphicsResult<()>,
    {
        self.begin_path(x, y)?;
        let result = f(self);
        if result.is_err() {
            self.current = None;
        }
        result?;
        Ok(self.end_path())
    }

    // --- clipping ---------------------------------------------------------

    /// Save the state and clip subsequent drawing to `path`.
    pub fn begin_clip(&mut self, path: &Path) -> &mut Self {
        self.push();
        self.ctx.begin_path();
        self.ctx.add_path(path.geometry());
        self.ctx.clip_to_path();
        self
    }

    /// Remove the clip started by the matching `begin_clip`.
    pub fn end_clip(&mut self) -> &mut Self {
        self.pop()
    }

    /// Run `f` with drawing clipped to `path`.
    pub fn clip<F>(&mut self, path: &Path, f: F) -> GraphicsResult<()>
    where
        F: FnOnce(&mut Self) -> GraphicsResult<()>,
    {
        self.begin_clip(path);
        let result = f(self);
        self.end_clip();
        result
    }

    // --- gradients --------------------------------------------------------

    /// Fill the clip region with a linear gradient from `start` to `end`.
    pub fn linear_gradient(&mut self, gradient: &Gradient, start: Point, end: Point) -> &mut Self {
        self.ctx.draw_linear_gradient(gradient, start, end);
        self
    }

    /// Fill the clip region with a radial gradient growing from `center`.
    pub fn radial_gradient(&mut self, gradient: &Gradient, center: Point, radius: f64) -> &mut Self {
        self.ctx
            .draw_radial_gradient(gradient, center, 0.0, center, radius);
        self
    }

    // --- text -------------------------------------------------------------

    pub fn font(&mut self, name: &str, size: f64) -> &mut Self {
        self.font_name = name.to_string();
        self.font_size = size;
        self.ctx.select_font(&self.font_name, self.font_size);
        self
    }

    pub fn font_size(&mut self, size: f64) -> &mut Self {
        let name = self.font_name.clone();
        self.font(&name, size)
    }

    /// Draw `text` at `(x, y)` with the fill color. Under center registration
    /// the text is centered on the point using an approximate width.
    pub fn text(&mut self, text: &str, x: f64, y: f64) -> GraphicsResult<&mut Self> {
        geom::ensure_finite("text", &[x, y])?;
        let (x, y) = match self.registration {
            Registration::Corner => (x, y),
            Registration::Center => {
                let width = text.chars().count() as f64 * self.font_size * APPROX_GLYPH_WIDTH;
                (x - width / 2.0, y + self.font_size / 2.0)
            }
        };
        self.ctx.show_text(text, Point::new(x, y));
        Ok(self)
    }

    // --- drawing shapes and images ------------------------------------------

    /// Draw a path or an image at `(x, y)`. Paths are replicated `iterations`
    /// times; images ignore the count.
    pub fn draw<'a>(
        &mut self,
        drawable: impl Into<Drawable<'a>>,
        x: f64,
        y: f64,
        iterations: usize,
    ) -> GraphicsResult<()> {
        match drawable.into() {
            Drawable::Path(path) => self.draw_path(path, x, y, iterations),
            Drawable::Image(image) => self.draw_image(image, x, y, None, None),
        }
    }

    /// Draw `path` `iterations` times with its randomize and increment specs.
    pub fn draw_path(&mut self, path: &Path, x: f64, y: f64, iterations: usize) -> GraphicsResult<()> {
        geom::ensure_finite("draw", &[x, y])?;
        iterate::draw_path(self, path, Point::new(x, y), iterations)
    }

    /// Draw `image` at `(x, y)`, at its natural size unless `w`/`h` are given.
    pub fn draw_image(
        &mut self,
        image: &ImageRef,
        x: f64,
        y: f64,
        w: Option<f64>,
        h: Option<f64>,
    ) -> GraphicsResult<()> {
        let w = w.unwrap_or(image.width);
        let h = h.unwrap_or(image.height);
        geom::ensure_finite("image", &[x, y, w, h])?;
        if w <= 0.0 || h <= 0.0 {
            return Err(GraphicsError::InvalidArgument(format!(
                "image {} has an empty size {w}x{h}",
                image.name
            )));
        }
        let (x, y) = self.registration.origin(x, y, w, h);
        self.trace(|| format!("image {} at [{x},{y}] with {w}x{h}", image.name));
        self.push();
        self.ctx.draw_image(image, Rect::new(x, y, x + w, y + h));
        self.pop();
        Ok(())
    }

    /// Draw `path` once in the center of each cell of a `rows`×`cols` grid
    /// spanning the canvas.
    pub fn grid(&mut self, path: &Path, rows: usize, cols: usize) -> GraphicsResult<()> {
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        let cell_w = self.config.width / cols as f64;
        let cell_h = self.config.height / rows as f64;
        self.new_state(|canvas| {
            for row in 0..rows {
                for col in 0..cols {
                    let tx = (col as f64 + 0.5) * cell_w;
                    let ty = (row as f64 + 0.5) * cell_h;
                    canvas.new_state(|canvas| {
                        canvas.translate(tx, ty);
                        canvas.draw_path(path, 0.0, 0.0, 1)
                    })?;
                }
            }
            Ok(())
        })
    }

    /// Debug overlay: numbered grid lines every `res` units in red, plus the
    /// canvas diagonals and center lines in black.
    pub fn cartesian(&mut self, res: f64, stroke_width: f64, font_size: f64) -> GraphicsResult<()> {
        geom::ensure_finite("cartesian", &[res, stroke_width, font_size])?;
        if res <= 0.0 {
            return Err(GraphicsError::InvalidArgument(format!(
                "cartesian grid resolution must be positive, got {res}"
            )));
        }
        let (w, h) = (self.config.width, self.config.height);
        self.new_state(|canvas| {
            canvas
                .font_size(font_size)
                .fill(ColorValue::black())
                .stroke(ColorValue::red())
                .stroke_width(stroke_width);
            let steps = (w / res).floor() as i64;
            for i in -steps..=steps {
                let x = i as f64 * res;
                canvas.line(x, -h, x, h)?;
                canvas.text(&x.to_string(), x, 0.0)?;
            }
            let steps = (h / res).floor() as i64;
            for i in -steps..=steps {
                let y = i as f64 * res;
                canvas.line(-w, y, w, y)?;
                canvas.text(&y.to_string(), 0.0, y)?;
            }
            canvas.stroke(ColorValue::black());
            canvas.line(-w, -h, w, h)?;
            canvas.line(w, -h, -w, h)?;
            canvas.line(0.0, h, w, 0.0)?;
            canvas.line(w / 2.0, 0.0, w / 2.0, h)?;
            canvas.line(0.0, h / 2.0, w, h / 2.0)?;
            Ok(())
        })
    }

    /// Start a new page. Only paged targets have pages.
    pub fn new_page(&mut self) -> &mut Self {
        if self.config.paged {
            log::debug!("new page");
        } else {
            log::warn!("new_page only valid when drawing to a paged document");
        }
        self
    }
}

impl<G: GraphicsContext> RenderSurface for Canvas<G> {
    fn push(&mut self) {
        Canvas::push(self);
    }

    fn pop(&mut self) {
        Canvas::pop(self);
    }

    fn concat(&mut self, transform: Affine) {
        self.ctx.concat_transform(transform);
    }

    fn set_fill(&mut self, color: ColorValue) {
        self.fill(color);
    }

    fn set_stroke(&mut self, color: ColorValue) {
        self.stroke(color);
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width(width);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha(alpha);
    }

    fn paint_geometry(&mut self, geometry: &BezPath) {
        self.paint_outline(geometry, self.paint_mode());
    }

    fn clip_geometry(&mut self, geometry: &BezPath) {
        self.ctx.begin_path();
        self.ctx.add_path(geometry);
        self.ctx.clip_to_path();
    }

    fn paint_image(&mut self, image: &ImageRef, rect: Rect) {
        self.ctx.draw_image(image, rect);
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
