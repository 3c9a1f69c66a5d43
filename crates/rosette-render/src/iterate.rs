//! Iterative path replication.
//!
//! [`IterativeRenderer`] draws a [`Path`] `n` times. Each copy resolves the
//! path's randomized specs afresh, while its incremental specs compound from
//! one copy to the next: the transform through a renderer-owned cumulative
//! matrix, colors through the last resolved fill and stroke.
//!
//! Every copy is drawn inside two nested saves that are always restored, so a
//! call emits exactly two saves and two restores per iteration.

use crate::surface::RenderSurface;
use kurbo::{Affine, Point, Rect};
use rand::Rng;
use rosette_core::geom;
use rosette_core::{Attribute, ColorValue, GraphicsResult, ParamMap, Path};

/// Where a copy's fill or stroke color comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PaintSource {
    /// Cycled from an incremental color list by iteration index.
    Cycle(ColorValue),
    /// The previous copy's drifted color.
    Drift(ColorValue),
    /// Picked from the randomized spec.
    Random(ColorValue),
    /// Leave the surface's current color alone.
    Skip,
}

impl PaintSource {
    /// Decide the base color for `kind` at iteration `index`.
    fn resolve<R: Rng + ?Sized>(
        path: &Path,
        kind: Attribute,
        index: usize,
        last: Option<ColorValue>,
        rng: &mut R,
    ) -> GraphicsResult<Self> {
        let incremental = path.incremental();
        if let Some(spec) = incremental.get(kind) {
            let colors = spec.colors();
            if !colors.is_empty() {
                return Ok(PaintSource::Cycle(colors[index % colors.len()]));
            }
        }
        if incremental.has_color_channels() {
            if let Some(color) = last {
                return Ok(PaintSource::Drift(color));
            }
        }
        match path.randomized().get(kind) {
            Some(spec) if spec.is_color() => Ok(PaintSource::Random(spec.choose_color(rng)?)),
            _ => Ok(PaintSource::Skip),
        }
    }

    fn color(self) -> Option<ColorValue> {
        match self {
            PaintSource::Cycle(c) | PaintSource::Drift(c) | PaintSource::Random(c) => Some(c),
            PaintSource::Skip => None,
        }
    }
}

/// Sample a translate, rotate and scale step from a parameter map.
///
/// `scale_x` and `scale_y` are multiplied by `scale`; without a `scale_y`
/// spec the step scales uniformly by the resolved `scale_x`.
pub fn sample_transform<R: Rng + ?Sized>(specs: &ParamMap, rng: &mut R) -> GraphicsResult<Affine> {
    let x = specs.sample_or(Attribute::X, 0.0, rng)?;
    let y = specs.sample_or(Attribute::Y, 0.0, rng)?;
    let rotation = specs.sample_or(Attribute::Rotation, 0.0, rng)?;
    let sc = specs.sample_or(Attribute::Scale, 1.0, rng)?;
    let sx = specs.sample_or(Attribute::ScaleX, 1.0, rng)? * sc;
    let sy = match specs.sample(Attribute::ScaleY, rng)? {
        Some(sy) => sy * sc,
        None => sx,
    };
    Ok(Affine::translate((x, y))
        * Affine::rotate(geom::radians(rotation))
        * Affine::scale_non_uniform(sx, sy))
}

/// Per-call state for drawing a path repeatedly.
#[derive(Debug, Clone)]
pub struct IterativeRenderer {
    cumulative: Affine,
    last_fill: Option<ColorValue>,
    last_stroke: Option<ColorValue>,
}

impl Default for IterativeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl IterativeRenderer {
    pub fn new() -> Self {
        Self {
            cumulative: Affine::IDENTITY,
            last_fill: None,
            last_stroke: None,
        }
    }

    /// Incremental transform accumulated so far.
    pub fn cumulative(&self) -> Affine {
        self.cumulative
    }

    /// Draw `path` `iterations` times. The origin shift is only applied when
    /// either coordinate is positive.
    ///
    /// Drift starts from scratch on every call.
    pub fn draw<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &Path,
        origin: Point,
        iterations: usize,
    ) -> GraphicsResult<()> {
        log::debug!(
            "draw path: {} iterations at ({}, {})",
            iterations,
            origin.x,
            origin.y
        );
        *self = Self::new();
        for index in 0..iterations {
            surface.push();
            let result = self.draw_copy(surface, path, origin, index);
            surface.pop();
            result?;
        }
        Ok(())
    }

    fn draw_copy<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &Path,
        origin: Point,
        index: usize,
    ) -> GraphicsResult<()> {
        if index > 0 {
            let step = sample_transform(path.incremental(), surface.rng())?;
            self.cumulative = self.cumulative * step;
        }
        surface.concat(self.cumulative);

        surface.push();
        let result = self.paint_copy(surface, path, origin, index);
        surface.pop();
        result
    }

    fn paint_copy<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &Path,
        origin: Point,
        index: usize,
    ) -> GraphicsResult<()> {
        if let Some(color) = self.resolve_color(surface, path, Attribute::Fill, index)? {
            surface.set_fill(color);
        }
        if let Some(color) = self.resolve_color(surface, path, Attribute::Stroke, index)? {
            surface.set_stroke(color);
        }

        let randomized = path.randomized();
        if let Some(width) = randomized.sample(Attribute::StrokeWidth, surface.rng())? {
            surface.set_stroke_width(width);
        }
        if let Some(alpha) = randomized.sample(Attribute::Alpha, surface.rng())? {
            surface.set_alpha(alpha);
        }

        let jitter = sample_transform(randomized, surface.rng())?;
        surface.concat(jitter);

        if origin.x > 0.0 || origin.y > 0.0 {
            surface.concat(Affine::translate(origin.to_vec2()));
        }

        if path.is_empty() {
            return Ok(());
        }
        surface.paint_geometry(path.geometry());
        if let Some(image) = path.image() {
            surface.clip_geometry(path.geometry());
            surface.paint_image(image, Rect::new(0.0, 0.0, image.width, image.height));
        }
        Ok(())
    }

    fn resolve_color<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &Path,
        kind: Attribute,
        index: usize,
    ) -> GraphicsResult<Option<ColorValue>> {
        let last = match kind {
            Attribute::Stroke => self.last_stroke,
            _ => self.last_fill,
        };
        let Some(base) = PaintSource::resolve(path, kind, index, last, surface.rng())?.color()
        else {
            return Ok(None);
        };

        let incremental = path.incremental();
        if incremental.has_color_channels() {
            let rng = surface.rng();
            let hue = incremental.sample_or(Attribute::Hue, 0.0, rng)?;
            let saturation = incremental.sample_or(Attribute::Saturation, 0.0, rng)?;
            let brightness = incremental.sample_or(Attribute::Brightness, 0.0, rng)?;
            let alpha = incremental.sample_or(Attribute::Alpha, 0.0, rng)?;
            let drifted = base.shifted(hue, saturation, brightness, alpha);
            match kind {
                Attribute::Stroke => self.last_stroke = Some(drifted),
                _ => self.last_fill = Some(drifted),
            }
            return Ok(Some(drifted));
        }

        let randomized = path.randomized();
        let rng = surface.rng();
        let mut color = base;
        if let Some(hue) = randomized.sample(Attribute::Hue, rng)? {
            color = color.with_hue(hue);
        }
        if let Some(saturation) = randomized.sample(Attribute::Saturation, rng)? {
            color = color.with_saturation(saturation);
        }
        if let Some(brightness) = randomized.sample(Attribute::Brightness, rng)? {
            color = color.with_brightness(brightness);
        }
        Ok(Some(color))
    }
}

/// Draw `path` `iterations` times on `surface` with fresh drift state.
pub fn draw_path<S: RenderSurface + ?Sized>(
    surface: &mut S,
    path: &Path,
    origin: Point,
    iterations: usize,
) -> GraphicsResult<()> {
    IterativeRenderer::new().draw(surface, path, origin, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::recording::{Command, RecordingContext};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rosette_core::{CanvasConfig, GraphicsError, ImageRef, ParamSpec, RangeKind};

    const EPS: f64 = 1e-9;

    fn canvas() -> Canvas<RecordingContext> {
        Canvas::new(RecordingContext::new(), CanvasConfig::new().with_seed(11))
    }

    fn square() -> Path {
        let mut path = Path::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        path
    }

    fn assert_affine_eq(a: Affine, b: Affine) {
        for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
            assert!((x - y).abs() < EPS, "{a:?} != {b:?}");
        }
    }

    fn fills(canvas: &Canvas<RecordingContext>) -> Vec<ColorValue> {
        canvas.context().paints().map(|p| p.fill).collect()
    }

    #[test]
    fn test_single_iteration_paints_once() {
        let mut canvas = canvas();
        let path = square();
        canvas.draw_path(&path, 0.0, 0.0, 1).unwrap();

        let paints: Vec<_> = canvas.context().paints().collect();
        assert_eq!(paints.len(), 1);
        assert_eq!(&paints[0].path, path.geometry());
        assert_affine_eq(paints[0].ctm, Affine::IDENTITY);
        assert_eq!(paints[0].fill, ColorValue::black());
    }

    #[test]
    fn test_zero_iterations_draws_nothing() {
        let mut canvas = canvas();
        let saves = canvas.context().save_count();
        canvas.draw_path(&square(), 0.0, 0.0, 0).unwrap();
        assert_eq!(canvas.context().paints().count(), 0);
        assert_eq!(canvas.context().save_count(), saves);
    }

    #[test]
    fn test_rotation_compounds_per_iteration() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::Rotation, 30.0).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 5).unwrap();

        let ctms: Vec<Affine> = canvas.context().paints().map(|p| p.ctm).collect();
        assert_eq!(ctms.len(), 5);
        for (i, ctm) in ctms.into_iter().enumerate() {
            assert_affine_eq(ctm, Affine::rotate(geom::radians(30.0 * i as f64)));
        }
    }

    #[test]
    fn test_save_restore_balanced_per_iteration() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::Rotation, 10.0).unwrap();
        path.randomize(Attribute::X, -5.0..=5.0).unwrap();

        let (saves, restores, depth) = {
            let ctx = canvas.context();
            (ctx.save_count(), ctx.restore_count(), ctx.depth())
        };
        canvas.draw_path(&path, 0.0, 0.0, 7).unwrap();

        let ctx = canvas.context();
        assert_eq!(ctx.save_count() - saves, 14);
        assert_eq!(ctx.restore_count() - restores, 14);
        assert_eq!(ctx.depth(), depth);
    }

    #[test]
    fn test_translate_and_scale_drift() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::X, 10.0).unwrap();
        path.increment(Attribute::ScaleX, 0.99).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 3).unwrap();

        let step = Affine::translate((10.0, 0.0)) * Affine::scale_non_uniform(0.99, 1.0);
        let ctms: Vec<Affine> = canvas.context().paints().map(|p| p.ctm).collect();
        assert_affine_eq(ctms[0], Affine::IDENTITY);
        assert_affine_eq(ctms[1], step);
        assert_affine_eq(ctms[2], step * step);

        let [a, _, _, d, e, f] = ctms[2].as_coeffs();
        assert!((a - 0.99 * 0.99).abs() < EPS);
        assert!((d - 1.0).abs() < EPS);
        assert!((e - 19.9).abs() < EPS);
        assert!(f.abs() < EPS);
    }

    #[test]
    fn test_missing_scale_y_scales_uniformly() {
        let mut canvas = canvas();
        let mut path = square();
        path.clear_increment(Attribute::ScaleY);
        path.increment(Attribute::ScaleX, 0.5).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 2).unwrap();

        let ctm = canvas.context().paints().nth(1).unwrap().ctm;
        assert_affine_eq(ctm, Affine::scale(0.5));
    }

    #[test]
    fn test_random_transform_does_not_persist() {
        let mut canvas = canvas();
        let mut path = square();
        path.randomize(Attribute::X, 100.0).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 3).unwrap();

        for paint in canvas.context().paints() {
            assert_affine_eq(paint.ctm, Affine::translate((100.0, 0.0)));
        }
    }

    #[test]
    fn test_random_fill_is_exact_palette_copy() {
        let a = ColorValue::rgb(0.2, 0.4, 0.6);
        let b = ColorValue::rgb(0.9, 0.1, 0.3);
        let mut canvas = canvas();
        let mut path = square();
        path.fill(vec![a, b]).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 50).unwrap();

        let fills = fills(&canvas);
        assert_eq!(fills.len(), 50);
        assert!(fills.iter().all(|c| *c == a || *c == b));
        assert!(fills.contains(&a));
        assert!(fills.contains(&b));
    }

    #[test]
    fn test_incremental_palette_cycles() {
        let list = vec![ColorValue::red(), ColorValue::green(), ColorValue::blue()];
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::Fill, list.clone()).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 5).unwrap();

        assert_eq!(
            fills(&canvas),
            vec![list[0], list[1], list[2], list[0], list[1]]
        );
    }

    #[test]
    fn test_hue_drift_accumulates() {
        let mut canvas = canvas();
        let mut path = square();
        path.fill(ColorValue::red()).unwrap();
        path.increment(Attribute::Hue, 0.1).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 3).unwrap();

        let hues: Vec<f64> = fills(&canvas).iter().map(|c| c.hue()).collect();
        for (hue, expected) in hues.iter().zip([0.1, 0.2, 0.3]) {
            assert!((hue - expected).abs() < 1e-6, "{hue} != {expected}");
        }
    }

    #[test]
    fn test_incremental_hue_suppresses_random_hue() {
        let mut canvas = canvas();
        let mut path = square();
        path.fill(ColorValue::red()).unwrap();
        path.randomize(Attribute::Hue, 0.5).unwrap();
        path.increment(Attribute::Hue, 0.1).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 1).unwrap();

        let hue = fills(&canvas)[0].hue();
        assert!((hue - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_random_hue_is_absolute() {
        let mut canvas = canvas();
        let mut path = square();
        path.fill(ColorValue::red()).unwrap();
        path.randomize(Attribute::Hue, 0.5).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 3).unwrap();

        for color in fills(&canvas) {
            assert!((color.hue() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_random_stroke_width_and_alpha() {
        let mut canvas = canvas();
        let mut path = square();
        path.randomize(Attribute::StrokeWidth, 1.0..=3.0).unwrap();
        path.randomize(Attribute::Alpha, 0.5).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 20).unwrap();

        for paint in canvas.context().paints() {
            assert!((1.0..=3.0).contains(&paint.line_width));
            assert!((paint.alpha - 0.5).abs() < EPS);
        }
        // Paint state set inside a copy does not leak past the call.
        assert!((canvas.context().alpha() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_origin_applied_only_when_positive() {
        let mut canvas = canvas();
        canvas.draw_path(&square(), 5.0, 5.0, 1).unwrap();
        canvas.draw_path(&square(), -5.0, 0.0, 1).unwrap();

        let ctms: Vec<Affine> = canvas.context().paints().map(|p| p.ctm).collect();
        assert_affine_eq(ctms[0], Affine::translate((5.0, 5.0)));
        assert_affine_eq(ctms[1], Affine::IDENTITY);
    }

    #[test]
    fn test_image_is_clipped_to_path() {
        let mut canvas = canvas();
        let mut path = square();
        path.set_image(ImageRef::new("texture", 32.0, 16.0));
        canvas.draw_path(&path, 0.0, 0.0, 1).unwrap();

        let tail: Vec<&Command> = canvas
            .context()
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Paint(_) | Command::Clip { .. } | Command::Image { .. }))
            .collect();
        assert!(matches!(tail[0], Command::Paint(_)));
        assert!(matches!(tail[1], Command::Clip { .. }));
        match tail[2] {
            Command::Image { name, rect, .. } => {
                assert_eq!(name, "texture");
                assert_eq!(*rect, Rect::new(0.0, 0.0, 32.0, 16.0));
            }
            other => panic!("expected an image, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_resolution_restores_state() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(
            Attribute::X,
            ParamSpec::Range { lo: 0.2, hi: 0.8, kind: RangeKind::Discrete },
        )
        .unwrap();
        let depth = canvas.context().depth();

        let result = canvas.draw_path(&path, 0.0, 0.0, 3);
        assert!(matches!(result, Err(GraphicsError::Configuration(_))));
        assert_eq!(canvas.context().depth(), depth);
        assert_eq!(canvas.context().paints().count(), 1);
    }

    #[test]
    fn test_saturation_and_brightness_drift_clamps() {
        let mut canvas = canvas();
        let mut path = square();
        path.fill(ColorValue::from_hsba(0.0, 0.5, 0.5, 1.0)).unwrap();
        path.increment(Attribute::Saturation, -0.3).unwrap();
        path.increment(Attribute::Brightness, 0.3).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 4).unwrap();

        let fills = fills(&canvas);
        assert!((fills[0].saturation() - 0.2).abs() < 1e-6);
        assert!((fills[0].brightness() - 0.8).abs() < 1e-6);
        for color in &fills[1..] {
            assert!(color.saturation().abs() < 1e-6, "{color:?}");
            assert!((color.brightness() - 1.0).abs() < 1e-6, "{color:?}");
        }
    }

    #[test]
    fn test_alpha_drift_accumulates_and_clamps() {
        let mut canvas = canvas();
        let mut path = square();
        path.fill(ColorValue::red()).unwrap();
        path.increment(Attribute::Alpha, -0.25).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 5).unwrap();

        let alphas: Vec<f64> = fills(&canvas).iter().map(|c| c.alpha()).collect();
        for (alpha, expected) in alphas.iter().zip([0.75, 0.5, 0.25, 0.0, 0.0]) {
            assert!((alpha - expected).abs() < 1e-9, "{alpha} != {expected}");
        }
        // Only the color drifts; the global alpha stays put.
        for paint in canvas.context().paints() {
            assert!((paint.alpha - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_cycled_palette_with_hue_drift() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::Fill, vec![ColorValue::red(), ColorValue::blue()])
            .unwrap();
        path.increment(Attribute::Hue, 0.25).unwrap();
        canvas.draw_path(&path, 0.0, 0.0, 4).unwrap();

        let hues: Vec<f64> = fills(&canvas).iter().map(|c| c.hue()).collect();
        let blue_shifted = 2.0 / 3.0 + 0.25;
        for (hue, expected) in hues.iter().zip([0.25, blue_shifted, 0.25, blue_shifted]) {
            assert!((hue - expected).abs() < 1e-6, "{hue} != {expected}");
        }
    }

    #[test]
    fn test_reused_renderer_starts_fresh() {
        let mut canvas = canvas();
        let mut path = square();
        path.increment(Attribute::Rotation, 30.0).unwrap();
        path.fill(ColorValue::red()).unwrap();
        path.increment(Attribute::Hue, 0.1).unwrap();

        let mut renderer = IterativeRenderer::new();
        renderer.draw(&mut canvas, &path, Point::ZERO, 3).unwrap();
        renderer.draw(&mut canvas, &path, Point::ZERO, 1).unwrap();

        let last = canvas.context().paints().last().unwrap();
        assert_affine_eq(last.ctm, Affine::IDENTITY);
        assert!((last.fill.hue() - 0.1).abs() < 1e-6);
        assert_affine_eq(renderer.cumulative(), Affine::IDENTITY);
    }

    #[test]
    fn test_empty_path_is_not_painted() {
        let mut canvas = canvas();
        let saves = canvas.context().save_count();
        let path = Path::starting_at(5.0, 5.0);
        canvas.draw_path(&path, 0.0, 0.0, 3).unwrap();

        assert_eq!(canvas.context().paints().count(), 0);
        assert_eq!(canvas.context().save_count() - saves, 6);
    }

    #[test]
    fn test_sample_transform_identity_defaults() {
        let mut rng = StdRng::seed_from_u64(1);
        let step = sample_transform(&ParamMap::incremental_defaults(), &mut rng).unwrap();
        assert_affine_eq(step, Affine::IDENTITY);
    }
}
