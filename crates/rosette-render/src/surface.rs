//! The surface contract the iterative renderer draws through.

use kurbo::{Affine, BezPath, Rect};
use rand::RngCore;
use rosette_core::{ColorValue, ImageRef};

/// State stack, transform and paint operations needed to render a shape.
///
/// Every `push` must be matched by a `pop` on the same surface.
pub trait RenderSurface {
    /// Save the graphics state.
    fn push(&mut self);

    /// Restore the most recently saved graphics state.
    fn pop(&mut self);

    /// Post-multiply the current transform.
    fn concat(&mut self, transform: Affine);

    fn set_fill(&mut self, color: ColorValue);

    fn set_stroke(&mut self, color: ColorValue);

    fn set_stroke_width(&mut self, width: f64);

    fn set_alpha(&mut self, alpha: f64);

    /// Add `geometry` to the current path and paint it with the current
    /// fill and stroke.
    fn paint_geometry(&mut self, geometry: &BezPath);

    /// Intersect the clip region with `geometry`.
    fn clip_geometry(&mut self, geometry: &BezPath);

    /// Draw an image into `rect` in user space.
    fn paint_image(&mut self, image: &ImageRef, rect: Rect);

    /// Random source used to resolve parameter specs.
    fn rng(&mut self) -> &mut dyn RngCore;
}
