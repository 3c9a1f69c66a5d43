//! Reusable shape definitions.
//!
//! A [`Path`] bakes its own construction-time transform into every command as
//! it is appended: calling [`Path::rotate`] affects only geometry added
//! afterwards. Alongside the geometry it carries the randomized and
//! incremental parameter maps the iterative renderer resolves per copy.

use crate::error::GraphicsResult;
use crate::geom;
use crate::params::{Attribute, ParamMap, ParamSpec};
use crate::style::{ImageRef, Registration};
use kurbo::{Affine, Arc, BezPath, Ellipse, PathEl, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Flattening tolerance used when converting primitives to path commands.
const TOLERANCE: f64 = 0.1;

/// A reusable shape: baked geometry plus randomize/increment specs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    /// Path commands in shape space, local transform already applied.
    geometry: BezPath,
    /// Construction-time transform for subsequently added geometry.
    #[serde(skip)]
    transform: Affine,
    /// Specs resampled independently for every rendered copy.
    #[serde(default = "ParamMap::randomized_defaults")]
    randomized: ParamMap,
    /// Specs accumulated from one rendered copy to the next.
    #[serde(default = "ParamMap::incremental_defaults")]
    incremental: ParamMap,
    #[serde(default)]
    registration: Registration,
    /// Image drawn clipped to the shape.
    #[serde(default)]
    image: Option<ImageRef>,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl Path {
    /// Create an empty path with identity parameter defaults.
    pub fn new() -> Self {
        Self {
            geometry: BezPath::new(),
            transform: Affine::IDENTITY,
            randomized: ParamMap::randomized_defaults(),
            incremental: ParamMap::incremental_defaults(),
            registration: Registration::default(),
            image: None,
        }
    }

    /// Create a path whose pen starts at `(x, y)`.
    pub fn starting_at(x: f64, y: f64) -> Self {
        let mut path = Self::new();
        path.move_to(x, y);
        path
    }

    /// Load a path definition from JSON. Both parameter maps are validated.
    pub fn from_json(json: &str) -> GraphicsResult<Self> {
        let path: Path = serde_json::from_str(json)?;
        path.randomized.validate()?;
        path.incremental.validate()?;
        Ok(path)
    }

    pub fn to_json(&self) -> GraphicsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // --- parameters -------------------------------------------------------

    /// Perturb `attr` independently for every rendered copy.
    pub fn randomize(&mut self, attr: Attribute, spec: impl Into<ParamSpec>) -> GraphicsResult<&mut Self> {
        self.randomized.set(attr, spec.into())?;
        Ok(self)
    }

    /// Drift `attr` cumulatively from one rendered copy to the next.
    pub fn increment(&mut self, attr: Attribute, spec: impl Into<ParamSpec>) -> GraphicsResult<&mut Self> {
        self.incremental.set(attr, spec.into())?;
        Ok(self)
    }

    /// Remove `attr` from the randomized map.
    pub fn clear_randomize(&mut self, attr: Attribute) -> Option<ParamSpec> {
        self.randomized.remove(attr)
    }

    /// Remove `attr` from the incremental map.
    pub fn clear_increment(&mut self, attr: Attribute) -> Option<ParamSpec> {
        self.incremental.remove(attr)
    }

    /// Shorthand for `randomize(Attribute::Fill, ..)`.
    pub fn fill(&mut self, colors: impl Into<ParamSpec>) -> GraphicsResult<&mut Self> {
        self.randomize(Attribute::Fill, colors)
    }

    /// Shorthand for `randomize(Attribute::Stroke, ..)`.
    pub fn stroke(&mut self, colors: impl Into<ParamSpec>) -> GraphicsResult<&mut Self> {
        self.randomize(Attribute::Stroke, colors)
    }

    /// Draw without stroke color of its own.
    pub fn no_stroke(&mut self) -> &mut Self {
        self.randomized.remove(Attribute::Stroke);
        self
    }

    pub fn randomized(&self) -> &ParamMap {
        &self.randomized
    }

    pub fn incremental(&self) -> &ParamMap {
        &self.incremental
    }

    /// Registration used by subsequent `rect`/`oval`/`round_rect` calls.
    pub fn set_registration(&mut self, mode: Registration) -> &mut Self {
        self.registration = mode;
        self
    }

    pub fn registration(&self) -> Registration {
        self.registration
    }

    /// Attach an image drawn clipped to this shape.
    pub fn set_image(&mut self, image: ImageRef) -> &mut Self {
        self.image = Some(image);
        self
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    // --- inspection -------------------------------------------------------

    /// Baked geometry.
    pub fn geometry(&self) -> &BezPath {
        &self.geometry
    }

    /// Current construction-time transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// True when there is nothing to paint (no commands beyond pen moves).
    pub fn is_empty(&self) -> bool {
        self.geometry
            .elements()
            .iter()
            .all(|el| matches!(el, PathEl::MoveTo(_)))
    }

    pub fn bounds(&self) -> Rect {
        if self.geometry.elements().is_empty() {
            return Rect::ZERO;
        }
        self.geometry.bounding_box()
    }

    pub fn origin_x(&self) -> f64 {
        self.bounds().x0
    }

    pub fn origin_y(&self) -> f64 {
        self.bounds().y0
    }

    pub fn width(&self) -> f64 {
        self.bounds().width()
    }

    pub fn height(&self) -> f64 {
        self.bounds().height()
    }

    /// Pen position in shape space, `None` before the first command.
    pub fn current_point(&self) -> Option<Point> {
        let mut start = None;
        let mut current = None;
        for el in self.geometry.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                    current = Some(p);
                }
                PathEl::ClosePath => current = start,
            }
        }
        current
    }

    /// Even-odd containment test in shape space.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.geometry.winding(Point::new(x, y)) % 2 != 0
    }

    // --- path construction ------------------------------------------------

    fn push(&mut self, el: PathEl) {
        self.geometry.push(self.transform * el);
    }

    fn extend(&mut self, elements: impl IntoIterator<Item = PathEl>) {
        for el in elements {
            self.push(el);
        }
    }

    /// Pen position in the coordinates passed to the builder methods.
    fn local_current_point(&self) -> Option<Point> {
        let baked = self.current_point()?;
        if self.transform.determinant().abs() < f64::EPSILON {
            return None;
        }
        Some(self.transform.inverse() * baked)
    }

    fn has_current_point(&self) -> bool {
        self.current_point().is_some()
    }

    /// Move the pen to `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathEl::MoveTo(Point::new(x, y)));
        self
    }

    /// Line from the pen to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathEl::LineTo(Point::new(x, y)));
        self
    }

    /// Cubic Bézier from the pen through two control points to `(x, y)`.
    pub fn curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) -> &mut Self {
        self.push(PathEl::CurveTo(
            Point::new(cp1x, cp1y),
            Point::new(cp2x, cp2y),
            Point::new(x, y),
        ));
        self
    }

    /// Quadratic Bézier from the pen through one control point to `(x, y)`.
    pub fn qcurve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> &mut Self {
        self.push(PathEl::QuadTo(Point::new(cpx, cpy), Point::new(x, y)));
        self
    }

    /// Arc of `radius` tangent to the lines pen→`(x1, y1)` and `(x1, y1)`→`(x2, y2)`.
    ///
    /// Degenerate configurations fall back to a straight line to `(x1, y1)`.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> &mut Self {
        let corner = Point::new(x1, y1);
        let Some(p0) = self.local_current_point() else {
            return self.move_to(x1, y1);
        };
        let v0 = p0 - corner;
        let v1 = Point::new(x2, y2) - corner;
        if radius <= 0.0 || v0.hypot() < f64::EPSILON || v1.hypot() < f64::EPSILON || v0.cross(v1).abs() < 1e-12 {
            return self.line_to(x1, y1);
        }

        let (u0, u1) = (v0.normalize(), v1.normalize());
        let half = u0.dot(u1).clamp(-1.0, 1.0).acos() / 2.0;
        let tangent = radius / half.tan();
        let t0 = corner + u0 * tangent;
        let t1 = corner + u1 * tangent;
        let center = corner + (u0 + u1).normalize() * (radius / half.sin());

        let start_angle = (t0 - center).atan2();
        let mut sweep = (t1 - center).atan2() - start_angle;
        if sweep > std::f64::consts::PI {
            sweep -= std::f64::consts::TAU;
        } else if sweep < -std::f64::consts::PI {
            sweep += std::f64::consts::TAU;
        }

        self.line_to(t0.x, t0.y);
        let arc = circular_arc(center, radius, start_angle, sweep);
        self.extend(arc.append_iter(TOLERANCE));
        self
    }

    /// Close the current subpath.
    pub fn end_path(&mut self) -> &mut Self {
        if self.has_current_point() {
            self.push(PathEl::ClosePath);
        }
        self
    }

    // --- primitives -------------------------------------------------------

    /// Append another path's geometry under this path's current transform.
    pub fn add_path(&mut self, other: &Path) -> &mut Self {
        let elements: Vec<PathEl> = other.geometry.elements().to_vec();
        self.extend(elements);
        self
    }

    /// Rectangle of `w`×`h` at `(x, y)` under the current registration.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let (x, y) = self.registration.origin(x, y, w, h);
        log::debug!("path.rect at [{x},{y}] with {w}x{h}");
        let rect = Rect::new(x, y, x + w, y + h);
        self.extend(rect.path_elements(TOLERANCE));
        self
    }

    /// Rectangle whose corners are rounded by `roundness` (a fraction of the
    /// shorter side).
    pub fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, roundness: f64) -> &mut Self {
        if roundness <= 0.0 {
            return self.rect(x, y, w, h);
        }
        let (x, y) = self.registration.origin(x, y, w, h);
        let curve = (w * roundness).min(h * roundness);
        self.move_to(x, y + curve)
            .curve_to(x, y, x, y, x + curve, y)
            .line_to(x + w - curve, y)
            .curve_to(x + w, y, x + w, y, x + w, y + curve)
            .line_to(x + w, y + h - curve)
            .curve_to(x + w, y + h, x + w, y + h, x + w - curve, y + h)
            .line_to(x + curve, y + h)
            .curve_to(x, y + h, x, y + h, x, y + h - curve)
            .end_path()
    }

    /// Ellipse inscribed in the `w`×`h` box at `(x, y)`.
    pub fn oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        let (x, y) = self.registration.origin(x, y, w, h);
        log::debug!("path.oval at [{x},{y}] with {w}x{h}");
        let ellipse = Ellipse::from_rect(Rect::new(x, y, x + w, y + h));
        self.extend(ellipse.path_elements(TOLERANCE));
        self
    }

    /// Straight segment as its own subpath.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.move_to(x1, y1).line_to(x2, y2)
    }

    /// Polyline through `points` as its own subpath.
    pub fn lines(&mut self, points: &[Point]) -> &mut Self {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(first.x, first.y);
            for p in rest {
                self.line_to(p.x, p.y);
            }
        }
        self
    }

    /// Circular arc centered at `(x, y)`, angles in degrees with 0° at
    /// 12 o'clock, sweeping clockwise from `start_angle` to `end_angle`.
    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> &mut Self {
        let (start, sweep) = clockwise_arc_angles(start_angle, end_angle);
        let center = Point::new(x, y);
        let first = center + Vec2::from_angle(start) * radius;
        if self.has_current_point() {
            self.line_to(first.x, first.y);
        } else {
            self.move_to(first.x, first.y);
        }
        let arc = circular_arc(center, radius, start, sweep);
        self.extend(arc.append_iter(TOLERANCE));
        self
    }

    /// Petal with its base at `(x, y)`, width `w`, height `h` and the widest
    /// point `bulge` along its length.
    pub fn petal(&mut self, x: f64, y: f64, w: f64, h: f64, bulge: f64) -> &mut Self {
        self.move_to(x, y)
            .qcurve_to(x - w, y + bulge, x, y + h)
            .qcurve_to(x + w, y + bulge, x, y)
            .end_path()
    }

    /// Append `path` `qty` times, rotating by `360 / qty` degrees after each.
    pub fn kaleidoscope(&mut self, path: &Path, qty: usize) -> &mut Self {
        if qty == 0 {
            return self;
        }
        let deg = 360.0 / qty as f64;
        for _ in 0..qty {
            self.add_path(path);
            self.rotate(deg);
        }
        self
    }

    /// Append `path` `iterations` times, rotating, scaling and translating the
    /// construction transform after each copy.
    #[allow(clippy::too_many_arguments)]
    pub fn spiral(
        &mut self,
        path: &Path,
        rotation: f64,
        scale_x: f64,
        scale_y: f64,
        tx: f64,
        ty: f64,
        iterations: usize,
    ) -> &mut Self {
        for _ in 0..iterations {
            self.add_path(path);
            self.rotate(rotation);
            self.scale(scale_x, scale_y);
            self.translate(tx, ty);
        }
        self
    }

    // --- construction transform -------------------------------------------

    /// Rotate subsequently added geometry by `deg` degrees.
    pub fn rotate(&mut self, deg: f64) -> &mut Self {
        log::debug!("path.rotate {deg}");
        self.transform = self.transform * Affine::rotate(geom::radians(deg));
        self
    }

    /// Scale subsequently added geometry.
    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        log::debug!("path.scale {sx}x{sy}");
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
        self
    }

    /// Translate subsequently added geometry.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        log::debug!("path.translate {x}x{y}");
        self.transform = self.transform * Affine::translate((x, y));
        self
    }
}

/// Start angle and clockwise sweep in radians for an arc given in clock
/// degrees (0° at 12 o'clock). A non-zero span that wraps to 0 is a full turn.
pub fn clockwise_arc_angles(start_angle: f64, end_angle: f64) -> (f64, f64) {
    let start = geom::radians(start_angle - 90.0);
    let span = end_angle - start_angle;
    let mut sweep = span.rem_euclid(360.0);
    if sweep == 0.0 && span != 0.0 {
        sweep = 360.0;
    }
    (start, geom::radians(sweep))
}

fn circular_arc(center: Point, radius: f64, start_angle: f64, sweep_angle: f64) -> Arc {
    Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle,
        sweep_angle,
        x_rotation: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::error::GraphicsError;

    const EPS: f64 = 1e-9;

    fn points(path: &Path) -> Vec<Point> {
        path.geometry()
            .elements()
            .iter()
            .filter_map(|el| el.end_point())
            .collect()
    }

    #[test]
    fn test_new_path_defaults() {
        let path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.randomized().get(Attribute::StrokeWidth), Some(&ParamSpec::Constant(1.0)));
        assert_eq!(path.incremental().get(Attribute::Scale), Some(&ParamSpec::Constant(1.0)));
    }

    #[test]
    fn test_rect_corner_and_center() {
        let mut path = Path::new();
        path.rect(10.0, 20.0, 30.0, 40.0);
        let b = path.bounds();
        assert!((b.x0 - 10.0).abs() < EPS && (b.y0 - 20.0).abs() < EPS);
        assert!((b.width() - 30.0).abs() < EPS && (b.height() - 40.0).abs() < EPS);

        let mut path = Path::new();
        path.set_registration(Registration::Center).rect(0.0, 0.0, 20.0, 20.0);
        assert!((path.origin_x() + 10.0).abs() < EPS);
        assert!((path.origin_y() + 10.0).abs() < EPS);
    }

    #[test]
    fn test_transform_is_baked_at_append_time() {
        let mut path = Path::new();
        path.line(0.0, 0.0, 10.0, 0.0);
        path.rotate(90.0);
        path.line(0.0, 0.0, 10.0, 0.0);

        let pts = points(&path);
        // First segment unaffected by the later rotation.
        assert!((pts[1].x - 10.0).abs() < EPS && pts[1].y.abs() < EPS);
        // Second segment rotated a quarter turn.
        assert!(pts[3].x.abs() < EPS && (pts[3].y - 10.0).abs() < EPS);
    }

    #[test]
    fn test_translate_then_scale_composes_in_call_order() {
        let mut path = Path::new();
        path.translate(5.0, 0.0).scale(2.0, 2.0).move_to(1.0, 1.0);
        let p = points(&path)[0];
        assert!((p.x - 7.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_petal_is_closed() {
        let mut path = Path::new();
        path.petal(0.0, 0.0, 10.0, 50.0, 25.0);
        let els = path.geometry().elements();
        assert!(matches!(els[0], PathEl::MoveTo(_)));
        assert!(matches!(els[1], PathEl::QuadTo(_, _)));
        assert!(matches!(els.last(), Some(PathEl::ClosePath)));
        assert!((path.height() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_kaleidoscope_rotates_copies() {
        let mut petal = Path::new();
        petal.line(0.0, 0.0, 0.0, 10.0);
        let mut flower = Path::new();
        flower.kaleidoscope(&petal, 4);
        let pts = points(&flower);
        assert_eq!(pts.len(), 8);
        // Second copy is rotated by 90 degrees.
        assert!((pts[3].x + 10.0).abs() < EPS && pts[3].y.abs() < EPS);
        // Construction transform ends at a full turn.
        let t = flower.transform().as_coeffs();
        assert!((t[0] - 1.0).abs() < EPS && t[1].abs() < EPS);
    }

    #[test]
    fn test_arc_quarter_clockwise() {
        let mut path = Path::new();
        path.arc(0.0, 0.0, 10.0, 0.0, 90.0);
        let pts = points(&path);
        let first = pts[0];
        let last = *pts.last().unwrap();
        // 12 o'clock on a y-down surface, then 3 o'clock.
        assert!(first.x.abs() < 1e-6 && (first.y + 10.0).abs() < 1e-6);
        assert!((last.x - 10.0).abs() < 1e-6 && last.y.abs() < 1e-6);
    }

    #[test]
    fn test_clockwise_arc_angles() {
        let (_, sweep) = clockwise_arc_angles(0.0, 360.0);
        assert!((sweep - std::f64::consts::TAU).abs() < EPS);
        let (_, sweep) = clockwise_arc_angles(90.0, 0.0);
        assert!((sweep - geom::radians(270.0)).abs() < EPS);
        let (_, sweep) = clockwise_arc_angles(45.0, 45.0);
        assert_eq!(sweep, 0.0);
    }

    #[test]
    fn test_arc_to_tangent_points() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).arc_to(10.0, 0.0, 10.0, 10.0, 5.0);
        let pts = points(&path);
        assert!((pts[1].x - 5.0).abs() < 1e-6 && pts[1].y.abs() < 1e-6);
        let end = *pts.last().unwrap();
        assert!((end.x - 10.0).abs() < 1e-6 && (end.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_arc_to_collinear_falls_back_to_line() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).arc_to(10.0, 0.0, 20.0, 0.0, 5.0);
        assert_eq!(path.geometry().elements().len(), 2);
        assert_eq!(path.current_point(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_contains_even_odd() {
        let mut path = Path::new();
        path.rect(0.0, 0.0, 10.0, 10.0);
        assert!(path.contains(5.0, 5.0));
        assert!(!path.contains(15.0, 5.0));
        path.rect(2.0, 2.0, 6.0, 6.0);
        assert!(!path.contains(5.0, 5.0));
        assert!(path.contains(1.0, 1.0));
    }

    #[test]
    fn test_current_point_after_close() {
        let mut path = Path::starting_at(1.0, 2.0);
        path.line_to(5.0, 5.0).end_path();
        assert_eq!(path.current_point(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_randomize_overwrites_and_validates() {
        let mut path = Path::new();
        path.randomize(Attribute::Rotation, 0.0..=360.0).unwrap();
        path.randomize(Attribute::Rotation, 45.0).unwrap();
        assert_eq!(path.randomized().get(Attribute::Rotation), Some(&ParamSpec::Constant(45.0)));
        assert!(path.increment(Attribute::Fill, 1.0).is_err());
        assert!(path.fill(vec![ColorValue::red(), ColorValue::blue()]).is_ok());
        // The incremental map is untouched by randomize.
        assert_eq!(path.incremental().get(Attribute::Rotation), Some(&ParamSpec::Constant(0.0)));
    }

    #[test]
    fn test_json_roundtrip_keeps_specs() {
        let mut path = Path::new();
        path.petal(0.0, 0.0, 10.0, 40.0, 20.0);
        path.increment(Attribute::Hue, -0.5..=0.5).unwrap();
        path.fill(ColorValue::red()).unwrap();

        let json = path.to_json().unwrap();
        let back = Path::from_json(&json).unwrap();
        assert_eq!(back.geometry().elements(), path.geometry().elements());
        assert_eq!(back.incremental(), path.incremental());
        assert_eq!(back.randomized(), path.randomized());
    }

    #[test]
    fn test_json_rejects_unknown_attribute() {
        let json = r#"{"geometry":[],"randomized":{"wobble":{"constant":1.0}}}"#;
        assert!(matches!(Path::from_json(json), Err(GraphicsError::Configuration(_))));
        let json = r#"{"geometry":[],"randomized":{"fill":{"constant":1.0}}}"#;
        assert!(matches!(Path::from_json(json), Err(GraphicsError::Configuration(_))));
    }

    #[test]
    fn test_json_palette_colors_are_clamped() {
        let json = r#"{"geometry":[],"randomized":{"fill":{"palette":[{"r":5.0,"g":0.5,"b":-2.0,"a":1.0}]}}}"#;
        let path = Path::from_json(json).unwrap();
        let colors = path.randomized().get(Attribute::Fill).unwrap().colors().to_vec();
        assert_eq!(colors, vec![ColorValue::rgb(1.0, 0.5, 0.0)]);
    }
}
