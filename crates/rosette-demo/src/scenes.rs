//! Classic iteration scenes.

use kurbo::Point;
use rosette_core::{Attribute, ColorValue, Gradient, GraphicsResult, ParamSpec, Path};
use rosette_render::{Canvas, RecordingContext};

/// Canvas the demo scenes draw on.
pub type DemoCanvas = Canvas<RecordingContext>;

/// A named scene that draws onto a canvas.
pub struct Scene {
    pub name: &'static str,
    pub description: &'static str,
    pub draw: fn(&mut DemoCanvas) -> GraphicsResult<()>,
}

/// All available scenes.
pub fn all() -> Vec<Scene> {
    vec![
        Scene {
            name: "flower",
            description: "five-petal flowers with randomized placement and color",
            draw: flower,
        },
        Scene {
            name: "petals",
            description: "a petal drifting in position, scale and color",
            draw: petals,
        },
        Scene {
            name: "kaleidoscope",
            description: "a rotated path repeated around a center",
            draw: kaleidoscope,
        },
        Scene {
            name: "spiral",
            description: "a square spiraling inwards with a cycled palette",
            draw: spiral,
        },
        Scene {
            name: "grid",
            description: "a dot drawn in every cell of a grid",
            draw: grid,
        },
    ]
}

/// Find a scene by name.
pub fn find(name: &str) -> Option<Scene> {
    all().into_iter().find(|scene| scene.name == name)
}

fn flower(canvas: &mut DemoCanvas) -> GraphicsResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.background(ColorValue::white());

    let mut shape = Path::new();
    let petals = 5;
    for _ in 0..petals {
        shape.petal(0.0, 0.0, 40.0, 100.0, 50.0);
        shape.rotate(360.0 / petals as f64);
    }
    let complement = ColorValue::blue().complementary();
    shape
        .fill(complement)?
        .stroke(complement)?
        .randomize(Attribute::StrokeWidth, 1.0..=10.0)?
        .randomize(Attribute::Rotation, 0.0..=360.0)?
        .randomize(Attribute::Scale, 0.5..=1.0)?
        .randomize(Attribute::ScaleX, 0.5..=1.0)?
        .randomize(Attribute::ScaleY, 0.5..=1.0)?
        .randomize(Attribute::Alpha, 0.5..=1.0)?
        .randomize(Attribute::Saturation, 0.0..=1.0)?
        .randomize(Attribute::Brightness, 0.0..=1.0)?
        .randomize(Attribute::X, -100.0..=100.0)?
        .randomize(Attribute::Y, -100.0..=100.0)?;

    canvas.translate(w / 2.0, h / 2.0);
    canvas.draw(&shape, 0.0, 0.0, 100)
}

fn petals(canvas: &mut DemoCanvas) -> GraphicsResult<()> {
    canvas.background(ColorValue::white());

    let mut shape = Path::new();
    shape.petal(0.0, 0.0, 40.0, 150.0, 30.0).oval(-10.0, 20.0, 20.0, 20.0);
    shape
        .fill(ColorValue::red())?
        .increment(Attribute::Rotation, 5.0)?
        .increment(Attribute::ScaleX, 0.99)?
        .increment(Attribute::ScaleY, 0.96)?
        .increment(Attribute::X, 10.0)?
        .increment(Attribute::Y, 12.0)?
        .increment(Attribute::Hue, -0.02..=0.02)?
        .increment(Attribute::Saturation, -0.1..=0.1)?
        .increment(Attribute::Brightness, -0.1..=0.1)?
        .increment(Attribute::Alpha, -0.1..=0.1)?;

    canvas.translate(50.0, 220.0);
    canvas.draw(&shape, 0.0, 0.0, 200)
}

fn kaleidoscope(canvas: &mut DemoCanvas) -> GraphicsResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    let gradient = Gradient::new(&[ColorValue::beige(), ColorValue::orange()])?;
    canvas.linear_gradient(&gradient, Point::new(w / 2.0, 0.0), Point::new(w / 2.0, h));

    let mut arm = Path::new();
    arm.line(0.0, 0.0, 0.0, 120.0).oval(-8.0, 120.0, 16.0, 16.0);
    let mut star = Path::new();
    star.kaleidoscope(&arm, 12);
    star.stroke(ColorValue::black())?
        .increment(Attribute::Rotation, 7.5)?
        .increment(Attribute::Scale, 0.9)?
        .increment(Attribute::Fill, vec![ColorValue::cyan(), ColorValue::magenta()])?;

    canvas.translate(w / 2.0, h / 2.0);
    canvas.draw(&star, 0.0, 0.0, 8)
}

fn spiral(canvas: &mut DemoCanvas) -> GraphicsResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.background(ColorValue::black());

    let mut square = Path::new();
    square.rect(-5.0, -5.0, 10.0, 10.0);
    let mut shape = Path::new();
    shape.spiral(&square, 20.0, 0.95, 0.95, 10.0, 10.0, 30);
    shape
        .increment(
            Attribute::Fill,
            vec![ColorValue::red(), ColorValue::orange(), ColorValue::yellow()],
        )?
        .increment(Attribute::Rotation, ParamSpec::int_range(10, 20))?;

    canvas.translate(w / 2.0, h / 2.0);
    canvas.draw(&shape, 0.0, 0.0, 12)
}

fn grid(canvas: &mut DemoCanvas) -> GraphicsResult<()> {
    canvas.background(ColorValue::white());

    let mut dot = Path::new();
    dot.oval(-6.0, -6.0, 12.0, 12.0);
    dot.fill(vec![ColorValue::red(), ColorValue::green(), ColorValue::blue()])?
        .randomize(Attribute::Scale, 0.5..=1.5)?;
    canvas.grid(&dot, 8, 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosette_core::CanvasConfig;

    #[test]
    fn test_every_scene_draws() {
        for scene in all() {
            let mut canvas = Canvas::new(RecordingContext::new(), CanvasConfig::new().with_seed(1));
            (scene.draw)(&mut canvas).unwrap();
            assert!(
                canvas.context().paints().count() > 0,
                "scene {} painted nothing",
                scene.name
            );
            assert_eq!(canvas.stack_size(), 2, "scene {} left state behind", scene.name);
        }
    }

    #[test]
    fn test_find_scene() {
        assert!(find("flower").is_some());
        assert!(find("nope").is_none());
    }
}
