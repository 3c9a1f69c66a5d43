//! Demo entry point.
//!
//! Renders one of the built-in scenes, or a path loaded from JSON, onto a
//! recording canvas and prints the display list as JSON.
//!
//! ```text
//! rosette-demo [SCENE | --path FILE] [--iterations N] [--seed N] [--size WxH]
//! ```

mod scenes;

use rosette_core::{CanvasConfig, GraphicsError, Path};
use rosette_render::{Canvas, RecordingContext};
use thiserror::Error;

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Usage: {0}")]
    Usage(String),
}

#[derive(Debug)]
struct Options {
    scene: String,
    path_file: Option<String>,
    iterations: usize,
    config: CanvasConfig,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, DemoError> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| DemoError::Usage(format!("{flag} needs a valid value")))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, DemoError> {
    let mut options = Options {
        scene: "flower".to_string(),
        path_file: None,
        iterations: 10,
        config: CanvasConfig::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => options.config.seed = Some(parse_value("--seed", args.next())?),
            "--iterations" => options.iterations = parse_value("--iterations", args.next())?,
            "--path" => options.path_file = Some(parse_value("--path", args.next())?),
            "--size" => {
                let size: String = parse_value("--size", args.next())?;
                let (w, h) = size
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
                    .ok_or_else(|| DemoError::Usage("--size expects WxH".to_string()))?;
                options.config = options.config.with_size(w, h);
            }
            "--verbose" => options.config.verbose = true,
            flag if flag.starts_with("--") => {
                return Err(DemoError::Usage(format!("unknown flag {flag}")));
            }
            scene => options.scene = scene.to_string(),
        }
    }
    Ok(options)
}

fn run(options: Options) -> Result<String, DemoError> {
    let mut canvas = Canvas::new(RecordingContext::new(), options.config.clone());

    if let Some(file) = &options.path_file {
        let json = std::fs::read_to_string(file)?;
        let path = Path::from_json(&json)?;
        log::info!("Drawing {file} {} times", options.iterations);
        let (w, h) = (canvas.width(), canvas.height());
        canvas.translate(w / 2.0, h / 2.0);
        canvas.draw(&path, 0.0, 0.0, options.iterations)?;
    } else {
        let scene = scenes::find(&options.scene).ok_or_else(|| {
            let names: Vec<&str> = scenes::all().iter().map(|s| s.name).collect();
            DemoError::Usage(format!(
                "unknown scene {}, expected one of {}",
                options.scene,
                names.join(", ")
            ))
        })?;
        log::info!("Drawing scene {}: {}", scene.name, scene.description);
        (scene.draw)(&mut canvas)?;
    }

    let ctx = canvas.into_context();
    log::info!(
        "Recorded {} commands ({} paints, {} saves, {} restores)",
        ctx.commands().len(),
        ctx.paints().count(),
        ctx.save_count(),
        ctx.restore_count()
    );
    Ok(serde_json::to_string_pretty(ctx.commands())?)
}

fn main() {
    env_logger::init();
    log::info!("Starting rosette demo");

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("{err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["spiral", "--seed", "4", "--size", "200x100"])).unwrap();
        assert_eq!(options.scene, "spiral");
        assert_eq!(options.config.seed, Some(4));
        assert!((options.config.width - 200.0).abs() < f64::EPSILON);
        assert!((options.config.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_args_rejects_unknown_flag() {
        assert!(matches!(parse_args(args(&["--fast"])), Err(DemoError::Usage(_))));
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let run_once = || {
            let options = parse_args(args(&["flower", "--seed", "9"])).unwrap();
            run(options).unwrap()
        };
        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn test_unknown_scene_lists_names() {
        let options = parse_args(args(&["nope"])).unwrap();
        match run(options) {
            Err(DemoError::Usage(message)) => assert!(message.contains("flower")),
            other => panic!("expected a usage error, got {other:?}"),
        }
    }
}
