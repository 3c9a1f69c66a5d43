//! Rosette Core Library
//!
//! Platform-agnostic data for procedural drawing: colors with an HSB view,
//! declarative parameter specs, and reusable paths that carry randomize and
//! increment rules for iterative rendering.

pub mod color;
pub mod config;
pub mod error;
pub mod geom;
pub mod params;
pub mod path;
pub mod style;

pub use color::ColorValue;
pub use config::CanvasConfig;
pub use error::{GraphicsError, GraphicsResult};
pub use params::{Attribute, ParamMap, ParamSpec, RangeKind};
pub use path::Path;
pub use style::{BlendMode, Gradient, ImageRef, LineCap, LineJoin, Registration, Shadow};
