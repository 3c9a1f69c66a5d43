//! Rosette Render Library
//!
//! The graphics context abstraction, the [`Canvas`] drawing surface and the
//! iterative renderer that replicates a path with randomized and incremental
//! parameters. [`RecordingContext`] is always available; the Vello context is
//! behind the `vello-renderer` feature.

pub mod canvas;
mod context;
pub mod iterate;
mod recording;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use canvas::{Canvas, Drawable};
pub use context::{GraphicsContext, PaintMode};
pub use iterate::{IterativeRenderer, draw_path, sample_transform};
pub use recording::{Command, PaintRecord, RecordingContext};
pub use surface::RenderSurface;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloContext;
