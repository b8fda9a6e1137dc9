//! Code generation module
//!
//! Generation is two-phase: tables are [`collect`](ModelBatch::collect)ed
//! into a [`ModelBatch`], then an [`Emitter`] flushes the whole batch once.

mod batch;
mod emitter;
mod naming;
mod struct_generator;
mod type_resolver;

pub use batch::*;
pub use emitter::*;
pub use naming::*;
pub use struct_generator::{render_batch, RenderedFile};
pub use type_resolver::*;
