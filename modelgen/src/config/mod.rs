//! Configuration for modelgen

pub mod defaults;
mod settings;

pub use settings::*;
