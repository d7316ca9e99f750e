//! Imported data line entities.

pub mod model;

pub use model::{DataLine, ImportReport};
