//! Core domain models for the pipeline
//!
//! This module defines the state record passed between steps, the step
//! abstraction, pipeline definitions, and run settings.

pub mod config;
pub mod pipeline;
pub mod state;
pub mod step;

pub use pipeline::*;
pub use state::*;
pub use step::*;
