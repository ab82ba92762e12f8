//! Core trait abstractions for the extraction library.
//!
//! These traits define the interfaces that applications implement
//! to plug a model-serving backend into the pipeline.

pub mod model;
