//! # mt_app
//!
//! Shared utilities for the MedTrack gateway binary

pub mod config_loader;
pub mod tracing_setup;
