//! Command-line layer
//!
//! Argument handling lives in `main.rs`; the workflow itself is in
//! [orchestration], decoupled from clap so it can be driven
//! programmatically.

pub mod orchestration;

pub use orchestration::{run_build_workflow, WorkflowResult};
