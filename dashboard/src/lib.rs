//! Command-line host for the stock data viewer.
//!
//! One invocation runs one pass of the pipeline: fetch the history for the
//! requested ticker and range, compute the derived metrics, print the
//! dashboard panels to stdout and write the CSV export.

pub mod cli;
pub mod config;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod render;

pub use pipeline::{Dashboard, DashboardRequest, PipelineError, UserMessage, run_pipeline};
