pub mod config;
pub mod domain;
pub mod error;
pub mod git_ops;
pub mod manifest;
pub mod rewrite;
pub mod ui;
pub mod workflow;

pub use error::{AutoCommitError, Result};
