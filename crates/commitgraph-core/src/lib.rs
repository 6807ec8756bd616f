//! Core types, configuration, and error handling for commitgraph.
//!
//! This crate provides the shared foundation used by the extractor and the
//! renderer crates:
//! - [`GraphError`] and [`ErrorKind`] for the failure taxonomy
//! - [`GraphConfig`] loaded from `.commitgraph.toml`
//! - Shared types: [`CommitRecord`], [`EdgeStyle`], [`ImageFormat`]

mod config;
mod error;
mod types;

pub use config::{GraphConfig, HistoryConfig, OutputConfig, RendererConfig, DEFAULT_CONFIG_FILE};
pub use error::{ErrorKind, GraphError};
pub use types::{CommitRecord, EdgeStyle, ImageFormat};

/// A convenience `Result` type for commitgraph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
