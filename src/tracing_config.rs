//! Tracing configuration for debugging type resolution and passes.
//!
//! Supports three output formats controlled by `SOYC_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, one level
//!   per pass span
//! - `json`: One JSON object per span/event, for tooling
//!
//! ## Quick start
//!
//! ```bash
//! # Pass spans with the diagnostics reported inside them
//! SOYC_LOG=debug SOYC_LOG_FORMAT=tree cargo test -p soyc-passes
//!
//! # Every lowered annotation
//! SOYC_LOG="soyc_types::lower=trace" cargo test -p soyc-types
//! ```
//!
//! The subscriber is only initialised when `SOYC_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a `SOYC_LOG_FORMAT` value; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("SOYC_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `SOYC_LOG`, falling back to `RUST_LOG`.
///
/// `SOYC_LOG` takes precedence when both are set. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `soyc_passes=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("SOYC_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `SOYC_LOG` nor `RUST_LOG` is set. A second
/// call, or a call after another subscriber was installed, is a no-op.
///
/// All output goes to stderr.
pub fn init_tracing() {
    let has_soyc_log = std::env::var("SOYC_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_soyc_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let result = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish()
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
