//! Tracing subscriber setup.
//!
//! Output is off unless `VELA_LOG` or `RUST_LOG` is set. Both take
//! `EnvFilter` directives, `VELA_LOG` winning when both are present:
//!
//! - `VELA_LOG=debug`: entry points of every compile phase.
//! - `VELA_LOG=vela_bind=trace`: folding decisions, step assignment and
//!   subscription churn.
//!
//! Spans render as an indented tree on stderr.

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Install the subscriber. Safe to call more than once; only the first
/// call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let Some(directives) = std::env::var("VELA_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
        else {
            return;
        };
        let layer = HierarchicalLayer::new(2)
            .with_writer(std::io::stderr)
            .with_targets(true)
            .with_bracketed_fields(true);
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new(directives))
            .with(layer)
            .try_init();
    });
}
