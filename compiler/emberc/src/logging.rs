//! Tracing subscriber setup for the `ember` binary.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber when `RUST_LOG` is set.
///
/// `EMBER_LOG_TREE=1` swaps the flat formatter for an indented tree of
/// spans. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
        if std::env::var("EMBER_LOG_TREE").is_ok_and(|v| v == "1") {
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_writer(std::io::stderr);
            registry.with(tree).init();
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .init();
        }
    });
}
