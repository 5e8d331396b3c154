//! Tracing subscriber installation for hosts and tests.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a subscriber once per process, if `RUST_LOG` is set.
///
/// `RUST_LOG` is parsed as an `EnvFilter`. With `FIR_LOG_TREE` also set,
/// spans are printed as an indented tree (handy for following nested
/// lazy resolution); otherwise events are printed flat.
///
/// The library never calls this itself.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("FIR_LOG_TREE").is_ok() {
            let tree = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true)
                .with_deferred_spans(true);
            Registry::default().with(filter).with(tree).init();
        } else {
            Registry::default()
                .with(filter)
                .with(fmt::layer().with_target(true).with_level(true))
                .init();
        }
    });
}
