//! Shared helpers for unit and integration tests

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{NodeId, NodeTree};

static TEST_SETUP: Once = Once::new();

/// Install the test logging subscriber once per process.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Dependencies that only add noise at trace level
    let noisy_modules = ["config", "toml"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // RUST_LOG wins; otherwise trace our own crate only
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orgtree=trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// Ids of the nodes in [`org_chart`].
#[derive(Debug, Clone, Copy)]
pub struct OrgChart {
    pub root: NodeId,
    pub engineering: NodeId,
    pub backend: NodeId,
    pub frontend: NodeId,
    pub sales: NodeId,
}

/// A small organization used across tests:
///
/// ```text
/// Root (300,100)
/// ├── Engineering (400,200)
/// │   ├── Backend (500,300)
/// │   └── Frontend (500,200)   twin branch of Engineering
/// └── Sales (400,100)          twin branch of Root
/// ```
pub fn org_chart() -> (NodeTree, OrgChart) {
    let mut tree = NodeTree::new();
    let root = tree.root().expect("fresh tree has a root");
    let engineering = tree.add_node(Some(root), "Engineering").expect("engineering");
    let backend = tree.add_node(Some(engineering), "Backend").expect("backend");
    let frontend = tree
        .add_twin_branch(Some(engineering), "Frontend")
        .expect("frontend");
    let sales = tree.add_twin_branch(Some(root), "Sales").expect("sales");
    (
        tree,
        OrgChart {
            root,
            engineering,
            backend,
            frontend,
            sales,
        },
    )
}
