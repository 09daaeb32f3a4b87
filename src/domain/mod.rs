//! Domain layer: the node tree and its lookups
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod hit;
pub mod record;
pub mod search;

pub use arena::{NodeId, NodeTree, TreeNode, BRANCH_OFFSET, DEFAULT_POSITION, ROOT_TITLE};
pub use entities::*;
pub use error::DomainError;
pub use hit::{HitTester, HIT_RADIUS};
pub use record::NodeRecord;
pub use search::find_by_title_fragment;
