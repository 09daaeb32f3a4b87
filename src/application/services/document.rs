//! Document service
//!
//! Reads and writes tree documents and opens the files attached to nodes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::record::{from_json, to_json};
use crate::domain::{DomainError, NodeId, NodeTree};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Service for persisting trees and launching attachments.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    opener: String,
}

impl DocumentService {
    /// Create a new document service; `opener` is the command used to open attachments.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        opener: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            cmd,
            opener: opener.into(),
        }
    }

    /// Read a document into a fresh tree.
    ///
    /// Nothing outside the returned tree is touched, so callers keep their
    /// current tree when this fails.
    pub fn load(&self, path: &Path) -> ApplicationResult<NodeTree> {
        debug!("load: path={}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;

        let tree = from_json(&content).map_err(|source| ApplicationError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("load: {} nodes, {} top-level", tree.len(), tree.top_level().len());
        Ok(tree)
    }

    /// Write a tree as a document.
    ///
    /// The content goes to a temporary sibling first and replaces `path` only
    /// once fully written.
    pub fn save(&self, tree: &NodeTree, path: &Path) -> ApplicationResult<()> {
        debug!("save: path={}, nodes={}", path.display(), tree.len());
        let content = to_json(tree)?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write_atomic(path, &content)
            .with_path_context("write document", path)
    }

    /// Start a new document holding only the root node.
    pub fn create(&self, path: &Path, force: bool) -> ApplicationResult<NodeTree> {
        if !force && self.fs.exists(path) {
            return Err(ApplicationError::DocumentExists(path.to_path_buf()));
        }
        let tree = NodeTree::new();
        self.save(&tree, path)?;
        Ok(tree)
    }

    /// Open the `index`-th file reference of `node` with the configured opener.
    ///
    /// Returns the path that was opened.
    pub fn open_attachment(
        &self,
        tree: &NodeTree,
        node: NodeId,
        index: usize,
    ) -> ApplicationResult<PathBuf> {
        let data = tree.data(node).ok_or(DomainError::NodeNotFound)?;
        let file = data.files.get(index).ok_or(DomainError::ItemOutOfRange {
            kind: "file",
            index,
            len: data.files.len(),
        })?;
        let path = PathBuf::from(file);
        debug!("open_attachment: {} via {}", path.display(), self.opener);

        if !self.fs.is_file(&path) {
            return Err(ApplicationError::AttachmentMissing(path));
        }

        let result = self
            .cmd
            .run(&self.opener, &[file.as_str()])
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run {}: {}", self.opener, path.display()),
                source: Box::new(e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ApplicationError::OperationFailed {
                context: format!("{} {}: {}", self.opener, path.display(), stderr.trim()),
                source: Box::new(InfraError::Opener {
                    message: stderr.to_string(),
                    exit_code: result.status.code(),
                }),
            });
        }
        Ok(path)
    }
}
