use std::path::Path;

use compio::fs::{self, File};
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::structure::{NodeId, ProjectTree};

/// Materializes the project tree on disk: a directory for every node with
/// children, an empty regular file for every childless node. Creation is
/// fully sequential; the first failure aborts the walk with no rollback of
/// already-created entries.
pub struct Generator;

impl Generator {
    /// Creates the tree relative to the current working directory.
    pub async fn generate(tree: &ProjectTree) -> Result<(), GenerationError> {
        Self::generate_in(tree, Path::new("")).await
    }

    pub async fn generate_in(tree: &ProjectTree, target: &Path) -> Result<(), GenerationError> {
        Self::generate_node(tree, ProjectTree::ROOT, target).await
    }

    async fn generate_node(
        tree: &ProjectTree,
        id: NodeId,
        target: &Path,
    ) -> Result<(), GenerationError> {
        let node = tree.node(id);

        // The synthetic root has no name and nothing to create.
        if !node.base_name().is_empty() {
            let path = target.join(node.full_name());
            if node.is_leaf() {
                // this is a file
                debug!("Creating file '{}'", node.full_name());
                let file = File::create(&path).await.context(CreateFileSnafu {
                    path: path.best_effort_path_display(),
                })?;
                file.close().await.context(CreateFileSnafu {
                    path: path.best_effort_path_display(),
                })?;
            } else {
                // this is a directory
                debug!("Creating directory '{}'", node.full_name());
                fs::create_dir(&path).await.context(CreateDirSnafu {
                    path: path.best_effort_path_display(),
                })?;
            }
        }

        for &child in node.children() {
            Box::pin(Self::generate_node(tree, child, target)).await?;
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum GenerationError {
    #[snafu(display("Failed to create file '{}'", path))]
    CreateFileError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create directory '{}'", path))]
    CreateDirError {
        path: String,
        source: std::io::Error,
    },
}
