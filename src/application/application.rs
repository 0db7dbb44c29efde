use std::sync::Arc;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, error, info};

use crate::application::RuntimeConfig;
use crate::executor::{CopyExecutionError, CopyExecutor, CopyExecutorCreationError};
use crate::generator::{GenerationError, Generator};
use crate::scratches::{ScratchIndex, ScratchIndexError};
use crate::structure::{ProjectTree, StructureDocument, StructureDocumentError, TreeBuildError};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();

        info!("Starting parsing of scratches...");
        let index =
            ScratchIndex::build(&runtime_config.scratches).context(ScratchIndexSnafu)?;
        let document = StructureDocument::read(index.structure_path())
            .await
            .context(StructureDocumentSnafu)?;
        let tree = ProjectTree::from_value(document.value()).context(TreeBuildSnafu)?;
        debug!("Built project tree with {} nodes", tree.len());
        tree.log_structure();
        info!("Parsing completed!");

        info!("Starting project generation...");
        Generator::generate(&tree).await.context(GenerationSnafu)?;
        info!("Generation completed!");

        info!("Starting content population...");
        let arc_tree = Arc::new(tree);
        let arc_index = Arc::new(index);
        let report = CopyExecutor::new()
            .context(CopyExecutorCreationSnafu)?
            .execute(arc_tree, arc_index)
            .await
            .context(PopulationSnafu)?;
        info!("Populated {} files", report.copied);

        if !report.failures.is_empty() {
            for failure in &report.failures {
                error!("Copy failed: {}", failure);
            }
            return CopiesFailedSnafu {
                failed: report.failures.len(),
            }
            .fail();
        }

        info!("Done! :)");
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while indexing scratches"))]
    ScratchIndexError { source: ScratchIndexError },
    #[snafu(display("Critical failure encountered while reading the project structure"))]
    StructureDocumentError { source: StructureDocumentError },
    #[snafu(display("Critical failure encountered while building the project tree"))]
    TreeBuildError { source: TreeBuildError },
    #[snafu(display("Critical failure encountered during project generation"))]
    GenerationError { source: GenerationError },
    #[snafu(display("Critical failure encountered while creating the copy executor"))]
    CopyExecutorCreationError { source: CopyExecutorCreationError },
    #[snafu(display("Critical failure encountered during content population"))]
    PopulationError { source: CopyExecutionError },
    #[snafu(display("{} content copies failed", failed))]
    CopiesFailedError { failed: usize },
}
