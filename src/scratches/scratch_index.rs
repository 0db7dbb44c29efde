use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::debug;
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;

pub const STRUCTURE_FILE_NAME: &str = "york.json";

/// Flat index of every entry found under the scratches root, in walk order.
/// Directories are indexed alongside files, so a base-name lookup can match
/// either.
#[derive(Debug, Clone)]
pub struct ScratchIndex {
    entries: Vec<PathBuf>,
    structure_path: PathBuf,
}

impl ScratchIndex {
    pub fn build(root: &Path) -> Result<Self, ScratchIndexError> {
        debug!(
            "Indexing scratches under {}",
            root.best_effort_path_display()
        );

        let mut entries = Vec::new();
        let mut structure_path = None;

        for entry in WalkDir::new(root) {
            let entry = entry.context(WalkSnafu {
                root: root.best_effort_path_display(),
            })?;

            if structure_path.is_none()
                && entry.file_type().is_file()
                && entry.file_name().to_str() == Some(STRUCTURE_FILE_NAME)
            {
                structure_path = Some(entry.path().to_path_buf());
            }
            entries.push(entry.into_path());
        }

        let structure_path = structure_path.context(StructureFileMissingSnafu {
            root: root.best_effort_path_display(),
        })?;
        debug!(
            "Indexed {} scratch entries, structure file at {}",
            entries.len(),
            structure_path.best_effort_path_display()
        );

        Ok(Self {
            entries,
            structure_path,
        })
    }

    /// Path of the `york.json` structure file discovered during the walk.
    pub fn structure_path(&self) -> &Path {
        &self.structure_path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries_iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }

    /// First indexed entry whose final path segment equals `base_name`.
    /// A directory can match just as well as a file; callers accept that.
    pub fn find_by_base_name(&self, base_name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name == base_name)
            })
            .map(PathBuf::as_path)
    }
}

#[derive(Debug, Snafu)]
pub enum ScratchIndexError {
    #[snafu(display("Failed to traverse the scratches directory {}", root))]
    WalkError {
        root: String,
        source: walkdir::Error,
    },
    #[snafu(display("{} file is not provided in {}", STRUCTURE_FILE_NAME, root))]
    StructureFileMissingError { root: String },
}
