mod document;
mod project_tree;

pub use document::{StructureDocument, StructureDocumentError};
pub use project_tree::{Node, NodeId, ProjectTree, TreeBuildError};
