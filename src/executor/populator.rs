use futures_channel::mpsc::UnboundedSender;
use tracing::debug;

use crate::jobs::CopyJob;
use crate::scratches::ScratchIndex;
use crate::structure::{NodeId, ProjectTree};

/// Walks the project tree and emits a [`CopyJob`] for every node whose base
/// name matches a scratch entry (first match in index order). Matching is by
/// name only, so a directory node can pair up too; the copy itself will
/// surface such spurious matches as per-pair failures.
pub fn populate(tree: &ProjectTree, index: &ScratchIndex, sink: &UnboundedSender<CopyJob>) {
    populate_node(tree, ProjectTree::ROOT, index, sink);
}

fn populate_node(
    tree: &ProjectTree,
    id: NodeId,
    index: &ScratchIndex,
    sink: &UnboundedSender<CopyJob>,
) {
    let node = tree.node(id);
    if let Some(scratch) = index.find_by_base_name(node.base_name()) {
        let job = CopyJob::new(node.full_name(), scratch);
        if sink.unbounded_send(job).is_err() {
            debug!("Copy sink is closed, stopping population");
            return;
        }
    }

    for &child in node.children() {
        populate_node(tree, child, index, sink);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use futures_channel::mpsc;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::scratches::STRUCTURE_FILE_NAME;

    fn collect_jobs(tree: &ProjectTree, index: &ScratchIndex) -> Vec<CopyJob> {
        let (sender, mut receiver) = mpsc::unbounded();
        populate(tree, index, &sender);
        drop(sender);

        let mut jobs = Vec::new();
        while let Ok(Some(job)) = receiver.try_next() {
            jobs.push(job);
        }
        jobs
    }

    #[test]
    fn populate_pairs_nodes_with_matching_scratches_only() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp.path().join(STRUCTURE_FILE_NAME), "{}").unwrap();
        fs::write(temp.path().join("main.go"), "package main").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("util.go"), "package util").unwrap();
        let index = ScratchIndex::build(temp.path()).unwrap();

        let tree =
            ProjectTree::from_value(&json!({"app": ["main.go", "util.go"], "README.md": []}))
                .unwrap();
        let mut jobs = collect_jobs(&tree, &index);
        jobs.sort_by(|a, b| a.destination.cmp(&b.destination));

        // README.md and the app directory have no scratch counterpart.
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].destination, "app/main.go");
        assert_eq!(jobs[0].scratch, temp.path().join("main.go"));
        assert_eq!(jobs[1].destination, "app/util.go");
        assert_eq!(jobs[1].scratch, temp.path().join("nested").join("util.go"));
    }

    #[test]
    fn populate_emits_at_most_one_job_per_node() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp.path().join(STRUCTURE_FILE_NAME), "{}").unwrap();
        // Two scratches share the base name; only the first match is paired.
        fs::write(temp.path().join("config.toml"), "first").unwrap();
        fs::create_dir(temp.path().join("alt")).unwrap();
        fs::write(temp.path().join("alt").join("config.toml"), "second").unwrap();
        let index = ScratchIndex::build(temp.path()).unwrap();

        let tree = ProjectTree::from_value(&json!({"config.toml": []})).unwrap();
        let jobs = collect_jobs(&tree, &index);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].destination, "config.toml");
    }

    #[test]
    fn populate_pairs_directory_nodes_on_spurious_name_match() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp.path().join(STRUCTURE_FILE_NAME), "{}").unwrap();
        fs::create_dir(temp.path().join("docs")).unwrap();
        let index = ScratchIndex::build(temp.path()).unwrap();

        // "docs" is a directory node in the tree, yet the scratch directory
        // of the same name still pairs with it. Nothing filters this out.
        let tree = ProjectTree::from_value(&json!({"docs": {"guide.md": []}})).unwrap();
        let jobs = collect_jobs(&tree, &index);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].destination, "docs");
        assert_eq!(jobs[0].scratch, temp.path().join("docs"));
    }

    #[test]
    fn populate_emits_nothing_for_the_unmatched_root() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp.path().join(STRUCTURE_FILE_NAME), "{}").unwrap();
        let index = ScratchIndex::build(temp.path()).unwrap();

        let tree = ProjectTree::from_value(&json!({})).unwrap();
        let jobs = collect_jobs(&tree, &index);

        assert!(jobs.is_empty());
    }
}
