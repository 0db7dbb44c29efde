use serde_json::Value;
use snafu::Snafu;
use tracing::debug;

/// Index of a node inside the [`ProjectTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// A single entry of the target project tree. A node with children becomes a
/// directory, a childless node with a non-empty base name becomes a file.
#[derive(Debug, Clone)]
pub struct Node {
    base_name: String,
    full_name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(base_name: String) -> Self {
        Self {
            base_name,
            full_name: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Own name segment; empty only for the synthetic root.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Slash-joined path from the tree root, empty for the root itself.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Project tree built from the loosely-typed structure document. Nodes live
/// in a flat arena; parent and child links are arena indices, so every node
/// can resolve its path without re-walking from the root.
///
/// The structure grammar has exactly three admissible shapes:
///   - an object nests one level per key,
///   - an array splices its elements in at the current level,
///   - a string is a leaf file.
#[derive(Debug, Clone)]
pub struct ProjectTree {
    nodes: Vec<Node>,
}

impl ProjectTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn from_value(value: &Value) -> Result<Self, TreeBuildError> {
        let mut tree = ProjectTree {
            nodes: vec![Node::new(String::new())],
        };
        tree.parse(Self::ROOT, None, value)?;
        Ok(tree)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    fn parse(
        &mut self,
        current: NodeId,
        parent: Option<NodeId>,
        value: &Value,
    ) -> Result<(), TreeBuildError> {
        self.link(current, parent);
        match value {
            // directory
            Value::Object(entries) => {
                for (key, child_value) in entries {
                    let child = self.push_node(key.clone());
                    self.parse(child, Some(current), child_value)?;
                    self.nodes[current.0].children.push(child);
                }
            }
            // directory's content, spliced into the current level
            Value::Array(elements) => {
                for element in elements {
                    self.parse(current, parent, element)?;
                }
            }
            // file
            Value::String(name) => {
                let leaf = self.push_node(name.clone());
                self.link(leaf, Some(current));
                self.nodes[current.0].children.push(leaf);
            }
            other => {
                return UnsupportedValueSnafu {
                    kind: value_kind(other),
                }
                .fail();
            }
        }

        Ok(())
    }

    /// Sets the parent link and derives `full_name` from the parent chain.
    /// Both the generic recursion path and the string-leaf shortcut go
    /// through here, so the two cannot drift apart.
    fn link(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
        let Some(parent_id) = parent else {
            return;
        };

        let parent_full_name = self.nodes[parent_id.0].full_name.clone();
        self.nodes[id.0].full_name = if parent_full_name.is_empty() {
            self.nodes[id.0].base_name.clone()
        } else {
            format!("{}/{}", parent_full_name, self.nodes[id.0].base_name)
        };
    }

    fn push_node(&mut self, base_name: String) -> NodeId {
        self.nodes.push(Node::new(base_name));
        NodeId(self.nodes.len() - 1)
    }

    /// Dumps the tree to the debug log, one indented line per node.
    pub fn log_structure(&self) {
        self.log_node(Self::ROOT, 0);
    }

    fn log_node(&self, id: NodeId, depth: usize) {
        let node = self.node(id);
        debug!(
            "{:depth$}{:?}:{:?}",
            "",
            node.base_name(),
            node.full_name()
        );
        for &child in node.children() {
            self.log_node(child, depth + 1);
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display("Unsupported {} value in the project structure", kind))]
    UnsupportedValueError { kind: &'static str },
}
