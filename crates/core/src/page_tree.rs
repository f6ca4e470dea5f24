//! Page-builder tree document.
//!
//! A page is stored as `{ rootNodeId, nodes }` where `nodes` maps node ids to
//! [`Node`]s and each node lists its children in render order. The browser
//! editor produces and consumes this shape; this module owns the server-side
//! bookkeeping: parsing, integrity validation and traversal. [`Tree::set_prop`]
//! backs the node props endpoint; the structural edits (`insert_child`,
//! `remove_subtree`, `move_node`) are library helpers that keep `parent`
//! links consistent and are not routed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of nodes accepted in a single page tree.
pub const MAX_NODES_PER_TREE: usize = 2000;

/// Version stamped on nodes created server-side.
pub const NODE_VERSION: &str = "1";

/// Component tags understood by the renderer and the editor resolver.
pub mod node_types {
    pub const CONTAINER: &str = "Container";
    pub const TEXT: &str = "Text";
    pub const HEADING: &str = "Heading";
    pub const BUTTON: &str = "Button";
    pub const IMAGE: &str = "Image";
    pub const REGISTRATION_FORM: &str = "RegistrationForm";
    pub const EVENT_DETAILS: &str = "EventDetails";
    pub const SESSION: &str = "Session";
    pub const IMAGE_HERO: &str = "ImageHero";

    /// All recognised component tags.
    pub const ALL: &[&str] = &[
        CONTAINER,
        TEXT,
        HEADING,
        BUTTON,
        IMAGE,
        REGISTRATION_FORM,
        EVENT_DETAILS,
        SESSION,
        IMAGE_HERO,
    ];
}

/// Check whether a component tag is one the renderer knows about.
pub fn is_known_node_type(node_type: &str) -> bool {
    node_types::ALL.contains(&node_type)
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Structural problems found in a tree or raised by a tree edit.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Tree JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Tree has {0} nodes, exceeding the maximum of {MAX_NODES_PER_TREE}")]
    TooManyNodes(usize),

    #[error("Root node '{0}' does not exist")]
    MissingRoot(String),

    #[error("Node key '{key}' does not match node id '{id}'")]
    KeyMismatch { key: String, id: String },

    #[error("Node '{parent}' references missing child '{child}'")]
    DanglingChild { parent: String, child: String },

    #[error("Node '{0}' is referenced more than once")]
    DuplicateReference(String),

    #[error("Node '{id}' declares parent {declared:?} but is a child of {actual:?}")]
    ParentMismatch {
        id: String,
        declared: Option<String>,
        actual: Option<String>,
    },

    #[error("Node '{0}' does not exist")]
    UnknownNode(String),

    #[error("Node id '{0}' is already in use")]
    DuplicateId(String),

    #[error("Index {index} is out of bounds for node '{parent}' with {len} children")]
    InvalidIndex {
        parent: String,
        index: usize,
        len: usize,
    },

    #[error("The root node cannot be removed or moved")]
    RootImmutable,

    #[error("Tree already has a root node")]
    RootAlreadySet,

    #[error("Cannot move node '{0}' into its own subtree")]
    MoveIntoDescendant(String),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single component instance in the page tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Child ids in render order.
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

fn default_version() -> String {
    NODE_VERSION.to_string()
}

impl Node {
    /// Build a childless node with the given props.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, props: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            children: Vec::new(),
            props,
            version: default_version(),
            parent: None,
        }
    }

    /// Read a string prop, if present and a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}

/// The serialized page document.
///
/// `Tree::default()` is the empty document `{ rootNodeId: "", nodes: {} }`
/// that a freshly created page starts with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    #[serde(default)]
    pub root_node_id: String,
    #[serde(default)]
    pub nodes: BTreeMap<String, Node>,
}

impl Tree {
    /// The empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a tree from JSON text.
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a tree from a stored value.
    ///
    /// Pages saved by older editor builds hold the tree as a JSON *string*
    /// rather than an object; both forms are accepted. `null` is the empty tree.
    pub fn from_stored(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::String(text) if text.trim().is_empty() => Ok(Self::empty()),
            Value::String(text) => Self::from_json(text),
            other => Ok(Self::deserialize(other)?),
        }
    }

    /// Serialize to a JSON value for storage.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.root_node_id.is_empty() && self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_node_id)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check referential integrity.
    ///
    /// The empty document is valid. Otherwise the root must exist, every child
    /// reference must resolve, no node may be reachable twice (this rejects
    /// both shared subtrees and cycles) and a declared `parent` must match the
    /// node that actually lists it. Unreachable nodes are tolerated; see
    /// [`Tree::orphans`].
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.nodes.len() > MAX_NODES_PER_TREE {
            return Err(TreeError::TooManyNodes(self.nodes.len()));
        }

        for (key, node) in &self.nodes {
            if key != &node.id {
                return Err(TreeError::KeyMismatch {
                    key: key.clone(),
                    id: node.id.clone(),
                });
            }
        }

        if self.root_node_id.is_empty() {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err(TreeError::MissingRoot(String::new()))
            };
        }

        if !self.nodes.contains_key(&self.root_node_id) {
            return Err(TreeError::MissingRoot(self.root_node_id.clone()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&str, Option<&str>)> = vec![(self.root_node_id.as_str(), None)];

        while let Some((id, parent)) = stack.pop() {
            if !seen.insert(id) {
                return Err(TreeError::DuplicateReference(id.to_string()));
            }
            let node = &self.nodes[id];

            if node.parent.is_some() && node.parent.as_deref() != parent {
                return Err(TreeError::ParentMismatch {
                    id: id.to_string(),
                    declared: node.parent.clone(),
                    actual: parent.map(str::to_string),
                });
            }

            for child in node.children.iter().rev() {
                if !self.nodes.contains_key(child) {
                    return Err(TreeError::DanglingChild {
                        parent: id.to_string(),
                        child: child.clone(),
                    });
                }
                stack.push((child.as_str(), Some(id)));
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Nodes reachable from the root in render order (pre-order, children in
    /// list order). Dangling references are skipped and each node is visited
    /// once, so this is safe on unvalidated input.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();
        if !self.root_node_id.is_empty() {
            stack.push(&self.root_node_id);
        }

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            out.push(node);
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Ids reachable from the root.
    pub fn reachable_ids(&self) -> HashSet<&str> {
        self.walk().into_iter().map(|n| n.id.as_str()).collect()
    }

    /// Ids present in the mapping but not reachable from the root, sorted.
    pub fn orphans(&self) -> Vec<&str> {
        let reachable = self.reachable_ids();
        self.nodes
            .keys()
            .map(String::as_str)
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Reachable nodes of a given component tag, in render order.
    pub fn nodes_of_type(&self, node_type: &str) -> Vec<&Node> {
        self.walk()
            .into_iter()
            .filter(|n| n.node_type == node_type)
            .collect()
    }

    /// Id of the node whose `children` lists `id`.
    pub fn find_parent(&self, id: &str) -> Option<&str> {
        self.nodes
            .values()
            .find(|n| n.children.iter().any(|c| c == id))
            .map(|n| n.id.as_str())
    }

    /// `id` and every node below it. Guards against cycles.
    fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().cloned());
            }
            out.push(current);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Install the root of an empty tree.
    pub fn set_root(&mut self, mut node: Node) -> Result<(), TreeError> {
        if !self.is_empty() {
            return Err(TreeError::RootAlreadySet);
        }
        node.parent = None;
        self.root_node_id = node.id.clone();
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Insert a new childless node under `parent_id`, at `index` or at the end.
    pub fn insert_child(
        &mut self,
        parent_id: &str,
        mut node: Node,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        if self.nodes.len() >= MAX_NODES_PER_TREE {
            return Err(TreeError::TooManyNodes(self.nodes.len() + 1));
        }
        let parent = self
            .nodes
            .get_mut(parent_id)
            .ok_or_else(|| TreeError::UnknownNode(parent_id.to_string()))?;

        let len = parent.children.len();
        let at = index.unwrap_or(len);
        if at > len {
            return Err(TreeError::InvalidIndex {
                parent: parent_id.to_string(),
                index: at,
                len,
            });
        }

        parent.children.insert(at, node.id.clone());
        node.parent = Some(parent_id.to_string());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node and everything below it. Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: &str) -> Result<usize, TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::UnknownNode(id.to_string()));
        }
        if id == self.root_node_id {
            return Err(TreeError::RootImmutable);
        }

        if let Some(parent_id) = self.find_parent(id).map(str::to_string) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| c != id);
            }
        }

        let doomed = self.subtree_ids(id);
        for doomed_id in &doomed {
            self.nodes.remove(doomed_id);
        }
        Ok(doomed.len())
    }

    /// Re-parent a node (with its subtree) under `new_parent_id`.
    pub fn move_node(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        if !self.nodes.contains_key(id) {
            return Err(TreeError::UnknownNode(id.to_string()));
        }
        if id == self.root_node_id {
            return Err(TreeError::RootImmutable);
        }
        if !self.nodes.contains_key(new_parent_id) {
            return Err(TreeError::UnknownNode(new_parent_id.to_string()));
        }
        if self.subtree_ids(id).iter().any(|d| d == new_parent_id) {
            return Err(TreeError::MoveIntoDescendant(id.to_string()));
        }

        // Bounds are checked against the destination after detaching, so a
        // move within the same parent sees the shortened list.
        let old_parent = self.find_parent(id).map(str::to_string);
        let dest_len = {
            let dest = &self.nodes[new_parent_id];
            let len = dest.children.len();
            if old_parent.as_deref() == Some(new_parent_id) {
                len - 1
            } else {
                len
            }
        };
        let at = index.unwrap_or(dest_len);
        if at > dest_len {
            return Err(TreeError::InvalidIndex {
                parent: new_parent_id.to_string(),
                index: at,
                len: dest_len,
            });
        }

        if let Some(old) = old_parent {
            if let Some(parent) = self.nodes.get_mut(&old) {
                parent.children.retain(|c| c != id);
            }
        }
        if let Some(dest) = self.nodes.get_mut(new_parent_id) {
            dest.children.insert(at, id.to_string());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(new_parent_id.to_string());
        }
        Ok(())
    }

    /// Set a single prop on a node, returning the previous value.
    pub fn set_prop(&mut self, id: &str, key: &str, value: Value) -> Result<Option<Value>, TreeError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::UnknownNode(id.to_string()))?;
        Ok(node.props.insert(key.to_string(), value))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
