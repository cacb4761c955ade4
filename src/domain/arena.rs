//! Arena-backed directory tree built from archive listings.

use std::fmt;

use generational_arena::{Arena, Index};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::instrument;

use crate::domain::container_path::{split_container_path, ContainerPath};
use crate::domain::error::{DomainError, DomainResult};

/// Stable external handle of a node, assigned in creation order.
pub type NodeId = usize;

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "root";

/// One directory or file in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Segment label with its original casing
    pub name: String,
    /// Unique id, `0` for the root
    pub id: NodeId,
    /// Leaf file (true) or directory (false)
    pub is_file: bool,
    /// Original listing entry for files, joined segments for directories
    pub full_path: String,
    /// Expanded/collapsed state owned by the renderer
    pub open: bool,
    /// Index of the parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes, directories first
    pub children: Vec<Index>,
}

impl TreeNode {
    pub(crate) fn new(name: &str, id: NodeId, is_file: bool, full_path: String) -> Self {
        Self {
            name: name.to_string(),
            id,
            is_file,
            full_path,
            open: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Case-insensitive identity check used for sibling deduplication.
    pub fn matches_name(&self, segment: &str) -> bool {
        self.name == segment || self.name.to_lowercase() == segment.to_lowercase()
    }

    /// Split this node's full path into container and inner path.
    pub fn container_path(&self) -> DomainResult<ContainerPath> {
        split_container_path(&self.full_path)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path)
    }
}

/// Directory tree with single-parent ownership.
///
/// All nodes live in one arena; children and parents are arena indices, so
/// there are no owning back references. Nodes are never removed.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<TreeNode>,
    root: Index,
    /// `by_id[id]` is the arena index of node `id`
    by_id: Vec<Index>,
    separator: char,
}

impl Tree {
    /// Empty tree holding only the root directory.
    pub fn new(separator: char) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(TreeNode::new(ROOT_NAME, 0, false, String::new()));
        Self {
            arena,
            root,
            by_id: vec![root],
            separator,
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &TreeNode {
        &self.arena[self.root]
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.arena.len().saturating_sub(1)
    }

    /// True when the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_of(&self, id: NodeId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn parent(&self, idx: Index) -> Option<&TreeNode> {
        self.get(idx)?.parent.and_then(|p| self.arena.get(p))
    }

    pub fn children(&self, idx: Index) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&child| self.arena.get(child).map(|node| (child, node)))
    }

    /// Child of `parent` whose name matches `segment` case-insensitively.
    pub fn find_child(&self, parent: Index, segment: &str) -> Option<Index> {
        self.children(parent)
            .find(|(_, node)| node.matches_name(segment))
            .map(|(idx, _)| idx)
    }

    /// Walk `path` segment by segment from the root.
    ///
    /// Matching is case-insensitive and empty segments are ignored, so an
    /// empty path resolves to the root.
    #[instrument(level = "trace", skip(self))]
    pub fn find_path(&self, path: &str) -> Option<&TreeNode> {
        let mut current = self.root;
        for segment in path.split(self.separator).filter(|s| !s.is_empty()) {
            current = self.find_child(current, segment)?;
        }
        self.get(current)
    }

    /// Insert `node` under `parent` at `position` and register its id.
    pub(crate) fn insert_child(&mut self, parent: Index, position: usize, mut node: TreeNode) -> Index {
        node.parent = Some(parent);
        let id = node.id;
        let idx = self.arena.insert(node);

        if let Some(parent) = self.arena.get_mut(parent) {
            let position = position.min(parent.children.len());
            parent.children.insert(position, idx);
        }
        if self.by_id.len() <= id {
            self.by_id.resize(id + 1, self.root);
        }
        self.by_id[id] = idx;

        idx
    }

    /// Set the expanded flag of node `id`.
    pub fn set_open(&mut self, id: NodeId, open: bool) -> DomainResult<()> {
        let idx = self.index_of(id).ok_or(DomainError::UnknownNode(id))?;
        let node = self
            .arena
            .get_mut(idx)
            .ok_or(DomainError::UnknownNode(id))?;
        node.open = open;
        Ok(())
    }

    /// Flip the expanded flag of node `id`, returning the new state.
    pub fn toggle_open(&mut self, id: NodeId) -> DomainResult<bool> {
        let open = !self
            .find_by_id(id)
            .ok_or(DomainError::UnknownNode(id))?
            .open;
        self.set_open(id, open)?;
        Ok(open)
    }

    /// Ids of all expanded nodes in tree order.
    pub fn open_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.open)
            .map(|(_, node)| node.id)
            .collect()
    }

    /// Container location of the file node `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, id: NodeId) -> DomainResult<ContainerPath> {
        let node = self.find_by_id(id).ok_or(DomainError::UnknownNode(id))?;
        if !node.is_file {
            return Err(DomainError::NotAFile {
                id,
                path: node.full_path.clone(),
            });
        }
        node.container_path()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        1 + self
            .children(node_idx)
            .map(|(child, _)| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Full paths of all file nodes in tree order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_file)
            .map(|(_, node)| node.full_path.clone())
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_file).count()
    }

    /// Directories below the root.
    pub fn dir_count(&self) -> usize {
        self.iter()
            .filter(|(idx, node)| !node.is_file && *idx != self.root)
            .count()
    }
}

/// Pre-order, left-to-right traversal starting at the root.
pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Nested view of one node for serialization; children are inlined
/// instead of exposing arena indices.
struct NodeView<'a> {
    tree: &'a Tree,
    idx: Index,
}

impl Serialize for NodeView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(node) = self.tree.get(self.idx) else {
            return serializer.serialize_none();
        };
        let mut state = serializer.serialize_struct("TreeNode", 6)?;
        state.serialize_field("name", &node.name)?;
        state.serialize_field("id", &node.id)?;
        state.serialize_field("open", &node.open)?;
        state.serialize_field("is_file", &node.is_file)?;
        state.serialize_field("full_path", &node.full_path)?;
        let children: Vec<NodeView<'_>> = node
            .children
            .iter()
            .map(|&idx| NodeView {
                tree: self.tree,
                idx,
            })
            .collect();
        state.serialize_field("children", &children)?;
        state.end()
    }
}

/// Serializes as the nested root node.
impl Serialize for Tree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        NodeView {
            tree: self,
            idx: self.root,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, Index, Index) {
        let mut tree = Tree::new('/');
        let root = tree.root();
        let dir = tree.insert_child(root, 0, TreeNode::new("a", 1, false, "a".into()));
        let file = tree.insert_child(dir, 0, TreeNode::new("x.txt", 2, true, "a/x.txt".into()));
        (tree, dir, file)
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = Tree::new('\\');
        let root = tree.root_node();
        assert_eq!(root.name, ROOT_NAME);
        assert_eq!(root.id, 0);
        assert!(!root.is_file);
        assert!(root.children.is_empty());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn serializes_as_nested_nodes() {
        let (mut tree, _, _) = sample();
        tree.set_open(1, true).unwrap();

        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["name"], ROOT_NAME);
        assert_eq!(json["id"], 0);
        let dir = &json["children"][0];
        assert_eq!(dir["name"], "a");
        assert_eq!(dir["open"], true);
        assert_eq!(dir["is_file"], false);
        let file = &dir["children"][0];
        assert_eq!(file["id"], 2);
        assert_eq!(file["full_path"], "a/x.txt");
        assert_eq!(file["children"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn parent_links_resolve_through_arena() {
        let (tree, dir, file) = sample();
        assert_eq!(tree.parent(file).map(|n| n.name.as_str()), Some("a"));
        assert_eq!(tree.parent(dir).map(|n| n.name.as_str()), Some(ROOT_NAME));
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn lookup_by_id() {
        let (tree, _, file) = sample();
        assert_eq!(tree.index_of(2), Some(file));
        assert_eq!(tree.find_by_id(1).map(|n| n.full_path.as_str()), Some("a"));
        assert!(tree.find_by_id(3).is_none());
    }

    #[test]
    fn find_path_ignores_case() {
        let (tree, _, _) = sample();
        assert_eq!(tree.find_path("A/X.TXT").map(|n| n.id), Some(2));
        assert_eq!(tree.find_path("").map(|n| n.id), Some(0));
        assert!(tree.find_path("a/y.txt").is_none());
    }

    #[test]
    fn toggle_open_only_touches_flag() {
        let (mut tree, _, _) = sample();
        assert!(tree.toggle_open(1).unwrap());
        assert_eq!(tree.open_ids(), vec![1]);
        assert!(!tree.toggle_open(1).unwrap());
        assert!(tree.open_ids().is_empty());
        assert_eq!(tree.set_open(9, true), Err(DomainError::UnknownNode(9)));
    }

    #[test]
    fn resolve_requires_file_node() {
        let (tree, _, _) = sample();
        let split = tree.resolve(2).unwrap();
        assert_eq!(split.container_id, "a");
        assert_eq!(split.inner_path, "x.txt");
        assert!(matches!(tree.resolve(1), Err(DomainError::NotAFile { id: 1, .. })));
        assert_eq!(tree.resolve(7), Err(DomainError::UnknownNode(7)));
    }

    #[test]
    fn counts_and_leaves() {
        let (tree, _, _) = sample();
        assert_eq!(tree.file_count(), 1);
        assert_eq!(tree.dir_count(), 1);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_nodes(), vec!["a/x.txt".to_string()]);
    }
}
