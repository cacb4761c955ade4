//! Tree builder for turning flat archive listings into directory trees.

use generational_arena::Index;
use tracing::{debug, instrument, trace, warn};

use crate::domain::arena::{NodeId, Tree, TreeNode};
use crate::domain::error::{DomainError, DomainResult};

/// Segment separator of archive listings.
pub const DEFAULT_SEPARATOR: char = '\\';

/// Builds a [`Tree`] one listing entry at a time.
///
/// Owns the id counter, so ids are unique per builder and start at `1`
/// for the first created node (the root keeps `0`).
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
    separator: char,
    last_id: NodeId,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    pub fn with_separator(separator: char) -> Self {
        Self {
            tree: Tree::new(separator),
            separator,
            last_id: 0,
        }
    }

    /// Tree built so far. Every prefix of the input is a valid tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn finish(self) -> Tree {
        self.tree
    }

    /// Insert every path, skipping conflicting entries.
    pub fn extend<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.insert(path.as_ref());
        }
        self
    }

    /// Insert `path`, returning the id of its file node.
    ///
    /// Never fails: empty paths yield `None`, and a path whose segments clash
    /// with the type of an existing node is logged and skipped so the node
    /// seen first wins.
    pub fn insert(&mut self, path: &str) -> Option<NodeId> {
        match self.try_insert(path) {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping listing entry: {}", e);
                None
            }
        }
    }

    /// Insert `path`, reporting type clashes instead of skipping them.
    ///
    /// Returns the id of the file node for `path` (created or already
    /// present), or `None` when the path has no segments or ends with the
    /// separator (a directory entry). On error the tree is left untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn try_insert(&mut self, path: &str) -> DomainResult<Option<NodeId>> {
        let segments: Vec<&str> = path
            .split(self.separator)
            .filter(|segment| !segment.is_empty())
            .collect();
        let Some(last) = segments.len().checked_sub(1) else {
            trace!("Ignoring empty listing entry: {:?}", path);
            return Ok(None);
        };

        // `data\` names a directory: the trailing empty segment keeps `data` open
        let ends_in_file = !path.ends_with(self.separator);
        let mut current = self.tree.root();
        let mut dir_path = String::new();

        for (pos, &segment) in segments.iter().enumerate() {
            let is_file = ends_in_file && pos == last;
            if !dir_path.is_empty() {
                dir_path.push(self.separator);
            }
            dir_path.push_str(segment);

            if let Some(existing) = self.tree.find_child(current, segment) {
                match self.tree.get(existing) {
                    Some(node) if node.is_file != is_file => {
                        return Err(DomainError::PathConflict {
                            path: path.to_string(),
                            segment: node.name.clone(),
                            existing: if node.is_file { "file" } else { "directory" },
                        })
                    }
                    Some(node) if node.is_file => return Ok(Some(node.id)),
                    _ => current = existing,
                }
                continue;
            }

            let full_path = if is_file {
                path.to_string()
            } else {
                dir_path.clone()
            };
            let idx = self.create_node(current, segment, is_file, full_path);
            if is_file {
                return Ok(self.tree.get(idx).map(|node| node.id));
            }
            current = idx;
        }

        Ok(None)
    }

    fn create_node(&mut self, parent: Index, name: &str, is_file: bool, full_path: String) -> Index {
        let position = self.insertion_index(parent, name, is_file);
        self.last_id += 1;
        debug!(
            "Creating {} '{}' (id {}) at position {}",
            if is_file { "file" } else { "directory" },
            full_path,
            self.last_id,
            position
        );
        self.tree
            .insert_child(parent, position, TreeNode::new(name, self.last_id, is_file, full_path))
    }

    /// Position for a new child of `parent`.
    ///
    /// Directories go before the first file or the first name sorting after
    /// them; files go before the first file sorting after them. Names compare
    /// by their stored bytes, so `"Z"` sorts before `"a"`.
    fn insertion_index(&self, parent: Index, name: &str, is_file: bool) -> usize {
        self.tree
            .children(parent)
            .position(|(_, node)| {
                if is_file {
                    node.is_file && node.name.as_str() > name
                } else {
                    node.is_file || node.name.as_str() > name
                }
            })
            .unwrap_or_else(|| self.tree.children(parent).count())
    }
}

/// Build a tree from `\`-separated listing entries.
#[instrument(level = "debug", skip(paths))]
pub fn build_tree_from_path_list<I, S>(paths: I) -> Tree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    build_tree_with_separator(paths, DEFAULT_SEPARATOR)
}

/// Build a tree from listing entries split on `separator`.
pub fn build_tree_with_separator<I, S>(paths: I, separator: char) -> Tree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = TreeBuilder::with_separator(separator);
    builder.extend(paths);
    let tree = builder.finish();
    debug!(
        "Built tree: {} directories, {} files",
        tree.dir_count(),
        tree.file_count()
    );
    tree
}
