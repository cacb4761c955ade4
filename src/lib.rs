//! Directory trees from flat archive listings.
//!
//! A listing is a sequence of composite paths such as
//! `d2data.mpq\data\global\items\flp2ax.dc6`, where the first segment names
//! the container archive. [`build_tree_from_path_list`] merges a listing into
//! one rooted [`Tree`]; [`split_container_path`] maps a file back to its
//! container and in-container path.
//!
//! ```
//! use archtree::{build_tree_with_separator, split_container_path};
//!
//! let tree = build_tree_with_separator(["a/x.txt", "a/y.txt", "b.txt"], '/');
//! let names: Vec<_> = tree.children(tree.root()).map(|(_, n)| n.name.as_str()).collect();
//! assert_eq!(names, ["a", "b.txt"]);
//!
//! let split = split_container_path("d2data.mpq/data/global/items/flp2ax.dc6").unwrap();
//! assert_eq!(split.container_id, "d2data.mpq");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    build_tree_from_path_list, build_tree_with_separator, split_container_path, ContainerPath,
    DomainError, DomainResult, NodeId, Tree, TreeBuilder, TreeNode,
};
