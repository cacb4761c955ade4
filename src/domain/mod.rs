//! Domain layer: the path tree and composite path handling
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod container_path;
pub mod error;

pub use arena::{NodeId, Tree, TreeIterator, TreeNode, ROOT_NAME};
pub use builder::{
    build_tree_from_path_list, build_tree_with_separator, TreeBuilder, DEFAULT_SEPARATOR,
};
pub use container_path::{split_container_path, ContainerPath, CONTAINER_SEPARATORS};
pub use error::{DomainError, DomainResult};
