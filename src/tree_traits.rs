use generational_arena::Index;
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::Tree;

/// How nodes are labelled when rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix each label with `[id]`
    pub show_ids: bool,
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String> {
        self.to_tree_string_with(RenderOptions::default())
    }

    fn to_tree_string_with(&self, options: RenderOptions) -> TermTree<String>;
}

impl TreeNodeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string_with(&self, options: RenderOptions) -> TermTree<String> {
        fn label(tree: &Tree, idx: Index, options: RenderOptions) -> String {
            let Some(node) = tree.get(idx) else {
                return String::new();
            };
            let mut label = if options.show_ids {
                format!("[{}] {}", node.id, node.name)
            } else {
                node.name.clone()
            };
            // directories carry a trailing separator
            if !node.is_file {
                label.push(tree.separator());
            }
            label
        }

        fn build_tree(tree: &Tree, node_idx: Index, parent: &mut TermTree<String>, options: RenderOptions) {
            for (child_idx, _) in tree.children(node_idx) {
                let mut child = TermTree::new(label(tree, child_idx, options));
                build_tree(tree, child_idx, &mut child, options);
                parent.push(child);
            }
        }

        let mut rendered = TermTree::new(label(self, self.root(), options));
        build_tree(self, self.root(), &mut rendered, options);
        rendered
    }
}
