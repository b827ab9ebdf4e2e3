//! Ancestry tree rendering.
//!
//! Building and drawing are separate steps. [`AncestryTree::from_history`]
//! turns the parent chain into `(depth, label)` nodes, HEAD at depth 0 and
//! each parent one level deeper. [`AncestryTree::to_indented_text`] flattens
//! that into lines whose indentation encodes nesting, which is the input a
//! [`TreeRenderer`] draws.

use crate::error::Result;
use crate::objects::Commit;

/// Indentation emitted per nesting level.
pub const INDENT: &str = "  ";

/// One line of the ancestry tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Nesting level; HEAD is 0.
    pub depth: usize,
    /// Text shown for the node (a commit digest).
    pub label: String,
}

/// The ancestry chain as nested nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryTree {
    nodes: Vec<TreeNode>,
}

impl AncestryTree {
    /// Builds the tree from a history walk (newest first).
    ///
    /// The first error from the walk is returned.
    pub fn from_history<I>(history: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Commit>>,
    {
        let nodes = history
            .into_iter()
            .enumerate()
            .map(|(depth, commit)| {
                commit.map(|c| TreeNode {
                    depth,
                    label: c.digest().to_hex(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AncestryTree { nodes })
    }

    /// Returns the nodes in order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Returns true if there are no commits.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders each node on its own line, indented by [`INDENT`] per level.
    pub fn to_indented_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&INDENT.repeat(node.depth));
            out.push_str(&node.label);
            out.push('\n');
        }
        out
    }
}

/// Draws indentation-nested text as a tree.
pub trait TreeRenderer {
    /// Renders `nested`, where each line is a node label and its leading
    /// indentation gives its depth.
    fn render(&self, nested: &str) -> String;
}

/// Box-drawing renderer in the style of `tree(1)`.
///
/// ```
/// use ledgit::tree::{AsciiTreeRenderer, TreeRenderer};
///
/// let out = AsciiTreeRenderer.render("c3\n  c2\n    c1\n");
/// assert_eq!(out, "c3\n└── c2\n    └── c1\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiTreeRenderer;

impl AsciiTreeRenderer {
    fn parse(nested: &str) -> Vec<TreeNode> {
        nested
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let label = line.trim_start();
                let width = line.len() - label.len();
                TreeNode {
                    depth: width / INDENT.len(),
                    label: label.trim_end().to_string(),
                }
            })
            .collect()
    }

    /// Whether a later node sits at `depth` before the tree climbs above it.
    fn has_later_sibling(nodes: &[TreeNode], index: usize, depth: usize) -> bool {
        for node in &nodes[index + 1..] {
            if node.depth < depth {
                return false;
            }
            if node.depth == depth {
                return true;
            }
        }
        false
    }
}

impl TreeRenderer for AsciiTreeRenderer {
    fn render(&self, nested: &str) -> String {
        let nodes = Self::parse(nested);
        let mut out = String::new();
        // open[k]: the current ancestor at depth k has more siblings below.
        let mut open: Vec<bool> = Vec::new();

        for (i, node) in nodes.iter().enumerate() {
            open.truncate(node.depth);
            let later = Self::has_later_sibling(&nodes, i, node.depth);

            if node.depth > 0 {
                for &more in open.iter().skip(1) {
                    out.push_str(if more { "│   " } else { "    " });
                }
                out.push_str(if later { "├── " } else { "└── " });
            }
            out.push_str(&node.label);
            out.push('\n');

            while open.len() < node.depth {
                open.push(false);
            }
            open.push(later);
        }

        out
    }
}
