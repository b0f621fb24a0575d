use std::fmt;
use std::path::Path;

use crate::error::ItemError;
use crate::scanner::{ItemFilter, TreeWalker, WalkEntry, WalkVisitor};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// One rendered line of the structure tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLine {
    /// Continuation columns inherited from the ancestors.
    pub indent: String,
    /// Branch glyph; empty for error markers.
    pub branch: &'static str,
    pub label: String,
    pub is_dir: bool,
}

impl fmt::Display for StructureLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.indent, self.branch, self.label)?;
        if self.is_dir {
            f.write_str("/")?;
        }
        Ok(())
    }
}

/// Join rendered lines with `\n`, without a trailing newline.
#[must_use]
pub fn join_lines(lines: &[StructureLine]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug)]
enum Node {
    Entry {
        name: String,
        depth: usize,
        is_dir: bool,
    },
    Marker {
        text: String,
        depth: usize,
    },
}

impl Node {
    const fn depth(&self) -> usize {
        match self {
            Self::Entry { depth, .. } | Self::Marker { depth, .. } => *depth,
        }
    }
}

#[derive(Default)]
struct NodeCollector {
    nodes: Vec<Node>,
}

impl WalkVisitor for NodeCollector {
    fn visit_dir(&mut self, entry: &WalkEntry) {
        self.push_entry(entry);
    }

    fn visit_file(&mut self, entry: &WalkEntry) {
        self.push_entry(entry);
    }

    fn visit_error(&mut self, error: &ItemError, depth: usize) {
        let text = match error {
            ItemError::AccessDenied { path } => format!("[Ошибка доступа: {}]", path.display()),
            ItemError::ReadFailure { reason, .. } => format!("[Ошибка: {reason}]"),
        };
        self.nodes.push(Node::Marker {
            text,
            depth: depth + 1,
        });
    }
}

impl NodeCollector {
    fn push_entry(&mut self, entry: &WalkEntry) {
        self.nodes.push(Node::Entry {
            name: entry.name.clone(),
            depth: entry.depth,
            is_dir: entry.is_dir,
        });
    }
}

/// Draws the admitted part of a directory hierarchy with box glyphs.
///
/// Entries are listed down to `max_depth + 1` levels below the root; a
/// directory on the last listed level appears but is not expanded. The
/// traversal is iterative, so deep trees cannot exhaust the call stack.
pub struct TreeRenderer<'a, F: ItemFilter> {
    filter: &'a F,
    max_depth: usize,
}

impl<'a, F: ItemFilter> TreeRenderer<'a, F> {
    #[must_use]
    pub const fn new(filter: &'a F, max_depth: usize) -> Self {
        Self { filter, max_depth }
    }

    #[must_use]
    pub fn render(&self, root: &Path) -> Vec<StructureLine> {
        let mut collector = NodeCollector::default();
        TreeWalker::new(root, self.filter)
            .with_max_depth(self.max_depth.saturating_add(1))
            .walk(&mut collector);

        let last = last_sibling_flags(&collector.nodes);
        let mut open: Vec<bool> = Vec::new();
        let mut lines = Vec::with_capacity(collector.nodes.len());

        for (node, is_last) in collector.nodes.into_iter().zip(last) {
            open.truncate(node.depth().saturating_sub(1));
            let indent: String = open
                .iter()
                .map(|&closed| if closed { BLANK } else { PIPE })
                .collect();

            match node {
                Node::Entry { name, is_dir, .. } => {
                    lines.push(StructureLine {
                        indent,
                        branch: if is_last { LAST_BRANCH } else { BRANCH },
                        label: name,
                        is_dir,
                    });
                    open.push(is_last);
                }
                Node::Marker { text, .. } => lines.push(StructureLine {
                    indent,
                    branch: "",
                    label: text,
                    is_dir: false,
                }),
            }
        }

        lines
    }
}

/// For each node in pre-order, whether no later sibling follows it.
fn last_sibling_flags(nodes: &[Node]) -> Vec<bool> {
    let mut seen: Vec<bool> = Vec::new();
    let mut flags = vec![false; nodes.len()];

    for (idx, node) in nodes.iter().enumerate().rev() {
        let depth = node.depth();
        if seen.len() <= depth {
            seen.resize(depth + 1, false);
        }
        flags[idx] = !seen[depth];
        seen[depth] = true;
        for deeper in &mut seen[depth + 1..] {
            *deeper = false;
        }
    }

    flags
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
