//! Command registry.
//!
//! The set of commands is built once by [`CommandRegistry::standard`] and
//! handed to the application through its context. Each node is either an
//! action or a submenu grouping further nodes.

use std::fmt::Write as _;

/// What an action node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Scan a tree and write the duplicate report
    FindDuplicates,
    /// Move folders into the dated archive
    MoveFolders,
    /// Print the registry
    ShowMenu,
}

/// One entry of the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNode {
    /// Runnable command
    Action {
        name: &'static str,
        description: &'static str,
        action: ActionKind,
    },
    /// Named group of commands
    Submenu {
        name: &'static str,
        description: &'static str,
        children: Vec<CommandNode>,
    },
}

impl CommandNode {
    /// Node name as typed on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CommandNode::Action { name, .. } | CommandNode::Submenu { name, .. } => *name,
        }
    }

    /// One-line description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            CommandNode::Action { description, .. } | CommandNode::Submenu { description, .. } => {
                *description
            }
        }
    }

    /// Children of a submenu; empty for actions.
    #[must_use]
    pub fn children(&self) -> &[CommandNode] {
        match self {
            CommandNode::Action { .. } => &[],
            CommandNode::Submenu { children, .. } => children,
        }
    }
}

/// Ordered tree of commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    roots: Vec<CommandNode>,
}

impl CommandRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands paf ships with.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .register(CommandNode::Submenu {
                name: "files",
                description: "File housekeeping",
                children: vec![
                    CommandNode::Action {
                        name: "find-dup",
                        description: "Find duplicated files in a folder and its subfolders",
                        action: ActionKind::FindDuplicates,
                    },
                    CommandNode::Action {
                        name: "mv",
                        description: "Move folders into a dated archive with verified copies",
                        action: ActionKind::MoveFolders,
                    },
                ],
            })
            .register(CommandNode::Action {
                name: "menu",
                description: "List available commands",
                action: ActionKind::ShowMenu,
            })
    }

    /// Append a top-level node.
    #[must_use]
    pub fn register(mut self, node: CommandNode) -> Self {
        self.roots.push(node);
        self
    }

    /// Top-level nodes in registration order.
    #[must_use]
    pub fn roots(&self) -> &[CommandNode] {
        &self.roots
    }

    /// Follow a path of names from the top level (`["files", "mv"]`).
    #[must_use]
    pub fn resolve(&self, path: &[&str]) -> Option<&CommandNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.iter().find(|n| n.name() == *first)?;
        for name in rest {
            node = node.children().iter().find(|n| n.name() == *name)?;
        }
        Some(node)
    }

    /// Find the action with `name` anywhere in the tree (depth-first).
    #[must_use]
    pub fn find_action(&self, name: &str) -> Option<ActionKind> {
        fn search(nodes: &[CommandNode], name: &str) -> Option<ActionKind> {
            nodes.iter().find_map(|node| match node {
                CommandNode::Action {
                    name: n, action, ..
                } if *n == name => Some(*action),
                CommandNode::Action { .. } => None,
                CommandNode::Submenu { children, .. } => search(children, name),
            })
        }
        search(&self.roots, name)
    }

    /// Indented listing of the whole tree.
    #[must_use]
    pub fn render(&self) -> String {
        fn walk(out: &mut String, nodes: &[CommandNode], depth: usize) {
            for node in nodes {
                let suffix = if matches!(node, CommandNode::Submenu { .. }) {
                    "/"
                } else {
                    ""
                };
                let label = format!("{}{}", node.name(), suffix);
                let _ = writeln!(
                    out,
                    "{:indent$}{:<12} {}",
                    "",
                    label,
                    node.description(),
                    indent = depth * 2
                );
                walk(out, node.children(), depth + 1);
            }
        }

        let mut out = String::new();
        walk(&mut out, &self.roots, 0);
        out
    }
}
