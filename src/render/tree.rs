use super::{FieldInstruction, RenderInstruction};
use itertools::Itertools;
use std::fmt;

/// Displays a flat render sequence as an indented tree. Used by the CLI and for debugging.
pub struct RenderTree<'a> {
    pub instructions: &'a [RenderInstruction],
}

enum TreeNode<'a> {
    Container {
        heading: String,
        children: Vec<TreeNode<'a>>,
    },
    Leaf(&'a FieldInstruction),
}

impl<'a> RenderTree<'a> {
    pub fn new(instructions: &'a [RenderInstruction]) -> Self {
        Self { instructions }
    }

    /// Rebuilds the nesting from the start/end markers.
    fn build(&self) -> Vec<TreeNode<'a>> {
        let mut root = Vec::new();
        let mut open: Vec<(String, Vec<TreeNode<'a>>)> = Vec::new();

        for instruction in self.instructions {
            match instruction {
                RenderInstruction::FormStart { title, .. } => open.push((title.clone(), Vec::new())),
                RenderInstruction::GroupStart { label, .. } => {
                    open.push((format!("{} (group)", label), Vec::new()))
                }
                RenderInstruction::FormEnd { .. } | RenderInstruction::GroupEnd { .. } => {
                    if let Some((heading, children)) = open.pop() {
                        attach(&mut open, &mut root, TreeNode::Container { heading, children });
                    }
                }
                RenderInstruction::Field(field) => {
                    attach(&mut open, &mut root, TreeNode::Leaf(field));
                }
            }
        }

        // Close anything left open by a truncated sequence.
        while let Some((heading, children)) = open.pop() {
            attach(&mut open, &mut root, TreeNode::Container { heading, children });
        }
        root
    }

    fn fmt_as_tree(
        &self,
        node: &TreeNode<'_>,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match node {
            TreeNode::Container { heading, children } => {
                writeln!(f, "{}", heading)?;
                for (index, child) in children.iter().enumerate() {
                    self.fmt_as_tree(child, f, &child_prefix, index + 1 == children.len())?;
                }
            }
            TreeNode::Leaf(field) => writeln!(f, "{}", describe(field))?,
        }
        Ok(())
    }
}

impl<'a> fmt::Display for RenderTree<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.build();
        for (index, node) in nodes.iter().enumerate() {
            self.fmt_as_tree(node, f, "", index + 1 == nodes.len())?;
        }
        Ok(())
    }
}

fn attach<'a>(
    open: &mut [(String, Vec<TreeNode<'a>>)],
    root: &mut Vec<TreeNode<'a>>,
    node: TreeNode<'a>,
) {
    match open.last_mut() {
        Some((_, children)) => children.push(node),
        None => root.push(node),
    }
}

/// e.g. `[select] state "State" * = "CA" {CA | NY}`
fn describe(field: &FieldInstruction) -> String {
    let mut line = format!(
        "[{}] {} {:?}{} = {:?}",
        field.kind,
        field.id,
        field.label,
        if field.required { " *" } else { "" },
        field.current_value
    );
    if let Some(options) = &field.options {
        let choices = options
            .iter()
            .filter(|option| !option.is_sentinel())
            .map(|option| option.label.as_str())
            .join(" | ");
        line.push_str(&format!(" {{{}}}", choices));
    }
    line
}
