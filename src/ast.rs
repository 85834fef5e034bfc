//! Abstract syntax tree produced by a successful parse.
//!
//! The tree has exactly two node kinds. A leaf owns one identified token. A
//! structure is a named, ordered group of children, produced by the grammar's
//! named-group operator; child order reflects left-to-right consumption order.
//!
//! The `Display` impl renders a human-readable tree for diagnostics: leaves
//! print as `id content`, structures print their name with children indented
//! two spaces per level. The exact format is not a machine-readable contract.

use std::fmt;

use crate::token::IdentifiedToken;

/// One node of the produced syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AstNode {
    /// A single consumed token.
    Leaf(IdentifiedToken),
    /// A named group of child nodes, in consumption order.
    Structure {
        name: String,
        children: Vec<AstNode>,
    },
}

impl AstNode {
    pub fn leaf(token: IdentifiedToken) -> Self {
        AstNode::Leaf(token)
    }

    pub fn structure(name: impl Into<String>, children: Vec<AstNode>) -> Self {
        AstNode::Structure {
            name: name.into(),
            children,
        }
    }

    /// The structure name, or `None` for leaves.
    pub fn name(&self) -> Option<&str> {
        match self {
            AstNode::Leaf(_) => None,
            AstNode::Structure { name, .. } => Some(name),
        }
    }

    /// Children of a structure; leaves have none.
    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Leaf(_) => &[],
            AstNode::Structure { children, .. } => children,
        }
    }

    pub fn as_leaf(&self) -> Option<&IdentifiedToken> {
        match self {
            AstNode::Leaf(token) => Some(token),
            AstNode::Structure { .. } => None,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        match self {
            AstNode::Leaf(token) => write!(f, "{} {}", token.id, token.content),
            AstNode::Structure { name, children } => {
                write!(f, "{}", name)?;
                for child in children {
                    writeln!(f)?;
                    child.render(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, content: &str) -> AstNode {
        AstNode::leaf(IdentifiedToken::new(id, content, 1, 1))
    }

    #[test]
    fn test_leaf_renders_id_and_content() {
        assert_eq!(leaf("Name", "a").to_string(), "Name a");
    }

    #[test]
    fn test_structure_renders_children_indented() {
        let tree = AstNode::structure(
            "->",
            vec![
                leaf("Name", "a"),
                AstNode::structure("group", vec![leaf("Name", "b")]),
            ],
        );

        assert_eq!(tree.to_string(), "->\n  Name a\n  group\n    Name b");
    }

    #[test]
    fn test_accessors() {
        let inner = leaf("Name", "a");
        let tree = AstNode::structure("s", vec![inner.clone()]);

        assert_eq!(tree.name(), Some("s"));
        assert_eq!(tree.children(), &[inner.clone()]);
        assert!(tree.as_leaf().is_none());
        assert_eq!(inner.children(), &[] as &[AstNode]);
        assert_eq!(inner.as_leaf().unwrap().content, "a");
    }
}
