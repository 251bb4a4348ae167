use std::{
    fmt::{self, Display},
    slice::Iter,
};

use super::statements::Stmt;

/// Node Trait
///
/// Implemented by every AST node. `Display` reconstructs source text for the
/// node's subtree; `token_literal` is the text of the token that introduced it.
pub trait Node: Display {
    fn token_literal(&self) -> &str;
}

/// Implements `Node` for structs that keep their leading token in a `token` field.
macro_rules! impl_node {
    ($($node:ty),+ $(,)?) => {
        $(
            impl $crate::ast::ast::Node for $node {
                fn token_literal(&self) -> &str {
                    &self.token.value
                }
            }
        )+
    };
}

pub(crate) use impl_node;

/// Root of every parse. Statements are kept in source order and render one
/// per line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        match self.statements.first() {
            Some(stmt) => stmt.token_literal(),
            None => "",
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Stmt;
    type IntoIter = Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
