use chumsky::error::{Simple, SimpleReason};
use thiserror::Error;

use crate::prelude::{Index, Span};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("{message} at {}", .span.start)]
    Syntax { span: Span, message: String },
    #[error("Unknown variable `{name}` at {}", .span.start)]
    UnknownVariable { name: char, span: Span },
    #[error("Unknown name `{name}` at {}", .span.start)]
    UnknownName { name: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::UnknownVariable { span, .. }
            | ParseError::UnknownName { span, .. } => span.clone(),
        }
    }

    /// Character offset of the offending input.
    pub fn position(&self) -> usize {
        self.span().start
    }
}

fn describe(c: Option<&char>) -> String {
    match c {
        Some(c) => format!("`{c}`"),
        None => "end of the input".to_string(),
    }
}

impl From<Simple<char>> for ParseError {
    fn from(e: Simple<char>) -> Self {
        let found = describe(e.found());
        let message = match e.reason() {
            SimpleReason::Unexpected => {
                let mut expected = e.expected().map(|c| describe(c.as_ref())).collect::<Vec<_>>();
                expected.sort();
                if expected.is_empty() {
                    format!("Unexpected {found}")
                } else {
                    format!("Unexpected {found}, expected {}", expected.join(", "))
                }
            }
            SimpleReason::Unclosed { delimiter, .. } => {
                format!("Unclosed delimiter `{delimiter}`, found {found}")
            }
            SimpleReason::Custom(msg) => msg.clone(),
        };
        ParseError::Syntax {
            span: e.span(),
            message,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InvalidTermError {
    /// A variable refers past the outermost enclosing abstraction.
    #[error("Variable #{occurrence} has index {index} but only {depth} enclosing binders")]
    FreeVariable {
        index: Index,
        depth: usize,
        occurrence: usize,
    },
}
