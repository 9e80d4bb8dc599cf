/// De Bruijn index: the number of binders between an occurrence and its binder.
pub type Index = usize;

pub type Span = std::ops::Range<usize>;
pub fn merge_span(lhs: &Span, rhs: &Span) -> Span {
    std::ops::Range {
        start: std::cmp::min(lhs.start, rhs.start),
        end: std::cmp::max(lhs.end, rhs.end),
    }
}

#[derive(derive_more::AsRef, PartialEq, Eq, Clone, derive_more::Display, Debug)]
#[display(bound = "T: std::fmt::Display")]
#[display(fmt = "{value}")]
pub struct Spanned<T> {
    pub span: Span,
    #[as_ref]
    pub value: T,
}
impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { span, value }
    }
    pub fn forget_span(self) -> T {
        self.value
    }
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

pub use crate::error::{InvalidTermError, ParseError};
