use crate::prelude::*;

#[derive(PartialEq, Eq, Debug)]
pub enum Term {
    /// `x`
    Var(Spanned<char>),
    /// `NAME`, or `_` for the previous result
    Name(Spanned<String>),
    /// `λx. t`
    Abs(Spanned<char>, Box<Spanned<Term>>),
    /// `t t`
    Apply(Box<Spanned<Term>>, Box<Spanned<Term>>),
}
