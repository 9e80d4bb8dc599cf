use std::collections::HashMap;

use crate::{ast, parser, prelude::*, term::Term};

/// Closed terms bound to uppercase names, plus `_` for the previous result.
pub type Definitions = HashMap<String, Term>;

/// Resolves names to De Bruijn indices. The innermost binder of a name wins.
///
/// A `NAME` is replaced by a copy of its definition. Definitions are closed,
/// so they are spliced in at any depth without shifting.
pub fn compile(term: &Spanned<ast::Term>, definitions: &Definitions) -> Result<Term, ParseError> {
    fn compile_rec(
        table: &mut Vec<char>,
        definitions: &Definitions,
        term: &Spanned<ast::Term>,
    ) -> Result<Term, ParseError> {
        Ok(match term.value() {
            ast::Term::Var(name) => {
                let index = table
                    .iter()
                    .rev()
                    .position(|x| *x == name.value)
                    .ok_or_else(|| ParseError::UnknownVariable {
                        name: name.value,
                        span: name.span(),
                    })?;
                Term::Var(index)
            }
            ast::Term::Name(name) => definitions
                .get(&name.value)
                .map(Term::copy)
                .ok_or_else(|| ParseError::UnknownName {
                    name: name.value.clone(),
                    span: name.span(),
                })?,
            ast::Term::Abs(name, body) => {
                table.push(name.value);
                let body = compile_rec(table, definitions, body)?;
                assert_eq!(Some(name.value), table.pop());
                Term::abs(body)
            }
            ast::Term::Apply(lhs, rhs) => {
                let lhs = compile_rec(table, definitions, lhs)?;
                let rhs = compile_rec(table, definitions, rhs)?;
                Term::apply(lhs, rhs)
            }
        })
    }
    compile_rec(&mut vec![], definitions, term)
}

/// Parses and resolves a closed term against `definitions`, reporting the
/// first error.
pub fn parse_term(s: &str, definitions: &Definitions) -> Result<Term, ParseError> {
    let term = parser::parse(s).map_err(|es| {
        es.into_iter().next().unwrap_or_else(|| ParseError::Syntax {
            span: 0..s.chars().count(),
            message: "Invalid term".to_string(),
        })
    })?;
    compile(&term, definitions)
}

impl std::str::FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_term(s, &Definitions::new())
    }
}
