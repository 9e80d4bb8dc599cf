use chumsky::prelude::*;

use crate::{
    ast::Term,
    prelude::{merge_span, ParseError, Spanned},
};

pub trait SimpleParser<O>: Parser<char, O, Error = Simple<char>> + Clone {}
impl<O, T> SimpleParser<O> for T where T: Parser<char, O, Error = Simple<char>> + Clone {}

/// Any single character that is not whitespace, punctuation of the syntax, or
/// part of a name.
fn is_symbol(c: &char) -> bool {
    !c.is_whitespace()
        && !c.is_ascii_uppercase()
        && !matches!(c, '(' | ')' | '.' | 'λ' | '\\' | '_')
}

fn symbol() -> impl SimpleParser<Spanned<char>> {
    filter(is_symbol)
        .map_with_span(Spanned::new)
        .labelled("variable")
}

/// A run of uppercase letters, or `_`.
fn name() -> impl SimpleParser<Spanned<String>> {
    filter(char::is_ascii_uppercase)
        .repeated()
        .at_least(1)
        .collect::<String>()
        .or(just('_').to("_".to_string()))
        .map_with_span(Spanned::new)
        .labelled("name")
}

fn apply(lhs: Spanned<Term>, rhs: Spanned<Term>) -> Spanned<Term> {
    let span = merge_span(&lhs.span, &rhs.span);
    Spanned::new(Term::Apply(lhs.into(), rhs.into()), span)
}

fn term_parser() -> impl SimpleParser<Spanned<Term>> {
    recursive(|term: Recursive<_, Spanned<Term>, _>| {
        // `λfx.t` is `λf.λx.t`
        let abs = just('λ')
            .or(just('\\'))
            .ignore_then(symbol().padded().repeated().at_least(1))
            .then_ignore(just('.'))
            .then(term.clone())
            .map_with_span(|(binders, body): (Vec<_>, Spanned<Term>), span| {
                let mut abs = binders.into_iter().rev().fold(body, |body, var| {
                    let span = var.span.start..body.span.end;
                    Spanned::new(Term::Abs(var, body.into()), span)
                });
                abs.span = span;
                abs
            })
            .padded()
            .labelled("abstraction");

        let atom = choice((
            symbol().map(Term::Var).map_with_span(Spanned::new),
            name().map(Term::Name).map_with_span(Spanned::new),
            term.map(Spanned::forget_span)
                .delimited_by(just('('), just(')'))
                .map_with_span(Spanned::new),
        ))
        .padded();

        // the body of a trailing abstraction extends to the end of the group
        let application = atom
            .clone()
            .then(atom.repeated())
            .foldl(apply)
            .then(abs.clone().or_not())
            .map(|(lhs, rhs)| match rhs {
                Some(rhs) => apply(lhs, rhs),
                None => lhs,
            })
            .labelled("application");

        choice((abs, application))
    })
    .labelled("term")
}

/// Parses the named syntax, `λ` or `\` introducing an abstraction.
pub fn parse(s: &str) -> Result<Spanned<Term>, Vec<ParseError>> {
    term_parser()
        .then_ignore(end())
        .parse(s)
        .map_err(|es| es.into_iter().map(ParseError::from).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    /// Strips spans so trees can be compared by shape.
    fn shape(term: &Spanned<Term>) -> String {
        match term.value() {
            Term::Var(x) => x.value.to_string(),
            Term::Name(name) => name.value.clone(),
            Term::Abs(x, body) => format!("[{}.{}]", x.value, shape(body)),
            Term::Apply(lhs, rhs) => format!("<{} {}>", shape(lhs), shape(rhs)),
        }
    }

    fn parse_shape(s: &str) -> String {
        shape(&parse(s).unwrap())
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_shape("x"), "x");
        assert_eq!(parse_shape("λx.x"), "[x.x]");
        assert_eq!(parse_shape("\\x.x"), "[x.x]");
        assert_eq!(parse_shape("(λx.x)"), "[x.x]");
        assert_eq!(parse_shape("x y z"), "<<x y> z>");
        assert_eq!(parse_shape("xyz"), "<<x y> z>");
        assert_eq!(parse_shape("x(y z)"), "<x <y z>>");
        assert_eq!(parse_shape("λx.λy.x y"), "[x.[y.<x y>]]");
        assert_eq!(parse_shape("(λx.x)y"), "<[x.x] y>");
        assert_eq!(parse_shape("x λy.y z"), "<x [y.<y z>]>");
        assert_eq!(parse_shape(" ( λ x . x )  ( y ) "), "<[x.x] y>");
    }

    #[test]
    fn test_binder_lists() {
        assert_eq!(parse_shape("λfx.f x"), "[f.[x.<f x>]]");
        assert_eq!(parse_shape("\\f x . x"), "[f.[x.x]]");
        assert_eq!(parse_shape("λmnf.m (n f)"), "[m.[n.[f.<m <n f>>]]]");

        let term = parse("λfx.f").unwrap();
        assert_eq!(term.span, 0..5);
        let Term::Abs(_, inner) = term.value() else {
            panic!("expected an abstraction");
        };
        assert_eq!(inner.span, 2..5);
    }

    #[test]
    fn test_names() {
        assert_eq!(parse_shape("PLUS ONE TWO"), "<<PLUS ONE> TWO>");
        assert_eq!(parse_shape("ONEx"), "<ONE x>");
        assert_eq!(parse_shape("_ (λx.x)"), "<_ [x.x]>");
        assert_eq!(parse_shape("λn.n (λx.FALSE) TRUE"), "[n.<<n [x.FALSE]> TRUE>]");
        // names are not binders
        assert!(parse("λX.X").is_err());
    }

    #[test]
    fn test_spans() {
        let term = parse("(λx.x) y").unwrap();
        assert_eq!(term.span, 0..8);
        let Term::Apply(lhs, rhs) = term.value() else {
            panic!("expected an application");
        };
        assert_eq!(lhs.span, 0..6);
        assert_eq!(rhs.span, 7..8);
    }

    #[test]
    fn test_unbalanced() {
        let errors = parse("(λx.x").unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(errors[0].position(), 5);

        let errors = parse("λx.x)").unwrap_err();
        assert_eq!(errors[0].position(), 4);
    }

    #[test]
    fn test_malformed() {
        assert!(parse("").is_err());
        assert!(parse("λ.x").is_err());
        assert!(parse("λx x").is_err());
        assert!(parse("()").is_err());
    }
}
