use crate::{prelude::*, term::Term};

/// Binder names, handed out by nesting depth. Deeper nesting reuses them.
const SYMBOLS: [char; 10] = ['x', 'y', 'z', 'a', 'b', 'c', 'd', 'e', 'f', 'g'];

/// Names of the abstractions enclosing the subterm being printed, outermost
/// first.
#[derive(Default, Debug)]
pub struct DisplayContext {
    binders: Vec<char>,
}

impl DisplayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.binders.len()
    }

    fn open(&mut self) -> char {
        let symbol = SYMBOLS[self.binders.len() % SYMBOLS.len()];
        self.binders.push(symbol);
        symbol
    }

    fn close(&mut self) {
        self.binders.pop();
    }

    fn lookup(&self, index: Index) -> Option<char> {
        self.binders.iter().rev().nth(index).copied()
    }
}

/// Drops the outermost pair of parentheses.
fn unwrap_parens(s: &str) -> &str {
    s.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(s)
}

impl Term {
    /// Parenthesized rendering, e.g. `(λx.λy.x)` or `(λx.x x x)`.
    ///
    /// References past the outermost binder print as `#k`, `k` counting on
    /// from that binder.
    pub fn to_display_string(&self, ctx: &mut DisplayContext) -> String {
        match self {
            Term::Var(index) => match ctx.lookup(*index) {
                Some(symbol) => symbol.to_string(),
                None => format!("#{}", index - ctx.depth()),
            },
            Term::Abs(body) => {
                let symbol = ctx.open();
                let rendered = body.to_display_string(ctx);
                ctx.close();
                let rendered = match body.as_ref() {
                    Term::Var(_) => rendered.as_str(),
                    Term::Abs(_) | Term::Apply(_, _) => unwrap_parens(&rendered),
                };
                format!("(λ{symbol}.{rendered})")
            }
            Term::Apply(lhs, rhs) => {
                let left = lhs.to_display_string(ctx);
                let right = rhs.to_display_string(ctx);
                match (lhs.as_ref(), rhs.as_ref()) {
                    (Term::Var(_), Term::Var(_)) => format!("({left} {right})"),
                    // `((x y) z)` is written `(x y z)`
                    (Term::Apply(_, _), Term::Var(_)) => match left.strip_suffix(')') {
                        Some(open) => format!("{open} {right})"),
                        None => format!("({left}{right})"),
                    },
                    _ => format!("({left}{right})"),
                }
            }
        }
    }
}
