use crate::prelude::*;

/// Untyped lambda term in De Bruijn notation. Every node owns its children,
/// so no two occurrences ever share a subtree.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    /// `#i`, counting binders outward from the innermost one
    Var(Index),
    /// `λ. t`
    Abs(Box<Term>),
    /// `t t`
    Apply(Box<Term>, Box<Term>),
}

impl Term {
    pub fn var(index: Index) -> Self {
        Term::Var(index)
    }

    pub fn abs(body: Term) -> Self {
        Term::Abs(body.into())
    }

    pub fn apply(lhs: Term, rhs: Term) -> Self {
        Term::Apply(lhs.into(), rhs.into())
    }

    /// Deep copy sharing nothing with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Number of variable occurrences, i.e. the number of diagram columns.
    pub fn occurrences(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term {
                Term::Var(_) => count += 1,
                Term::Abs(body) => stack.push(body),
                Term::Apply(lhs, rhs) => {
                    stack.push(rhs);
                    stack.push(lhs);
                }
            }
        }
        count
    }

    /// Fails on the first occurrence (left to right) that has no binder.
    pub fn check_closed(&self) -> Result<(), InvalidTermError> {
        let mut occurrence = 0;
        let mut stack = vec![(self, 0)];
        while let Some((term, depth)) = stack.pop() {
            match term {
                Term::Var(index) => {
                    if *index >= depth {
                        return Err(InvalidTermError::FreeVariable {
                            index: *index,
                            depth,
                            occurrence,
                        });
                    }
                    occurrence += 1;
                }
                Term::Abs(body) => stack.push((body, depth + 1)),
                Term::Apply(lhs, rhs) => {
                    stack.push((rhs, depth));
                    stack.push((lhs, depth));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_display_string(&mut crate::printer::DisplayContext::new()))
    }
}
