use tracing::debug;

use crate::{
    subst::{beta_substitute, shift_free},
    term::Term,
};

/// `(λ. body) arg`
fn apply(mut body: Term, mut arg: Term) -> Term {
    shift_free(&mut arg, 0, 1);
    if let Some(replacement) = beta_substitute(&mut body, 0, &arg) {
        body = replacement;
    }
    shift_free(&mut body, 0, -1);
    body
}

/// Contracts the leftmost-outermost redex of `term`, reducing under
/// abstractions. Returns whether anything changed.
///
/// A contracted redex is replaced wholesale; its old subtree is dropped.
pub fn reduce(term: &mut Term) -> bool {
    match term {
        Term::Var(_) => false,
        Term::Abs(body) => reduce(body),
        Term::Apply(lhs, rhs) => {
            if let Term::Abs(body) = lhs.as_mut() {
                let body = std::mem::replace(body.as_mut(), Term::Var(0));
                let arg = std::mem::replace(rhs.as_mut(), Term::Var(0));
                *term = apply(body, arg);
                return true;
            }
            reduce(lhs) || reduce(rhs)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// No redex is left after `steps` reductions.
    Normal { steps: usize },
    /// The step limit was hit. The term may or may not be normal.
    Exhausted { steps: usize },
}

impl Outcome {
    pub fn steps(&self) -> usize {
        match self {
            Outcome::Normal { steps } | Outcome::Exhausted { steps } => *steps,
        }
    }
}

/// Drives `term` towards its normal form, showing `visit` every intermediate
/// term (the initial one first) before the next step is attempted.
///
/// Without a limit this does not return for terms that have no normal form.
pub fn trace<E>(
    term: &mut Term,
    limit: Option<usize>,
    mut visit: impl FnMut(usize, &Term) -> Result<(), E>,
) -> Result<Outcome, E> {
    let mut steps = 0;
    loop {
        visit(steps, term)?;
        if limit.map_or(false, |limit| steps >= limit) {
            return Ok(Outcome::Exhausted { steps });
        }
        if !reduce(term) {
            return Ok(Outcome::Normal { steps });
        }
        steps += 1;
        debug!(steps, "beta step");
    }
}

pub fn normalize(term: &mut Term, limit: Option<usize>) -> Outcome {
    match trace(term, limit, |_, _| Ok::<_, std::convert::Infallible>(())) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::term::strategy::closed_term;

    fn identity() -> Term {
        lambda!(var!(0))
    }
    fn k() -> Term {
        lambda!(lambda!(var!(1)))
    }
    fn s() -> Term {
        lambda!(lambda!(lambda!(apply!(
            apply!(var!(2), var!(0)),
            apply!(var!(1), var!(0))
        ))))
    }
    fn omega() -> Term {
        let w = lambda!(apply!(var!(0), var!(0)));
        apply!(w.copy(), w)
    }
    fn church(n: usize) -> Term {
        let mut body = var!(0);
        for _ in 0..n {
            body = apply!(var!(1), body);
        }
        lambda!(lambda!(body))
    }
    fn eval(mut term: Term) -> Term {
        assert!(matches!(normalize(&mut term, Some(10_000)), Outcome::Normal { .. }));
        term
    }

    #[test]
    fn test_identity_application() {
        let mut term = apply!(identity(), k());
        assert!(reduce(&mut term));
        assert_eq!(term, k());
        assert!(!reduce(&mut term));
    }

    #[test]
    fn test_k_combinator() {
        let a = lambda!(apply!(var!(0), var!(0)));
        let b = s();
        assert_eq!(eval(apply!(apply!(k(), a.copy()), b)), a);
    }

    #[test]
    fn test_k_relevels_free_references() {
        // λ. K #0 I  ->  λ. #0
        let mut term = lambda!(apply!(apply!(k(), var!(0)), identity()));
        assert_eq!(normalize(&mut term, None), Outcome::Normal { steps: 2 });
        assert_eq!(term, identity());
    }

    #[test]
    fn test_skk_is_identity() {
        assert_eq!(eval(apply!(apply!(s(), k()), k())), identity());
    }

    #[test]
    fn test_substitution_under_binder() {
        // λ. (λ. λ. #1) #0  ->  λ. λ. #1
        let mut term = lambda!(apply!(lambda!(lambda!(var!(1))), var!(0)));
        assert!(reduce(&mut term));
        assert_eq!(term, lambda!(lambda!(var!(1))));
    }

    #[test]
    fn test_leftmost_outermost() {
        let left = apply!(identity(), var!(0));
        let right = apply!(identity(), var!(1));
        // (λ. λ. (I #0) (I #1))
        let mut term = lambda!(lambda!(apply!(left, right.copy())));
        assert!(reduce(&mut term));
        assert_eq!(term, lambda!(lambda!(apply!(var!(0), right))));
        assert!(reduce(&mut term));
        assert_eq!(term, lambda!(lambda!(apply!(var!(0), var!(1)))));
        assert!(!reduce(&mut term));
    }

    #[test]
    fn test_outer_redex_first() {
        // K I Ω has a normal form only under normal order
        let mut term = apply!(apply!(k(), identity()), omega());
        assert_eq!(normalize(&mut term, Some(10)), Outcome::Normal { steps: 2 });
        assert_eq!(term, identity());
    }

    #[test]
    fn test_church_arithmetic() {
        let plus = lambda!(lambda!(lambda!(lambda!(apply!(
            apply!(var!(3), var!(1)),
            apply!(apply!(var!(2), var!(1)), var!(0))
        )))));
        let mult = lambda!(lambda!(lambda!(apply!(
            var!(2),
            apply!(var!(1), var!(0))
        ))));
        assert_eq!(eval(apply!(apply!(plus, church(2)), church(3))), church(5));
        assert_eq!(eval(apply!(apply!(mult, church(2)), church(3))), church(6));
    }

    #[test]
    fn test_omega_keeps_changing() {
        let mut term = omega();
        for _ in 0..50 {
            assert!(reduce(&mut term));
            assert_eq!(term, omega());
        }
        assert_eq!(
            normalize(&mut term, Some(50)),
            Outcome::Exhausted { steps: 50 }
        );
    }

    #[test]
    fn test_trace_visits_every_term() {
        let mut seen = vec![];
        let outcome = trace(&mut apply!(apply!(k(), identity()), k()), None, |step, term| {
            seen.push((step, term.copy()));
            Ok::<_, ()>(())
        });
        assert_eq!(outcome, Ok(Outcome::Normal { steps: 2 }));
        assert_eq!(
            seen,
            vec![
                (0, apply!(apply!(k(), identity()), k())),
                (1, apply!(lambda!(identity()), k())),
                (2, identity()),
            ]
        );
    }

    #[test]
    fn test_trace_stops_on_visitor_error() {
        let outcome = trace(&mut omega(), None, |step, _| if step == 3 { Err(step) } else { Ok(()) });
        assert_eq!(outcome, Err(3));
    }

    proptest! {
        #[test]
        fn prop_identity_beta(term in closed_term()) {
            let mut redex = apply!(identity(), term.copy());
            prop_assert!(reduce(&mut redex));
            prop_assert_eq!(redex, term);
        }

        #[test]
        fn prop_reduction_keeps_terms_closed(term in closed_term()) {
            let mut term = term;
            for _ in 0..8 {
                if term.occurrences() > 5_000 || !reduce(&mut term) {
                    break;
                }
                prop_assert!(term.check_closed().is_ok());
            }
        }
    }
}
