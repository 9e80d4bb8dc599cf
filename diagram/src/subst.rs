//! Index bookkeeping for beta reduction.

use crate::{prelude::*, term::Term};

/// Adds `delta` to every index at or above `cutoff`. Entering an abstraction
/// raises the cutoff, so only references free in `term` move.
pub fn shift_free(term: &mut Term, cutoff: usize, delta: isize) {
    match term {
        Term::Var(index) => {
            if *index >= cutoff {
                *index = index
                    .checked_add_signed(delta)
                    .expect("Something went wrong while shifting: index became negative");
            }
        }
        Term::Abs(body) => shift_free(body, cutoff + 1, delta),
        Term::Apply(lhs, rhs) => {
            shift_free(lhs, cutoff, delta);
            shift_free(rhs, cutoff, delta);
        }
    }
}

/// Replaces every reference to `target` with a fresh copy of `value`, lifted
/// over the binders crossed on the way down.
///
/// Returns the replacement when `term` itself is such a reference. Compound
/// nodes adopt their children's replacements in place and return `None`.
pub fn beta_substitute(term: &mut Term, target: Index, value: &Term) -> Option<Term> {
    match term {
        Term::Var(index) if *index == target => {
            let mut copy = value.copy();
            shift_free(&mut copy, 0, target as isize);
            Some(copy)
        }
        Term::Var(_) => None,
        Term::Abs(body) => {
            if let Some(body_replacement) = beta_substitute(body, target + 1, value) {
                **body = body_replacement;
            }
            None
        }
        Term::Apply(lhs, rhs) => {
            if let Some(lhs_replacement) = beta_substitute(lhs, target, value) {
                **lhs = lhs_replacement;
            }
            if let Some(rhs_replacement) = beta_substitute(rhs, target, value) {
                **rhs = rhs_replacement;
            }
            None
        }
    }
}
