//! Pure tree rewrites over lambda-calculus terms: substitution,
//! alpha-conversion and beta-reduction.

use thiserror::Error;
use tracing::debug;

use crate::term_ast::Term;

/// Errors raised by the rewriting functions when handed a malformed tree or
/// when reduction does not settle.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ReductionError {
    #[error("expected an abstraction in alpha-conversion, received a {found}")]
    NotAnAbstraction { found: &'static str },

    #[error("expected a variable as the bound argument of an abstraction, received a {found}")]
    BinderNotAVariable { found: &'static str },

    #[error("no beta-normal form reached within {steps} reduction passes")]
    StepLimitExceeded { steps: usize },
}

/// Copies `tree`, replacing every subterm equal to `target` with
/// `replacement`. With `shadow` set, an abstraction binding `target` is left
/// untouched. Inner binders are never renamed, so a free variable of
/// `replacement` can be captured by another binder inside `tree`.
pub fn substitute(tree: &Term, target: &Term, replacement: &Term, shadow: bool) -> Term {
    if shadow {
        if let Term::Abstraction { argument, .. } = tree {
            if **argument == *target {
                return tree.clone();
            }
        }
    }

    if tree == target {
        return replacement.clone();
    }

    match tree {
        Term::Abstraction { argument, body } => {
            return Term::Abstraction {
                argument: Box::new(substitute(argument, target, replacement, shadow)),
                body: Box::new(substitute(body, target, replacement, shadow)),
            };
        }
        Term::Application {
            abstraction,
            parameter,
        } => {
            return Term::Application {
                abstraction: Box::new(substitute(abstraction, target, replacement, shadow)),
                parameter: Box::new(substitute(parameter, target, replacement, shadow)),
            };
        }
        Term::Variable { .. } => {
            return tree.clone();
        }
    }
}

// Checks that `tree` is an abstraction over a variable and returns the binder.
fn bound_variable(tree: &Term) -> Result<(&Term, &Term), ReductionError> {
    let Term::Abstraction { argument, body } = tree else {
        return Err(ReductionError::NotAnAbstraction {
            found: tree.kind_name(),
        });
    };

    if !matches!(**argument, Term::Variable { .. }) {
        return Err(ReductionError::BinderNotAVariable {
            found: argument.kind_name(),
        });
    }

    return Ok((&**argument, &**body));
}

/// Renames the binder of the abstraction `tree` to `new_name`, along with
/// every occurrence it binds. Occurrences under an inner binder of the same
/// name are left alone.
pub fn rename_bound_variable(tree: &Term, new_name: &str) -> Result<Term, ReductionError> {
    let (argument, body) = bound_variable(tree)?;
    let renamed = Term::variable(new_name);

    return Ok(Term::Abstraction {
        argument: Box::new(renamed.clone()),
        body: Box::new(substitute(body, argument, &renamed, true)),
    });
}

/// Renames the binder of the abstraction `tree` to a name not used anywhere
/// in `tree`, formed by appending the smallest free numeric suffix.
pub fn alpha_convert(tree: &Term) -> Result<Term, ReductionError> {
    let (argument, _) = bound_variable(tree)?;
    let Term::Variable { name } = argument else {
        return Err(ReductionError::BinderNotAVariable {
            found: argument.kind_name(),
        });
    };

    let used_names = tree.all_variables();
    let mut suffix = 0;
    let mut new_name = format!("{}{}", name.token_text, suffix);

    while used_names.contains(new_name.as_str()) {
        suffix += 1;
        new_name = format!("{}{}", name.token_text, suffix);
    }

    return rename_bound_variable(tree, new_name.as_str());
}

/// One bottom-up beta-reduction pass: children are reduced first, then a
/// node of the form `(λx.body) parameter` becomes `body[x := parameter]`.
/// The result of a substitution is not reduced again in the same pass.
pub fn beta_reduce(tree: &Term) -> Term {
    match tree {
        Term::Variable { .. } => {
            return tree.clone();
        }
        Term::Abstraction { argument, body } => {
            return Term::Abstraction {
                argument: argument.clone(),
                body: Box::new(beta_reduce(body)),
            };
        }
        Term::Application {
            abstraction,
            parameter,
        } => {
            let abstraction = beta_reduce(abstraction);
            let parameter = beta_reduce(parameter);

            if let Term::Abstraction { argument, body } = &abstraction {
                return substitute(body, argument, &parameter, true);
            }

            return Term::Application {
                abstraction: Box::new(abstraction),
                parameter: Box::new(parameter),
            };
        }
    }
}

/// A term is beta-normal when a reduction pass leaves it unchanged.
pub fn is_beta_normal(tree: &Term) -> bool {
    return beta_reduce(tree) == *tree;
}

/// Repeats `beta_reduce` until the term stops changing, giving up after
/// `max_steps` passes.
pub fn normalize(tree: &Term, max_steps: usize) -> Result<Term, ReductionError> {
    let mut current = tree.clone();

    for step in 0..max_steps {
        let reduced = beta_reduce(&current);

        if reduced == current {
            debug!(step, "reached beta-normal form");
            return Ok(current);
        }

        debug!(step, term = %reduced, "beta-reduction pass");
        current = reduced;
    }

    if is_beta_normal(&current) {
        return Ok(current);
    }

    return Err(ReductionError::StepLimitExceeded { steps: max_steps });
}
