//! Data structures to represent lambda calculus terms, and some utility
//! functions to display and inspect them.

use std::collections::HashSet;

use crate::lexical_analysis::{Token, TokenClass};

/// Represents a lambda-calculus term. Terms are never mutated in place; the
/// rewriting functions build new trees.
///
/// The `argument` of an `Abstraction` is always a `Variable` in trees built by
/// the parser or the constructors below.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Term {
    Abstraction {
        argument: Box<Term>,
        body: Box<Term>,
    },
    Application {
        abstraction: Box<Term>,
        parameter: Box<Term>,
    },
    Variable {
        name: Token,
    },
}

impl Term {
    /// A variable leaf named by an identifier.
    pub fn variable(var_name: &str) -> Term {
        return Term::Variable {
            name: Token::new(TokenClass::Variable, var_name),
        };
    }

    /// A variable leaf holding a numeral token.
    pub fn numeral(digits: &str) -> Term {
        return Term::Variable {
            name: Token::new(TokenClass::Number, digits),
        };
    }

    pub fn abstraction(var_name: &str, body: Term) -> Term {
        return Term::Abstraction {
            argument: Box::new(Term::variable(var_name)),
            body: Box::new(body),
        };
    }

    pub fn application(abstraction: Term, parameter: Term) -> Term {
        return Term::Application {
            abstraction: Box::new(abstraction),
            parameter: Box::new(parameter),
        };
    }

    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Abstraction { .. } => "Abstraction",
            Term::Application { .. } => "Application",
            Term::Variable { .. } => "Variable",
        }
    }

    /// Renders the term back to surface syntax that re-parses to an equal
    /// tree.
    pub fn reconstruct(&self) -> String {
        let mut out_string = String::new();
        reconstruct_helper(self, &mut out_string);
        return out_string;
    }

    /// Finds all variable names used in the term, binders included.
    pub fn all_variables(&self) -> HashSet<&str> {
        match self {
            Term::Variable { name } => {
                return HashSet::from([name.token_text.as_str()]);
            }
            Term::Application {
                abstraction,
                parameter,
            } => {
                let abstraction_vars = abstraction.all_variables();
                let parameter_vars = parameter.all_variables();

                return abstraction_vars.union(&parameter_vars).copied().collect();
            }
            Term::Abstraction { argument, body } => {
                let mut body_vars = body.all_variables();
                body_vars.extend(argument.all_variables());
                return body_vars;
            }
        };
    }
}

// Helper function to produce the surface syntax of a Term.
fn reconstruct_helper(term: &Term, string_so_far: &mut String) {
    match term {
        Term::Variable { name } => {
            string_so_far.push_str(name.token_text.as_str());
        }
        Term::Application {
            abstraction,
            parameter,
        } => {
            string_so_far.push('(');
            reconstruct_helper(abstraction, string_so_far);
            string_so_far.push_str(") ");

            // A parameter that is itself an application would otherwise be
            // re-read as a longer left-associated chain.
            if let Term::Application { .. } = &**parameter {
                string_so_far.push('(');
                reconstruct_helper(parameter, string_so_far);
                string_so_far.push(')');
            } else {
                reconstruct_helper(parameter, string_so_far);
            }
        }
        Term::Abstraction { argument, body } => {
            string_so_far.push('λ');
            reconstruct_helper(argument, string_so_far);
            string_so_far.push('.');
            reconstruct_helper(body, string_so_far);
        }
    };
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.reconstruct());
    }
}
