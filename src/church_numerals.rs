//! Church-numeral encoding of numeral literals, and decoding of terms shaped
//! like Church numerals.

use thiserror::Error;
use tracing::debug;

use crate::lexical_analysis::TokenClass;
use crate::recursive_descent_parsing::{try_parse, ParseError};
use crate::term_ast::Term;

/// Largest numeral `convert` expands. The encoding nests one group per unit
/// and parsing it takes several stack frames per group, so the bound keeps
/// the parse well inside a 2 MiB thread stack.
pub const MAX_ENCODED_NUMERAL: u64 = 128;

/// Errors raised while converting numerals to Church numerals.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ChurchError {
    #[error("numeral {digits} is larger than {max}", max = MAX_ENCODED_NUMERAL)]
    NumeralOutOfRange { digits: String },

    #[error("could not parse the encoded numeral: {0}")]
    Parse(#[from] ParseError),
}

/// Encodes numerals with a pair of binder names that is fresh for each call
/// on the same encoder.
#[derive(Debug, Default, Clone)]
pub struct ChurchEncoder {
    counter: usize,
}

// Builds `f (f (… x))` with `n` applications of `f`.
fn repeat_application(f: &str, x: &str, n: u64) -> String {
    let mut series = String::from(x);

    for _ in 0..n {
        series = format!("{} ({})", f, series);
    }

    return series;
}

impl ChurchEncoder {
    pub fn new() -> ChurchEncoder {
        return ChurchEncoder::default();
    }

    /// Produces the surface syntax `\fk.\xk.fk (fk (… xk))` for `n`, where `k`
    /// increases with every call.
    pub fn encode(&mut self, n: u64) -> String {
        self.counter += 1;

        let f = format!("f{}", self.counter);
        let x = format!("x{}", self.counter);
        let encoded = format!("\\{}.\\{}.{}", f, x, repeat_application(&f, &x, n));

        debug!(n, %encoded, "encoded church numeral");

        return encoded;
    }

    /// Rebuilds `term` with every numeral leaf replaced by the parsed Church
    /// encoding of its value.
    pub fn convert(&mut self, term: &Term) -> Result<Term, ChurchError> {
        match term {
            Term::Variable { name } if name.token_class == TokenClass::Number => {
                let value = name
                    .token_text
                    .parse::<u64>()
                    .ok()
                    .filter(|&value| value <= MAX_ENCODED_NUMERAL)
                    .ok_or_else(|| ChurchError::NumeralOutOfRange {
                        digits: name.token_text.clone(),
                    })?;

                return Ok(try_parse(self.encode(value).as_str(), false)?);
            }
            Term::Variable { .. } => {
                return Ok(term.clone());
            }
            Term::Abstraction { argument, body } => {
                return Ok(Term::Abstraction {
                    argument: Box::new(self.convert(argument)?),
                    body: Box::new(self.convert(body)?),
                });
            }
            Term::Application {
                abstraction,
                parameter,
            } => {
                return Ok(Term::Application {
                    abstraction: Box::new(self.convert(abstraction)?),
                    parameter: Box::new(self.convert(parameter)?),
                });
            }
        }
    }
}

/// Reads back the number encoded by a term of the shape `λf.λx.f (f (… x))`
/// with distinct binders, or `None` for any other term.
pub fn decode(term: &Term) -> Option<u64> {
    let Term::Abstraction { argument: f, body } = term else {
        return None;
    };
    let Term::Abstraction { argument: x, body } = &**body else {
        return None;
    };

    if f == x {
        return None;
    }

    let mut count = 0;
    let mut current = &**body;

    loop {
        match current {
            Term::Variable { .. } if current == &**x => return Some(count),
            Term::Application {
                abstraction,
                parameter,
            } if abstraction == f => {
                count += 1;
                current = &**parameter;
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::recursive_descent_parsing::try_parse;
    use crate::term_rewriting::normalize;

    use super::*;

    fn parse_ok(text: &str) -> Term {
        return try_parse(text, true).expect("try_parse returned unexpected parse error");
    }

    // Test if successive encodings use fresh binder names.
    #[test]
    fn test_encode() {
        let mut encoder = ChurchEncoder::new();

        assert_eq!(encoder.encode(0), r"\f1.\x1.x1");
        assert_eq!(encoder.encode(3), r"\f2.\x2.f2 (f2 (f2 (x2)))");
    }

    // Test if encodings parse to the expected Church numeral shapes.
    #[test]
    fn test_encode_shapes() {
        let mut encoder = ChurchEncoder::new();

        assert_eq!(
            parse_ok(encoder.encode(0).as_str()),
            Term::abstraction("f1", Term::abstraction("x1", Term::variable("x1")))
        );

        let three = parse_ok(encoder.encode(3).as_str());
        assert_eq!(three.reconstruct(), "λf2.λx2.(f2) ((f2) ((f2) x2))");
        assert_eq!(decode(&three), Some(3));
    }

    // Test if convert replaces numerals and keeps everything else.
    #[test]
    fn test_convert() {
        let mut encoder = ChurchEncoder::new();

        let converted = encoder
            .convert(&parse_ok("\\n. n 2 x"))
            .expect("convert returned unexpected church error");

        assert_eq!(
            converted,
            parse_ok("\\n. n (\\f1.\\x1. f1 (f1 x1)) x")
        );

        // The next conversion draws fresh names.
        assert_eq!(
            encoder.convert(&Term::numeral("0")),
            Ok(parse_ok("\\f2.\\x2.x2"))
        );
    }

    // Test if oversized numerals are rejected.
    #[test]
    fn test_convert_out_of_range() {
        let mut encoder = ChurchEncoder::new();

        assert_eq!(
            encoder.convert(&Term::numeral("99999999999999999999999")),
            Err(ChurchError::NumeralOutOfRange {
                digits: String::from("99999999999999999999999"),
            })
        );
        assert_eq!(
            encoder.convert(&Term::numeral((MAX_ENCODED_NUMERAL + 1).to_string().as_str())),
            Err(ChurchError::NumeralOutOfRange {
                digits: (MAX_ENCODED_NUMERAL + 1).to_string(),
            })
        );
    }

    // Test if the largest accepted numeral converts, reduces and decodes on
    // an ordinary test thread.
    #[test]
    fn test_convert_largest_numeral() {
        let mut encoder = ChurchEncoder::new();

        let converted = encoder
            .convert(&Term::numeral(MAX_ENCODED_NUMERAL.to_string().as_str()))
            .expect("convert returned unexpected church error");
        assert_eq!(decode(&converted), Some(MAX_ENCODED_NUMERAL));

        let successor = parse_ok("λn.λf.λx.f (n f x)");
        let normal_form = normalize(&Term::application(successor, converted), 10)
            .expect("normalize returned unexpected reduction error");

        assert_eq!(decode(&normal_form), Some(MAX_ENCODED_NUMERAL + 1));
        assert_eq!(
            parse_ok(normal_form.reconstruct().as_str()),
            normal_form
        );
    }

    // Test if decode rejects terms that are not Church numerals.
    #[test]
    fn test_decode_rejects() {
        assert_eq!(decode(&parse_ok("\\f. \\x. x")), Some(0));
        assert_eq!(decode(&parse_ok("\\f. \\f. f")), None);
        assert_eq!(decode(&parse_ok("\\f. \\x. f f x")), None);
        assert_eq!(decode(&parse_ok("\\f. \\x. y")), None);
        assert_eq!(decode(&parse_ok("f x")), None);
    }

    // Test if Church addition of converted numerals normalizes to their sum.
    #[test]
    fn test_addition() {
        let mut encoder = ChurchEncoder::new();

        let program = parse_ok("(λm.λn.λf.λx.m f (n f x)) 2 3");
        let converted = encoder
            .convert(&program)
            .expect("convert returned unexpected church error");
        let normal_form =
            normalize(&converted, 100).expect("normalize returned unexpected reduction error");

        assert_eq!(decode(&normal_form), Some(5));
    }
}
