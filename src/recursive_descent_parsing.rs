//! Recursive descent parser that pulls tokens from the lexer and constructs
//! lambda-calculus terms.

use thiserror::Error;
use tracing::warn;

use crate::character_stream::Position;
use crate::lexical_analysis::{LexError, Lexer, Token, TokenClass};
use crate::term_ast::Term;

/// Represents a parsing error.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("expected a variable before \".\" at {position}, found {found:?}")]
    ExpectedVariable { found: Token, position: Position },

    #[error("grouped expression opened at {opened_at} is missing its closing parenthesis")]
    MissingClosingParenthesis { opened_at: Position },

    #[error("expected a {expected:?} token at {position}, found {found:?}")]
    UnexpectedToken {
        expected: TokenClass,
        found: Token,
        position: Position,
    },

    #[error("anonymous abstractions are not allowed, encountered one at {position}")]
    AnonymousAbstractionDisallowed { position: Position },

    #[error("unexpected end of input at {position}")]
    UnexpectedEndOfInput { position: Position },

    #[error("unexpected {found:?} after the end of the expression at {position}")]
    UnexpectedTrailingInput { found: Token, position: Position },

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Parser state: the lexer, the count of abstractions seen so far (used to
/// name anonymous binders `α1`, `α2`, … in source order), and the anonymous
/// binder policy.
#[derive(Debug, Clone)]
pub struct Parser {
    lexer: Lexer,
    abstraction_count: usize,
    allow_anonymous_abstractions: bool,
}

impl Parser {
    pub fn new(text: &str) -> Parser {
        return Parser {
            lexer: Lexer::new(text),
            abstraction_count: 0,
            allow_anonymous_abstractions: true,
        };
    }

    /// Sets whether binders without an explicit bound variable are accepted.
    pub fn with_anonymous_abstractions(mut self, allow: bool) -> Parser {
        self.allow_anonymous_abstractions = allow;
        return self;
    }

    // Whether the next token has the given class. Lookahead failures count
    // as "no".
    fn next_token_is_class(&mut self, token_class: TokenClass) -> bool {
        return matches!(self.lexer.peek_token(1), Ok(token) if token.token_class == token_class);
    }

    // Turns a failed lookahead into the matching parse error.
    fn end_or_lex_error(&self, lex_error: LexError) -> ParseError {
        if lex_error.is_end_of_input() {
            return ParseError::UnexpectedEndOfInput {
                position: self.lexer.position(),
            };
        }

        return ParseError::Lex(lex_error);
    }

    // Consumes the next token, requiring the given class.
    fn next_token_of_class(&mut self, token_class: TokenClass) -> Result<Token, ParseError> {
        let offset = self.lexer.offset();
        let token = self
            .lexer
            .next_token()
            .map_err(|lex_error| self.end_or_lex_error(lex_error))?;

        if token.token_class != token_class {
            return Err(ParseError::UnexpectedToken {
                expected: token_class,
                found: token,
                position: self.lexer.position_at(offset),
            });
        }

        return Ok(token);
    }

    // Parses `LAMBDA VAR DOT expression`, or `LAMBDA expression` when
    // anonymous binders are allowed.
    fn parse_abstraction(&mut self) -> Result<Term, ParseError> {
        self.next_token_of_class(TokenClass::Lambda)?;
        self.abstraction_count += 1;

        let next_is_variable = self.next_token_is_class(TokenClass::Variable);
        let second_is_dot = self.lexer.has_available_tokens(2)
            && matches!(self.lexer.peek_token(2), Ok(token) if token.token_class == TokenClass::Dot);

        if next_is_variable && second_is_dot {
            let argument = self.next_token_of_class(TokenClass::Variable)?;
            self.next_token_of_class(TokenClass::Dot)?;
            let body = self.parse_expression(false)?;

            return Ok(Term::Abstraction {
                argument: Box::new(Term::Variable { name: argument }),
                body: Box::new(body),
            });
        }

        if !second_is_dot && self.allow_anonymous_abstractions {
            let argument = Term::variable(format!("α{}", self.abstraction_count).as_str());
            let body = self.parse_expression(false)?;

            return Ok(Term::Abstraction {
                argument: Box::new(argument),
                body: Box::new(body),
            });
        }

        let position = self.lexer.position();

        if !next_is_variable {
            return match self.lexer.peek_token(1) {
                Ok(found) => Err(ParseError::ExpectedVariable { found, position }),
                Err(lex_error) => Err(self.end_or_lex_error(lex_error)),
            };
        }

        return Err(ParseError::AnonymousAbstractionDisallowed { position });
    }

    // Parses `'(' expression ')'`.
    fn parse_grouped_expression(&mut self) -> Result<Term, ParseError> {
        let opened_at = self.lexer.offset();
        self.next_token_of_class(TokenClass::ParenOpen)?;

        let expression = self.parse_expression(false)?;

        let offset = self.lexer.offset();
        match self.lexer.peek_token(1) {
            Ok(token) if token.token_class == TokenClass::ParenClose => {
                self.lexer.next_token()?;
                return Ok(expression);
            }
            Ok(found) if found.token_class == TokenClass::ParenOpen => {
                return Err(ParseError::UnexpectedToken {
                    expected: TokenClass::ParenClose,
                    found,
                    position: self.lexer.position_at(offset),
                });
            }
            _ => {
                return Err(ParseError::MissingClosingParenthesis {
                    opened_at: self.lexer.position_at(opened_at),
                });
            }
        }
    }

    // Parses a variable or numeral leaf.
    fn parse_variable(&mut self) -> Result<Term, ParseError> {
        let offset = self.lexer.offset();
        let token = self
            .lexer
            .peek_token(1)
            .map_err(|lex_error| self.end_or_lex_error(lex_error))?;

        match token.token_class {
            TokenClass::Variable | TokenClass::Number => {
                self.lexer.next_token()?;
                return Ok(Term::Variable { name: token });
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: TokenClass::Variable,
                    found: token,
                    position: self.lexer.position_at(offset),
                });
            }
        }
    }

    /// Parses one expression. With `operand_only` set, stops after a single
    /// grouped expression, abstraction or leaf; otherwise folds any following
    /// operands into left-associated applications.
    pub fn parse_expression(&mut self, operand_only: bool) -> Result<Term, ParseError> {
        let mut expression = if self.next_token_is_class(TokenClass::ParenOpen) {
            self.parse_grouped_expression()?
        } else if self.next_token_is_class(TokenClass::Lambda) {
            self.parse_abstraction()?
        } else {
            self.parse_variable()?
        };

        if operand_only {
            return Ok(expression);
        }

        while self.lexer.has_token()
            && self.lexer.peek_token(1)?.token_class != TokenClass::ParenClose
        {
            let parameter = self.parse_expression(true)?;

            expression = Term::Application {
                abstraction: Box::new(expression),
                parameter: Box::new(parameter),
            };
        }

        return Ok(expression);
    }

    /// Parses the whole input as one expression, rejecting a stray closing
    /// parenthesis left after it.
    ///
    /// Remaining input is detected with the trimmed-length exhaustion check,
    /// so with leading whitespace the tail of the input can be dropped
    /// without an error: `"  a b"` parses as `a`.
    pub fn try_parse(&mut self) -> Result<Term, ParseError> {
        let expression = self.parse_expression(false)?;

        if self.lexer.has_token() {
            let position = self.lexer.position();
            let found = self.lexer.peek_token(1)?;
            return Err(ParseError::UnexpectedTrailingInput { found, position });
        }

        return Ok(expression);
    }

    /// Recovery boundary: parses the input, logging a diagnostic and
    /// returning `None` on any failure.
    pub fn parse(&mut self) -> Option<Term> {
        match self.try_parse() {
            Ok(expression) => Some(expression),
            Err(parse_error) => {
                warn!("{}", parse_error);
                None
            }
        }
    }
}

/// Parses `text` into a term, or logs why it could not and returns `None`.
pub fn parse(text: &str, allow_anonymous_abstractions: bool) -> Option<Term> {
    return Parser::new(text)
        .with_anonymous_abstractions(allow_anonymous_abstractions)
        .parse();
}

/// Parses `text` into a term, returning the error instead of logging it.
pub fn try_parse(text: &str, allow_anonymous_abstractions: bool) -> Result<Term, ParseError> {
    return Parser::new(text)
        .with_anonymous_abstractions(allow_anonymous_abstractions)
        .try_parse();
}
