//! Pull-based lexer that turns a character stream into lambda-calculus
//! tokens on demand.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::character_stream::{CharacterStream, Position, StreamError};

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TokenClass {
    Lambda,
    Dot,
    ParenOpen,
    ParenClose,
    Variable,
    Number,
}

/// Represents a single token of the language. Two tokens are equal iff their
/// class and text match.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
}

impl Token {
    pub fn new(token_class: TokenClass, token_text: &str) -> Token {
        return Token {
            token_class,
            token_text: String::from(token_text),
        };
    }
}

/// Errors raised while lexing.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LexError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("could not lex {found:?} at {position}")]
    UnrecognizedCharacter { found: char, position: Position },

    /// A multi-character scan matched nothing. `next_token` only starts a
    /// scan after its first character matched, so this comes from scanning
    /// at a position outside the class.
    #[error("empty token while lexing at {position}")]
    EmptyToken { position: Position },

    #[error("lookahead must be at least one token, got {requested}")]
    InvalidLookahead { requested: usize },
}

impl LexError {
    pub fn is_end_of_input(&self) -> bool {
        return matches!(self, LexError::Stream(StreamError::EndOfInput { .. }));
    }
}

// Represents how to recognize a token class. Single-character classes have
// no continuation; multi-character classes keep scanning while the
// continuation matches.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    start: Regex,
    continuation: Option<Regex>,
}

// Character classes for each token class. `α` is accepted as a letter so that
// synthesized anonymous binder names lex back as variables.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Lambda,
            start: Regex::new(r"^[λ\\]$").expect("Unable to compile Lambda rule regex."),
            continuation: None,
        },
        TokenRule {
            token_class: TokenClass::Dot,
            start: Regex::new(r"^\.$").expect("Unable to compile Dot rule regex."),
            continuation: None,
        },
        TokenRule {
            token_class: TokenClass::ParenOpen,
            start: Regex::new(r"^\($").expect("Unable to compile ParenOpen rule regex."),
            continuation: None,
        },
        TokenRule {
            token_class: TokenClass::ParenClose,
            start: Regex::new(r"^\)$").expect("Unable to compile ParenClose rule regex."),
            continuation: None,
        },
        TokenRule {
            token_class: TokenClass::Number,
            start: Regex::new(r"^[0-9]$").expect("Unable to compile Number rule regex."),
            continuation: Some(
                Regex::new(r"^[0-9]$").expect("Unable to compile Number continuation regex.")
            ),
        },
        TokenRule {
            token_class: TokenClass::Variable,
            start: Regex::new(r"^[A-Za-zα]$").expect("Unable to compile Variable rule regex."),
            continuation: Some(
                Regex::new(r"^[A-Za-z0-9]$")
                    .expect("Unable to compile Variable continuation regex.")
            ),
        },
    ];
    static ref WHITESPACE: Regex =
        Regex::new(r"^[ \t\r\n]$").expect("Unable to compile whitespace regex.");
}

// Checks a single character against a single-character regex.
fn char_matches(regex: &Regex, c: char) -> bool {
    let mut buffer = [0u8; 4];
    return regex.is_match(c.encode_utf8(&mut buffer));
}

// Finds the rule whose first character class accepts `c`, restricted to
// single- or multi-character rules.
fn get_rule_starting_with(c: char, multi_character: bool) -> Option<&'static TokenRule> {
    TOKEN_RULES.iter().find(|token_rule| {
        token_rule.continuation.is_some() == multi_character && char_matches(&token_rule.start, c)
    })
}

/// Lexer over a single input string. Tokens are produced on demand; lookahead
/// saves and restores the stream position.
#[derive(Debug, Clone)]
pub struct Lexer {
    stream: CharacterStream,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        return Lexer {
            stream: CharacterStream::new(text),
        };
    }

    // Scans a multi-character token. Stops at the first character outside
    // the class or at the end of the input, retreating if it overshot.
    fn scan_multi_character(&mut self, token_rule: &TokenRule) -> Result<Token, LexError> {
        let start_offset = self.stream.offset();
        let mut token_text = String::new();

        while let Ok(current) = self.stream.advance_and_return() {
            let accepted = match (&token_rule.continuation, token_text.is_empty()) {
                (_, true) => char_matches(&token_rule.start, current),
                (Some(continuation), false) => char_matches(continuation, current),
                (None, false) => false,
            };

            if !accepted {
                self.stream.retreat();
                break;
            }

            token_text.push(current);
        }

        if token_text.is_empty() {
            return Err(LexError::EmptyToken {
                position: self.stream.position_at(start_offset),
            });
        }

        return Ok(Token {
            token_class: token_rule.token_class,
            token_text,
        });
    }

    /// Lexes the next token, skipping leading whitespace.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let mut current = self.stream.advance_and_return()?;

        while char_matches(&WHITESPACE, current) {
            current = self.stream.advance_and_return()?;
        }

        if let Some(token_rule) = get_rule_starting_with(current, false) {
            let token = Token {
                token_class: token_rule.token_class,
                token_text: current.to_string(),
            };
            trace!(?token, "lexed token");
            return Ok(token);
        }

        self.stream.retreat();

        if let Some(token_rule) = get_rule_starting_with(current, true) {
            let token = self.scan_multi_character(token_rule)?;
            trace!(?token, "lexed token");
            return Ok(token);
        }

        let position = self.stream.position();
        self.stream.advance();

        return Err(LexError::UnrecognizedCharacter {
            found: current,
            position,
        });
    }

    /// Returns the `n`-th upcoming token (1-based) without consuming any.
    pub fn peek_token(&mut self, n: usize) -> Result<Token, LexError> {
        if n == 0 {
            return Err(LexError::InvalidLookahead { requested: n });
        }

        self.stream.push_checkpoint();

        let mut peeked = self.next_token();
        for _ in 1..n {
            if peeked.is_err() {
                break;
            }
            peeked = self.next_token();
        }

        self.stream.pop_checkpoint();

        return peeked;
    }

    /// Whether `n` more tokens can be lexed before an error or the end of the
    /// input. The position is restored either way.
    pub fn has_available_tokens(&mut self, n: usize) -> bool {
        self.stream.push_checkpoint();

        let mut lexed = 0;
        while lexed < n && self.next_token().is_ok() {
            lexed += 1;
        }

        self.stream.pop_checkpoint();

        return lexed == n;
    }

    /// Whether the underlying stream still has input left (see
    /// `CharacterStream::is_exhausted`).
    pub fn has_token(&self) -> bool {
        return !self.stream.is_exhausted();
    }

    pub fn position(&self) -> Position {
        return self.stream.position();
    }

    /// Current character offset. Cheaper than `position`, which rescans the
    /// input for the line and column.
    pub fn offset(&self) -> usize {
        return self.stream.offset();
    }

    pub fn position_at(&self, offset: usize) -> Position {
        return self.stream.position_at(offset);
    }

    /// Iterates the tokens of the whole input, restarting from position 0.
    /// The iteration ends after the first lex error.
    pub fn tokens(&mut self) -> Tokens<'_> {
        self.stream.seek(0);

        return Tokens {
            lexer: self,
            failed: false,
        };
    }
}

/// Iterator returned by `Lexer::tokens`.
pub struct Tokens<'a> {
    lexer: &'a mut Lexer,
    failed: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.lexer.has_token() {
            return None;
        }

        let next = self.lexer.next_token();
        self.failed = next.is_err();

        return Some(next);
    }
}
