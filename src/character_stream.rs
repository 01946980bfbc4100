//! A positioned, rewindable cursor over the characters of an input string.

use std::fmt::Display;

use thiserror::Error;

/// A location inside the input text. Offsets count characters (not bytes);
/// lines and columns are zero-based.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Derives the line and column of `offset` from the characters preceding
    /// it.
    pub fn locate(chars: &[char], offset: usize) -> Position {
        let preceding = &chars[..offset.min(chars.len())];

        let line = preceding.iter().filter(|&&c| c == '\n').count();
        let column = preceding.iter().rev().take_while(|&&c| c != '\n').count();

        return Position {
            offset,
            line,
            column,
        };
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(
            f,
            "(offset {}, line {}, column {})",
            self.offset, self.line, self.column
        );
    }
}

/// Raised when a character is requested past the end of the input.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StreamError {
    #[error("unexpected end of input at {position}")]
    EndOfInput { position: Position },
}

/// Cursor over the input with a stack of saved positions for backtracking.
#[derive(Debug, Clone)]
pub struct CharacterStream {
    chars: Vec<char>,
    offset: usize,
    checkpoints: Vec<usize>,
    trimmed_len: usize,
}

impl CharacterStream {
    pub fn new(text: &str) -> CharacterStream {
        return CharacterStream {
            chars: text.chars().collect(),
            offset: 0,
            checkpoints: Vec::new(),
            trimmed_len: text.trim().chars().count(),
        };
    }

    /// Returns the current character without moving.
    pub fn peek(&self) -> Result<char, StreamError> {
        return self
            .chars
            .get(self.offset)
            .copied()
            .ok_or_else(|| StreamError::EndOfInput {
                position: self.position(),
            });
    }

    /// Returns the current character and moves one position forward.
    pub fn advance_and_return(&mut self) -> Result<char, StreamError> {
        let current = self.peek()?;
        self.offset += 1;
        return Ok(current);
    }

    /// Moves one position forward without reading.
    pub fn advance(&mut self) {
        self.offset += 1;
    }

    /// Moves one position back. Callers only retreat over characters they
    /// have already read.
    pub fn retreat(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn push_checkpoint(&mut self) {
        self.checkpoints.push(self.offset);
    }

    /// Restores the most recently saved position. Does nothing when no
    /// checkpoint is saved.
    pub fn pop_checkpoint(&mut self) {
        if let Some(saved_offset) = self.checkpoints.pop() {
            self.offset = saved_offset;
        }
    }

    /// True once the offset reaches the length of the whitespace-trimmed
    /// input. The comparison is against the trimmed length, not against the
    /// remaining suffix, so leading whitespace shifts the cut-off.
    pub fn is_exhausted(&self) -> bool {
        return self.offset >= self.trimmed_len;
    }

    pub fn offset(&self) -> usize {
        return self.offset;
    }

    pub fn position(&self) -> Position {
        return Position::locate(&self.chars, self.offset);
    }

    pub fn position_at(&self, offset: usize) -> Position {
        return Position::locate(&self.chars, offset);
    }
}
