use crate::commands::error::{ParseError, ParseResult};

/// A saved position of a [`TokenCursor`]. Restoring it puts the cursor back
/// exactly where [`TokenCursor::snapshot`] observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    index: usize,
    offset: usize,
}

/// A repositionable view over the argument part of a command line.
///
/// Tokens are whitespace delimited. A token starting with `"` runs to the
/// matching unescaped `"` (or the end of input) and may contain whitespace;
/// inside quotes `\"` and `\\` are escapes.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    raw: &'a str,
    index: usize,
    offset: usize,
    completing: bool,
}

struct RawToken {
    text: String,
    start: usize,
    end: usize,
}

fn read_token(raw: &str, offset: usize) -> Option<RawToken> {
    let rest = &raw[offset..];
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let start = offset + (rest.len() - trimmed.len());

    if let Some(quoted) = trimmed.strip_prefix('"') {
        let mut text = String::new();
        let mut escaped = false;
        for (i, c) in quoted.char_indices() {
            if escaped {
                if c != '"' && c != '\\' {
                    text.push('\\');
                }
                text.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                // +1 for the opening quote, +1 for the closing one
                return Some(RawToken {
                    text,
                    start,
                    end: start + i + 2,
                });
            } else {
                text.push(c);
            }
        }
        if escaped {
            text.push('\\');
        }
        return Some(RawToken {
            text,
            start,
            end: raw.len(),
        });
    }

    let len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    Some(RawToken {
        text: trimmed[..len].to_string(),
        start,
        end: start + len,
    })
}

impl<'a> TokenCursor<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            index: 0,
            offset: 0,
            completing: false,
        }
    }

    /// A cursor over a line that is still being typed. A trailing empty
    /// token under completion counts towards [`TokenCursor::token_count`].
    pub fn for_completion(raw: &'a str) -> Self {
        Self {
            completing: true,
            ..Self::new(raw)
        }
    }

    /// Returns the next token and advances past it.
    pub fn next(&mut self) -> ParseResult<String> {
        let token = read_token(self.raw, self.offset).ok_or(ParseError::NoMoreTokens)?;
        self.offset = token.end;
        self.index += 1;
        Ok(token.text)
    }

    /// Returns the next token without moving.
    pub fn peek(&self) -> ParseResult<String> {
        read_token(self.raw, self.offset)
            .map(|token| token.text)
            .ok_or(ParseError::NoMoreTokens)
    }

    pub fn has_next(&self) -> bool {
        !self.remaining_raw().trim_start().is_empty()
    }

    pub fn snapshot(&self) -> CursorState {
        CursorState {
            index: self.index,
            offset: self.offset,
        }
    }

    pub fn restore(&mut self, state: CursorState) {
        self.index = state.index;
        self.offset = state.offset;
    }

    /// The untouched tail of the input, leading whitespace included.
    pub fn remaining_raw(&self) -> &'a str {
        &self.raw[self.offset..]
    }

    /// Consumes everything that is left as one value.
    pub fn take_rest(&mut self) -> ParseResult<String> {
        let rest = self.remaining_raw().trim_start();
        if rest.is_empty() {
            return Err(ParseError::NoMoreTokens);
        }
        let rest = rest.to_string();
        while self.next().is_ok() {}
        Ok(rest)
    }

    /// Number of tokens consumed so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of tokens in the whole line, consumed or not.
    pub fn token_count(&self) -> usize {
        let mut probe = self.clone();
        while probe.next().is_ok() {}
        if self.pending_token() {
            probe.index + 1
        } else {
            probe.index
        }
    }

    /// Raw offset at which the next token starts, or the input length when
    /// nothing is left.
    pub fn next_token_start(&self) -> usize {
        read_token(self.raw, self.offset).map_or(self.raw.len(), |token| token.start)
    }

    /// Whether the line ends in whitespace while completing, so an empty
    /// token after the last one is the one being typed.
    fn pending_token(&self) -> bool {
        self.completing && self.completion_offset() == self.raw.len()
    }

    /// Moves onto the token being completed. That is the last token, or past
    /// every token when an empty one is pending.
    pub fn seek_last(&mut self) {
        if self.pending_token() {
            while self.next().is_ok() {}
            return;
        }
        loop {
            let state = self.snapshot();
            if self.next().is_err() {
                return;
            }
            if !self.has_next() {
                self.restore(state);
                return;
            }
        }
    }

    /// Raw offset where the token being completed starts. When the line ends
    /// in whitespace a new, empty token is being started at the very end.
    pub fn completion_offset(&self) -> usize {
        let mut offset = 0;
        let mut last = None;
        while let Some(token) = read_token(self.raw, offset) {
            offset = token.end;
            last = Some(token);
        }
        match last {
            Some(token) if token.end == self.raw.len() => token.start,
            _ => self.raw.len(),
        }
    }
}
