use text_size::{TextRange, TextSize};
use verdant_parse::SourceChar;

pub(crate) const EOF_CHAR: char = '\0';

/// Character cursor over the included part of the input.
///
/// Within a token, the end of an included range reads as end of input.
#[derive(Clone)]
pub(crate) struct Cursor<'s> {
    chars: &'s [SourceChar],
    index: usize,
    token_start: usize,
    end_of_input: u32,
}

impl<'s> Cursor<'s> {
    pub(crate) fn new(chars: &'s [SourceChar], end_of_input: u32) -> Self {
        Self { chars, index: 0, token_start: 0, end_of_input }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index.min(self.chars.len());
        self.token_start = self.index;
    }

    pub(crate) fn start_token(&mut self) {
        self.token_start = self.index;
    }

    fn char_at(&self, index: usize) -> Option<char> {
        let ch = self.chars.get(index)?;
        let same_range =
            index == self.token_start || ch.range == self.chars[self.token_start].range;
        same_range.then_some(ch.ch)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.char_at(self.index).is_none()
    }

    pub(crate) fn peek(&self) -> char {
        self.char_at(self.index).unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance(&mut self) -> char {
        match self.char_at(self.index) {
            Some(ch) => {
                self.index += 1;
                ch
            }
            None => EOF_CHAR,
        }
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool) {
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
    }

    /// Skips whitespace, crossing range boundaries.
    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(ch) = self.chars.get(self.index)
            && ch.ch.is_whitespace()
        {
            self.index += 1;
        }
    }

    pub(crate) fn token_len(&self) -> usize {
        self.index - self.token_start
    }

    pub(crate) fn token_chars(&self) -> impl Iterator<Item = char> + use<'s> {
        self.chars[self.token_start..self.index].iter().map(|ch| ch.ch)
    }

    pub(crate) fn token_range(&self) -> TextRange {
        let start = self.chars.get(self.token_start).map_or(self.end_of_input, |ch| ch.byte);
        let end =
            if self.index > self.token_start { self.chars[self.index - 1].end() } else { start };
        TextRange::new(TextSize::new(start), TextSize::new(end))
    }

    /// Bytes of the next character, which decided where the token ended.
    pub(crate) fn lookahead(&self) -> u32 {
        self.chars.get(self.index).map_or(0, |ch| u32::from(ch.len))
    }
}
