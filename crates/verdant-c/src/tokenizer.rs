mod cursor;

use cursor::Cursor;
use text_size::TextRange;
use verdant_parse::SourceText;
use verdant_syntax::Symbol;

use crate::kinds::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: Symbol,
    pub(crate) range: TextRange,
    pub(crate) lookahead: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    String,
}

/// One-token-lookahead lexer. Whitespace is skipped; comments come out as
/// `COMMENT` tokens for the parser to attach as extras.
#[derive(Clone)]
pub(crate) struct Tokenizer<'s> {
    source: &'s SourceText<'s>,
    cursor: Cursor<'s>,
    mode: Mode,
    current: Token,
}

impl<'s> Tokenizer<'s> {
    pub(crate) fn new(source: &'s SourceText<'s>, byte: u32) -> Self {
        let end_of_input = source.end_of_input();
        let mut tokenizer = Self {
            source,
            cursor: Cursor::new(source.chars(), end_of_input),
            mode: Mode::Normal,
            current: Token {
                kind: EOF,
                range: TextRange::empty(end_of_input.into()),
                lookahead: 0,
            },
        };
        tokenizer.reset(byte);
        tokenizer
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.current
    }

    pub(crate) fn next_token(&mut self) -> Token {
        let next = self.lex();
        std::mem::replace(&mut self.current, next)
    }

    /// Restarts lexing in normal mode at the first character at or after `byte`.
    pub(crate) fn reset(&mut self, byte: u32) {
        self.cursor.set_index(self.source.char_index_at(byte));
        self.mode = Mode::Normal;
        self.current = self.lex();
    }

    fn lex(&mut self) -> Token {
        if self.mode == Mode::String
            && let Some(token) = self.string_token()
        {
            return token;
        }

        self.cursor.skip_whitespace();
        self.cursor.start_token();
        let kind = self.kind();
        self.token(kind)
    }

    fn token(&self, kind: Symbol) -> Token {
        Token { kind, range: self.cursor.token_range(), lookahead: self.cursor.lookahead() }
    }

    fn kind(&mut self) -> Symbol {
        if self.cursor.is_eof() {
            return EOF;
        }

        match self.cursor.advance() {
            ';' => SEMICOLON,
            '=' => EQ,
            ',' => COMMA,
            '(' => L_PAREN,
            ')' => R_PAREN,
            '{' => L_BRACE,
            '}' => R_BRACE,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '/' => match self.cursor.peek() {
                '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    COMMENT
                }
                '*' => {
                    self.block_comment();
                    COMMENT
                }
                _ => SLASH,
            },
            '"' => {
                self.mode = Mode::String;
                QUOTE
            }
            '0'..='9' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                NUMBER_LITERAL
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                self.keyword_or_identifier()
            }
            _ => UNKNOWN,
        }
    }

    fn block_comment(&mut self) {
        self.cursor.advance();
        while !self.cursor.is_eof() {
            if self.cursor.advance() == '*' && self.cursor.peek() == '/' {
                self.cursor.advance();
                break;
            }
        }
    }

    fn keyword_or_identifier(&self) -> Symbol {
        if self.cursor.token_len() > 8 {
            return IDENTIFIER;
        }

        let text: String = self.cursor.token_chars().collect();
        match text.as_str() {
            "return" => RETURN_KW,
            "int" | "char" | "float" | "double" | "void" | "long" | "short" | "unsigned" | "signed"
            | "bool" => PRIMITIVE_TYPE,
            _ => IDENTIFIER,
        }
    }

    /// Content or closing quote of a string literal. `None` once the line or
    /// input ends without one, which drops back to normal lexing.
    fn string_token(&mut self) -> Option<Token> {
        self.cursor.start_token();
        if self.cursor.is_eof() || self.cursor.peek() == '\n' {
            self.mode = Mode::Normal;
            return None;
        }

        if self.cursor.peek() == '"' {
            self.cursor.advance();
            self.mode = Mode::Normal;
            return Some(self.token(QUOTE));
        }

        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                '"' | '\n' => break,
                '\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() && self.cursor.peek() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        Some(self.token(STRING_CONTENT))
    }
}
