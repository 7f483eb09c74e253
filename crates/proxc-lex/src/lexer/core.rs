//! Core lexer: token stream interface and character dispatch.

use proxc_util::{FileId, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for ProxC source code.
///
/// The lexer is stateful: it tracks the current offset, a one-token peek
/// buffer, and a one-token push-back buffer. Tokens are produced on demand;
/// after the end of input is reached, every further call returns an EOF
/// token.
pub struct Lexer<'a> {
    /// Character cursor over the source buffer.
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors.
    handler: &'a Handler,

    /// File the source buffer was read from.
    file_id: FileId,

    /// Byte offset where the current token started.
    pub(crate) token_start: usize,

    /// Line where the current token started (1-based).
    token_start_line: u32,

    /// Column where the current token started (1-based).
    token_start_column: u32,

    /// One-token lookahead filled by `peek`.
    peeked: Option<Token>,

    /// One-token push-back buffer filled by `unget`.
    pushed_back: Option<Token>,

    /// Whether any lexical error was reported.
    had_error: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            file_id,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            peeked: None,
            pushed_back: None,
            had_error: false,
        }
    }

    /// Consume and return the next token.
    ///
    /// A pushed-back token is returned first, then a previously peeked
    /// token, then a freshly scanned one.
    pub fn next(&mut self) -> Token {
        if let Some(token) = self.pushed_back.take() {
            return token;
        }
        if let Some(token) = self.peeked.take() {
            return token;
        }
        self.scan_token()
    }

    /// Return the next token without consuming it. Successive `peek`s
    /// return the same token; the following `next` returns it.
    pub fn peek(&mut self) -> Token {
        if let Some(token) = &self.pushed_back {
            return token.clone();
        }
        if self.peeked.is_none() {
            self.peeked = Some(self.scan_token());
        }
        self.peeked.clone().unwrap()
    }

    /// Push back one token; the next `next` returns it before reading
    /// further. At most one token may be pushed back at a time.
    pub fn unget(&mut self, token: Token) {
        debug_assert!(self.pushed_back.is_none(), "double unget");
        self.pushed_back = Some(token);
    }

    /// Whether any lexical error has been reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// Report a lexical error spanning the current token.
    pub(crate) fn report_error(&mut self, message: String) {
        self.had_error = true;
        self.handler.error(message, self.token_span());
    }

    /// Span from the start of the current token to the cursor.
    pub(crate) fn token_span(&self) -> Span {
        Span::with_file(
            self.token_start,
            self.cursor.position(),
            self.file_id,
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Build a token whose text is the captured source slice.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.cursor.slice_from(self.token_start), self.token_span())
    }

    /// Build a token with explicit text (strings, error tokens).
    pub(crate) fn make_token_with_text(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(kind, text, self.token_span())
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make_token_with_text(TokenKind::Eof, "");
        }

        let c = self.cursor.current_char();
        match c {
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            '.' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            _ => self.lex_operator(c),
        }
    }
}

/// Convenience constructor used by tests and one-shot token dumps.
impl<'a> Lexer<'a> {
    pub fn with_dummy_file(source: &'a str, handler: &'a Handler) -> Self {
        Self::new(source, FileId::DUMMY, handler)
    }
}
