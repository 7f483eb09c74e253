//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lex an identifier: `[A-Za-z_][A-Za-z0-9_]*`. If the captured text
    /// matches a reserved keyword, the token carries the keyword kind.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        loop {
            let c = self.cursor.current_char();
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        match keyword_from_ident(text) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(crate::TokenKind::Ident),
        }
    }
}
