//! String and character literal lexing.

use crate::token::{LiteralValue, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lex a string literal. The resulting token's text is the processed
    /// content with escapes resolved. A newline before the closing quote is
    /// an error.
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("Unterminated string literal".to_string());
                return self.make_token_with_text(TokenKind::Error, content);
            }

            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                },
                '\n' => {
                    self.report_error("Unterminated string literal".to_string());
                    return self.make_token_with_text(TokenKind::Error, content);
                },
                '\\' => {
                    content.push(self.read_escape_char());
                },
                c => {
                    content.push(c);
                    self.cursor.advance();
                },
            }
        }

        self.make_token_with_text(TokenKind::Str, content)
    }

    /// Lex a character literal: one character or escape between single
    /// quotes. A missing closing quote is an error.
    pub(crate) fn lex_char(&mut self) -> Token {
        self.cursor.advance();

        if self.cursor.is_at_end() {
            self.report_error("Unterminated character literal".to_string());
            return self.make_token_with_text(TokenKind::Error, "");
        }

        let value = if self.cursor.current_char() == '\\' {
            self.read_escape_char()
        } else {
            let c = self.cursor.current_char();
            self.cursor.advance();
            c
        };

        if self.cursor.current_char() != '\'' {
            self.report_error("Unterminated character literal".to_string());
            return self.make_token_with_text(TokenKind::Error, value.to_string());
        }
        self.cursor.advance();

        self.make_token_with_text(TokenKind::Char, value.to_string())
            .with_value(LiteralValue::Char(value))
    }

    /// Consume a backslash escape and return the character it denotes.
    /// Unknown escapes yield the escaped character itself.
    fn read_escape_char(&mut self) -> char {
        self.cursor.advance(); // backslash
        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'x' => {
                let mut value: u32 = 0;
                for _ in 0..2 {
                    let d = self.cursor.current_char();
                    if let Some(digit) = d.to_digit(16) {
                        value = value * 16 + digit;
                        self.cursor.advance();
                    } else {
                        break;
                    }
                }
                char::from_u32(value).unwrap_or('\0')
            },
            _ => c,
        }
    }
}
