//! Numeric literal lexing.
//!
//! Integers come in decimal, hex (`0x`), binary (`0b`), and octal (leading
//! `0`) forms. A literal is a float if it contains a decimal point or an
//! exponent. Trailing `u`/`U`/`l`/`L`/`f`/`F` suffix characters are consumed
//! and discarded; they are not part of the token text.

use crate::token::{LiteralValue, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_number(&mut self) -> Token {
        let mut is_float = false;
        let mut is_hex = false;
        let mut is_binary = false;
        let mut is_octal = false;

        if self.cursor.current_char() == '0' {
            self.cursor.advance();
            match self.cursor.current_char() {
                'x' | 'X' => {
                    is_hex = true;
                    self.cursor.advance();
                },
                'b' | 'B' => {
                    is_binary = true;
                    self.cursor.advance();
                },
                c if c.is_ascii_digit() => {
                    is_octal = true;
                },
                _ => {},
            }
        }

        loop {
            let c = self.cursor.current_char();

            if is_hex {
                if c.is_ascii_hexdigit() {
                    self.cursor.advance();
                } else {
                    break;
                }
            } else if is_binary {
                if c == '0' || c == '1' {
                    self.cursor.advance();
                } else {
                    break;
                }
            } else if c.is_ascii_digit() {
                self.cursor.advance();
            } else if c == '.' && !is_float && self.cursor.peek_char(1).is_ascii_digit() {
                is_float = true;
                self.cursor.advance();
            } else if c == 'e' || c == 'E' {
                is_float = true;
                self.cursor.advance();
                if self.cursor.current_char() == '+' || self.cursor.current_char() == '-' {
                    self.cursor.advance();
                }
            } else {
                break;
            }
        }

        // Token text excludes any suffix characters.
        let text = self.cursor.slice_from(self.token_start).to_string();

        while matches!(
            self.cursor.current_char(),
            'u' | 'U' | 'l' | 'L' | 'f' | 'F'
        ) {
            self.cursor.advance();
        }

        if is_float {
            let value = match text.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    self.report_error(format!("Invalid float literal '{}'", text));
                    0.0
                },
            };
            self.make_token_with_text(TokenKind::Float, text)
                .with_value(LiteralValue::Float(value))
        } else {
            let value = self.parse_int_value(&text, is_hex, is_binary, is_octal);
            self.make_token_with_text(TokenKind::Number, text)
                .with_value(LiteralValue::Int(value))
        }
    }

    fn parse_int_value(&mut self, text: &str, is_hex: bool, is_binary: bool, is_octal: bool) -> i64 {
        let parsed = if is_hex {
            let digits = &text[2..];
            if digits.is_empty() {
                Ok(0)
            } else {
                i64::from_str_radix(digits, 16)
            }
        } else if is_binary {
            let digits = &text[2..];
            if digits.is_empty() {
                Ok(0)
            } else {
                i64::from_str_radix(digits, 2)
            }
        } else if is_octal {
            i64::from_str_radix(text, 8)
        } else {
            text.parse::<i64>()
        };

        match parsed {
            Ok(v) => v,
            Err(_) => {
                self.report_error(format!("Integer literal '{}' out of range", text));
                0
            },
        }
    }
}
