//! Whitespace and comment skipping.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skip whitespace, line comments, and block comments. Called before
    /// lexing each token.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                },
                '/' => {
                    let next = self.cursor.peek_char(1);
                    if next == '/' {
                        self.skip_line_comment();
                    } else if next == '*' {
                        self.skip_block_comment();
                    } else {
                        return;
                    }
                },
                _ => return,
            }
        }
    }

    /// Skip a `//` comment up to (not including) the newline.
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skip a `/* ... */` comment. Block comments do not nest. Reaching end
    /// of input before `*/` is a lexical error.
    fn skip_block_comment(&mut self) {
        self.token_start = self.cursor.position();
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }

        self.report_error("Unterminated block comment".to_string());
    }
}
