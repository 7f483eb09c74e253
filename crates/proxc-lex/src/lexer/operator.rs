//! Operator and punctuation lexing.
//!
//! All operators use maximal munch: `<<=` is one token, not `<<` `=` or
//! `<` `<=`.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Dispatch on an operator or punctuation character. `c` is the
    /// current (not yet consumed) character.
    pub(crate) fn lex_operator(&mut self, c: char) -> Token {
        match c {
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '^' => self.lex_caret(),
            '!' => self.lex_bang(),
            '=' => self.lex_equals(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '~' => self.single(TokenKind::Tilde),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '?' => self.single(TokenKind::Question),
            _ => {
                self.cursor.advance();
                self.report_error(format!("Unexpected character: '{}'", c));
                self.make_token(TokenKind::Error)
            },
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind)
    }

    /// `+`, `++`, `+=`
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            self.make_token(TokenKind::PlusPlus)
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::PlusAssign)
        } else {
            self.make_token(TokenKind::Plus)
        }
    }

    /// `-`, `--`, `-=`, `->`
    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            self.make_token(TokenKind::MinusMinus)
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::MinusAssign)
        } else if self.cursor.match_char('>') {
            self.make_token(TokenKind::Arrow)
        } else {
            self.make_token(TokenKind::Minus)
        }
    }

    /// `*`, `*=`
    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::StarAssign)
        } else {
            self.make_token(TokenKind::Star)
        }
    }

    /// `/`, `/=` (comments were skipped before dispatch)
    fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::SlashAssign)
        } else {
            self.make_token(TokenKind::Slash)
        }
    }

    /// `%`, `%=`
    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::PercentAssign)
        } else {
            self.make_token(TokenKind::Percent)
        }
    }

    /// `&`, `&&`, `&=`
    fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.make_token(TokenKind::AndAnd)
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::AmpAssign)
        } else {
            self.make_token(TokenKind::Amp)
        }
    }

    /// `|`, `||`, `|=`
    fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            self.make_token(TokenKind::OrOr)
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::PipeAssign)
        } else {
            self.make_token(TokenKind::Pipe)
        }
    }

    /// `^`, `^=`
    fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::CaretAssign)
        } else {
            self.make_token(TokenKind::Caret)
        }
    }

    /// `!`, `!=`
    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::NotEq)
        } else {
            self.make_token(TokenKind::Bang)
        }
    }

    /// `=`, `==`
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::EqEq)
        } else {
            self.make_token(TokenKind::Assign)
        }
    }

    /// `<`, `<=`, `<<`, `<<=`
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::LtEq)
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::ShlAssign)
            } else {
                self.make_token(TokenKind::Shl)
            }
        } else {
            self.make_token(TokenKind::Lt)
        }
    }

    /// `>`, `>=`, `>>`, `>>=`
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::GtEq)
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                self.make_token(TokenKind::ShrAssign)
            } else {
                self.make_token(TokenKind::Shr)
            }
        } else {
            self.make_token(TokenKind::Gt)
        }
    }
}
