//! proxc-lex - Lexical analyzer for the ProxC language.
//!
//! The lexer turns a read-only source buffer into a restartable stream of
//! positioned [`Token`]s, on demand. The stream ends with an EOF token,
//! which is emitted repeatedly on further calls.
//!
//! The public surface is deliberately small:
//! - [`Lexer::next`] consumes and returns the next token
//! - [`Lexer::peek`] looks at the next token without consuming it
//! - [`Lexer::unget`] pushes back one token
//!
//! Malformed input produces an `Error` token and records a diagnostic; the
//! lexer never panics on user input.

pub mod cursor;
mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, LiteralValue, Token, TokenKind};

#[cfg(test)]
mod edge_cases;
