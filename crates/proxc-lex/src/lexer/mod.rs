//! Lexer implementation, split into focused components:
//! - `core` - the `Lexer` struct, stream interface, and dispatch
//! - `comment` - whitespace and comment skipping
//! - `identifier` - identifier and keyword lexing
//! - `number` - numeric literal lexing
//! - `string` - string and character literal lexing
//! - `operator` - operator and punctuation lexing

mod comment;
mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use self::core::Lexer;
