//! Stream-level invariants and edge cases for the lexer.

use proptest::prelude::*;
use proxc_util::Handler;

use crate::{Lexer, Token, TokenKind};

/// Tokenize a full source string, including the final EOF token.
fn tokenize(source: &str) -> Vec<Token> {
    let handler = Handler::new();
    let mut lexer = Lexer::with_dummy_file(source, &handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

#[test]
fn stream_ends_with_exactly_one_eof() {
    for source in ["", "int x;", "/* comment */", "a + b * c", "\"str\" 'c'"] {
        let tokens = tokenize(source);
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1, "source {:?}", source);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }
}

#[test]
fn positions_are_monotonically_non_decreasing() {
    let source = "int main() {\n  return 1 + 2;\n}\n";
    let tokens = tokenize(source);

    let mut prev = (0u32, 0u32);
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        let pos = (token.span.line, token.span.column);
        assert!(pos >= prev, "token {:?} went backwards", token.text);
        prev = pos;
    }
}

#[test]
fn lexing_twice_yields_identical_streams() {
    let source = "process worker(int n) { while (n) { yield; n = n - 1; } }";
    assert_eq!(tokenize(source), tokenize(source));
}

#[test]
fn mixed_literals_and_operators() {
    let tokens = tokenize("x <<= 0xFF + .5;");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::ShlAssign,
            TokenKind::Number,
            TokenKind::Plus,
            TokenKind::Float,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn error_tokens_do_not_stop_the_stream() {
    let tokens = tokenize("a @ b");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::Error,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

proptest! {
    /// The lexer terminates on arbitrary input and always produces exactly
    /// one trailing EOF.
    #[test]
    fn arbitrary_input_terminates(source in ".{0,200}") {
        let tokens = tokenize(&source);
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        prop_assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1
        );
    }

    /// Lexing is deterministic: the same source yields the same stream.
    #[test]
    fn arbitrary_input_idempotent(source in "[ -~\n\t]{0,120}") {
        prop_assert_eq!(tokenize(&source), tokenize(&source));
    }

    /// Non-EOF token positions never go backwards.
    #[test]
    fn arbitrary_input_positions_monotone(source in "[ -~\n]{0,120}") {
        let tokens = tokenize(&source);
        let mut prev = (0u32, 0u32);
        for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            let pos = (token.span.line, token.span.column);
            prop_assert!(pos >= prev);
            prev = pos;
        }
    }
}
