//! proxc-par - Recursive-descent parser for the ProxC language.
//!
//! The parser pulls tokens from [`proxc_lex::Lexer`] on demand (one token
//! of lookahead, no backtracking) and builds an AST rooted at a `Program`
//! node containing the top-level declarations.
//!
//! Error handling is panic-mode recovery: the first error in a parsing
//! context records a message and suppresses further messages until the
//! parser synchronizes at the next statement or declaration boundary. The
//! `had_error` flag is the authoritative failure indicator.

pub mod ast;
mod expr;
mod items;
mod stmt;
pub mod types;

pub use ast::{Node, NodeKind, Value};
pub use types::{qual, BaseType, TypeInfo, MAX_ARRAY_DIMS};

use proxc_lex::{Lexer, Token, TokenKind};
use proxc_util::{Handler, Span};

/// Recursive-descent parser.
pub struct Parser<'a> {
    /// Token source.
    lexer: Lexer<'a>,

    /// Diagnostic sink.
    handler: &'a Handler,

    /// Current (not yet consumed) token.
    current: Token,

    /// Most recently consumed token.
    previous: Token,

    /// Whether any syntax error was recorded.
    had_error: bool,

    /// Whether error messages are currently suppressed.
    panic_mode: bool,

    /// Number of tokens consumed; used to guarantee forward progress
    /// during recovery.
    consumed: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>, handler: &'a Handler) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", Span::DUMMY);
        let mut parser = Self {
            lexer,
            handler,
            current: placeholder.clone(),
            previous: placeholder,
            had_error: false,
            panic_mode: false,
            consumed: 0,
        };
        parser.advance();
        parser
    }

    /// Parse a complete program.
    pub fn parse(&mut self) -> Node {
        self.parse_program()
    }

    /// program := declaration* EOF
    pub fn parse_program(&mut self) -> Node {
        let mut program = Node::new(NodeKind::Program, self.current.span);

        while !self.check(TokenKind::Eof) {
            let before = self.consumed;

            if let Some(decl) = self.parse_declaration() {
                program.add_child(decl);
            }

            if self.panic_mode {
                self.synchronize();
            }

            // A declaration that consumed nothing would loop forever; skip
            // the offending token.
            if self.consumed == before && !self.check(TokenKind::Eof) {
                self.advance();
            }
        }

        program
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub(crate) fn in_panic_mode(&self) -> bool {
        self.panic_mode
    }

    pub(crate) fn consumed_count(&self) -> usize {
        self.consumed
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    /// Consume the current token. Error tokens from the lexer are skipped
    /// here; the lexer has already reported them.
    pub(crate) fn advance(&mut self) {
        let next = loop {
            let token = self.lexer.next();
            self.consumed += 1;
            if token.kind != TokenKind::Error {
                break token;
            }
            self.had_error = true;
        };
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    /// Consume a token of the given kind or record an error.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.current.kind == kind {
            self.advance();
            return true;
        }
        self.error_at_current(message);
        false
    }

    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.previous
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    /// Record an error at the current token.
    pub(crate) fn error_at_current(&mut self, message: &str) {
        let token = self.current.clone();
        self.error_at(&token, message);
    }

    /// Record an error at `token`, unless already panicking.
    pub(crate) fn error_at(&mut self, token: &Token, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let shown = if token.kind == TokenKind::Eof {
            "end of file"
        } else {
            &token.text
        };
        self.handler
            .error(format!("{} at '{}'", message, shown), token.span);
    }

    /// Skip tokens until a statement or declaration boundary, then clear
    /// panic mode: stop after a `;` or in front of a token that can start
    /// a fresh statement or declaration.
    pub(crate) fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.check(TokenKind::Eof) {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }

            match self.current.kind {
                TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Int
                | TokenKind::Void
                | TokenKind::CharType
                | TokenKind::FloatType => return,
                _ => self.advance(),
            }
        }
    }
}

#[cfg(test)]
mod edge_cases;

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use proxc_util::FileId;

    /// Parse a full program, returning the root and whether errors were
    /// recorded.
    pub fn parse_source(source: &str) -> (Node, bool, Handler) {
        let handler = Handler::new();
        let ast;
        let had_error;
        {
            let lexer = Lexer::new(source, FileId::DUMMY, &handler);
            let mut parser = Parser::new(lexer, &handler);
            ast = parser.parse();
            had_error = parser.had_error();
        }
        (ast, had_error, handler)
    }

    /// Parse a single expression (used by the expression tests).
    pub fn parse_expr_source(source: &str) -> (Option<Node>, bool) {
        let handler = Handler::new();
        let lexer = Lexer::new(source, FileId::DUMMY, &handler);
        let mut parser = Parser::new(lexer, &handler);
        let expr = parser.parse_expression();
        (expr, parser.had_error())
    }

    /// Parse a single statement.
    pub fn parse_stmt_source(source: &str) -> (Option<Node>, bool) {
        let handler = Handler::new();
        let lexer = Lexer::new(source, FileId::DUMMY, &handler);
        let mut parser = Parser::new(lexer, &handler);
        let stmt = parser.parse_statement();
        (stmt, parser.had_error())
    }
}
