//! Statement parsing.

use proxc_lex::TokenKind;

use crate::ast::{Node, NodeKind};
use crate::Parser;

impl<'a> Parser<'a> {
    /// statement := block | if | while | do_while | for | return | break
    ///            | continue | process_stmt | expr_stmt
    pub fn parse_statement(&mut self) -> Option<Node> {
        if self.check(TokenKind::LBrace) {
            return self.parse_block();
        }

        if self.match_token(TokenKind::If) {
            return self.parse_if_statement();
        }
        if self.match_token(TokenKind::While) {
            return self.parse_while_statement();
        }
        if self.match_token(TokenKind::Do) {
            return self.parse_do_while_statement();
        }
        if self.match_token(TokenKind::For) {
            return self.parse_for_statement();
        }
        if self.match_token(TokenKind::Return) {
            return self.parse_return_statement();
        }
        if self.match_token(TokenKind::Break) {
            let node = Node::new(NodeKind::Break, self.previous().span);
            self.consume(TokenKind::Semicolon, "Expected ';' after break");
            return Some(node);
        }
        if self.match_token(TokenKind::Continue) {
            let node = Node::new(NodeKind::Continue, self.previous().span);
            self.consume(TokenKind::Semicolon, "Expected ';' after continue");
            return Some(node);
        }

        // Process and semaphore primitives are statements of their own.
        if self.match_token(TokenKind::Create) {
            return self.parse_create_statement();
        }
        if self.match_token(TokenKind::Resume) {
            return self.parse_primitive_statement(NodeKind::Resume, "resume");
        }
        if self.match_token(TokenKind::Suspend) {
            return self.parse_primitive_statement(NodeKind::Suspend, "suspend");
        }
        if self.match_token(TokenKind::Kill) {
            return self.parse_primitive_statement(NodeKind::Kill, "kill");
        }
        if self.match_token(TokenKind::Sleep) {
            return self.parse_primitive_statement(NodeKind::Sleep, "sleep");
        }
        if self.match_token(TokenKind::Wait) {
            return self.parse_primitive_statement(NodeKind::Wait, "wait");
        }
        if self.match_token(TokenKind::Signal) {
            return self.parse_primitive_statement(NodeKind::Signal, "signal");
        }
        if self.match_token(TokenKind::Yield) {
            let node = Node::new(NodeKind::Yield, self.previous().span);
            self.consume(TokenKind::Semicolon, "Expected ';' after yield");
            return Some(node);
        }

        let mut node = Node::new(NodeKind::ExprStmt, self.current().span);
        node.left = Some(Box::new(self.parse_expression()?));
        self.consume(TokenKind::Semicolon, "Expected ';' after expression");
        Some(node)
    }

    /// block := '{' statement* '}'
    pub fn parse_block(&mut self) -> Option<Node> {
        let mut block = Node::new(NodeKind::Block, self.current().span);

        self.consume(TokenKind::LBrace, "Expected '{'");

        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let before = self.consumed_count();

            if let Some(stmt) = self.parse_statement() {
                block.add_child(stmt);
            }

            if self.in_panic_mode() {
                self.synchronize();
            }

            if self.consumed_count() == before
                && !self.check(TokenKind::RBrace)
                && !self.check(TokenKind::Eof)
            {
                self.advance();
            }
        }

        self.consume(TokenKind::RBrace, "Expected '}'");

        Some(block)
    }

    /// if := 'if' '(' expression ')' statement ('else' statement)?
    ///
    /// Condition in `left`, then-branch in `right`, else-branch in `extra`.
    fn parse_if_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::If, self.previous().span);

        self.consume(TokenKind::LParen, "Expected '(' after 'if'");
        node.left = Some(Box::new(self.parse_expression()?));
        self.consume(TokenKind::RParen, "Expected ')' after condition");

        node.right = Some(Box::new(self.parse_statement()?));

        if self.match_token(TokenKind::Else) {
            node.extra = Some(Box::new(self.parse_statement()?));
        }

        Some(node)
    }

    /// while := 'while' '(' expression ')' statement
    fn parse_while_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::While, self.previous().span);

        self.consume(TokenKind::LParen, "Expected '(' after 'while'");
        node.left = Some(Box::new(self.parse_expression()?));
        self.consume(TokenKind::RParen, "Expected ')' after condition");

        node.right = Some(Box::new(self.parse_statement()?));

        Some(node)
    }

    /// do_while := 'do' statement 'while' '(' expression ')' ';'
    ///
    /// Slots are reversed relative to `while`: body in `left`, condition
    /// in `right`.
    fn parse_do_while_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::DoWhile, self.previous().span);

        node.left = Some(Box::new(self.parse_statement()?));

        self.consume(TokenKind::While, "Expected 'while' after do body");
        self.consume(TokenKind::LParen, "Expected '(' after 'while'");
        node.right = Some(Box::new(self.parse_expression()?));
        self.consume(TokenKind::RParen, "Expected ')' after condition");
        self.consume(TokenKind::Semicolon, "Expected ';' after do-while");

        Some(node)
    }

    /// for := 'for' '(' expr? ';' expr? ';' expr? ')' statement
    ///
    /// Init/cond/step in `left`/`right`/`extra`; the body is appended as
    /// the first list child.
    fn parse_for_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::For, self.previous().span);

        self.consume(TokenKind::LParen, "Expected '(' after 'for'");

        if !self.match_token(TokenKind::Semicolon) {
            node.left = Some(Box::new(self.parse_expression()?));
            self.consume(TokenKind::Semicolon, "Expected ';' after for init");
        }

        if !self.match_token(TokenKind::Semicolon) {
            node.right = Some(Box::new(self.parse_expression()?));
            self.consume(TokenKind::Semicolon, "Expected ';' after for condition");
        }

        if !self.check(TokenKind::RParen) {
            node.extra = Some(Box::new(self.parse_expression()?));
        }

        self.consume(TokenKind::RParen, "Expected ')' after for clauses");

        let body = self.parse_statement()?;
        node.add_child(body);

        Some(node)
    }

    /// return := 'return' expression? ';'
    fn parse_return_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::Return, self.previous().span);

        if !self.check(TokenKind::Semicolon) {
            node.left = Some(Box::new(self.parse_expression()?));
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after return");

        Some(node)
    }

    /// create := 'create' '(' (assignment (',' assignment)*)? ')' ';'
    ///
    /// All arguments are kept in the child list, in source order.
    fn parse_create_statement(&mut self) -> Option<Node> {
        let mut node = Node::new(NodeKind::Create, self.previous().span);

        self.consume(TokenKind::LParen, "Expected '(' after 'create'");
        if !self.check(TokenKind::RParen) {
            loop {
                let arg = self.parse_assignment_expression()?;
                node.add_child(arg);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "Expected ')' after create arguments");
        self.consume(TokenKind::Semicolon, "Expected ';' after create");

        Some(node)
    }

    /// Single-argument process primitive: `name ( expression ) ;`
    fn parse_primitive_statement(&mut self, kind: NodeKind, name: &str) -> Option<Node> {
        let mut node = Node::new(kind, self.previous().span);

        self.consume(
            TokenKind::LParen,
            &format!("Expected '(' after '{}'", name),
        );
        node.left = Some(Box::new(self.parse_expression()?));
        self.consume(
            TokenKind::RParen,
            &format!("Expected ')' after '{}' argument", name),
        );
        self.consume(TokenKind::Semicolon, &format!("Expected ';' after '{}'", name));

        Some(node)
    }
}
