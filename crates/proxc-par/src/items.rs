//! Top-level declaration parsing: type specifiers, functions, processes,
//! and variable declarations.

use proxc_lex::TokenKind;
use proxc_util::{Span, Symbol};

use crate::ast::{Node, NodeKind};
use crate::types::{qual, BaseType, TypeInfo};
use crate::Parser;

impl<'a> Parser<'a> {
    /// declaration := [static|extern] type_specifier '*'* IDENT
    ///                ( function_rest | var_rest )
    ///
    /// Whether the identifier introduces a function or a variable is
    /// decided by peeking at the token after the name: `(` means function.
    pub fn parse_declaration(&mut self) -> Option<Node> {
        // Storage classes are accepted and discarded; the back end has no
        // use for them.
        if !self.match_token(TokenKind::Static) {
            self.match_token(TokenKind::Extern);
        }

        let mut ty = self.parse_type_specifier();

        while self.match_token(TokenKind::Star) {
            ty = TypeInfo::pointer_to(ty);
        }

        if !self.consume(TokenKind::Ident, "Expected identifier") {
            return None;
        }
        let name = Symbol::intern(&self.previous().text);
        let name_span = self.previous().span;

        if self.check(TokenKind::LParen) {
            self.parse_function(ty, name, name_span)
        } else {
            self.parse_variable_declaration(ty, name, name_span)
        }
    }

    /// type_specifier := base (unsigned|signed)? const? volatile?
    ///
    /// On a missing specifier an error is recorded and `int` is assumed so
    /// parsing can continue.
    pub fn parse_type_specifier(&mut self) -> TypeInfo {
        let mut ty = if self.match_token(TokenKind::Void) {
            TypeInfo::new(BaseType::Void)
        } else if self.match_token(TokenKind::CharType) {
            TypeInfo::new(BaseType::Char)
        } else if self.match_token(TokenKind::Short) {
            TypeInfo::new(BaseType::Short)
        } else if self.match_token(TokenKind::Int) {
            TypeInfo::new(BaseType::Int)
        } else if self.match_token(TokenKind::Long) {
            TypeInfo::new(BaseType::Long)
        } else if self.match_token(TokenKind::FloatType) {
            TypeInfo::new(BaseType::Float)
        } else if self.match_token(TokenKind::Double) {
            TypeInfo::new(BaseType::Double)
        } else if self.match_token(TokenKind::Process) {
            TypeInfo::new(BaseType::Process)
        } else if self.match_token(TokenKind::Semaphore) {
            TypeInfo::new(BaseType::Semaphore)
        } else {
            self.error_at_current("Expected type specifier");
            return TypeInfo::new(BaseType::Int);
        };

        if self.match_token(TokenKind::Unsigned) {
            ty.qualifiers |= qual::UNSIGNED;
        } else if self.match_token(TokenKind::Signed) {
            ty.qualifiers |= qual::SIGNED;
        }

        if self.match_token(TokenKind::Const) {
            ty.qualifiers |= qual::CONST;
        }
        if self.match_token(TokenKind::Volatile) {
            ty.qualifiers |= qual::VOLATILE;
        }

        ty
    }

    /// function_rest := '(' params? ')' ( block | ';' )
    ///
    /// A `process` return type makes the node a PROCESS; parameters live in
    /// the child list, the body (if any) in `left`.
    fn parse_function(
        &mut self,
        return_type: TypeInfo,
        name: Symbol,
        span: Span,
    ) -> Option<Node> {
        let kind = if return_type.base == BaseType::Process {
            NodeKind::Process
        } else {
            NodeKind::Function
        };

        let mut node = Node::new(kind, span);
        node.name = Some(name);
        node.ty = Some(return_type);

        self.consume(TokenKind::LParen, "Expected '(' after function name");

        if !self.check(TokenKind::RParen) {
            loop {
                let param_ty = self.parse_type_specifier();
                let mut param = Node::new(NodeKind::Param, self.current().span);
                param.ty = Some(param_ty);

                if self.check(TokenKind::Ident) {
                    param.name = Some(Symbol::intern(&self.current().text));
                    self.advance();
                }

                node.add_child(param);

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RParen, "Expected ')' after parameters");

        if self.check(TokenKind::LBrace) {
            node.left = Some(Box::new(self.parse_block()?));
        } else {
            // Forward declaration.
            self.consume(TokenKind::Semicolon, "Expected ';' or function body");
        }

        Some(node)
    }

    /// var_rest := ('[' NUMBER? ']')* ('=' assignment)? ';'
    fn parse_variable_declaration(
        &mut self,
        base_ty: TypeInfo,
        name: Symbol,
        span: Span,
    ) -> Option<Node> {
        let mut ty = base_ty;
        let mut node = Node::new(NodeKind::VarDecl, span);
        node.name = Some(name);

        while self.match_token(TokenKind::LBracket) {
            if self.check(TokenKind::Number) {
                let size = self.current().int_value();
                self.advance();
                ty = TypeInfo::array_of(ty, size);
            } else {
                // Unknown size.
                ty = TypeInfo::array_of(ty, 0);
            }
            self.consume(TokenKind::RBracket, "Expected ']'");
        }

        node.ty = Some(ty);

        if self.match_token(TokenKind::Assign) {
            node.left = Some(Box::new(self.parse_assignment_expression()?));
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after declaration");

        Some(node)
    }
}
