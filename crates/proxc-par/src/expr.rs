//! Expression parsing.
//!
//! The binary-operator levels of the grammar are flattened into a single
//! precedence climb driven by [`TokenKind::precedence`]; all binary
//! operators are left-associative. Assignment, the ternary conditional,
//! the comma operator, unary, and postfix forms keep their own routines.
//!
//! Precedence (higher binds tighter):
//!
//! | level | operators |
//! |-------|----------------|
//! | 10 | `*` `/` `%` |
//! | 9 | `+` `-` |
//! | 8 | `<<` `>>` |
//! | 7 | `<` `>` `<=` `>=` |
//! | 6 | `==` `!=` |
//! | 5 | `&` |
//! | 4 | `^` |
//! | 3 | `\|` |
//! | 2 | `&&` |
//! | 1 | `\|\|` |

use proxc_lex::TokenKind;
use proxc_util::Symbol;

use crate::ast::{Node, NodeKind, Value};
use crate::types::{BaseType, TypeInfo};
use crate::Parser;

impl<'a> Parser<'a> {
    /// expression := assignment (',' assignment)*
    pub fn parse_expression(&mut self) -> Option<Node> {
        let mut left = self.parse_assignment_expression()?;

        while self.match_token(TokenKind::Comma) {
            let span = self.previous().span;
            let right = self.parse_assignment_expression()?;
            let mut node = Node::new(NodeKind::Comma, span);
            node.left = Some(Box::new(left));
            node.right = Some(Box::new(right));
            left = node;
        }

        Some(left)
    }

    /// assignment := conditional ( assign_op assignment )?
    ///
    /// `=` produces an `Assign` node; the compound forms produce
    /// `CompoundAssign` with the operator spelling preserved.
    pub fn parse_assignment_expression(&mut self) -> Option<Node> {
        let left = self.parse_conditional_expression()?;

        if self.current().kind.is_assignment_op() {
            let is_plain = self.current().kind == TokenKind::Assign;
            self.advance();
            let op_token = self.previous().clone();

            let mut node = if is_plain {
                Node::new(NodeKind::Assign, op_token.span)
            } else {
                let mut node = Node::new(NodeKind::CompoundAssign, op_token.span);
                node.op = op_token.text;
                node
            };

            node.left = Some(Box::new(left));
            node.right = Some(Box::new(self.parse_assignment_expression()?));
            return Some(node);
        }

        Some(left)
    }

    /// conditional := binary ('?' expression ':' conditional)?
    pub fn parse_conditional_expression(&mut self) -> Option<Node> {
        let left = self.parse_binary_expression(1)?;

        if self.match_token(TokenKind::Question) {
            let mut node = Node::new(NodeKind::Ternary, self.previous().span);
            node.left = Some(Box::new(left));
            node.right = Some(Box::new(self.parse_expression()?));
            self.consume(TokenKind::Colon, "Expected ':' in ternary expression");
            node.extra = Some(Box::new(self.parse_conditional_expression()?));
            return Some(node);
        }

        Some(left)
    }

    /// Precedence climb over all binary operator levels. Only operators
    /// whose precedence is at least `min_prec` are consumed; the recursion
    /// with `prec + 1` makes every level left-associative.
    fn parse_binary_expression(&mut self, min_prec: u8) -> Option<Node> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let kind = self.current().kind;
            let prec = kind.precedence();
            if !kind.is_binary_op() || prec < min_prec {
                break;
            }

            self.advance();
            let op_token = self.previous().clone();
            let right = self.parse_binary_expression(prec + 1)?;

            let mut node = Node::new(NodeKind::BinaryOp, op_token.span);
            node.op = op_token.text;
            node.left = Some(Box::new(left));
            node.right = Some(Box::new(right));
            left = node;
        }

        Some(left)
    }

    /// unary := ('++'|'--'|'+'|'-'|'!'|'~'|'&'|'*'|'sizeof') unary | postfix
    pub fn parse_unary_expression(&mut self) -> Option<Node> {
        if self.match_token(TokenKind::PlusPlus) {
            let mut node = Node::new(NodeKind::PreInc, self.previous().span);
            node.left = Some(Box::new(self.parse_unary_expression()?));
            return Some(node);
        }

        if self.match_token(TokenKind::MinusMinus) {
            let mut node = Node::new(NodeKind::PreDec, self.previous().span);
            node.left = Some(Box::new(self.parse_unary_expression()?));
            return Some(node);
        }

        // Unary plus is a no-op.
        if self.match_token(TokenKind::Plus) {
            return self.parse_unary_expression();
        }

        if self.match_token(TokenKind::Minus) {
            return self.unary_op("-");
        }
        if self.match_token(TokenKind::Bang) {
            return self.unary_op("!");
        }
        if self.match_token(TokenKind::Tilde) {
            return self.unary_op("~");
        }

        if self.match_token(TokenKind::Amp) {
            let mut node = Node::new(NodeKind::AddressOf, self.previous().span);
            node.left = Some(Box::new(self.parse_unary_expression()?));
            return Some(node);
        }

        if self.match_token(TokenKind::Star) {
            let mut node = Node::new(NodeKind::Dereference, self.previous().span);
            node.left = Some(Box::new(self.parse_unary_expression()?));
            node.is_lvalue = true;
            return Some(node);
        }

        if self.match_token(TokenKind::Sizeof) {
            let mut node = Node::new(NodeKind::Sizeof, self.previous().span);
            if self.match_token(TokenKind::LParen) {
                node.left = Some(Box::new(self.parse_expression()?));
                self.consume(TokenKind::RParen, "Expected ')' after sizeof expression");
            } else {
                node.left = Some(Box::new(self.parse_unary_expression()?));
            }
            node.ty = Some(TypeInfo::new(BaseType::Int));
            return Some(node);
        }

        self.parse_postfix_expression()
    }

    fn unary_op(&mut self, op: &str) -> Option<Node> {
        let mut node = Node::new(NodeKind::UnaryOp, self.previous().span);
        node.op = op.to_string();
        node.left = Some(Box::new(self.parse_unary_expression()?));
        Some(node)
    }

    /// postfix := primary ( call | index | member | '++' | '--' )*
    pub fn parse_postfix_expression(&mut self) -> Option<Node> {
        let mut node = self.parse_primary_expression()?;

        loop {
            if self.match_token(TokenKind::LParen) {
                let mut call = Node::new(NodeKind::Call, self.previous().span);
                call.left = Some(Box::new(node));

                if !self.check(TokenKind::RParen) {
                    loop {
                        let arg = self.parse_assignment_expression()?;
                        call.add_child(arg);
                        if !self.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }

                self.consume(TokenKind::RParen, "Expected ')' after arguments");
                node = call;
            } else if self.match_token(TokenKind::LBracket) {
                let mut access = Node::new(NodeKind::ArrayAccess, self.previous().span);
                access.left = Some(Box::new(node));
                access.right = Some(Box::new(self.parse_expression()?));
                self.consume(TokenKind::RBracket, "Expected ']' after array index");
                access.is_lvalue = true;
                node = access;
            } else if self.match_token(TokenKind::Dot) {
                node = self.member_access(NodeKind::MemberAccess, node)?;
            } else if self.match_token(TokenKind::Arrow) {
                node = self.member_access(NodeKind::PtrMember, node)?;
            } else if self.match_token(TokenKind::PlusPlus) {
                let mut inc = Node::new(NodeKind::PostInc, self.previous().span);
                inc.left = Some(Box::new(node));
                node = inc;
            } else if self.match_token(TokenKind::MinusMinus) {
                let mut dec = Node::new(NodeKind::PostDec, self.previous().span);
                dec.left = Some(Box::new(node));
                node = dec;
            } else {
                break;
            }
        }

        Some(node)
    }

    fn member_access(&mut self, kind: NodeKind, object: Node) -> Option<Node> {
        let mut member = Node::new(kind, self.previous().span);
        member.left = Some(Box::new(object));

        self.consume(TokenKind::Ident, "Expected member name");
        let mut field = Node::new(NodeKind::Identifier, self.previous().span);
        field.name = Some(Symbol::intern(&self.previous().text));
        member.right = Some(Box::new(field));

        member.is_lvalue = true;
        Some(member)
    }

    /// primary := NUMBER | FLOAT | STRING | CHAR | IDENT | true | false
    ///          | null | getpid | '(' expression ')'
    pub fn parse_primary_expression(&mut self) -> Option<Node> {
        if self.match_token(TokenKind::Number) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Number, token.span);
            node.value = Value::Int(token.int_value());
            node.ty = Some(TypeInfo::new(BaseType::Int));
            return Some(node);
        }

        if self.match_token(TokenKind::Float) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Float, token.span);
            node.value = Value::Float(token.float_value());
            node.ty = Some(TypeInfo::new(BaseType::Float));
            return Some(node);
        }

        if self.match_token(TokenKind::Str) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Str, token.span);
            node.value = Value::Str(token.text);
            node.ty = Some(TypeInfo::pointer_to(TypeInfo::new(BaseType::Char)));
            return Some(node);
        }

        if self.match_token(TokenKind::Char) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Char, token.span);
            node.value = Value::Char(token.char_value());
            node.ty = Some(TypeInfo::new(BaseType::Char));
            return Some(node);
        }

        if self.match_token(TokenKind::Ident) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Identifier, token.span);
            node.name = Some(Symbol::intern(&token.text));
            node.is_lvalue = true;
            return Some(node);
        }

        if self.match_token(TokenKind::True) || self.match_token(TokenKind::False) {
            let token = self.previous().clone();
            let mut node = Node::new(NodeKind::Number, token.span);
            node.value = Value::Int((token.kind == TokenKind::True) as i64);
            node.ty = Some(TypeInfo::new(BaseType::Int));
            return Some(node);
        }

        if self.match_token(TokenKind::NullLiteral) {
            let mut node = Node::new(NodeKind::Number, self.previous().span);
            node.value = Value::Int(0);
            node.ty = Some(TypeInfo::new(BaseType::Pointer));
            return Some(node);
        }

        if self.match_token(TokenKind::Getpid) {
            let mut node = Node::new(NodeKind::Getpid, self.previous().span);
            // Accept both `getpid` and `getpid()`.
            if self.match_token(TokenKind::LParen) {
                self.consume(TokenKind::RParen, "Expected ')' after 'getpid('");
            }
            node.ty = Some(TypeInfo::new(BaseType::Pid));
            return Some(node);
        }

        if self.match_token(TokenKind::LParen) {
            let node = self.parse_expression()?;
            self.consume(TokenKind::RParen, "Expected ')' after expression");
            return Some(node);
        }

        self.error_at_current("Expected expression");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::parse_expr_source;

    fn expr(source: &str) -> Node {
        let (node, had_error) = parse_expr_source(source);
        assert!(!had_error, "unexpected error for {:?}", source);
        node.expect("expression")
    }

    fn assert_binary(node: &Node, op: &str) {
        assert_eq!(node.kind, NodeKind::BinaryOp, "node {:?}", node.kind);
        assert_eq!(node.op, op);
    }

    #[test]
    fn test_int_literal() {
        let node = expr("42");
        assert_eq!(node.kind, NodeKind::Number);
        assert_eq!(node.value, Value::Int(42));
        assert_eq!(node.ty.as_ref().unwrap().base, BaseType::Int);
    }

    #[test]
    fn test_float_literal() {
        let node = expr("3.5");
        assert_eq!(node.kind, NodeKind::Float);
        assert_eq!(node.value, Value::Float(3.5));
    }

    #[test]
    fn test_string_literal_type() {
        let node = expr("\"hi\"");
        assert_eq!(node.kind, NodeKind::Str);
        assert_eq!(node.value, Value::Str("hi".to_string()));
        let ty = node.ty.unwrap();
        assert_eq!(ty.base, BaseType::Pointer);
        assert_eq!(ty.pointed.unwrap().base, BaseType::Char);
    }

    #[test]
    fn test_true_false_null() {
        assert_eq!(expr("true").value, Value::Int(1));
        assert_eq!(expr("false").value, Value::Int(0));
        let null = expr("null");
        assert_eq!(null.value, Value::Int(0));
        assert_eq!(null.ty.unwrap().base, BaseType::Pointer);
    }

    #[test]
    fn test_identifier_is_lvalue() {
        let node = expr("x");
        assert_eq!(node.kind, NodeKind::Identifier);
        assert!(node.is_lvalue);
        assert_eq!(node.name_str(), "x");
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let node = expr("a + b * c");
        assert_binary(&node, "+");
        assert_binary(node.right.as_ref().unwrap(), "*");
    }

    #[test]
    fn test_left_associativity() {
        let node = expr("a - b - c");
        assert_binary(&node, "-");
        assert_binary(node.left.as_ref().unwrap(), "-");
        assert_eq!(node.right.as_ref().unwrap().kind, NodeKind::Identifier);
    }

    #[test]
    fn test_logical_hierarchy() {
        // a || b && c  =>  a || (b && c)
        let node = expr("a || b && c");
        assert_binary(&node, "||");
        assert_binary(node.right.as_ref().unwrap(), "&&");
    }

    #[test]
    fn test_bitwise_hierarchy() {
        // a | b ^ c & d  =>  a | (b ^ (c & d))
        let node = expr("a | b ^ c & d");
        assert_binary(&node, "|");
        let xor = node.right.as_ref().unwrap();
        assert_binary(xor, "^");
        assert_binary(xor.right.as_ref().unwrap(), "&");
    }

    #[test]
    fn test_shift_vs_additive() {
        // a + b << c  =>  (a + b) << c
        let node = expr("a + b << c");
        assert_binary(&node, "<<");
        assert_binary(node.left.as_ref().unwrap(), "+");
    }

    #[test]
    fn test_comparison_vs_equality() {
        // a < b == c > d  =>  (a < b) == (c > d)
        let node = expr("a < b == c > d");
        assert_binary(&node, "==");
        assert_binary(node.left.as_ref().unwrap(), "<");
        assert_binary(node.right.as_ref().unwrap(), ">");
    }

    #[test]
    fn test_parentheses_override() {
        let node = expr("(a + b) * c");
        assert_binary(&node, "*");
        assert_binary(node.left.as_ref().unwrap(), "+");
    }

    #[test]
    fn test_unary_chain() {
        let node = expr("-!~x");
        assert_eq!(node.kind, NodeKind::UnaryOp);
        assert_eq!(node.op, "-");
        let inner = node.left.as_ref().unwrap();
        assert_eq!(inner.op, "!");
        let inner2 = inner.left.as_ref().unwrap();
        assert_eq!(inner2.op, "~");
    }

    #[test]
    fn test_unary_plus_is_dropped() {
        let node = expr("+x");
        assert_eq!(node.kind, NodeKind::Identifier);
    }

    #[test]
    fn test_address_of_and_deref() {
        let node = expr("&x");
        assert_eq!(node.kind, NodeKind::AddressOf);

        let node = expr("*p");
        assert_eq!(node.kind, NodeKind::Dereference);
        assert!(node.is_lvalue);
    }

    #[test]
    fn test_sizeof_forms() {
        let node = expr("sizeof(x)");
        assert_eq!(node.kind, NodeKind::Sizeof);
        assert_eq!(node.ty.as_ref().unwrap().base, BaseType::Int);

        let node = expr("sizeof x");
        assert_eq!(node.kind, NodeKind::Sizeof);
    }

    #[test]
    fn test_assignment_right_associative() {
        let node = expr("a = b = 1");
        assert_eq!(node.kind, NodeKind::Assign);
        assert_eq!(node.right.as_ref().unwrap().kind, NodeKind::Assign);
    }

    #[test]
    fn test_compound_assignment_preserves_op() {
        let node = expr("a += 2");
        assert_eq!(node.kind, NodeKind::CompoundAssign);
        assert_eq!(node.op, "+=");

        let node = expr("a <<= 1");
        assert_eq!(node.op, "<<=");
    }

    #[test]
    fn test_ternary_slots() {
        let node = expr("c ? a : b");
        assert_eq!(node.kind, NodeKind::Ternary);
        assert_eq!(node.left.as_ref().unwrap().kind, NodeKind::Identifier);
        assert_eq!(node.right.as_ref().unwrap().name_str(), "a");
        assert_eq!(node.extra.as_ref().unwrap().name_str(), "b");
    }

    #[test]
    fn test_nested_ternary_right_branch() {
        // c ? a : d ? b : e  =>  else branch is itself a ternary
        let node = expr("c ? a : d ? b : e");
        assert_eq!(node.kind, NodeKind::Ternary);
        assert_eq!(node.extra.as_ref().unwrap().kind, NodeKind::Ternary);
    }

    #[test]
    fn test_call_with_args() {
        let node = expr("f(1, x, 2 + 3)");
        assert_eq!(node.kind, NodeKind::Call);
        assert_eq!(node.left.as_ref().unwrap().name_str(), "f");
        assert_eq!(node.children.len(), 3);
        assert_binary(&node.children[2], "+");
    }

    #[test]
    fn test_call_no_args() {
        let node = expr("f()");
        assert_eq!(node.kind, NodeKind::Call);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_array_access_is_lvalue() {
        let node = expr("a[i + 1]");
        assert_eq!(node.kind, NodeKind::ArrayAccess);
        assert!(node.is_lvalue);
        assert_binary(node.right.as_ref().unwrap(), "+");
    }

    #[test]
    fn test_member_access() {
        let node = expr("s.field");
        assert_eq!(node.kind, NodeKind::MemberAccess);
        assert!(node.is_lvalue);
        assert_eq!(node.right.as_ref().unwrap().name_str(), "field");

        let node = expr("p->field");
        assert_eq!(node.kind, NodeKind::PtrMember);
        assert!(node.is_lvalue);
    }

    #[test]
    fn test_postfix_chain() {
        let node = expr("a.b[0]++");
        assert_eq!(node.kind, NodeKind::PostInc);
        let access = node.left.as_ref().unwrap();
        assert_eq!(access.kind, NodeKind::ArrayAccess);
        assert_eq!(
            access.left.as_ref().unwrap().kind,
            NodeKind::MemberAccess
        );
    }

    #[test]
    fn test_pre_and_post_increment() {
        assert_eq!(expr("++x").kind, NodeKind::PreInc);
        assert_eq!(expr("--x").kind, NodeKind::PreDec);
        assert_eq!(expr("x++").kind, NodeKind::PostInc);
        assert_eq!(expr("x--").kind, NodeKind::PostDec);
    }

    #[test]
    fn test_comma_expression() {
        let node = expr("a = 1, b = 2");
        assert_eq!(node.kind, NodeKind::Comma);
        assert_eq!(node.left.as_ref().unwrap().kind, NodeKind::Assign);
        assert_eq!(node.right.as_ref().unwrap().kind, NodeKind::Assign);
    }

    #[test]
    fn test_getpid_expression() {
        let node = expr("getpid()");
        assert_eq!(node.kind, NodeKind::Getpid);
        assert_eq!(node.ty.as_ref().unwrap().base, BaseType::Pid);

        let node = expr("getpid");
        assert_eq!(node.kind, NodeKind::Getpid);
    }

    #[test]
    fn test_expected_expression_error() {
        let (node, had_error) = parse_expr_source(";");
        assert!(node.is_none());
        assert!(had_error);
    }
}
