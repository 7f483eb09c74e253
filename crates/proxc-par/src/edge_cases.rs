//! Program-level parser edge cases.

use crate::ast::NodeKind;
use crate::test_util::parse_source;

#[test]
fn empty_function_body() {
    let (ast, had_error, _) = parse_source("void f() { }");
    assert!(!had_error);
    let body = ast.children[0].left.as_ref().unwrap();
    assert_eq!(body.kind, NodeKind::Block);
    assert!(body.children.is_empty());
}

#[test]
fn deeply_nested_blocks() {
    let (ast, had_error, _) = parse_source("void f() { { { { x; } } } }");
    assert!(!had_error);
    let mut node: &crate::ast::Node = ast.children[0].left.as_ref().unwrap();
    for _ in 0..3 {
        assert_eq!(node.kind, NodeKind::Block);
        node = &node.children[0];
    }
    assert_eq!(node.kind, NodeKind::Block);
}

#[test]
fn full_program_shape() {
    let source = "\
        int counter;\n\
        semaphore lock;\n\
        process worker(int id) {\n\
            while (1) {\n\
                wait(lock);\n\
                counter = counter + 1;\n\
                signal(lock);\n\
                yield;\n\
            }\n\
        }\n\
        void main() {\n\
            create(worker, 1);\n\
            create(worker, 2);\n\
        }\n";

    let (ast, had_error, handler) = parse_source(source);
    assert!(!had_error);
    assert!(!handler.has_errors());

    let kinds: Vec<_> = ast.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::VarDecl,
            NodeKind::VarDecl,
            NodeKind::Process,
            NodeKind::Function,
        ]
    );
}

#[test]
fn parse_twice_yields_identical_trees() {
    let source = "int x; void f(int a) { if (a) return a; return x; }";
    let (a, _, _) = parse_source(source);
    let (b, _, _) = parse_source(source);
    assert_eq!(a, b);
}

#[test]
fn error_in_one_function_does_not_hide_the_next() {
    let source = "void bad() { x = ; } void good() { return; }";
    let (ast, had_error, _) = parse_source(source);
    assert!(had_error);
    assert!(ast
        .children
        .iter()
        .any(|c| c.kind == NodeKind::Function && c.name_str() == "good"));
}

#[test]
fn dump_of_small_program() {
    let (ast, _, _) = parse_source("void f() { return 1; }");
    let dump = ast.dump();
    assert!(dump.starts_with("PROGRAM\n"));
    assert!(dump.contains("FUNCTION: f"));
    assert!(dump.contains("RETURN"));
    assert!(dump.contains("NUMBER: 1"));
}
