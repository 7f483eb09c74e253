//! proxc-sem - Lexically scoped symbol table and the top-level symbol
//! build pass.
//!
//! The table owns a stack of scopes. Each scope hashes its symbols into a
//! fixed bucket array (djb2, 128 buckets) for O(1) average insert and
//! lookup; name lookup walks from the current scope outward to the global
//! scope. Inserting a variable or parameter assigns it the scope's running
//! byte offset; function and process symbols take insertion-order slots
//! instead, which the code generator uses as call targets.

pub mod scope;

use proxc_par::ast::{Node, NodeKind};
use proxc_par::types::{BaseType, TypeInfo};
use proxc_util::{Handler, Span, Symbol as Name};
use thiserror::Error;

pub use scope::{bucket_index, Scope, BUCKET_COUNT};

/// Symbol categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Process,
    Semaphore,
    Struct,
    Union,
    Enum,
    Typedef,
    Label,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Function => "function",
            SymbolKind::Process => "process",
            SymbolKind::Semaphore => "semaphore",
            SymbolKind::Struct => "struct",
            SymbolKind::Union => "union",
            SymbolKind::Enum => "enum",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Label => "label",
        }
    }
}

/// A declared name. The entry owns its type descriptor; `decl_span` points
/// back at the declaration site.
#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub name: Name,
    pub kind: SymbolKind,
    pub ty: TypeInfo,
    /// Level of the scope the symbol was declared in.
    pub scope_level: u32,
    /// Storage offset (variables/parameters) or call slot
    /// (functions/processes).
    pub offset: i32,
    pub is_initialized: bool,
    pub is_used: bool,
    pub decl_span: Span,
}

/// Symbol-table errors.
#[derive(Debug, Error)]
pub enum SemError {
    #[error("Symbol '{0}' already declared in current scope")]
    Redeclaration(String),
}

/// The symbol table: a stack of scopes, global scope at the bottom.
pub struct SymbolTable {
    scopes: Vec<Scope>,
    had_error: bool,
    last_error: Option<String>,
}

impl SymbolTable {
    /// Create a table containing only the global scope (level 0).
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(0)],
            had_error: false,
            last_error: None,
        }
    }

    /// Current nesting level; 0 when only the global scope exists.
    pub fn current_level(&self) -> u32 {
        (self.scopes.len() - 1) as u32
    }

    /// Push a fresh scope one level deeper than the current one.
    pub fn enter_scope(&mut self) {
        let level = self.current_level() + 1;
        self.scopes.push(Scope::new(level));
    }

    /// Destroy the current scope and all its symbols, restoring the
    /// parent. A no-op at the global scope.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare a symbol in the current scope.
    ///
    /// Fails when the name already exists in the current scope (shadowing
    /// outer scopes is allowed). Variables and parameters advance the
    /// scope's byte offset by the type's size; functions and processes
    /// take the next insertion-order slot. The table takes ownership of
    /// `ty`.
    pub fn insert(
        &mut self,
        name: Name,
        kind: SymbolKind,
        ty: TypeInfo,
        decl_span: Span,
    ) -> Result<(), SemError> {
        if self.lookup_current_scope(name).is_some() {
            let err = SemError::Redeclaration(name.as_str().to_string());
            self.had_error = true;
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        let level = self.current_level();
        let scope = self.scopes.last_mut().expect("global scope always exists");

        let offset = match kind {
            SymbolKind::Function | SymbolKind::Process => {
                let slot = scope.next_slot;
                scope.next_slot += 1;
                slot
            },
            _ => scope.next_offset,
        };

        if matches!(kind, SymbolKind::Variable | SymbolKind::Parameter) {
            scope.next_offset += ty.size() as i32;
        }

        scope.insert(SymbolEntry {
            name,
            kind,
            ty,
            scope_level: level,
            offset,
            is_initialized: false,
            is_used: false,
            decl_span,
        });

        Ok(())
    }

    /// Look a name up from the current scope outward; the first match
    /// wins, so inner declarations shadow outer ones.
    pub fn lookup(&self, name: Name) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.find(name))
    }

    /// Look a name up in the current scope only.
    pub fn lookup_current_scope(&self, name: Name) -> Option<&SymbolEntry> {
        self.scopes.last().and_then(|scope| scope.find(name))
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Scopes from global outward to the current one.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Render the table, innermost scope first.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for scope in self.scopes.iter().rev() {
            out.push_str(&format!("Scope level {}:\n", scope.level));
            for sym in scope.symbols() {
                out.push_str(&format!(
                    "  {}: {} ({}) offset={}\n",
                    sym.name,
                    sym.kind.as_str(),
                    sym.ty,
                    sym.offset
                ));
            }
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Populate the global scope from a parsed program: one entry per
/// top-level function, process, or variable declaration. Other node kinds
/// are ignored. Redeclarations are reported to `handler` and recorded in
/// the table's error state.
pub fn build_symbol_table(program: &Node, handler: &Handler) -> SymbolTable {
    let mut table = SymbolTable::new();

    if program.kind != NodeKind::Program {
        return table;
    }

    for child in &program.children {
        let kind = match child.kind {
            NodeKind::Process => SymbolKind::Process,
            NodeKind::Function => SymbolKind::Function,
            NodeKind::VarDecl => SymbolKind::Variable,
            _ => continue,
        };

        let Some(name) = child.name else { continue };
        let ty = child
            .ty
            .clone()
            .unwrap_or_else(|| TypeInfo::new(BaseType::Unknown));

        if let Err(err) = table.insert(name, kind, ty, child.span) {
            handler.error(err.to_string(), child.span);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_ty() -> TypeInfo {
        TypeInfo::new(BaseType::Int)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = SymbolTable::new();
        let name = Name::intern("x");
        table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        let sym = table.lookup(name).expect("x");
        assert_eq!(sym.kind, SymbolKind::Variable);
        assert_eq!(sym.scope_level, 0);
        assert_eq!(sym.offset, 0);
    }

    #[test]
    fn test_lookup_missing() {
        let table = SymbolTable::new();
        assert!(table.lookup(Name::intern("nope")).is_none());
    }

    #[test]
    fn test_variable_offsets_advance_by_size() {
        let mut table = SymbolTable::new();
        table
            .insert(Name::intern("a"), SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();
        table
            .insert(
                Name::intern("b"),
                SymbolKind::Variable,
                TypeInfo::new(BaseType::Char),
                Span::DUMMY,
            )
            .unwrap();
        table
            .insert(Name::intern("c"), SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        assert_eq!(table.lookup(Name::intern("a")).unwrap().offset, 0);
        assert_eq!(table.lookup(Name::intern("b")).unwrap().offset, 4);
        assert_eq!(table.lookup(Name::intern("c")).unwrap().offset, 5);
    }

    #[test]
    fn test_function_slots_in_insertion_order() {
        let mut table = SymbolTable::new();
        table
            .insert(
                Name::intern("a"),
                SymbolKind::Function,
                TypeInfo::new(BaseType::Void),
                Span::DUMMY,
            )
            .unwrap();
        table
            .insert(
                Name::intern("v"),
                SymbolKind::Variable,
                int_ty(),
                Span::DUMMY,
            )
            .unwrap();
        table
            .insert(
                Name::intern("b"),
                SymbolKind::Process,
                TypeInfo::new(BaseType::Process),
                Span::DUMMY,
            )
            .unwrap();

        assert_eq!(table.lookup(Name::intern("a")).unwrap().offset, 0);
        assert_eq!(table.lookup(Name::intern("b")).unwrap().offset, 1);
        // Function slots do not disturb variable offsets.
        assert_eq!(table.lookup(Name::intern("v")).unwrap().offset, 0);
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        let name = Name::intern("dup");
        table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        let err = table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap_err();
        assert!(err.to_string().contains("already declared"));
        assert!(table.had_error());
    }

    #[test]
    fn test_shadowing_in_inner_scope() {
        let mut table = SymbolTable::new();
        let name = Name::intern("x");
        table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        table.enter_scope();
        table
            .insert(name, SymbolKind::Variable, TypeInfo::new(BaseType::Char), Span::DUMMY)
            .unwrap();

        let sym = table.lookup(name).unwrap();
        assert_eq!(sym.scope_level, 1);
        assert_eq!(sym.ty.base, BaseType::Char);

        table.exit_scope();
        let sym = table.lookup(name).unwrap();
        assert_eq!(sym.scope_level, 0);
        assert_eq!(sym.ty.base, BaseType::Int);
    }

    #[test]
    fn test_lookup_current_scope_ignores_outer() {
        let mut table = SymbolTable::new();
        let name = Name::intern("outer");
        table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        table.enter_scope();
        assert!(table.lookup_current_scope(name).is_none());
        assert!(table.lookup(name).is_some());
    }

    #[test]
    fn test_exit_scope_at_global_is_noop() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.current_level(), 0);
        assert_eq!(table.scopes().len(), 1);
    }

    #[test]
    fn test_scope_levels() {
        let mut table = SymbolTable::new();
        assert_eq!(table.current_level(), 0);
        table.enter_scope();
        assert_eq!(table.current_level(), 1);
        table.enter_scope();
        assert_eq!(table.current_level(), 2);
        table.exit_scope();
        assert_eq!(table.current_level(), 1);
    }

    #[test]
    fn test_exit_scope_drops_symbols() {
        let mut table = SymbolTable::new();
        let name = Name::intern("temp");

        table.enter_scope();
        table
            .insert(name, SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();
        assert!(table.lookup(name).is_some());

        table.exit_scope();
        assert!(table.lookup(name).is_none());
    }

    #[test]
    fn test_fresh_scope_offsets_start_at_zero() {
        let mut table = SymbolTable::new();
        table
            .insert(Name::intern("g"), SymbolKind::Variable, int_ty(), Span::DUMMY)
            .unwrap();

        table.enter_scope();
        table
            .insert(Name::intern("l"), SymbolKind::Parameter, int_ty(), Span::DUMMY)
            .unwrap();
        assert_eq!(table.lookup(Name::intern("l")).unwrap().offset, 0);
    }

    #[test]
    fn test_dump_contains_entries() {
        let mut table = SymbolTable::new();
        table
            .insert(Name::intern("main"), SymbolKind::Function, TypeInfo::new(BaseType::Void), Span::DUMMY)
            .unwrap();
        let dump = table.dump();
        assert!(dump.contains("Scope level 0:"));
        assert!(dump.contains("main: function (void) offset=0"));
    }
}

#[cfg(test)]
mod build_tests {
    use super::*;
    use proxc_lex::Lexer;
    use proxc_par::Parser;
    use proxc_util::FileId;

    fn build(source: &str) -> (SymbolTable, Handler) {
        let handler = Handler::new();
        let table;
        {
            let lexer = Lexer::new(source, FileId::DUMMY, &handler);
            let mut parser = Parser::new(lexer, &handler);
            let ast = parser.parse();
            assert!(!parser.had_error(), "parse failed for {:?}", source);
            table = build_symbol_table(&ast, &handler);
        }
        (table, handler)
    }

    #[test]
    fn test_top_level_population() {
        let (table, handler) = build(
            "int g;\nprocess worker(int id) { yield; }\nvoid main() { }\n",
        );
        assert!(!handler.has_errors());

        let g = table.lookup(Name::intern("g")).unwrap();
        assert_eq!(g.kind, SymbolKind::Variable);

        let worker = table.lookup(Name::intern("worker")).unwrap();
        assert_eq!(worker.kind, SymbolKind::Process);

        let main = table.lookup(Name::intern("main")).unwrap();
        assert_eq!(main.kind, SymbolKind::Function);
    }

    #[test]
    fn test_function_offsets_by_insertion_order() {
        let (table, _) = build("void a() { } void b() { }");
        assert_eq!(table.lookup(Name::intern("a")).unwrap().offset, 0);
        assert_eq!(table.lookup(Name::intern("b")).unwrap().offset, 1);
    }

    #[test]
    fn test_duplicate_top_level_reports_error() {
        let (table, handler) = build("int x; int x;");
        assert!(table.had_error());
        assert!(handler.has_errors());
        assert!(table
            .last_error()
            .unwrap()
            .contains("already declared"));
    }

    #[test]
    fn test_only_top_level_symbols_are_inserted() {
        let (table, _) = build("void f() { x = 1; }");
        // Locals and statement-level names are not populated by the build
        // pass.
        assert!(table.lookup(Name::intern("x")).is_none());
        assert_eq!(table.current_level(), 0);
    }
}
