//! The lowering pass: one traversal of the AST emitting stack-VM
//! instructions.

use proxc_par::ast::{Node, NodeKind};
use proxc_sem::{SymbolEntry, SymbolTable};
use proxc_util::Symbol as Name;

use crate::buffer::CodeBuffer;
use crate::error::CodeGenError;
use crate::opcode::Opcode;

/// Sentinel for "no enclosing loop".
const NO_LABEL: i32 = -1;

/// Code generator. Owns its code buffer; borrows the symbol table
/// read-only.
pub struct CodeGen<'a> {
    code: CodeBuffer,
    symtab: &'a SymbolTable,

    /// Patch index serving as the enclosing loop's break target.
    loop_break: i32,

    /// Instruction index `continue` jumps to in the enclosing loop.
    loop_continue: i32,

    had_error: bool,
    errors: Vec<CodeGenError>,
}

impl<'a> CodeGen<'a> {
    pub fn new(symtab: &'a SymbolTable) -> Self {
        Self {
            code: CodeBuffer::new(),
            symtab,
            loop_break: NO_LABEL,
            loop_continue: NO_LABEL,
            had_error: false,
            errors: Vec::new(),
        }
    }

    /// Lower a whole program. Returns success iff no error was recorded;
    /// emission continues past errors so several can accumulate.
    pub fn generate(&mut self, ast: &Node) -> bool {
        self.gen_program(ast);
        !self.had_error
    }

    pub fn code(&self) -> &CodeBuffer {
        &self.code
    }

    pub fn into_code(self) -> CodeBuffer {
        self.code
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn errors(&self) -> &[CodeGenError] {
        &self.errors
    }

    pub fn last_error(&self) -> Option<String> {
        self.errors.last().map(|e| e.to_string())
    }

    fn error(&mut self, err: CodeGenError) {
        self.had_error = true;
        self.errors.push(err);
    }

    /// Resolve a name to `(scope_level, offset)`.
    fn lookup(&self, name: Option<Name>) -> Option<(u32, i32)> {
        name.and_then(|n| self.symtab.lookup(n))
            .map(|sym: &SymbolEntry| (sym.scope_level, sym.offset))
    }

    // =========================================================================
    // Program and functions
    // =========================================================================

    fn gen_program(&mut self, node: &Node) {
        if node.kind != NodeKind::Program {
            return;
        }

        for child in &node.children {
            if matches!(child.kind, NodeKind::Function | NodeKind::Process) {
                self.gen_function(child);
            }
        }

        self.code.emit(Opcode::Halt, 0);
    }

    /// Function body framed by a `func_<name>` label and an implicit
    /// `PUSH 0; RET` tail return.
    fn gen_function(&mut self, node: &Node) {
        self.code.emit_label(format!("func_{}", node.name_str()));

        if let Some(body) = &node.left {
            self.gen_statement(body);
        }

        self.code.emit(Opcode::Push, 0);
        self.code.emit(Opcode::Ret, 0);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn gen_statement(&mut self, node: &Node) {
        match node.kind {
            NodeKind::ExprStmt => {
                if let Some(expr) = &node.left {
                    self.gen_expression(expr);
                }
                self.code.emit(Opcode::Pop, 0);
            },

            NodeKind::Return => {
                match &node.left {
                    Some(expr) => self.gen_expression(expr),
                    None => {
                        self.code.emit(Opcode::Push, 0);
                    },
                }
                self.code.emit(Opcode::Ret, 0);
            },

            NodeKind::If => {
                if let Some(cond) = &node.left {
                    self.gen_expression(cond);
                }
                let jz_index = self.code.emit(Opcode::Jz, 0);

                if let Some(then_branch) = &node.right {
                    self.gen_statement(then_branch);
                }

                if let Some(else_branch) = &node.extra {
                    let jmp_index = self.code.emit(Opcode::Jmp, 0);
                    self.code.patch_jump(jz_index, self.code.count() as i32);
                    self.gen_statement(else_branch);
                    self.code.patch_jump(jmp_index, self.code.count() as i32);
                } else {
                    self.code.patch_jump(jz_index, self.code.count() as i32);
                }
            },

            NodeKind::While => {
                let loop_start = self.code.count();
                let old_break = self.loop_break;
                let old_continue = self.loop_continue;

                self.loop_continue = loop_start as i32;

                if let Some(cond) = &node.left {
                    self.gen_expression(cond);
                }
                let jz_index = self.code.emit(Opcode::Jz, 0);

                if let Some(body) = &node.right {
                    self.gen_statement(body);
                }
                self.code.emit(Opcode::Jmp, loop_start as i32);

                self.code.patch_jump(jz_index, self.code.count() as i32);
                self.loop_break = old_break;
                self.loop_continue = old_continue;
            },

            NodeKind::DoWhile => {
                let old_break = self.loop_break;
                let old_continue = self.loop_continue;

                let loop_start = self.code.count();
                self.loop_continue = loop_start as i32;

                if let Some(body) = &node.left {
                    self.gen_statement(body);
                }
                if let Some(cond) = &node.right {
                    self.gen_expression(cond);
                }
                self.code.emit(Opcode::Jnz, loop_start as i32);

                self.loop_break = old_break;
                self.loop_continue = old_continue;
            },

            NodeKind::For => {
                let old_break = self.loop_break;
                let old_continue = self.loop_continue;

                if let Some(init) = &node.left {
                    self.gen_expression(init);
                    self.code.emit(Opcode::Pop, 0);
                }

                let loop_start = self.code.count();

                if let Some(cond) = &node.right {
                    self.gen_expression(cond);
                    let jz_index = self.code.emit(Opcode::Jz, 0);
                    self.loop_break = jz_index as i32;
                }

                if let Some(body) = node.children.first() {
                    self.gen_statement(body);
                }

                self.loop_continue = self.code.count() as i32;
                if let Some(step) = &node.extra {
                    self.gen_expression(step);
                    self.code.emit(Opcode::Pop, 0);
                }

                self.code.emit(Opcode::Jmp, loop_start as i32);

                if node.right.is_some() && self.loop_break >= 0 {
                    self.code
                        .patch_jump(self.loop_break as usize, self.code.count() as i32);
                }

                self.loop_break = old_break;
                self.loop_continue = old_continue;
            },

            NodeKind::Break => {
                if self.loop_break >= 0 {
                    self.code.emit(Opcode::Jmp, self.loop_break);
                }
            },

            NodeKind::Continue => {
                if self.loop_continue >= 0 {
                    self.code.emit(Opcode::Jmp, self.loop_continue);
                }
            },

            NodeKind::Block => {
                for child in &node.children {
                    self.gen_statement(child);
                }
            },

            NodeKind::Create => {
                for arg in &node.children {
                    self.gen_expression(arg);
                }
                self.code.emit(Opcode::Create, node.children.len() as i32);
            },

            NodeKind::Resume => self.gen_primitive(node, Opcode::Resume),
            NodeKind::Suspend => self.gen_primitive(node, Opcode::Suspend),
            NodeKind::Kill => self.gen_primitive(node, Opcode::Kill),
            NodeKind::Sleep => self.gen_primitive(node, Opcode::Sleep),
            NodeKind::Wait => self.gen_primitive(node, Opcode::Wait),
            NodeKind::Signal => self.gen_primitive(node, Opcode::Signal),

            NodeKind::Yield => {
                self.code.emit(Opcode::Yield, 0);
            },

            _ => {},
        }
    }

    fn gen_primitive(&mut self, node: &Node, opcode: Opcode) {
        if let Some(arg) = &node.left {
            self.gen_expression(arg);
        }
        self.code.emit(opcode, 0);
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn gen_expression(&mut self, node: &Node) {
        match node.kind {
            NodeKind::Number => {
                self.code.emit(Opcode::Push, node.int_value() as i32);
            },

            NodeKind::Identifier => {
                let Some((scope_level, offset)) = self.lookup(node.name) else {
                    self.error(CodeGenError::UndefinedVariable(
                        node.name_str().to_string(),
                    ));
                    return;
                };
                let opcode = if scope_level == 0 {
                    Opcode::Loadg
                } else {
                    Opcode::Loadl
                };
                self.code.emit(opcode, offset);
            },

            NodeKind::BinaryOp => {
                if let Some(left) = &node.left {
                    self.gen_expression(left);
                }
                if let Some(right) = &node.right {
                    self.gen_expression(right);
                }

                let opcode = match node.op.as_str() {
                    "+" => Some(Opcode::Add),
                    "-" => Some(Opcode::Sub),
                    "*" => Some(Opcode::Mul),
                    "/" => Some(Opcode::Div),
                    "%" => Some(Opcode::Mod),
                    "&" => Some(Opcode::And),
                    "|" => Some(Opcode::Or),
                    "^" => Some(Opcode::Xor),
                    "<<" => Some(Opcode::Shl),
                    ">>" => Some(Opcode::Shr),
                    "==" => Some(Opcode::Eq),
                    "!=" => Some(Opcode::Ne),
                    "<" => Some(Opcode::Lt),
                    "<=" => Some(Opcode::Le),
                    ">" => Some(Opcode::Gt),
                    ">=" => Some(Opcode::Ge),
                    // Both operands are always evaluated; see the tests.
                    "&&" => Some(Opcode::Land),
                    "||" => Some(Opcode::Lor),
                    _ => None,
                };
                if let Some(opcode) = opcode {
                    self.code.emit(opcode, 0);
                }
            },

            NodeKind::UnaryOp => {
                if let Some(operand) = &node.left {
                    self.gen_expression(operand);
                }
                match node.op.as_str() {
                    "-" => {
                        self.code.emit(Opcode::Neg, 0);
                    },
                    "!" => {
                        self.code.emit(Opcode::Lnot, 0);
                    },
                    "~" => {
                        self.code.emit(Opcode::Not, 0);
                    },
                    _ => {},
                }
            },

            NodeKind::Assign => {
                let target = node.left.as_deref();
                let Some((scope_level, offset)) = self.lookup(target.and_then(|t| t.name))
                else {
                    let shown = target.map(|t| t.name_str()).unwrap_or("");
                    self.error(CodeGenError::UndefinedVariable(shown.to_string()));
                    return;
                };
                let opcode = if scope_level == 0 {
                    Opcode::Storeg
                } else {
                    Opcode::Storel
                };

                if let Some(value) = &node.right {
                    self.gen_expression(value);
                }
                // The assignment's own value stays on the stack.
                self.code.emit(Opcode::Dup, 0);
                self.code.emit(opcode, offset);
            },

            NodeKind::CompoundAssign => {
                self.error(CodeGenError::Unsupported("compound assignment"));
            },

            NodeKind::Call => {
                for arg in &node.children {
                    self.gen_expression(arg);
                }

                let callee = node.left.as_deref();
                let Some((_, offset)) = self.lookup(callee.and_then(|c| c.name)) else {
                    let shown = callee.map(|c| c.name_str()).unwrap_or("");
                    self.error(CodeGenError::UndefinedFunction(shown.to_string()));
                    return;
                };
                self.code.emit(Opcode::Call, offset);
            },

            NodeKind::Getpid => {
                self.code.emit(Opcode::Getpid, 0);
            },

            // Floats, strings, and the remaining expression forms have no
            // lowering; they emit nothing.
            _ => {},
        }
    }
}
