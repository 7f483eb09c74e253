//! proxc-drv - Compiler driver.
//!
//! The driver owns one compilation: it runs the stages in order
//! (lex → parse → symbol-table build → code generation), short-circuiting
//! on the first failing stage, and writes the textual VM program to the
//! output file. Diagnostics from every stage collect in a shared handler;
//! the driver renders them as `<filename>:<line>:<column>: error: <text>`
//! (position omitted when no token position exists).

use std::path::{Path, PathBuf};

use thiserror::Error;

use proxc_gen::{CodeBuffer, CodeGen};
use proxc_lex::{Lexer, TokenKind};
use proxc_par::{Node, Parser};
use proxc_sem::{build_symbol_table, SymbolTable};
use proxc_util::{FileId, Handler, Span};

/// Compiler version, stamped into the output header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Print the token stream.
    pub dump_tokens: bool,
    /// Print the AST.
    pub dump_ast: bool,
    /// Print the symbol table.
    pub dump_symbols: bool,
    /// Print the generated code.
    pub dump_code: bool,
    /// Accepted but currently ignored.
    pub optimize: bool,
    /// Warning level, 0-3.
    pub warning_level: u8,
    /// Output path for the compiled program.
    pub output_file: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dump_tokens: false,
            dump_ast: false,
            dump_symbols: false,
            dump_code: false,
            optimize: false,
            warning_level: 1,
            output_file: PathBuf::from("out.pxc"),
        }
    }
}

/// Driver-level errors.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compilation failed")]
    Failed,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// One compilation of one source buffer.
pub struct Compiler {
    source: String,
    filename: String,
    pub options: Options,
    handler: Handler,

    ast: Option<Node>,
    symtab: Option<SymbolTable>,
    code: Option<CodeBuffer>,

    last_error: Option<String>,
}

impl Compiler {
    pub fn new(source: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            filename: filename.into(),
            options: Options::default(),
            handler: Handler::new(),
            ast: None,
            symtab: None,
            code: None,
            last_error: None,
        }
    }

    /// Run the whole pipeline. Each stage aborts the pipeline on failure.
    pub fn compile(&mut self) -> bool {
        self.lex() && self.parse() && self.analyze() && self.generate()
    }

    /// Lexing happens on demand while parsing; this stage only serves the
    /// token dump, and fails early if that scan hit lexical errors.
    fn lex(&mut self) -> bool {
        if !self.options.dump_tokens {
            return true;
        }

        let mut lexer = Lexer::new(&self.source, FileId::DUMMY, &self.handler);
        println!("=== Tokens ===");
        loop {
            let token = lexer.next();
            println!(
                "{:<15} '{}' at {}:{}",
                token.kind.as_str(),
                token.text,
                token.span.line,
                token.span.column
            );
            if token.kind == TokenKind::Eof {
                break;
            }
        }

        if lexer.had_error() {
            self.record_failure();
            return false;
        }
        true
    }

    fn parse(&mut self) -> bool {
        let had_error;
        let ast;
        {
            let lexer = Lexer::new(&self.source, FileId::DUMMY, &self.handler);
            let mut parser = Parser::new(lexer, &self.handler);
            ast = parser.parse();
            had_error = parser.had_error();
        }

        if had_error || self.handler.has_errors() {
            self.record_failure();
            return false;
        }

        if self.options.dump_ast {
            println!("=== Abstract Syntax Tree ===");
            print!("{}", ast.dump());
        }

        self.ast = Some(ast);
        true
    }

    /// Populate the global scope with the top-level declarations.
    fn analyze(&mut self) -> bool {
        let Some(ast) = &self.ast else { return false };

        let symtab = build_symbol_table(ast, &self.handler);

        if self.options.dump_symbols {
            println!("=== Symbol Table ===");
            print!("{}", symtab.dump());
        }

        let failed = symtab.had_error();
        self.symtab = Some(symtab);

        if failed {
            self.record_failure();
            return false;
        }
        true
    }

    fn generate(&mut self) -> bool {
        let (Some(ast), Some(symtab)) = (&self.ast, &self.symtab) else {
            return false;
        };

        let mut gen = CodeGen::new(symtab);
        let ok = gen.generate(ast);

        // Codegen errors carry no token position.
        for err in gen.errors() {
            self.handler.error(err.to_string(), Span::DUMMY);
        }

        let code = gen.into_code();
        if self.options.dump_code {
            println!("=== Generated Code ===");
            print!("{}", code.disassemble());
        }
        self.code = Some(code);

        if !ok {
            self.record_failure();
            return false;
        }
        true
    }

    fn record_failure(&mut self) {
        self.last_error = self.handler.last_error();
    }

    /// Write the compiled program: a three-line comment header, a blank
    /// line, then one instruction per line.
    pub fn write_output(&self, path: &Path) -> Result<(), CompileError> {
        let Some(code) = &self.code else {
            return Err(CompileError::Failed);
        };

        let mut out = String::new();
        out.push_str("; ProxC Compiled Code\n");
        out.push_str(&format!("; Source: {}\n", self.filename));
        out.push_str(&format!("; Compiler Version: {}\n", VERSION));
        out.push('\n');
        out.push_str(&code.listing());

        std::fs::write(path, out).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn error_count(&self) -> usize {
        self.handler.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.handler.warning_count()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn code(&self) -> Option<&CodeBuffer> {
        self.code.as_ref()
    }

    pub fn ast(&self) -> Option<&Node> {
        self.ast.as_ref()
    }

    pub fn symtab(&self) -> Option<&SymbolTable> {
        self.symtab.as_ref()
    }

    /// Render all collected diagnostics, one line each.
    pub fn report(&self) -> Vec<String> {
        self.handler
            .diagnostics()
            .iter()
            .map(|diag| {
                if diag.span.line == 0 {
                    format!("{}: {}", diag.level, diag.message)
                } else {
                    format!(
                        "{}:{}:{}: {}: {}",
                        self.filename, diag.span.line, diag.span.column, diag.level, diag.message
                    )
                }
            })
            .collect()
    }
}

/// Compile `input_file` and write the program to `output_file`.
pub fn compile_file(input_file: &Path, options: Options) -> Result<(), CompileError> {
    let source = std::fs::read_to_string(input_file).map_err(|source| CompileError::Io {
        path: input_file.to_path_buf(),
        source,
    })?;

    let output_file = options.output_file.clone();
    let mut compiler = Compiler::new(source, input_file.display().to_string());
    compiler.options = options;

    if !compiler.compile() {
        for line in compiler.report() {
            eprintln!("{}", line);
        }
        return Err(CompileError::Failed);
    }

    compiler.write_output(&output_file)?;
    Ok(())
}
