use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;

use proxc_drv::{compile_file, CompileError, Options, VERSION};

fn print_help() {
    println!("ProxC Compiler v{}", VERSION);
    println!("Usage: proxc [options] <input_file>");
    println!();
    println!("Options:");
    println!("  -o <file>     Write output to <file>");
    println!("  -dump-tokens  Print all tokens");
    println!("  -dump-ast     Print abstract syntax tree");
    println!("  -dump-symbols Print symbol table");
    println!("  -dump-code    Print generated code");
    println!("  -O            Enable optimizations");
    println!("  -W<level>     Set warning level (0-3)");
    println!("  -h, --help    Print this help message");
    println!("  -v, --version Print compiler version");
}

fn parse_args(args: &[String]) -> Result<(PathBuf, Options), CompileError> {
    let mut options = Options::default();
    let mut input: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" => {
                let path = iter.next().ok_or_else(|| {
                    CompileError::InvalidArguments("-o requires a file name".to_string())
                })?;
                options.output_file = PathBuf::from(path);
            },
            "-dump-tokens" => options.dump_tokens = true,
            "-dump-ast" => options.dump_ast = true,
            "-dump-symbols" => options.dump_symbols = true,
            "-dump-code" => options.dump_code = true,
            "-O" => options.optimize = true,
            _ if arg.starts_with("-W") => {
                let level = arg[2..].parse::<u8>().map_err(|_| {
                    CompileError::InvalidArguments(format!("bad warning level '{}'", arg))
                })?;
                if level > 3 {
                    return Err(CompileError::InvalidArguments(format!(
                        "warning level {} out of range (0-3)",
                        level
                    )));
                }
                options.warning_level = level;
            },
            _ if arg.starts_with('-') => {
                return Err(CompileError::InvalidArguments(format!(
                    "unknown option '{}'",
                    arg
                )));
            },
            _ => {
                if input.is_some() {
                    return Err(CompileError::InvalidArguments(
                        "multiple input files".to_string(),
                    ));
                }
                input = Some(PathBuf::from(arg));
            },
        }
    }

    let input = input.ok_or_else(|| {
        CompileError::InvalidArguments("no input file".to_string())
    })?;

    Ok((input, options))
}

fn run(input: &Path, options: Options) -> anyhow::Result<()> {
    compile_file(input, options)
        .with_context(|| format!("failed to compile {}", input.display()))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.iter().any(|a| a == "-v" || a == "--version") {
        println!("proxc {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let (input, options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!("Try 'proxc --help'.");
            return ExitCode::from(2);
        },
    };

    match run(&input, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        },
    }
}
