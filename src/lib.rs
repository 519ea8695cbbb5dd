//! klox is a tree-walk interpreter for Lox, a small dynamically typed,
//! class-based scripting language. Source text runs through four phases:
//!
//! ## Scanning
//! The [`scanner`] turns the raw text into tokens, each carrying its kind,
//! lexeme, optional literal value, and 1-based line number. Lexical problems
//! (an unterminated string, a stray character) are reported and scanning
//! keeps going, so one run surfaces every such mistake.
//!
//! ## Parsing
//! The [`parser`] is a hand-written recursive descent parser producing
//! [`Stmt`](stmt::Stmt) and [`Expr`](expr::Expr) trees. On a syntax error it
//! records the diagnostic and synchronizes forward to the next statement
//! boundary before trying again, so a single mistake does not cascade into a
//! wall of noise. Whatever it returns is only executed if no error was
//! recorded.
//!
//! ## Resolving
//! The [`resolver`] is a static pass that binds every variable reference to
//! the lexical scope defining it, recording how many environment hops the
//! evaluator must take. This is what makes closures capture the scope from
//! their declaration site rather than their call site, and it rejects a fixed
//! family of scoping mistakes (`var a = a;`, `return` at the top level,
//! `this` outside a class, and so on) before anything runs.
//!
//! ## Interpreting
//! The [`interpreter`] walks the tree and evaluates it, maintaining a chain
//! of [`environment`](environment::Environment) frames rooted at the globals.
//! Functions are first class, classes support single inheritance with `super`
//! dispatch, and methods bind `this` through an implicit scope whose depth
//! the resolver pre-computed. Runtime errors abort the current run and are
//! reported with the offending line.
//!
//! The [`Klox`] driver ties the phases together for the three entry points:
//! a script file, the interactive prompt, and raw source. It owns the error
//! flags the process exit code is derived from; nothing in the crate keeps
//! global state.

use std::fs;
use std::io::Write;
use std::process;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use ast::AstPrinter;
use expr::ExprId;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// One interpreter session. Program output (`print`, the `--debug` dump) goes
/// to the injected sink; diagnostics always go to standard error.
pub struct Klox<'a> {
    interpreter: Interpreter<'a>,
    debug: bool,
    test_mode: bool,
    had_error: bool,
    had_runtime_error: bool,
    next_expr_id: ExprId,
}

impl<'a> Klox<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Klox {
            interpreter: Interpreter::new(output),
            debug: false,
            test_mode: false,
            had_error: false,
            had_runtime_error: false,
            next_expr_id: 0,
        }
    }

    /// Dump the parsed AST instead of resolving and evaluating.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Suppresses the non-zero process exits of [`run_file`](Self::run_file)
    /// so tests can run scripts in-process and inspect the captured output.
    pub fn set_test_mode(&mut self, test_mode: bool) {
        self.test_mode = test_mode;
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Runs a script file, then exits the process with 65 on a static error
    /// or 70 on a runtime error (unless test mode is on).
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).expect("script file to be readable");

        self.run(&contents);

        if !self.test_mode {
            if self.had_error {
                process::exit(65);
            }
            if self.had_runtime_error {
                process::exit(70);
            }
        }
    }

    /// The interactive prompt. One line at a time until end of input; error
    /// flags reset between lines so a mistake does not poison the session.
    /// Line history persists across sessions in the user's home directory.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("line editor to initialize");

        let history = home::home_dir().map(|dir| dir.join(".klox_history"));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    self.had_error = false;
                    self.had_runtime_error = false;
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("error reading input: {error}");
                    break;
                }
            }
        }

        if let Some(path) = &history {
            let _ = editor.save_history(path);
        }
    }

    /// Runs one chunk of source through the pipeline. Evaluation is refused
    /// if any phase before it reported an error.
    pub fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();
        for error in scanner.errors() {
            eprintln!("{error}");
            self.had_error = true;
        }

        // Parsing still runs on a stream with scan errors; the statements it
        // returns are only ever executed on a fully clean run.
        let mut parser = Parser::new(tokens, self.next_expr_id);
        let statements = parser.parse();
        self.next_expr_id = parser.next_id;
        for error in parser.errors() {
            eprintln!("{error}");
            self.had_error = true;
        }

        if self.had_error {
            return;
        }

        if self.debug {
            for statement in &statements {
                let line = AstPrinter.print_stmt(statement);
                writeln!(self.interpreter.writer(), "{line}")
                    .expect("program output to be writable");
            }
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);
        for error in resolver.errors() {
            eprintln!("{error}");
            self.had_error = true;
        }

        if self.had_error {
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            eprintln!("{error}");
            self.had_runtime_error = true;
        }
    }
}
