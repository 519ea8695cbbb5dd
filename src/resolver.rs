use std::collections::HashMap;

use crate::error::ResolveError;
use crate::expr::{Expr, ExprId, VariableData};
use crate::interpreter::Interpreter;
use crate::stmt::{FunctionData, Stmt};
use crate::token::Token;

/// What kind of function body the resolver is currently inside.
#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

/// What kind of class body the resolver is currently inside.
#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pass that binds every variable reference to the scope that defines
/// it, recording hop distances into the interpreter's side table.
///
/// The scope stack here moves in lock-step with the environments the
/// evaluator creates: a block, a function invocation, a class body with
/// `super`, and a bound-method call with `this` each push exactly one scope.
/// A scope entry is `false` between declaration and definition, which is how
/// `var a = a;` gets caught.
///
/// The resolver never halts on an error; it records the problem and keeps
/// walking so every scoping violation in a program is reported at once.
pub struct Resolver<'a, 'w> {
    interpreter: &'a mut Interpreter<'w>,
    scopes: Vec<HashMap<String, bool>>,
    errors: Vec<ResolveError>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a, 'w> Resolver<'a, 'w> {
    pub fn new(interpreter: &'a mut Interpreter<'w>) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            errors: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves a whole program (or any statement list).
    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    /// The scoping errors found so far, in source order.
    pub fn errors(&self) -> &[ResolveError] {
        &self.errors
    }

    fn error(&mut self, token: &Token, message: &str) {
        self.errors.push(ResolveError {
            token: token.clone(),
            message: message.to_string(),
        });
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks a name as declared but not yet usable in the innermost scope.
    /// Global declarations are not tracked.
    fn declare(&mut self, name: &Token) {
        if self.scopes.is_empty() {
            return;
        }

        if self.scopes.last().expect("scope stack to be non-empty").contains_key(&name.lexeme) {
            self.error(name, "Already a variable with this name in this scope.");
        }

        self.scopes
            .last_mut()
            .expect("scope stack to be non-empty")
            .insert(name.lexeme.clone(), false);
    }

    /// Marks a declared name as usable.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Finds the innermost scope containing the name and records its hop
    /// distance. Names found in no scope stay global.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, function: &FunctionData, kind: FunctionType) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_variable(&mut self, variable: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&variable.name.lexeme) == Some(&false) {
                self.error(&variable.name, "Can't read local variable in its own initializer.");
            }
        }

        self.resolve_local(variable.id, &variable.name);
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(data) => self.resolve_expr(&data.expr),

            Stmt::Print(data) => self.resolve_expr(&data.expr),

            Stmt::Var(data) => {
                self.declare(&data.name);
                self.resolve_expr(&data.initializer);
                self.define(&data.name);
            }

            Stmt::Block(data) => {
                self.begin_scope();
                self.resolve(&data.statements);
                self.end_scope();
            }

            Stmt::If(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.then_branch);
                if let Some(else_branch) = &data.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::While(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.body);
            }

            Stmt::Function(data) => {
                // Defined before the body resolves so the function can
                // recurse into itself.
                self.declare(&data.name);
                self.define(&data.name);

                self.resolve_function(data, FunctionType::Function);
            }

            Stmt::Return(data) => {
                if self.current_function == FunctionType::None {
                    self.error(&data.keyword, "Can't return from top-level code.");
                }

                if let Some(value) = &data.value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(&data.keyword, "Can't return a value from an initializer.");
                    }

                    self.resolve_expr(value);
                }
            }

            Stmt::Class(data) => {
                let enclosing_class = self.current_class;
                self.current_class = ClassType::Class;

                self.declare(&data.name);
                self.define(&data.name);

                if let Some(superclass) = &data.superclass {
                    if superclass.name.lexeme == data.name.lexeme {
                        self.error(&superclass.name, "A class can't inherit from itself.");
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_variable(superclass);

                    self.begin_scope();
                    self.scopes
                        .last_mut()
                        .expect("scope stack to be non-empty")
                        .insert("super".to_string(), true);
                }

                self.begin_scope();
                self.scopes
                    .last_mut()
                    .expect("scope stack to be non-empty")
                    .insert("this".to_string(), true);

                for method in &data.methods {
                    let declaration = if method.name.lexeme == "init" {
                        FunctionType::Initializer
                    } else {
                        FunctionType::Method
                    };
                    self.resolve_function(method, declaration);
                }

                self.end_scope();

                if data.superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Variable(data) => self.resolve_variable(data),

            Expr::Assign(data) => {
                self.resolve_expr(&data.value);
                self.resolve_local(data.id, &data.name);
            }

            Expr::Unary(data) => self.resolve_expr(&data.right),

            Expr::Binary(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }

            Expr::Logical(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            }

            Expr::Grouping(data) => self.resolve_expr(&data.expr),

            Expr::Call(data) => {
                self.resolve_expr(&data.callee);

                for argument in &data.arguments {
                    self.resolve_expr(argument);
                }
            }

            Expr::Get(data) => self.resolve_expr(&data.object),

            Expr::Set(data) => {
                self.resolve_expr(&data.value);
                self.resolve_expr(&data.object);
            }

            Expr::This(data) => {
                if self.current_class == ClassType::None {
                    self.error(&data.keyword, "Can't use 'this' outside of a class.");
                    return;
                }

                self.resolve_local(data.id, &data.keyword);
            }

            Expr::Super(data) => {
                match self.current_class {
                    ClassType::Subclass => {}
                    ClassType::None => {
                        self.error(&data.keyword, "Can't use 'super' outside of a class.");
                    }
                    ClassType::Class => {
                        self.error(
                            &data.keyword,
                            "Can't use 'super' in a class with no superclass.",
                        );
                    }
                }

                self.resolve_local(data.id, &data.keyword);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn resolve_errors(source: &str) -> Vec<String> {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();
        let mut parser = Parser::new(tokens, 0);
        let statements = parser.parse();
        assert!(parser.errors().is_empty(), "parse errors in test source");

        let mut resolver = Resolver::new(&mut interpreter);
        resolver.resolve(&statements);
        resolver.errors().iter().map(|e| e.to_string()).collect()
    }

    /// Resolves a clean source chunk and returns the recorded depth of the
    /// reference node with the given id.
    fn depth_of(source: &str, id: ExprId) -> Option<usize> {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();
        let mut parser = Parser::new(tokens, 0);
        let statements = parser.parse();
        assert!(parser.errors().is_empty(), "parse errors in test source");

        let mut resolver = Resolver::new(&mut interpreter);
        resolver.resolve(&statements);
        assert!(resolver.errors().is_empty(), "resolve errors in test source");

        interpreter.resolved_depth(id)
    }

    #[test]
    fn reading_a_local_in_its_own_initializer_is_an_error() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn redeclaring_in_the_same_scope_is_an_error() {
        assert_eq!(
            resolve_errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn redeclaring_a_global_is_allowed() {
        assert_eq!(resolve_errors("var a = 1; var a = 2;"), Vec::<String>::new());
    }

    #[test]
    fn top_level_return_is_an_error() {
        assert_eq!(
            resolve_errors("return;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn returning_a_value_from_an_initializer_is_an_error() {
        assert_eq!(
            resolve_errors("class C { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn bare_return_in_an_initializer_is_allowed() {
        assert_eq!(
            resolve_errors("class C { init() { return; } }"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn this_outside_a_class_is_an_error() {
        assert_eq!(
            resolve_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn super_outside_a_class_is_an_error() {
        assert_eq!(
            resolve_errors("fun f() { super.m(); }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
    }

    #[test]
    fn super_without_a_superclass_is_an_error() {
        assert_eq!(
            resolve_errors("class C { m() { super.m(); } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn a_class_cannot_inherit_from_itself() {
        assert_eq!(
            resolve_errors("class C < C {}"),
            vec!["[line 1] Error at 'C': A class can't inherit from itself."]
        );
    }

    #[test]
    fn several_errors_are_all_reported() {
        let errors = resolve_errors("return;\nprint this;");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn local_reference_records_its_hop_distance() {
        // The only reference node is `a` inside the print; one block scope
        // separates it from the declaration.
        assert_eq!(depth_of("{ var a = 1; { print a; } }", 0), Some(1));
    }

    #[test]
    fn global_references_stay_unresolved() {
        assert_eq!(depth_of("var a = 1; print a;", 0), None);
    }

    #[test]
    fn this_resolves_through_the_implicit_class_scope() {
        // Ids: 0 is `this` inside the method body. Scopes at the reference:
        // the method body, then the class `this` scope.
        assert_eq!(depth_of("class C { m() { print this; } }", 0), Some(1));
    }

    #[test]
    fn super_sits_one_scope_outside_this() {
        // Ids: 0 is the superclass reference, 1 is the `super` expression.
        let source = "class A {} class B < A { m() { super.m; } }";
        assert_eq!(depth_of(source, 1), Some(2));
    }

    #[test]
    fn closure_references_skip_intervening_scopes() {
        let source = "\
fun outer() {
  var x = 1;
  fun middle() {
    fun inner() {
      print x;
    }
  }
}";
        // Ids: 0 is `x` in the innermost body; it sits three scopes in from
        // the declaration (inner body, middle body, outer body).
        assert_eq!(depth_of(source, 0), Some(2));
    }
}
