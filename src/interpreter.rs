use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{RuntimeError, Unwind};
use crate::expr::{Expr, ExprId};
use crate::function::{Function, NativeFunction};
use crate::stmt::{ClassData, Stmt};
use crate::token::{Token, TokenType};
use crate::value::{Callable, Value};

/// Walks the program depth-first, holding the current environment pointer and
/// the resolver's side table of hop distances.
///
/// Every scope the resolver models has a matching environment here: one per
/// block, one per function invocation, one per class body holding `super`,
/// and one per bound-method call holding `this`. Program output (`print`)
/// goes to the injected writer so tests can capture it.
pub struct Interpreter<'a> {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            globals
                .borrow_mut()
                .define(native.name, Value::NativeFunction(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Records the hop distance for a reference node. Called by the resolver;
    /// nodes without an entry are global.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    #[cfg(test)]
    pub(crate) fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    pub(crate) fn writer(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    /// Executes a resolved program. Stops at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                return match unwind {
                    Unwind::Error(error) => Err(error),
                    Unwind::Return(_) => unreachable!("return unwound past every call frame"),
                };
            }
        }

        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Expression(data) => {
                self.evaluate(&data.expr)?;
                Ok(())
            }

            Stmt::Print(data) => {
                let value = self.evaluate(&data.expr)?;
                writeln!(self.output, "{value}").expect("program output to be writable");
                Ok(())
            }

            Stmt::Var(data) => {
                let value = self.evaluate(&data.initializer)?;
                self.environment.borrow_mut().define(&data.name.lexeme, value);
                Ok(())
            }

            Stmt::Block(data) => {
                let environment = Environment::new(Some(Rc::clone(&self.environment)));
                self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
            }

            Stmt::If(data) => {
                if self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.then_branch)
                } else if let Some(else_branch) = &data.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::While(data) => {
                while self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.body)?;
                }
                Ok(())
            }

            Stmt::Function(data) => {
                let function = Function::new(data, Rc::clone(&self.environment), false);
                self.environment
                    .borrow_mut()
                    .define(&data.name.lexeme, Value::Function(function));
                Ok(())
            }

            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(Unwind::Return(value))
            }

            Stmt::Class(data) => self.execute_class(data),
        }
    }

    fn execute_class(&mut self, data: &ClassData) -> Result<(), Unwind> {
        let superclass = match &data.superclass {
            Some(variable) => match self.look_up_variable(&variable.name, variable.id)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    }
                    .into());
                }
            },
            None => None,
        };

        // The name is bound before the methods are built and rebound after,
        // mirroring the resolver's declare/define split for this statement.
        self.environment.borrow_mut().define(&data.name.lexeme, Value::Nil);

        let previous = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Value::Class(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(environment));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(method, Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Rc::new(Class {
            name: data.name.lexeme.clone(),
            superclass,
            methods,
        });

        self.environment = previous;
        self.environment
            .borrow_mut()
            .define(&data.name.lexeme, Value::Class(class));

        Ok(())
    }

    /// Runs statements in the given environment, restoring the previous one
    /// on every exit path, including unwinds.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Unwind> {
        let previous = mem::replace(&mut self.environment, environment);

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, Unwind> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal.clone())),

            Expr::Grouping(data) => self.evaluate(&data.expr),

            Expr::Variable(data) => Ok(self.look_up_variable(&data.name, data.id)?),

            Expr::This(data) => Ok(self.look_up_variable(&data.keyword, data.id)?),

            Expr::Assign(data) => {
                let value = self.evaluate(&data.value)?;

                match self.locals.get(&data.id) {
                    Some(distance) => {
                        self.environment
                            .borrow_mut()
                            .assign_at(*distance, &data.name, value.clone());
                    }
                    None => {
                        self.globals.borrow_mut().assign(&data.name, value.clone())?;
                    }
                }

                Ok(value)
            }

            Expr::Unary(data) => {
                let right = self.evaluate(&data.right)?;

                match data.operator.kind {
                    TokenType::Minus => match right {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError {
                            token: data.operator.clone(),
                            message: "Operand must be a number.".to_string(),
                        }
                        .into()),
                    },
                    TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
                    _ => unreachable!("parser produced a unary operator {:?}", data.operator.kind),
                }
            }

            Expr::Binary(data) => {
                let left = self.evaluate(&data.left)?;
                let right = self.evaluate(&data.right)?;

                match data.operator.kind {
                    TokenType::Minus => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Number(l - r))
                    }
                    TokenType::Slash => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Number(l / r))
                    }
                    TokenType::Star => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Number(l * r))
                    }
                    TokenType::Greater => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Bool(l > r))
                    }
                    TokenType::GreaterEqual => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Bool(l >= r))
                    }
                    TokenType::Less => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Bool(l < r))
                    }
                    TokenType::LessEqual => {
                        let (l, r) = number_operands(&data.operator, &left, &right)?;
                        Ok(Value::Bool(l <= r))
                    }
                    TokenType::Plus => match (left, right) {
                        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                        (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                        _ => Err(RuntimeError {
                            token: data.operator.clone(),
                            message: "Operands must be two numbers or two strings.".to_string(),
                        }
                        .into()),
                    },
                    TokenType::EqualEqual => Ok(Value::Bool(left == right)),
                    TokenType::BangEqual => Ok(Value::Bool(left != right)),
                    // Both operands evaluated; the sequence takes the right
                    // value.
                    TokenType::Comma => Ok(right),
                    _ => unreachable!("parser produced a binary operator {:?}", data.operator.kind),
                }
            }

            Expr::Logical(data) => {
                let left = self.evaluate(&data.left)?;

                match data.operator.kind {
                    TokenType::Or if left.is_truthy() => Ok(left),
                    TokenType::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(&data.right),
                }
            }

            Expr::Call(data) => {
                let callee = self.evaluate(&data.callee)?;

                let mut arguments = Vec::with_capacity(data.arguments.len());
                for argument in &data.arguments {
                    arguments.push(self.evaluate(argument)?);
                }

                let callable: &dyn Callable = match &callee {
                    Value::Function(function) => function,
                    Value::NativeFunction(native) => native,
                    Value::Class(class) => class,
                    _ => {
                        return Err(RuntimeError {
                            token: data.paren.clone(),
                            message: "Can only call functions and classes.".to_string(),
                        }
                        .into());
                    }
                };

                if arguments.len() != callable.arity() {
                    return Err(RuntimeError {
                        token: data.paren.clone(),
                        message: format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            arguments.len()
                        ),
                    }
                    .into());
                }

                Ok(callable.call(self, arguments)?)
            }

            Expr::Get(data) => {
                let object = self.evaluate(&data.object)?;

                match object {
                    Value::Instance(instance) => {
                        let value = instance.borrow().get(&data.name, &instance)?;
                        Ok(value)
                    }
                    _ => Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have properties.".to_string(),
                    }
                    .into()),
                }
            }

            Expr::Set(data) => {
                let object = self.evaluate(&data.object)?;

                let Value::Instance(instance) = object else {
                    return Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have fields.".to_string(),
                    }
                    .into());
                };

                let value = self.evaluate(&data.value)?;
                instance.borrow_mut().set(&data.name, value.clone());
                Ok(value)
            }

            Expr::Super(data) => {
                let distance = *self
                    .locals
                    .get(&data.id)
                    .expect("'super' reference to be resolved");

                let superclass = match self.environment.borrow().get_at(distance, "super") {
                    Value::Class(class) => class,
                    _ => unreachable!("'super' resolved to a non-class"),
                };

                // The implicit `this` scope sits one hop inside the `super`
                // scope.
                let instance = match self.environment.borrow().get_at(distance - 1, "this") {
                    Value::Instance(instance) => instance,
                    _ => unreachable!("'this' resolved to a non-instance"),
                };

                let Some(method) = superclass.find_method(&data.method.lexeme) else {
                    return Err(RuntimeError {
                        token: data.method.clone(),
                        message: format!("Undefined property '{}'.", data.method.lexeme),
                    }
                    .into());
                };

                Ok(Value::Function(method.bind(&instance)))
            }
        }
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => Ok(self.environment.borrow().get_at(*distance, &name.lexeme)),
            None => self.globals.borrow().get(name),
        }
    }
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), Unwind> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError {
            token: operator.clone(),
            message: "Operands must be numbers.".to_string(),
        }
        .into()),
    }
}
