use crate::expr::Expr;
use crate::literal::Literal;
use crate::stmt::{FunctionData, Stmt};
use crate::token::TokenType;

/// Prints parsed statements back as canonical source text.
///
/// The output is valid input again: parsing what this prints yields a
/// structurally equivalent tree, with `for` loops staying in their desugared
/// while-loop form and number literals in value form. Nested statements print
/// inline, one top-level statement per line.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(data) => format!("{};", self.print_expr(&data.expr)),

            Stmt::Print(data) => format!("print {};", self.print_expr(&data.expr)),

            Stmt::Var(data) => format!(
                "var {} = {};",
                data.name.lexeme,
                self.print_expr(&data.initializer)
            ),

            Stmt::Block(data) => self.print_block(&data.statements),

            Stmt::If(data) => match &data.else_branch {
                Some(else_branch) => format!(
                    "if ({}) {} else {}",
                    self.print_expr(&data.condition),
                    self.print_stmt(&data.then_branch),
                    self.print_stmt(else_branch),
                ),
                None => format!(
                    "if ({}) {}",
                    self.print_expr(&data.condition),
                    self.print_stmt(&data.then_branch),
                ),
            },

            Stmt::While(data) => format!(
                "while ({}) {}",
                self.print_expr(&data.condition),
                self.print_stmt(&data.body),
            ),

            Stmt::Function(data) => format!("fun {}", self.print_function(data)),

            Stmt::Return(data) => match &data.value {
                Some(value) => format!("return {};", self.print_expr(value)),
                None => "return;".to_string(),
            },

            Stmt::Class(data) => {
                let mut string = format!("class {}", data.name.lexeme);
                if let Some(superclass) = &data.superclass {
                    string += &format!(" < {}", superclass.name.lexeme);
                }
                string += " {";
                for method in &data.methods {
                    string += " ";
                    string += &self.print_function(method);
                }
                string += " }";
                string
            }
        }
    }

    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(Literal::String(s)) => format!("\"{s}\""),
            Expr::Literal(literal) => literal.to_string(),

            Expr::Variable(data) => data.name.lexeme.clone(),

            Expr::Assign(data) => {
                format!("{} = {}", data.name.lexeme, self.print_expr(&data.value))
            }

            Expr::Unary(data) => {
                format!("{}{}", data.operator.lexeme, self.print_expr(&data.right))
            }

            Expr::Binary(data) => {
                let left = self.print_expr(&data.left);
                let right = self.print_expr(&data.right);
                if data.operator.kind == TokenType::Comma {
                    format!("{left}, {right}")
                } else {
                    format!("{left} {} {right}", data.operator.lexeme)
                }
            }

            Expr::Logical(data) => format!(
                "{} {} {}",
                self.print_expr(&data.left),
                data.operator.lexeme,
                self.print_expr(&data.right),
            ),

            Expr::Grouping(data) => format!("({})", self.print_expr(&data.expr)),

            Expr::Call(data) => {
                let arguments: Vec<String> = data
                    .arguments
                    .iter()
                    .map(|argument| self.print_expr(argument))
                    .collect();
                format!("{}({})", self.print_expr(&data.callee), arguments.join(", "))
            }

            Expr::Get(data) => format!("{}.{}", self.print_expr(&data.object), data.name.lexeme),

            Expr::Set(data) => format!(
                "{}.{} = {}",
                self.print_expr(&data.object),
                data.name.lexeme,
                self.print_expr(&data.value),
            ),

            Expr::This(_) => "this".to_string(),

            Expr::Super(data) => format!("super.{}", data.method.lexeme),
        }
    }

    fn print_block(&self, statements: &[Stmt]) -> String {
        let mut string = String::from("{");
        for statement in statements {
            string += " ";
            string += &self.print_stmt(statement);
        }
        string += " }";
        string
    }

    fn print_function(&self, function: &FunctionData) -> String {
        let params: Vec<&str> = function
            .params
            .iter()
            .map(|param| param.lexeme.as_str())
            .collect();
        format!(
            "{}({}) {}",
            function.name.lexeme,
            params.join(", "),
            self.print_block(&function.body)
        )
    }
}
