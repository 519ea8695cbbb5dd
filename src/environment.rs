use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// One scope frame: a name-to-value map plus an optional link to the
/// enclosing frame. Frames are shared through `Rc<RefCell<...>>` because
/// closures keep whole chains alive past the scope that created them; cycles
/// through captured functions are tolerated rather than collected.
#[derive(Debug)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            values: HashMap::new(),
        }
    }

    /// Binds a name in this frame, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Walks `distance` enclosing links. Only called with distances the
    /// resolver computed, so a missing link is an interpreter bug.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let parent = self
            .enclosing
            .clone()
            .unwrap_or_else(|| panic!("enclosing environment to exist at depth 1"));
        let mut environment = parent;

        for depth in 1..distance {
            let parent = environment
                .borrow()
                .enclosing
                .clone()
                .unwrap_or_else(|| panic!("enclosing environment to exist at depth {depth}"));
            environment = parent;
        }

        environment
    }

    /// Looks a name up along the whole chain. Used for names the resolver
    /// left global.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Reads a name at an exact hop distance. The resolver guarantees the
    /// name is defined there.
    pub fn get_at(&self, distance: usize, name: &str) -> Value {
        if distance > 0 {
            self.ancestor(distance)
                .borrow()
                .values
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("'{name}' to be defined {distance} scopes out"))
        } else {
            self.values
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("'{name}' to be defined in this scope"))
        }
    }

    /// Overwrites an existing binding along the chain, failing if the name
    /// was never defined.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Overwrites a binding at an exact hop distance.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Value) {
        if distance > 0 {
            self.ancestor(distance)
                .borrow_mut()
                .values
                .insert(name.lexeme.clone(), value);
        } else {
            self.values.insert(name.lexeme.clone(), value);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::TokenType;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::Identifier, lexeme.to_string(), None, 1)
    }

    #[test]
    fn define_then_get() {
        let mut environment = Environment::default();
        environment.define("a", Value::Number(1.0));

        assert_eq!(environment.get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_walks_the_chain() {
        let outer = Rc::new(RefCell::new(Environment::default()));
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::new(Some(Rc::clone(&outer)));

        assert_eq!(inner.get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn inner_definitions_shadow_outer_ones() {
        let outer = Rc::new(RefCell::new(Environment::default()));
        outer.borrow_mut().define("a", Value::Number(1.0));
        let mut inner = Environment::new(Some(Rc::clone(&outer)));
        inner.define("a", Value::Number(2.0));

        assert_eq!(inner.get(&name("a")).unwrap(), Value::Number(2.0));
        assert_eq!(outer.borrow().get(&name("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_at_skips_shadowing_frames() {
        let global = Rc::new(RefCell::new(Environment::default()));
        global.borrow_mut().define("a", Value::String("global".to_string()));
        let middle = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&global)))));
        middle.borrow_mut().define("a", Value::String("middle".to_string()));
        let inner = Environment::new(Some(Rc::clone(&middle)));

        assert_eq!(inner.get_at(1, "a"), Value::String("middle".to_string()));
        assert_eq!(inner.get_at(2, "a"), Value::String("global".to_string()));
    }

    #[test]
    fn assign_overwrites_the_defining_frame() {
        let outer = Rc::new(RefCell::new(Environment::default()));
        outer.borrow_mut().define("a", Value::Number(1.0));
        let mut inner = Environment::new(Some(Rc::clone(&outer)));

        inner.assign(&name("a"), Value::Number(2.0)).unwrap();
        assert_eq!(outer.borrow().get(&name("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn assign_to_undefined_name_fails() {
        let mut environment = Environment::default();
        let error = environment.assign(&name("ghost"), Value::Nil).unwrap_err();

        assert_eq!(error.to_string(), "Undefined variable 'ghost'.\n[line 1]");
    }

    #[test]
    fn assign_at_targets_an_exact_frame() {
        let outer = Rc::new(RefCell::new(Environment::default()));
        outer.borrow_mut().define("a", Value::Number(1.0));
        let mut inner = Environment::new(Some(Rc::clone(&outer)));
        inner.define("a", Value::Number(2.0));

        inner.assign_at(1, &name("a"), Value::Number(3.0));
        assert_eq!(outer.borrow().get(&name("a")).unwrap(), Value::Number(3.0));
        assert_eq!(inner.get_at(0, "a"), Value::Number(2.0));
    }
}
