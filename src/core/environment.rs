use std::cell::RefCell;
use std::collections::HashMap;
use std::iter::FromIterator;
use std::rc::Rc;

use super::{Object, Result, RuntimeError};

/// A shared handle to a scope. Closures keep one of these to the scope they
/// were defined in, so a scope lives as long as its longest-lived closure.
pub type Env = Rc<RefCell<Environment>>;

/// A single lexical scope that can be arbitrarily nested.
///
/// ```notrust
///     +-------------------------+
///     | call scope              |
///     | =====================   |
///     | store: { x: 2 }         |
///     | outer: -----------------+----->+---------------------+
///     +-------------------------+      | defining scope      |
///                                      | =                   |
///                                      | store: { adder: fn }|
///                                      | outer: None         |
///                                      +---------------------+
/// ```
///
/// Lookups walk outward on a miss. Writes only ever land in the scope they
/// are made on; an inner scope never mutates its outer one.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Env>,
}

/// Creates a top-level scope.
#[must_use]
pub fn new_environment() -> Env {
    Environment::new().into_shared()
}

/// Creates a scope nested inside `outer`.
#[must_use]
pub fn new_enclosed_environment(outer: &Env) -> Env {
    Environment::enclosed(Rc::clone(outer)).into_shared()
}

impl Environment {
    /// Creates a new empty, top-level environment.
    #[must_use]
    pub fn new() -> Self {
        Environment {
            store: HashMap::new(),
            outer: None,
        }
    }

    /// Creates a new empty environment whose lookups fall back to `outer`.
    #[must_use]
    pub fn enclosed(outer: Env) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    #[must_use]
    pub fn into_shared(self) -> Env {
        Rc::new(RefCell::new(self))
    }

    /// Returns the value bound to `name` in the nearest scope that has it.
    ///
    /// # Errors
    /// Returns `RuntimeError::IdentifierNotFound` if no scope in the chain
    /// binds `name`.
    pub fn get(&self, name: &str) -> Result<Object> {
        match self.store.get(name) {
            Some(value) => Ok(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => Err(RuntimeError::IdentifierNotFound(name.to_owned())),
            },
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding of the same
    /// name.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}

/// Constructs a top-level environment from an iterator of bindings.
impl FromIterator<(String, Object)> for Environment {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Object)>,
    {
        let mut store = HashMap::new();
        store.extend(iter);

        Environment { store, outer: None }
    }
}
