//! Named functions bound to fixed arguments.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ConstructionError;

/// A named function pointer together with the arguments it will be called with.
///
/// Anonymous callables are not accepted: every closure carries a non-empty name, so
/// that equality, hashing and descriptions stay meaningful. Equality and hashing
/// consider the name and the bound arguments.
///
/// # Example
///
/// ```
/// use actionpack::action::Closure;
///
/// fn add(args: &(i32, i32)) -> Result<i32, String> {
///     Ok(args.0 + args.1)
/// }
///
/// let closure = Closure::new("add", add, (2, 3)).unwrap();
/// assert_eq!(closure.call(), Ok(5));
/// assert_eq!(closure.name(), "add");
///
/// // The macro derives the name from the function path
/// let same = actionpack::closure!(add, (2, 3));
/// assert_eq!(closure, same);
///
/// assert!(Closure::new("", add, (2, 3)).is_err());
/// ```
pub struct Closure<Args, T, E> {
    name: String,
    function: fn(&Args) -> Result<T, E>,
    args: Args,
}

impl<Args, T, E> Closure<Args, T, E> {
    /// Bind `args` to `function` under `name`.
    pub fn new(
        name: impl Into<String>,
        function: fn(&Args) -> Result<T, E>,
        args: Args,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConstructionError::AnonymousClosure);
        }
        Ok(Self {
            name,
            function,
            args,
        })
    }

    /// Call the function with the bound arguments.
    pub fn call(&self) -> Result<T, E> {
        (self.function)(&self.args)
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound arguments.
    pub fn args(&self) -> &Args {
        &self.args
    }
}

/// Bind arguments to a named function, using the function path as the name.
///
/// ```
/// fn greet(who: &String) -> Result<String, ()> {
///     Ok(format!("hello {}", who))
/// }
///
/// let closure = actionpack::closure!(greet, "world".to_string());
/// assert_eq!(closure.name(), "greet");
/// assert_eq!(closure.call(), Ok("hello world".to_string()));
/// ```
#[macro_export]
macro_rules! closure {
    ($function:path, $args:expr) => {
        match $crate::action::Closure::new(stringify!($function), $function, $args) {
            Ok(closure) => closure,
            Err(_) => unreachable!("a function path is never empty"),
        }
    };
}

impl<Args: Clone, T, E> Clone for Closure<Args, T, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            function: self.function,
            args: self.args.clone(),
        }
    }
}

impl<Args: PartialEq, T, E> PartialEq for Closure<Args, T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl<Args: Eq, T, E> Eq for Closure<Args, T, E> {}

impl<Args: Hash, T, E> Hash for Closure<Args, T, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

impl<Args: fmt::Debug, T, E> fmt::Debug for Closure<Args, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

impl<Args: fmt::Debug, T, E> fmt::Display for Closure<Args, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.name, self.args)
    }
}
