use std::rc::Rc;

use super::{Object, RuntimeError, NULL};

/// Native functions available to every program. A user binding with the same
/// name shadows the builtin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
}

impl Builtin {
    #[must_use]
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "first" => Some(Builtin::First),
            "last" => Some(Builtin::Last),
            "rest" => Some(Builtin::Rest),
            "push" => Some(Builtin::Push),
            "puts" => Some(Builtin::Puts),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Len => "len",
            Self::First => "first",
            Self::Last => "last",
            Self::Rest => "rest",
            Self::Push => "push",
            Self::Puts => "puts",
        }
    }

    /// Calls the builtin. Failures come back as an `Object::Error`.
    #[must_use]
    pub fn call(self, arguments: &[Object]) -> Object {
        self.apply(arguments).unwrap_or_else(Object::Error)
    }

    fn apply(self, arguments: &[Object]) -> Result<Object, RuntimeError> {
        match self {
            Self::Len => {
                let [argument] = Builtin::arguments::<1>(arguments)?;
                let len = match argument {
                    Object::String(s) => s.chars().count(),
                    Object::Array(elements) => elements.len(),
                    other => return Err(self.unsupported(other)),
                };

                Ok(Object::Integer(i64::try_from(len).unwrap_or(i64::MAX)))
            }
            Self::First => {
                let elements = self.array_argument(arguments)?;
                Ok(elements.first().cloned().unwrap_or(NULL))
            }
            Self::Last => {
                let elements = self.array_argument(arguments)?;
                Ok(elements.last().cloned().unwrap_or(NULL))
            }
            Self::Rest => {
                let elements = self.array_argument(arguments)?;
                if elements.is_empty() {
                    return Ok(NULL);
                }

                Ok(Object::Array(Rc::new(elements[1..].to_vec())))
            }
            Self::Push => {
                let [array, value] = Builtin::arguments::<2>(arguments)?;
                match array {
                    Object::Array(elements) => {
                        let mut pushed = Vec::with_capacity(elements.len() + 1);
                        pushed.extend(elements.iter().cloned());
                        pushed.push(value.clone());
                        Ok(Object::Array(Rc::new(pushed)))
                    }
                    other => Err(self.unsupported(other)),
                }
            }
            Self::Puts => {
                for argument in arguments {
                    println!("{}", argument.inspect());
                }

                Ok(NULL)
            }
        }
    }

    /// Checks the arity and hands the arguments back as a fixed size array.
    fn arguments<const N: usize>(arguments: &[Object]) -> Result<&[Object; N], RuntimeError> {
        <&[Object; N]>::try_from(arguments).map_err(|_| RuntimeError::WrongArgumentCount {
            got: arguments.len(),
            want: N,
        })
    }

    fn array_argument<'a>(self, arguments: &'a [Object]) -> Result<&'a [Object], RuntimeError> {
        let [argument] = Builtin::arguments::<1>(arguments)?;
        match argument {
            Object::Array(elements) => Ok(elements.as_slice()),
            other => Err(self.unsupported(other)),
        }
    }

    fn unsupported(self, actual: &Object) -> RuntimeError {
        RuntimeError::UnsupportedArgument {
            builtin: self.name(),
            actual: actual.object_type(),
        }
    }
}
