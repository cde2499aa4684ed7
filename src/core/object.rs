use std::fmt;
use std::result;

use super::{Object, Result, RuntimeError};

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// The type tag of an [`Object`], as it appears in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Null => "NULL",
            Self::String => "STRING",
            Self::Array => "ARRAY",
            Self::Hash => "HASH",
            Self::Function => "FUNCTION",
            Self::Builtin => "BUILTIN",
            Self::ReturnValue => "RETURN_VALUE",
            Self::Error => "ERROR",
        };

        write!(f, "{}", name)
    }
}

/// Identifies a hash entry by value rather than by object identity: two
/// objects with the same type and digest are the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ObjectType,
    pub value: u64,
}

impl Object {
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Integer(_) => ObjectType::Integer,
            Self::Boolean(_) => ObjectType::Boolean,
            Self::Null => ObjectType::Null,
            Self::String(_) => ObjectType::String,
            Self::Array(_) => ObjectType::Array,
            Self::Hash(_) => ObjectType::Hash,
            Self::Function(_) => ObjectType::Function,
            Self::Builtin(_) => ObjectType::Builtin,
            Self::ReturnValue(_) => ObjectType::ReturnValue,
            Self::Error(_) => ObjectType::Error,
        }
    }

    /// Only `Null` and `false` are falsy. Everything else, `0` and `""`
    /// included, is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Boolean(false))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Computes the structural hash key of an Integer, Boolean or String.
    ///
    /// # Errors
    /// Returns `RuntimeError::UnusableAsHashKey` for every other type.
    pub fn hash_key(&self) -> Result<HashKey> {
        let value = match self {
            // the bit pattern, not the numeric value
            #[allow(clippy::cast_sign_loss)]
            Self::Integer(i) => *i as u64,
            Self::Boolean(b) => u64::from(*b),
            Self::String(s) => fnv1a(s.as_bytes()),
            other => return Err(RuntimeError::UnusableAsHashKey(other.object_type())),
        };

        Ok(HashKey {
            kind: self.object_type(),
            value,
        })
    }

    /// Human readable rendering, as echoed by the REPL.
    #[must_use]
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        if b {
            TRUE
        } else {
            FALSE
        }
    }
}

impl From<RuntimeError> for Object {
    fn from(e: RuntimeError) -> Self {
        Object::Error(e)
    }
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
