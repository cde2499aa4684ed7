use std::fmt;
use std::rc::Rc;
use std::result;

use indexmap::IndexMap;
use thiserror::Error;

mod builtins;
mod display;
mod environment;
mod interpreter;
mod lexer;
mod object;
mod parser;

pub use builtins::Builtin;
pub use environment::{new_enclosed_environment, new_environment, Env, Environment};
pub use interpreter::{eval, Interpreter};
pub use lexer::Lexer;
pub use object::{HashKey, ObjectType, FALSE, NULL, TRUE};
pub use parser::{parse, Parser};

pub type Result<T> = result::Result<T, RuntimeError>;

/// A diagnostic produced while parsing. Parsing never stops at the first one;
/// the parser records it and moves on to the next statement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A required token (`)`, `]`, `}`, `,`, `=`, an identifier, ...) was missing.
    #[error("expected next token to be {expected}, got {actual} instead")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    /// The token cannot start an expression.
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),
    /// An integer literal does not fit in an `i64`.
    #[error("could not parse {0} as integer")]
    InvalidInteger(String),
}

/// A failure raised while evaluating. These never unwind the host stack:
/// they travel through the evaluator wrapped in [`Object::Error`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectType,
        operator: InfixOperator,
        right: ObjectType,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: InfixOperator,
        right: ObjectType,
    },
    #[error("not a function: {0}")]
    NotAFunction(ObjectType),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
    #[error("argument to `{builtin}` not supported, got {actual}")]
    UnsupportedArgument {
        builtin: &'static str,
        actual: ObjectType,
    },
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// Classifies a run of identifier characters. Only exact keyword matches
    /// are keywords; everything else is an identifier.
    #[must_use]
    pub fn lookup_ident(ident: &str) -> TokenKind {
        match ident {
            "fn" => TokenKind::Function,
            "let" => TokenKind::Let,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident,
        }
    }
}

#[derive(Eq, Hash, Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Rc<str>,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, literal: &str) -> Self {
        Token {
            kind,
            literal: Rc::from(literal),
        }
    }
}

/// Every AST node can name the literal of the token it started with and
/// render itself back to canonical source text (through `Display`).
pub trait Node: fmt::Display {
    fn token_literal(&self) -> String;
}

/// The root of a parsed program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let { name: String, value: Expression },
    Return(Expression),
    Expression(Expression),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(String),
    Integer(i64),
    Boolean(bool),
    String(String),
    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    /// The body is shared with every `Function` object created from it.
    Function {
        parameters: Vec<String>,
        body: Rc<BlockStatement>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array(Vec<Expression>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Hash(Vec<(Expression, Expression)>),
}

/// A runtime value.
///
/// `ReturnValue` and `Error` double as control signals: once produced they
/// are handed back up through every enclosing evaluation step untouched.
#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    String(String),
    Array(Rc<Vec<Object>>),
    Hash(Rc<IndexMap<HashKey, HashPair>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    ReturnValue(Box<Object>),
    Error(RuntimeError),
}

/// The original key is kept next to the value so a hash can be inspected.
#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// A closure: parameters and body plus the scope it was defined in.
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

// The captured scope can (indirectly) contain this very function, so it is
// left out to keep `Debug` from recursing forever.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Null, Self::Null) => true,
            (Self::String(l), Self::String(r)) => l == r,
            (Self::Array(l), Self::Array(r)) => l == r,
            (Self::Hash(l), Self::Hash(r)) => l == r,
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r),
            (Self::Builtin(l), Self::Builtin(r)) => l == r,
            (Self::ReturnValue(l), Self::ReturnValue(r)) => l == r,
            (Self::Error(l), Self::Error(r)) => l == r,
            _ => false,
        }
    }
}
