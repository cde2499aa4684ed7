//! `monkey` is the library that powers the monkey interpreter.
//!
//! Source text goes through three stages, each usable on its own:
//! - `Lexer` turns a `String` into a stream of `Token`s. It never fails;
//!   characters it does not recognize become `TokenKind::Illegal` tokens.
//! - `Parser` builds a `Program` with a Pratt (top down operator precedence)
//!   parser. Syntax problems are collected as `ParseError`s rather than
//!   aborting at the first one.
//! - `eval` walks the `Program` in an `Env` and produces an `Object`. Runtime
//!   failures are `Object::Error` values, not Rust errors, so a REPL session
//!   survives them.
//!
//! ```
//! use monkey::core::Interpreter;
//!
//! let mut interpreter = Interpreter::new();
//! let value = interpreter
//!     .run("let add = fn(a, b) { a + b }; add(1, 2)")
//!     .unwrap();
//!
//! assert_eq!("3", value.inspect());
//! ```
#![warn(clippy::pedantic)]

pub mod core;
