use std::fmt;
use std::result;

use super::{
    BlockStatement, Expression, InfixOperator, Node, Object, PrefixOperator, Program, Statement,
    TokenKind,
};

/// Writes `items` separated by `", "`.
fn comma_separated<T: fmt::Display>(
    f: &mut fmt::Formatter,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }

    Ok(())
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let token = match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Ident => "IDENT",
            Self::Int => "INT",
            Self::String => "STRING",
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Bang => "!",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Function => "FUNCTION",
            Self::Let => "LET",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::Return => "RETURN",
        };

        write!(f, "{}", token)
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Bang => write!(f, "!"),
            Self::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let operator = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Asterisk => "*",
            Self::Slash => "/",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "==",
            Self::NotEq => "!=",
        };

        write!(f, "{}", operator)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        self.statements.iter().try_for_each(|s| write!(f, "{}", s))
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        self.statements.iter().try_for_each(|s| write!(f, "{}", s))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Let { name, value } => write!(f, "let {} = {};", name, value),
            Self::Return(value) => write!(f, "return {};", value),
            Self::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Identifier(name) => write!(f, "{}", name),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
            Self::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Self::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }
                Ok(())
            }
            Self::Function { parameters, body } => {
                write!(f, "fn(")?;
                comma_separated(f, parameters)?;
                write!(f, ") {}", body)
            }
            Self::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                comma_separated(f, arguments)?;
                write!(f, ")")
            }
            Self::Array(elements) => {
                write!(f, "[")?;
                comma_separated(f, elements)?;
                write!(f, "]")
            }
            Self::Index { left, index } => write!(f, "({}[{}])", left, index),
            Self::Hash(pairs) => {
                write!(f, "{{")?;
                comma_separated(f, pairs.iter().map(|(k, v)| format!("{}:{}", k, v)))?;
                write!(f, "}}")
            }
        }
    }
}

impl Node for Program {
    fn token_literal(&self) -> String {
        self.statements
            .first()
            .map(Node::token_literal)
            .unwrap_or_default()
    }
}

impl Node for BlockStatement {
    fn token_literal(&self) -> String {
        "{".to_owned()
    }
}

impl Node for Statement {
    fn token_literal(&self) -> String {
        match self {
            Self::Let { .. } => "let".to_owned(),
            Self::Return(_) => "return".to_owned(),
            Self::Expression(expression) => expression.token_literal(),
        }
    }
}

impl Node for Expression {
    fn token_literal(&self) -> String {
        match self {
            Self::Identifier(name) | Self::String(name) => name.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
            Self::Prefix { operator, .. } => operator.to_string(),
            Self::Infix { operator, .. } => operator.to_string(),
            Self::If { .. } => "if".to_owned(),
            Self::Function { .. } => "fn".to_owned(),
            Self::Call { .. } => "(".to_owned(),
            Self::Array(_) | Self::Index { .. } => "[".to_owned(),
            Self::Hash(_) => "{".to_owned(),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{}", s),
            Self::Array(elements) => {
                write!(f, "[")?;
                comma_separated(f, elements.iter())?;
                write!(f, "]")
            }
            Self::Hash(pairs) => {
                write!(f, "{{")?;
                comma_separated(
                    f,
                    pairs
                        .values()
                        .map(|pair| format!("{}:{}", pair.key, pair.value)),
                )?;
                write!(f, "}}")
            }
            Self::Function(function) => {
                write!(f, "fn(")?;
                comma_separated(f, &function.parameters)?;
                write!(f, ") {{ {} }}", function.body)
            }
            Self::Builtin(builtin) => write!(f, "builtin function {}", builtin.name()),
            Self::ReturnValue(value) => write!(f, "{}", value),
            Self::Error(e) => write!(f, "ERROR: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HashPair, Lexer, Parser};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn it_renders_a_program_built_by_hand() {
        let program = Program {
            statements: vec![Statement::Let {
                name: "myVar".to_owned(),
                value: Expression::Identifier("anotherVar".to_owned()),
            }],
        };

        assert_eq!("let myVar = anotherVar;", program.to_string());
        assert_eq!("let", program.token_literal());
    }

    #[test]
    fn it_renders_if_else_expressions() {
        let mut parser = Parser::new(Lexer::new(
            "if (x > 1) { x } else { let y = 2; y }".to_owned(),
        ));
        let program = parser.parse_program();

        assert!(parser.errors().is_empty());
        assert_eq!("if(x > 1) xelse let y = 2;y", program.to_string());
        assert_eq!("if", program.token_literal());
    }

    #[test]
    fn it_reports_the_starting_token_of_expressions() {
        let cases = vec![
            ("5", "5"),
            ("-5", "-"),
            ("1 + 2", "+"),
            ("fn(x) { x }", "fn"),
            ("add(1)", "("),
            ("[1]", "["),
            ("a[0]", "["),
            ("{1: 2}", "{"),
            ("\"hi\"", "hi"),
        ];

        for (source, literal) in cases {
            let program = Parser::new(Lexer::new(source.to_owned())).parse_program();
            assert_eq!(literal, program.token_literal(), "source: {}", source);
        }
    }

    #[test]
    fn it_inspects_scalar_objects() {
        assert_eq!("42", Object::Integer(42).inspect());
        assert_eq!("-7", Object::Integer(-7).inspect());
        assert_eq!("true", Object::Boolean(true).inspect());
        assert_eq!("null", Object::Null.inspect());
        assert_eq!("hello world", Object::String("hello world".to_owned()).inspect());
    }

    #[test]
    fn it_inspects_collections() {
        let array = Object::Array(Rc::new(vec![
            Object::Integer(1),
            Object::String("two".to_owned()),
            Object::Boolean(false),
        ]));
        assert_eq!("[1, two, false]", array.inspect());

        let mut pairs = IndexMap::new();
        for (key, value) in [(Object::Integer(1), "one"), (Object::Boolean(true), "yes")] {
            pairs.insert(
                key.hash_key().unwrap(),
                HashPair {
                    key,
                    value: Object::String(value.to_owned()),
                },
            );
        }
        assert_eq!("{1:one, true:yes}", Object::Hash(Rc::new(pairs)).inspect());
    }

    #[test]
    fn it_inspects_errors_and_return_values() {
        let error = Object::Error(crate::core::RuntimeError::IdentifierNotFound(
            "foobar".to_owned(),
        ));

        assert_eq!("ERROR: identifier not found: foobar", error.inspect());
        assert_eq!(
            "5",
            Object::ReturnValue(Box::new(Object::Integer(5))).inspect()
        );
    }

    #[test]
    fn it_names_token_kinds_in_diagnostics() {
        assert_eq!("IDENT", TokenKind::Ident.to_string());
        assert_eq!("==", TokenKind::Eq.to_string());
        assert_eq!("FUNCTION", TokenKind::Function.to_string());
        assert_eq!("EOF", TokenKind::Eof.to_string());
    }
}
