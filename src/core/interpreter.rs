use std::rc::Rc;
use std::result;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use super::{
    parse, BlockStatement, Builtin, Env, Environment, Expression, Function, HashPair,
    InfixOperator, Lexer, Object, ParseError, PrefixOperator, Program, RuntimeError, Statement,
    NULL,
};

/// The outcome of evaluating one node.
///
/// `Err` always carries a signal, either `Object::ReturnValue` or
/// `Object::Error`, which `?` hands straight back to the caller so nothing
/// after it is evaluated. Function calls unwrap return values; the program
/// boundary unwraps everything.
type Flow = result::Result<Object, Object>;

/// Evaluates `program` in `env` and returns the value of its last statement.
///
/// Runtime failures are not Rust errors: they come back as `Object::Error`,
/// in the same place a successful result would.
pub fn eval(program: &Program, env: &Env) -> Object {
    debug!(statements = program.statements.len(), "evaluating program");

    match eval_statements(&program.statements, env) {
        Ok(value) | Err(value) => match value {
            Object::ReturnValue(value) => *value,
            value => value,
        },
    }
}

/// A top-level evaluation session. Bindings made by one call to
/// [`Interpreter::interpret`] are visible to the next.
#[derive(Debug)]
pub struct Interpreter {
    environment: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Interpreter {
            environment: Environment::new().into_shared(),
        }
    }

    #[must_use]
    pub fn with_environment(environment: Env) -> Self {
        Interpreter { environment }
    }

    #[must_use]
    pub fn environment(&self) -> &Env {
        &self.environment
    }

    pub fn interpret(&mut self, program: &Program) -> Object {
        eval(program, &self.environment)
    }

    /// Lexes, parses and evaluates `source` in this session.
    ///
    /// # Errors
    /// Returns every parse diagnostic if `source` did not parse cleanly, in
    /// which case nothing is evaluated.
    pub fn run(&mut self, source: &str) -> result::Result<Object, Vec<ParseError>> {
        let (program, errors) = parse(Lexer::new(source.to_owned()));
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.interpret(&program))
    }
}

fn raise(error: RuntimeError) -> Object {
    debug!(%error, "runtime error");
    Object::Error(error)
}

fn eval_statements(statements: &[Statement], env: &Env) -> Flow {
    let mut result = NULL;
    for statement in statements {
        result = eval_statement(statement, env)?;
    }

    Ok(result)
}

fn eval_block(block: &BlockStatement, env: &Env) -> Flow {
    eval_statements(&block.statements, env)
}

fn eval_statement(statement: &Statement, env: &Env) -> Flow {
    match statement {
        Statement::Let { name, value } => {
            let value = eval_expression(value, env)?;
            env.borrow_mut().set(name.as_str(), value);
            Ok(NULL)
        }
        Statement::Return(value) => {
            let value = eval_expression(value, env)?;
            Err(Object::ReturnValue(Box::new(value)))
        }
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_expression(expression: &Expression, env: &Env) -> Flow {
    match expression {
        Expression::Integer(value) => Ok(Object::Integer(*value)),
        Expression::Boolean(value) => Ok(Object::from(*value)),
        Expression::String(value) => Ok(Object::String(value.clone())),
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env)?;
            eval_prefix_expression(*operator, &right)
        }
        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix_expression(*operator, &left, &right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            if eval_expression(condition, env)?.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Ok(NULL)
            }
        }
        Expression::Function { parameters, body } => Ok(Object::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: Rc::clone(body),
            env: Rc::clone(env),
        }))),
        Expression::Call {
            function,
            arguments,
        } => {
            let function = eval_expression(function, env)?;
            let arguments = eval_expressions(arguments, env)?;
            apply_function(&function, arguments)
        }
        Expression::Array(elements) => {
            let elements = eval_expressions(elements, env)?;
            Ok(Object::Array(Rc::new(elements)))
        }
        Expression::Index { left, index } => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index_expression(&left, &index)
        }
        Expression::Hash(pairs) => eval_hash_literal(pairs, env),
    }
}

/// Evaluates left to right, stopping at the first signal.
fn eval_expressions(expressions: &[Expression], env: &Env) -> result::Result<Vec<Object>, Object> {
    expressions
        .iter()
        .map(|expression| eval_expression(expression, env))
        .collect()
}

fn eval_identifier(name: &str, env: &Env) -> Flow {
    let bound = env.borrow().get(name);

    bound.or_else(|error| match Builtin::lookup(name) {
        Some(builtin) => Ok(Object::Builtin(builtin)),
        None => Err(raise(error)),
    })
}

fn eval_prefix_expression(operator: PrefixOperator, right: &Object) -> Flow {
    match (operator, right) {
        (PrefixOperator::Bang, right) => Ok(Object::from(!right.is_truthy())),
        (PrefixOperator::Minus, Object::Integer(value)) => Ok(Object::Integer(value.wrapping_neg())),
        (PrefixOperator::Minus, right) => Err(raise(RuntimeError::UnknownPrefixOperator {
            operator,
            right: right.object_type(),
        })),
    }
}

fn eval_infix_expression(operator: InfixOperator, left: &Object, right: &Object) -> Flow {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => {
            eval_string_infix_expression(operator, l, r).ok_or_else(|| unknown(operator, left, right))
        }
        (Object::Boolean(l), Object::Boolean(r)) => {
            equality(operator, l == r).ok_or_else(|| unknown(operator, left, right))
        }
        (Object::Null, Object::Null) => {
            equality(operator, true).ok_or_else(|| unknown(operator, left, right))
        }
        _ if left.object_type() != right.object_type() => {
            equality(operator, false).ok_or_else(|| {
                raise(RuntimeError::TypeMismatch {
                    left: left.object_type(),
                    operator,
                    right: right.object_type(),
                })
            })
        }
        _ => Err(unknown(operator, left, right)),
    }
}

/// Resolves `==` and `!=` given whether the operands are equal. Any other
/// operator yields `None`.
fn equality(operator: InfixOperator, equal: bool) -> Option<Object> {
    match operator {
        InfixOperator::Eq => Some(Object::from(equal)),
        InfixOperator::NotEq => Some(Object::from(!equal)),
        _ => None,
    }
}

fn unknown(operator: InfixOperator, left: &Object, right: &Object) -> Object {
    raise(RuntimeError::UnknownInfixOperator {
        left: left.object_type(),
        operator,
        right: right.object_type(),
    })
}

fn eval_integer_infix_expression(operator: InfixOperator, left: i64, right: i64) -> Flow {
    let value = match operator {
        InfixOperator::Plus => Object::Integer(left.wrapping_add(right)),
        InfixOperator::Minus => Object::Integer(left.wrapping_sub(right)),
        InfixOperator::Asterisk => Object::Integer(left.wrapping_mul(right)),
        InfixOperator::Slash if right == 0 => {
            return Err(raise(RuntimeError::DivisionByZero(left)));
        }
        InfixOperator::Slash => Object::Integer(left.wrapping_div(right)),
        InfixOperator::Lt => Object::from(left < right),
        InfixOperator::Gt => Object::from(left > right),
        InfixOperator::Eq => Object::from(left == right),
        InfixOperator::NotEq => Object::from(left != right),
    };

    Ok(value)
}

fn eval_string_infix_expression(operator: InfixOperator, left: &str, right: &str) -> Option<Object> {
    match operator {
        InfixOperator::Plus => {
            let mut buffer = String::with_capacity(left.len() + right.len());
            buffer.push_str(left);
            buffer.push_str(right);
            Some(Object::String(buffer))
        }
        _ => equality(operator, left == right),
    }
}

fn eval_index_expression(left: &Object, index: &Object) -> Flow {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL)),
        (Object::Hash(pairs), key) => {
            let key = key.hash_key().map_err(raise)?;
            Ok(pairs.get(&key).map_or(NULL, |pair| pair.value.clone()))
        }
        _ => Err(raise(RuntimeError::IndexNotSupported(left.object_type()))),
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Env) -> Flow {
    let mut hash = IndexMap::with_capacity(pairs.len());

    for (key, value) in pairs {
        let key = eval_expression(key, env)?;
        let hash_key = key.hash_key().map_err(raise)?;
        let value = eval_expression(value, env)?;

        hash.insert(hash_key, HashPair { key, value });
    }

    Ok(Object::Hash(Rc::new(hash)))
}

#[instrument(level = "debug", skip_all)]
fn apply_function(function: &Object, arguments: Vec<Object>) -> Flow {
    match function {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Err(raise(RuntimeError::WrongArgumentCount {
                    got: arguments.len(),
                    want: function.parameters.len(),
                }));
            }

            let mut scope = Environment::enclosed(Rc::clone(&function.env));
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                scope.set(parameter.as_str(), argument);
            }

            match eval_block(&function.body, &scope.into_shared()) {
                Err(Object::ReturnValue(value)) => Ok(*value),
                flow => flow,
            }
        }
        Object::Builtin(builtin) => match builtin.call(&arguments) {
            Object::Error(error) => Err(raise(error)),
            value => Ok(value),
        },
        other => Err(raise(RuntimeError::NotAFunction(other.object_type()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{new_environment, ObjectType};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(source: &str) -> Object {
        let (program, errors) = parse(Lexer::new(source.to_owned()));
        assert_eq!(Vec::<ParseError>::new(), errors, "source: {}", source);

        eval(&program, &new_environment())
    }

    fn array(values: &[i64]) -> Object {
        Object::Array(Rc::new(values.iter().copied().map(Object::Integer).collect()))
    }

    #[rstest]
    #[case("5", 5)]
    #[case("10", 10)]
    #[case("-5", -5)]
    #[case("-10", -10)]
    #[case("5 + 5 + 5 + 5 - 10", 10)]
    #[case("2 * 2 * 2 * 2 * 2", 32)]
    #[case("-50 + 100 + -50", 0)]
    #[case("5 * 2 + 10", 20)]
    #[case("5 + 2 * 10", 25)]
    #[case("20 + 2 * -10", 0)]
    #[case("50 / 2 * 2 + 10", 60)]
    #[case("2 * (5 + 10)", 30)]
    #[case("3 * 3 * 3 + 10", 37)]
    #[case("3 * (3 * 3) + 10", 37)]
    #[case("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50)]
    #[case("5 + 5 * 2", 15)]
    #[case("(5 + 5) * 2", 20)]
    #[case("7 / 2", 3)]
    #[case("-7 / 2", -3)]
    fn it_can_evaluate_integer_expressions(#[case] source: &str, #[case] expected: i64) {
        assert_eq!(Object::Integer(expected), run(source));
    }

    #[test]
    fn it_wraps_on_integer_overflow() {
        assert_eq!(Object::Integer(i64::MIN), run("9223372036854775807 + 1"));
        assert_eq!(Object::Integer(i64::MIN), run("-9223372036854775807 - 1"));
        assert_eq!(
            Object::Integer(i64::MIN),
            run("let min = -9223372036854775807 - 1; min / -1")
        );
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    #[case("1 < 2", true)]
    #[case("1 > 2", false)]
    #[case("1 < 1", false)]
    #[case("1 > 1", false)]
    #[case("1 == 1", true)]
    #[case("1 != 1", false)]
    #[case("1 == 2", false)]
    #[case("1 != 2", true)]
    #[case("true == true", true)]
    #[case("false == false", true)]
    #[case("true == false", false)]
    #[case("true != false", true)]
    #[case("(1 < 2) == true", true)]
    #[case("(1 < 2) == false", false)]
    #[case("(1 > 2) == true", false)]
    #[case("\"monkey\" == \"monkey\"", true)]
    #[case("\"monkey\" != \"monkey\"", false)]
    #[case("\"monkey\" == \"donkey\"", false)]
    #[case("1 == true", false)]
    #[case("1 != \"1\"", true)]
    #[case("!true", false)]
    #[case("!false", true)]
    #[case("!5", false)]
    #[case("!0", false)]
    #[case("!!true", true)]
    #[case("!!false", false)]
    #[case("!!5", true)]
    fn it_can_evaluate_boolean_expressions(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(Object::Boolean(expected), run(source));
    }

    #[rstest]
    #[case("if (true) { 10 }", Object::Integer(10))]
    #[case("if (false) { 10 }", NULL)]
    #[case("if (1) { 10 }", Object::Integer(10))]
    #[case("if (0) { 10 } else { 20 }", Object::Integer(10))]
    #[case("if (1 < 2) { 10 }", Object::Integer(10))]
    #[case("if (1 > 2) { 10 }", NULL)]
    #[case("if (1 > 2) { 10 } else { 20 }", Object::Integer(20))]
    #[case("if (1 < 2) { 10 } else { 20 }", Object::Integer(10))]
    fn it_can_evaluate_if_expressions(#[case] source: &str, #[case] expected: Object) {
        assert_eq!(expected, run(source));
    }

    #[rstest]
    #[case("return 10;", 10)]
    #[case("return 10; 9;", 10)]
    #[case("return 2 * 5; 9;", 10)]
    #[case("9; return 2 * 5; 9;", 10)]
    #[case("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10)]
    #[case("let f = fn(x) { return x; x + 10; }; f(10);", 10)]
    #[case("let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);", 20)]
    #[case("let f = fn() { 1 + if (true) { return 2; } }; f()", 2)]
    fn it_stops_at_the_first_return(#[case] source: &str, #[case] expected: i64) {
        assert_eq!(Object::Integer(expected), run(source));
    }

    #[rstest]
    #[case("5 + true;", "type mismatch: INTEGER + BOOLEAN")]
    #[case("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN")]
    #[case("1 < \"one\"", "type mismatch: INTEGER < STRING")]
    #[case("-true", "unknown operator: -BOOLEAN")]
    #[case("-\"a\"", "unknown operator: -STRING")]
    #[case("true + false;", "unknown operator: BOOLEAN + BOOLEAN")]
    #[case("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN")]
    #[case("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN")]
    #[case(
        "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
        "unknown operator: BOOLEAN + BOOLEAN"
    )]
    #[case("\"Hello\" - \"World\"", "unknown operator: STRING - STRING")]
    #[case("[1, 2] == [1, 2]", "unknown operator: ARRAY == ARRAY")]
    #[case("{} != {}", "unknown operator: HASH != HASH")]
    #[case("foobar", "identifier not found: foobar")]
    #[case("let f = fn() { undefined(); 5 }; f()", "identifier not found: undefined")]
    #[case("[1, foo, bar]", "identifier not found: foo")]
    #[case("let add = fn(a, b) { a + b }; add(foo, bar)", "identifier not found: foo")]
    #[case("10 / 0", "division by zero: 10 / 0")]
    #[case("1(2)", "not a function: INTEGER")]
    #[case("\"f\"()", "not a function: STRING")]
    #[case("fn(x) { x }(1, 2)", "wrong number of arguments. got=2, want=1")]
    #[case("fn(x, y) { x }(1)", "wrong number of arguments. got=1, want=2")]
    #[case("5[0]", "index operator not supported: INTEGER")]
    #[case("{\"name\": \"Monkey\"}[fn(x) { x }];", "unusable as hash key: FUNCTION")]
    #[case("{\"a\": 1}[[1]]", "unusable as hash key: ARRAY")]
    #[case("{[1]: 2}", "unusable as hash key: ARRAY")]
    #[case("len(1)", "argument to `len` not supported, got INTEGER")]
    #[case("len(\"one\", \"two\")", "wrong number of arguments. got=2, want=1")]
    #[case("push(1, 1)", "argument to `push` not supported, got INTEGER")]
    fn it_reports_runtime_errors(#[case] source: &str, #[case] message: &str) {
        match run(source) {
            Object::Error(error) => assert_eq!(message, error.to_string()),
            other => panic!("expected an error for {}, got {:?}", source, other),
        }
    }

    #[test]
    fn it_reports_errors_through_inspect() {
        assert_eq!("ERROR: type mismatch: INTEGER + BOOLEAN", run("5 + true;").inspect());
        assert_eq!(
            Object::Error(RuntimeError::IdentifierNotFound("foobar".to_owned())),
            run("foobar;")
        );
    }

    #[rstest]
    #[case("let a = 5; a;", 5)]
    #[case("let a = 5 * 5; a;", 25)]
    #[case("let a = 5; let b = a; b;", 5)]
    #[case("let a = 5; let b = a; let c = a + b + 5; c;", 15)]
    fn it_can_bind_names(#[case] source: &str, #[case] expected: i64) {
        assert_eq!(Object::Integer(expected), run(source));
    }

    #[test]
    fn it_yields_null_for_a_trailing_let() {
        assert_eq!(NULL, run("let a = 5;"));
        assert_eq!(NULL, run(""));
    }

    #[test]
    fn it_can_create_a_function_object() {
        match run("fn(x) { x + 2; };") {
            Object::Function(function) => {
                assert_eq!(vec!["x".to_owned()], function.parameters);
                assert_eq!("(x + 2)", function.body.to_string());
            }
            other => panic!("expected a function, got {:?}", other),
        }

        assert_eq!("fn(x, y) { (x + y) }", run("fn(x, y) { x + y }").inspect());
    }

    #[rstest]
    #[case("let identity = fn(x) { x; }; identity(5);", 5)]
    #[case("let identity = fn(x) { return x; }; identity(5);", 5)]
    #[case("let double = fn(x) { x * 2; }; double(5);", 10)]
    #[case("let add = fn(x, y) { x + y; }; add(5, 5);", 10)]
    #[case("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20)]
    #[case("fn(x) { x; }(5)", 5)]
    #[case("let a = fn(x) { x + 1; }; a(5);", 6)]
    #[case("let x = 1; let f = fn(x) { x }; f(5) + x", 6)]
    #[case(
        "let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } }; fib(10);",
        55
    )]
    fn it_can_apply_functions(#[case] source: &str, #[case] expected: i64) {
        assert_eq!(Object::Integer(expected), run(source));
    }

    #[test]
    fn it_returns_null_from_a_body_without_a_value() {
        assert_eq!(NULL, run("let f = fn() { }; f()"));
        assert_eq!(NULL, run("let f = fn() { let x = 1; }; f()"));
    }

    #[rstest]
    #[case("let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(3);")]
    #[case("let newAdder = fn(x) { fn(y) { x + y }; }; newAdder(2)(3);")]
    #[case("let outer = fn(a) { fn(b) { fn(c) { a + b + c } } }; outer(1)(1)(3);")]
    fn it_captures_the_defining_scope(#[case] source: &str) {
        assert_eq!(Object::Integer(5), run(source));
    }

    #[test]
    fn it_sees_bindings_made_after_a_closure_was_created() {
        assert_eq!(
            Object::Integer(2),
            run("let x = 1; let f = fn() { x }; let x = 2; f();")
        );
    }

    #[test]
    fn it_does_not_leak_parameters_into_the_caller() {
        assert_eq!(
            Object::Error(RuntimeError::IdentifierNotFound("y".to_owned())),
            run("let f = fn(y) { y }; f(1); y")
        );
    }

    #[test]
    fn it_can_evaluate_strings() {
        assert_eq!(Object::String("Hello World!".to_owned()), run("\"Hello World!\""));
        assert_eq!(
            Object::String("Hello World!".to_owned()),
            run("\"Hello\" + \" \" + \"World!\"")
        );
    }

    #[rstest]
    #[case("len(\"\")", Object::Integer(0))]
    #[case("len(\"four\")", Object::Integer(4))]
    #[case("len(\"hello world\")", Object::Integer(11))]
    #[case("len([1, 2, 3])", Object::Integer(3))]
    #[case("first([1, 2, 3])", Object::Integer(1))]
    #[case("last([1, 2, 3])", Object::Integer(3))]
    #[case("rest([1, 2, 3])", array(&[2, 3]))]
    #[case("push([], 1)", array(&[1]))]
    #[case("first([])", NULL)]
    #[case("let len = fn(x) { 42 }; len(\"a\")", Object::Integer(42))]
    fn it_can_call_builtins(#[case] source: &str, #[case] expected: Object) {
        assert_eq!(expected, run(source));
    }

    #[test]
    fn it_resolves_builtins_as_values() {
        assert_eq!(Object::Builtin(Builtin::Len), run("len"));
        assert_eq!(Object::Integer(2), run("let size = len; size([1, 2])"));
    }

    #[rstest]
    #[case("[1, 2, 3][0]", Object::Integer(1))]
    #[case("[1, 2, 3][1]", Object::Integer(2))]
    #[case("[1, 2, 3][2]", Object::Integer(3))]
    #[case("let i = 0; [1][i];", Object::Integer(1))]
    #[case("[1, 2, 3][1 + 1];", Object::Integer(3))]
    #[case("let myArray = [1, 2, 3]; myArray[2];", Object::Integer(3))]
    #[case("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", Object::Integer(6))]
    #[case("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Object::Integer(2))]
    #[case("[1, 2, 3][3]", NULL)]
    #[case("[1, 2, 3][-1]", NULL)]
    #[case("[][0]", NULL)]
    fn it_can_index_arrays(#[case] source: &str, #[case] expected: Object) {
        assert_eq!(expected, run(source));
    }

    #[test]
    fn it_can_evaluate_array_literals() {
        assert_eq!(array(&[1, 4, 6]), run("[1, 2 * 2, 3 + 3]"));
    }

    #[test]
    fn it_can_map_and_reduce_with_builtins() {
        let map = "
            let map = fn(arr, f) {
                let iter = fn(arr, accumulated) {
                    if (len(arr) == 0) {
                        accumulated
                    } else {
                        iter(rest(arr), push(accumulated, f(first(arr))));
                    }
                };
                iter(arr, []);
            };
            let double = fn(x) { x * 2 };
            map([1, 2, 3, 4], double);
        ";
        assert_eq!(array(&[2, 4, 6, 8]), run(map));

        let sum = "
            let reduce = fn(arr, initial, f) {
                let iter = fn(arr, result) {
                    if (len(arr) == 0) { result } else { iter(rest(arr), f(result, first(arr))) }
                };
                iter(arr, initial);
            };
            reduce([1, 2, 3, 4, 5], 0, fn(acc, el) { acc + el });
        ";
        assert_eq!(Object::Integer(15), run(sum));
    }

    #[test]
    fn it_can_evaluate_hash_literals() {
        let source = "
            let two = \"two\";
            {
                \"one\": 10 - 9,
                two: 1 + 1,
                \"thr\" + \"ee\": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }
        ";

        let pairs = match run(source) {
            Object::Hash(pairs) => pairs,
            other => panic!("expected a hash, got {:?}", other),
        };

        let expected = vec![
            (Object::String("one".to_owned()), 1),
            (Object::String("two".to_owned()), 2),
            (Object::String("three".to_owned()), 3),
            (Object::Integer(4), 4),
            (Object::Boolean(true), 5),
            (Object::Boolean(false), 6),
        ];

        assert_eq!(expected.len(), pairs.len());
        for (key, value) in expected {
            let pair = &pairs[&key.hash_key().unwrap()];
            assert_eq!(key, pair.key);
            assert_eq!(Object::Integer(value), pair.value);
        }
    }

    #[test]
    fn it_keeps_the_last_value_for_a_repeated_key() {
        assert_eq!("{a:2}", run("{\"a\": 1, \"a\": 2}").inspect());
        assert_eq!("{a:1, b:[1, 2]}", run("{\"a\": 1, \"b\": [1, 2]}").inspect());
    }

    #[rstest]
    #[case("{\"foo\": 5}[\"foo\"]", Object::Integer(5))]
    #[case("{\"foo\": 5}[\"bar\"]", NULL)]
    #[case("let key = \"foo\"; {\"foo\": 5}[key]", Object::Integer(5))]
    #[case("{}[\"foo\"]", NULL)]
    #[case("{5: 5}[5]", Object::Integer(5))]
    #[case("{true: 5}[true]", Object::Integer(5))]
    #[case("{false: 5}[false]", Object::Integer(5))]
    #[case("{1: \"int\", true: \"bool\"}[true]", Object::String("bool".to_owned()))]
    fn it_can_index_hashes(#[case] source: &str, #[case] expected: Object) {
        assert_eq!(expected, run(source));
    }

    #[test]
    fn it_keeps_bindings_across_a_session() {
        let mut interpreter = Interpreter::new();

        assert_eq!(Ok(NULL), interpreter.run("let x = 5;"));
        assert_eq!(Ok(Object::Integer(10)), interpreter.run("x * 2"));
        assert_eq!(
            Ok(Object::Integer(15)),
            interpreter.run("let triple = fn(n) { n * 3 }; triple(x)")
        );
    }

    #[test]
    fn it_refuses_to_run_source_with_diagnostics() {
        let mut interpreter = Interpreter::new();

        assert_eq!(
            Err(vec![ParseError::NoPrefixParseFn(
                crate::core::TokenKind::RParen
            )]),
            interpreter.run(")")
        );
    }

    #[test]
    fn it_can_share_an_environment_with_the_host() {
        let env = new_environment();
        env.borrow_mut().set("answer", Object::Integer(42));

        let mut interpreter = Interpreter::with_environment(Rc::clone(&env));
        assert_eq!(Ok(Object::Integer(43)), interpreter.run("answer + 1"));

        interpreter.run("let seen = true;").unwrap();
        assert_eq!(Ok(Object::Boolean(true)), env.borrow().get("seen"));
        assert!(Rc::ptr_eq(&env, interpreter.environment()));
    }

    #[test]
    fn it_names_object_types() {
        assert_eq!(ObjectType::Function, run("fn() { 1 }").object_type());
        assert_eq!(ObjectType::Builtin, run("puts").object_type());
        assert_eq!(ObjectType::Hash, run("{}").object_type());
    }
}
