use lin::{
    lexer::Span,
    value::{
        error::{RuntimeError, RuntimeErrorKind},
        formatter::{BasicFormatter, PrettyFormatter, ValueFormatter},
        Value, ValueKind,
    },
};
use std::path::Path;

#[test]
fn renders_doubles_with_six_digits() {
    assert_eq!(Value::Double(1.5).to_string(), "1.500000");
    assert_eq!(Value::Double(-0.25).to_string(), "-0.250000");
}

#[test]
fn renders_nested_arrays_without_spaces() {
    let value = Value::Array(vec![
        Value::Int(1),
        Value::Array(vec![Value::Char('a'), Value::Null]),
        Value::String("x y".into()),
    ]);
    assert_eq!(value.to_string(), "[1,[a,null],x y]");
}

#[test]
fn string_concatenation_renders_other_operand() {
    let lhs = Value::String("n=".into());
    assert_eq!(lhs.add(&Value::Double(2.0)), Ok(Value::String("n=2.000000".into())));
    let rhs = Value::String("!".into());
    assert_eq!(
        Value::Array(vec![Value::Int(1)]).add(&rhs),
        Ok(Value::String("[1]!".into()))
    );
}

#[test]
fn array_append_puts_other_operand_last() {
    let array = Value::Array(vec![Value::Int(1), Value::Int(2)]);
    let expected = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(array.add(&Value::Int(3)), Ok(expected.clone()));
    assert_eq!(Value::Int(3).add(&array), Ok(expected));
}

#[test]
fn repeat_with_non_positive_count_is_empty() {
    let text = Value::String("ab".into());
    assert_eq!(text.multiply(&Value::Int(0)), Ok(Value::String("".into())));
    assert_eq!(Value::Int(-2).multiply(&text), Ok(Value::String("".into())));
    let array = Value::Array(vec![Value::Int(1)]);
    assert_eq!(array.multiply(&Value::Int(-1)), Ok(Value::Array(vec![])));
}

#[test]
fn repeat_with_huge_count_fails_instead_of_allocating() {
    let text = Value::String("ab".into());
    assert_eq!(
        text.multiply(&Value::Int(i64::MAX)),
        Err(RuntimeErrorKind::RepeatTooLarge {
            length: 2,
            count: i64::MAX
        })
    );
    let array = Value::Array(vec![Value::Null]);
    assert_eq!(
        Value::Int(i64::MAX).multiply(&array),
        Err(RuntimeErrorKind::RepeatTooLarge {
            length: 1,
            count: i64::MAX
        })
    );
}

#[test]
fn repeat_of_empty_value_ignores_count() {
    let empty = Value::String("".into());
    assert_eq!(empty.multiply(&Value::Int(i64::MAX)), Ok(Value::String("".into())));
    let array = Value::Array(vec![]);
    assert_eq!(array.multiply(&Value::Int(i64::MAX)), Ok(Value::Array(vec![])));
}

#[test]
fn char_arithmetic_stays_a_char() {
    assert_eq!(Value::Char('a').add(&Value::Int(1)), Ok(Value::Char('b')));
    assert_eq!(Value::Int(2).add(&Value::Char('a')), Ok(Value::Char('c')));
    assert_eq!(Value::Char('c').subtract(&Value::Int(2)), Ok(Value::Char('a')));
    assert_eq!(
        Value::Char('a').subtract(&Value::Int(200)),
        Err(RuntimeErrorKind::InvalidCharacter(-103))
    );
}

#[test]
fn integer_division_by_zero_fails() {
    assert_eq!(
        Value::Int(1).divide(&Value::Int(0)),
        Err(RuntimeErrorKind::DivisionByZero)
    );
    assert_eq!(
        Value::Int(1).modulo(&Value::Int(0)),
        Err(RuntimeErrorKind::DivisionByZero)
    );
    assert_eq!(
        Value::Double(1.0).divide(&Value::Int(0)),
        Ok(Value::Double(f64::INFINITY))
    );
}

#[test]
fn equality_rejects_mixed_kinds() {
    assert_eq!(Value::Null.is_equal(&Value::Null), Ok(Value::Bool(true)));
    assert_eq!(Value::Null.is_not_equal(&Value::Null), Ok(Value::Bool(false)));
    assert_eq!(
        Value::Int(1).is_equal(&Value::Double(1.0)),
        Err(RuntimeErrorKind::InvalidOperands {
            operator: "==",
            lhs: ValueKind::Int,
            rhs: ValueKind::Double,
        })
    );
}

#[test]
fn strings_compare_lexicographically() {
    let apple = Value::String("apple".into());
    let banana = Value::String("banana".into());
    assert_eq!(apple.less_than(&banana), Ok(Value::Bool(true)));
    assert_eq!(apple.greater_than_or_equal(&banana), Ok(Value::Bool(false)));
}

#[test]
fn unary_operators_check_kind() {
    assert_eq!(Value::Int(5).bit_not(), Ok(Value::Int(-6)));
    assert_eq!(Value::Bool(true).logical_not(), Ok(Value::Bool(false)));
    assert_eq!(
        Value::String("x".into()).negate(),
        Err(RuntimeErrorKind::InvalidOperand {
            operator: "-",
            operand: ValueKind::String,
        })
    );
}

#[test]
fn basic_formatter_renders_values_and_positions() {
    let source = "x = 1;\ny = x / 0;\n";
    let formatter = BasicFormatter::new(source);
    assert_eq!(formatter.format(&Value::Double(0.5)), "0.500000");
    let error = RuntimeError {
        kind: RuntimeErrorKind::DivisionByZero,
        span: Span::new(11.into(), 16.into()),
    };
    assert_eq!(
        formatter.format_error(&error),
        "(2:5) RuntimeError: division by zero"
    );
}

#[test]
fn pretty_formatter_includes_code_and_message() {
    let source = "y = 1 / 0;\n";
    let error = RuntimeError {
        kind: RuntimeErrorKind::DivisionByZero,
        span: Span::new(4.into(), 9.into()),
    };
    let report = PrettyFormatter::new(source, Path::new("main.lin")).format_error(&error);
    assert!(report.contains("RT010"));
    assert!(report.contains("RuntimeError: division by zero"));
    assert!(report.contains("main.lin"));
}
