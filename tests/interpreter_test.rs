use std::{
    fs::{read_dir, read_to_string},
    path::Path,
    str::FromStr,
};

use color_eyre::{eyre::Context, Result};
use lin::{
    interpreter::{context::BufferedContext, SystemContext, TreeWalkInterpreter},
    lexer::LineBreaks,
    parser::Parser,
    value::{
        error::RuntimeErrorKind,
        formatter::{BasicFormatter, ValueFormatter},
    },
};
use proptest::prelude::*;

#[test]
fn test_arithmetic() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/arithmetic");
    test_engine(input_dir)
}

#[test]
fn test_comparison() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/comparison");
    test_engine(input_dir)
}

#[test]
fn test_string() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/string");
    test_engine(input_dir)
}

#[test]
fn test_char() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/char");
    test_engine(input_dir)
}

#[test]
fn test_array() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/array");
    test_engine(input_dir)
}

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_scope() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/scope");
    test_engine(input_dir)
}

#[test]
fn test_if() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/if");
    test_engine(input_dir)
}

#[test]
fn test_while() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/while");
    test_engine(input_dir)
}

#[test]
fn test_function() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/function");
    test_engine(input_dir)
}

#[test]
fn test_builtin() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/builtin");
    test_engine(input_dir)
}

#[test]
fn test_syntax() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/syntax");
    test_engine(input_dir)
}

#[test]
fn runtime_error_reports_line_and_column() {
    let source = "x = 1;\ny = x + true;\n";
    let program = Parser::new(source).parse().expect("Program is valid.");
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let error = interpreter
        .run(&program)
        .expect_err("Adding a bool to an int fails.");
    assert_eq!(
        BasicFormatter::new(source).format_error(&error),
        "(2:5) TypeError: unexpected arguments of operator +: int and bool"
    );
    assert_eq!(error.code(), "RT001");
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let source = "print(\"a\", 1);\nprintln(missing);\n";
    let program = Parser::new(source).parse().expect("Program is valid.");
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let error = interpreter
        .run(&program)
        .expect_err("missing is not defined.");
    assert_eq!(error.category(), "RuntimeError");
    assert_eq!(interpreter.into_context().into_data(), "a1");
}

/// Output sink that refuses every write, like a closed pipe.
struct ClosedOutput;

impl SystemContext for ClosedOutput {
    fn write(&mut self, _text: &str) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ))
    }

    fn read_token(&mut self) -> Option<String> {
        None
    }
}

#[test]
fn failed_output_stops_the_program() {
    let source = "x = 1;\nprintln(x);\nprintln(undefined_after);\n";
    let program = Parser::new(source).parse().expect("Program is valid.");
    let mut interpreter = TreeWalkInterpreter::new(ClosedOutput);
    let error = interpreter
        .run(&program)
        .expect_err("Output can not be written.");
    assert_eq!(
        error.kind,
        RuntimeErrorKind::OutputFailed("pipe closed".into())
    );
    assert_eq!(error.category(), "RuntimeError");
    assert_eq!(error.code(), "RT014");
}

struct TestCase {
    name: String,
    source: String,
    input: String,
    output: String,
    parse_errors: String,
    runtime_errors: String,
}

impl TestCase {
    pub fn check(&self) {
        let line_breaks = LineBreaks::new(&self.source);

        let mut parser = Parser::new(&self.source);
        let program = match parser.parse() {
            Ok(program) => program,
            Err(e) => {
                let line = line_breaks.get_line_from_span(e.span);
                let actual = format!("({line}) {}: {}", e.category(), e.kind);
                assert_eq!(
                    self.parse_errors, actual,
                    "Failed test {} at parse stage.",
                    self.name,
                );
                return;
            }
        };
        assert!(
            self.parse_errors.is_empty(),
            "Failed test {}: expected a parse error.",
            self.name
        );

        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::with_input(&self.input));
        let result = interpreter.run(&program);
        let output = interpreter.into_context().into_data();
        assert_eq!(self.output, output, "Failed test {} at print.", self.name);

        match result {
            Ok(()) => assert!(
                self.runtime_errors.is_empty(),
                "Failed test {}: expected a runtime error.",
                self.name
            ),
            Err(e) => {
                let line = line_breaks.get_line_from_span(e.span);
                let actual = format!("({line}) {}: {}", e.category(), e.kind);
                assert_eq!(
                    self.runtime_errors, actual,
                    "Failed test {} at runtime.",
                    self.name,
                );
            }
        }
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "lin" {
            continue;
        }

        println!("Parsing {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    if !succeeded {
        assert!(false);
    }

    Ok(())
}

fn strip_directive<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let comment_index = line.find(directive)?;
    line[comment_index..]
        .strip_prefix(directive)
        .map(|rest| rest.trim())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;

    let mut source_lines = Vec::new();
    let mut stdin_tokens = Vec::new();
    let mut expected_outputs = Vec::new();
    let mut expected_parse_errors = Vec::new();
    let mut expected_runtime_errors = Vec::new();

    for (line_index, line) in input.lines().enumerate() {
        if let Some(expected) = strip_directive(line, "// expect:") {
            expected_outputs.push(expected.to_string());
        } else if let Some(expected) = strip_directive(line, "// expect parse error:") {
            expected_parse_errors.push(format!("({}) {expected}", line_index + 1));
        } else if let Some(expected) = strip_directive(line, "// expect runtime error:") {
            expected_runtime_errors.push(format!("({}) {expected}", line_index + 1));
        } else if let Some(tokens) = strip_directive(line, "// input:") {
            stdin_tokens.push(tokens.to_string());
        }
        source_lines.push(line.to_string());
    }

    let output = if expected_outputs.is_empty() {
        String::new()
    } else {
        expected_outputs.push(String::from_str("")?);
        expected_outputs.join("\n")
    };
    Ok(TestCase {
        name: test_name.into_owned(),
        source: source_lines.join("\n"),
        input: stdin_tokens.join(" "),
        output,
        parse_errors: expected_parse_errors.join("\n"),
        runtime_errors: expected_runtime_errors.join("\n"),
    })
}

// Property-based tests

fn run(source: &str) -> (String, Option<String>) {
    let program = Parser::new(source)
        .parse()
        .expect("Generated programs are syntactically valid.");
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let error = interpreter
        .run(&program)
        .err()
        .map(|e| format!("{}: {}", e.category(), e.kind));
    (interpreter.into_context().into_data(), error)
}

/// Source text for any `i64`, including ones whose magnitude has no literal form.
fn int_literal(value: i64) -> String {
    if value >= 0 {
        value.to_string()
    } else {
        format!("(0 - {} - 1)", -(value + 1))
    }
}

fn value_literal_strategy() -> impl Strategy<Value = (String, &'static str)> {
    prop_oneof![
        any::<i32>().prop_map(|v| (format!("({v})"), "int")),
        (-1000.0f64..1000.0).prop_map(|v| (format!("({v:.3})"), "double")),
        "[a-z ]{0,8}".prop_map(|s| (format!("\"{s}\""), "string")),
        any::<bool>().prop_map(|v| (format!("{v}"), "bool")),
        "[a-z]".prop_map(|s| (format!("'{s}'"), "char")),
        Just(("null".to_string(), "null")),
        prop::collection::vec(any::<i16>(), 0..4).prop_map(|v| {
            let elements: Vec<String> = v.iter().map(|e| format!("({e})")).collect();
            (format!("[{}]", elements.join(", ")), "array")
        }),
    ]
}

proptest! {
    #[test]
    fn integer_arithmetic_matches_native(a in any::<i64>(), b in any::<i64>()) {
        let source = format!(
            "a = {}; b = {}; println(a + b, a - b, a * b);",
            int_literal(a),
            int_literal(b),
        );
        let (output, error) = run(&source);
        prop_assert_eq!(error, None);
        let expected = format!(
            "{}\n{}\n{}\n",
            a.wrapping_add(b),
            a.wrapping_sub(b),
            a.wrapping_mul(b)
        );
        prop_assert_eq!(output, expected);
    }

    #[test]
    fn string_repeat_matches_native(text in "[a-z]{0,5}", count in -3i64..8) {
        let source = format!(
            "println(\"{text}\" * ({count}));\nprintln(({count}) * \"{text}\");"
        );
        let (output, error) = run(&source);
        prop_assert_eq!(error, None);
        let repeated = text.repeat(count.max(0) as usize);
        prop_assert_eq!(output, format!("{repeated}\n{repeated}\n"));
    }

    #[test]
    fn typeof_names_every_kind((literal, kind) in value_literal_strategy()) {
        let source = format!("println(typeof({literal}));");
        let (output, error) = run(&source);
        prop_assert_eq!(error, None);
        prop_assert_eq!(output, format!("{kind}\n"));
    }

    #[test]
    fn typeof_rejects_wrong_arity(count in prop_oneof![Just(0usize), 2usize..5]) {
        let arguments: Vec<String> = (0..count).map(|i| i.to_string()).collect();
        let source = format!("typeof({});", arguments.join(", "));
        let (_, error) = run(&source);
        prop_assert_eq!(
            error,
            Some(format!("ArgumentError: typeof expects 1 arguments but got {count}"))
        );
    }
}
