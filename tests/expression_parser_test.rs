use color_eyre::eyre::{Context, Result};
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use lin::parser::{
    formatter::{BasicParserFormatter, ExpressionFormatter, ParserFormatter, SExpressionFormatter},
    Parser,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let mut parser = Parser::new(input);
    let result = parser.parse_expression();
    let actual = match result {
        Ok(ref tree) => SExpressionFormatter.format(tree),
        Err(ref e) => BasicParserFormatter::new(input).format_error(e),
    };

    assert_eq!(actual, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("", "(1:1) SyntaxError: Expected a non-EOF token.", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

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

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(&output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    if !succeeded {
        assert!(false);
    }

    Ok(())
}

#[test]
fn assignment_is_right_associative() {
    check("a = b = c", "(= a (= b c))", "right associative assignment");
}

#[test]
fn subtraction_is_left_associative() {
    check("1 - 2 - 3", "(- (- 1 2) 3)", "left associative subtraction");
}

#[test]
fn assignment_inside_call_argument() {
    check("f(x = 2)", "(call f (= x 2))", "assignment as argument");
}

#[test]
fn char_and_string_escapes_are_decoded() {
    check(
        r#"'\n' + "a\tb""#,
        r#"(+ '\n' "a\tb")"#,
        "decoded escapes",
    );
}

#[test]
fn group_can_not_be_assigned() {
    check(
        "(a) = 1",
        "(1:1) SyntaxError: can not assign to this expression.",
        "group target",
    );
}
