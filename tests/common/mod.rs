//! Utility helpers shared across integration tests.

use hardwrap::line_util::columns;

/// Build a `Vec<String>` from a list of string slices.
///
/// Used to spell out expected output one line at a time.
macro_rules! lines_vec {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

/// Split `text` into owned lines for comparison with [`lines_vec!`].
pub fn lines_of(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Assert common wrapping expectations for a list item.
///
/// Verifies the number of lines, the bullet on the first line, the width of
/// every line and that continuation lines are aligned under the item text.
pub fn assert_wrapped_list_item(output: &[String], prefix: &str, width: usize, expected: usize) {
    assert!(expected > 0, "expected line count must be positive");
    assert!(!output.is_empty(), "output slice is empty");
    assert_eq!(output.len(), expected, "unexpected line count: {output:?}");
    assert!(output.first().is_some_and(|line| line.starts_with(prefix)));
    let indent = " ".repeat(columns(prefix));
    for line in output.iter().skip(1) {
        assert!(line.starts_with(&indent), "misaligned line {line:?}");
        assert!(!line[indent.len()..].starts_with(' '), "over-indented line {line:?}");
    }
    assert_within_width(output, width);
}

/// Assert no line is wider than `width` unless it is a single word.
pub fn assert_within_width(output: &[String], width: usize) {
    for line in output {
        let single_word = !line.trim().contains(char::is_whitespace);
        assert!(
            columns(line) <= width || single_word,
            "line {line:?} exceeds {width} columns"
        );
    }
}
