//! Tests for the line classifier.

use rstest::rstest;

use super::*;

fn categories(text: &str) -> Vec<Category> {
    let classifier = LineClassifier::scan(text);
    (0..line_ranges(text).len())
        .map(|line| classifier.line_category(line).expect("line exists"))
        .collect()
}

#[test]
fn plain_paragraphs_are_text() {
    assert_eq!(
        categories("one line\nanother\n\nthird"),
        vec![Category::Text; 4]
    );
}

#[test]
fn fenced_blocks_are_source() {
    use Category::{SourceBlock, Text};
    assert_eq!(
        categories("intro\n```rust\nlet x = 1;\n```\nafter"),
        vec![Text, SourceBlock, SourceBlock, SourceBlock, Text]
    );
}

#[test]
fn directive_body_is_source_until_dedent() {
    use Category::{SourceBlock, Text};
    let text = ".. code-block:: python\n\n   print(1)\n\n   print(2)\n\nback to text";
    assert_eq!(
        categories(text),
        vec![
            SourceBlock,
            SourceBlock,
            SourceBlock,
            SourceBlock,
            SourceBlock,
            Text,
            Text
        ]
    );
}

#[test]
fn literal_block_follows_double_colon() {
    use Category::{LiteralBlock, Text};
    let text = "Example::\n\n    raw   text\n    kept\n\nNormal again.";
    assert_eq!(
        categories(text),
        vec![Text, LiteralBlock, LiteralBlock, LiteralBlock, Text, Text]
    );
}

#[test]
fn double_colon_without_blank_line_is_not_literal() {
    assert_eq!(
        categories("* item::\n  continued"),
        vec![Category::Text, Category::Text]
    );
}

#[rstest]
#[case("Title\n=====\n\nBody", vec![Category::SectionHeading, Category::SectionHeading, Category::Text, Category::Text])]
#[case("=====\nTitle\n=====\nBody", vec![Category::SectionHeading, Category::SectionHeading, Category::SectionHeading, Category::Text])]
#[case("Long title\n---\nBody", vec![Category::Text, Category::Text, Category::Text])]
fn headings_need_adornment_as_long_as_title(#[case] text: &str, #[case] expected: Vec<Category>) {
    assert_eq!(categories(text), expected);
}

#[rstest]
#[case("| a | b |")]
#[case("+----+----+")]
#[case("  +====+")]
fn table_lines(#[case] line: &str) {
    assert_eq!(categories(line), vec![Category::Table]);
}

#[test]
fn offsets_resolve_to_their_line() {
    let text = "para\n```\ncode\n```\n";
    let classifier = LineClassifier::scan(text);
    assert_eq!(classifier.content_type_at(0), Some(Category::Text));
    assert_eq!(classifier.content_type_at(4), Some(Category::Text));
    assert_eq!(classifier.content_type_at(5), Some(Category::SourceBlock));
    assert_eq!(classifier.content_type_at(11), Some(Category::SourceBlock));
    assert_eq!(classifier.content_type_at(text.len()), Some(Category::Text));
    assert_eq!(classifier.content_type_at(text.len() + 1), None);
}

#[test]
fn only_text_is_reflowable() {
    assert!(Category::Text.is_reflowable());
    for category in [
        Category::LiteralBlock,
        Category::SectionHeading,
        Category::Table,
        Category::SourceBlock,
    ] {
        assert!(!category.is_reflowable());
    }
}
