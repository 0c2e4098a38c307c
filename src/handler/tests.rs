//! Tests for the handler pipeline.

use rstest::rstest;

use super::{
    transform::{
        WrapShape,
        apply_edit,
        convert_to_single_line,
        replace_internal_sentinels,
        wrap_single_line,
    },
    *,
};
use crate::{buffer::Document, line_util::SENTINEL};

const S: char = SENTINEL;

fn shape(width: usize) -> WrapShape<'static> {
    WrapShape {
        first_indent: "",
        indent: "",
        width,
        delimiter: "\n",
    }
}

fn layout(max_width: usize) -> WrapLayout {
    WrapLayout {
        max_width,
        tab_width: 4,
    }
}

/// Run the full handler sequence against `text` and return the output and
/// the absolute caret.
fn run(
    handler: &mut dyn WrappingHandler,
    text: &str,
    edit: &PendingEdit,
    width: usize,
) -> Result<(String, Option<usize>), ReflowError> {
    let doc = Document::new(text);
    let last = doc.line_count() - 1;
    let span = BlockSpan::from_lines(&doc, 0, last).expect("span");
    handler.setup(&doc, &span, edit.caret_reference())?;
    handler.apply_edit(edit)?;
    let out = handler.wrap(layout(width))?;
    Ok((out, handler.reference_offset()))
}

#[rstest]
#[case("abc", Some(1), PendingEdit::insert(3, "d"), "abcd", Some(1))]
#[case("abc", Some(3), PendingEdit::insert(3, "d"), "abcd", Some(4))]
#[case("abcdef", Some(4), PendingEdit::new(1, 3, "X"), "aXef", Some(2))]
#[case("abcdef", Some(2), PendingEdit::new(1, 3, "X"), "aXef", Some(2))]
#[case("abcdef", Some(5), PendingEdit::delete(1, 2), "adef", Some(3))]
#[case("ab", Some(1), PendingEdit::insert(1, "\r\n\n"), "a\u{E000}b", Some(4))]
fn edits_move_the_reference(
    #[case] text: &str,
    #[case] reference: Option<usize>,
    #[case] edit: PendingEdit,
    #[case] expected: &str,
    #[case] expected_ref: Option<usize>,
) {
    let out = apply_edit(text, reference, &edit).expect("edit fits");
    assert_eq!(out.text, expected);
    assert_eq!(out.reference, expected_ref);
}

#[rstest]
#[case(PendingEdit::delete(2, 5))]
#[case(PendingEdit::insert(9, "x"))]
#[case(PendingEdit::insert(2, "x"))]
fn edits_outside_the_text_fail(#[case] edit: PendingEdit) {
    assert!(matches!(
        apply_edit("héllo", None, &edit),
        Err(ReflowError::EditOutsideBlock { .. })
    ));
}

#[rstest]
#[case("one\n  two\nthree", None, "one two three", None)]
#[case("one   \n  two", Some(5), "one two", Some(4))]
#[case("one\n  two", Some(6), "one two", Some(4))]
#[case("one\n  two", Some(4), "one two", Some(4))]
#[case("one\n\n\ntwo", Some(5), "one two", Some(3))]
#[case("  lead\n  more", Some(1), "  lead more", Some(1))]
#[case("  lead\n  more", Some(10), "  lead more", Some(8))]
#[case("one\ntwo  ", Some(9), "one two  ", Some(9))]
#[case("a\r\nb", Some(3), "a b", Some(2))]
fn lines_join_with_one_space(
    #[case] text: &str,
    #[case] reference: Option<usize>,
    #[case] expected: &str,
    #[case] expected_ref: Option<usize>,
) {
    let out = convert_to_single_line(text, reference);
    assert_eq!(out.text, expected);
    assert_eq!(out.reference, expected_ref);
}

#[test]
fn wraps_at_the_last_fitting_space() {
    let out = wrap_single_line("aaa bbb ccc ddd", Some(9), shape(7));
    assert_eq!(out.text, "aaa bbb\nccc ddd");
    assert_eq!(out.reference, Some(9));
}

#[test]
fn caret_at_the_break_stays_on_its_line() {
    let out = wrap_single_line("aaaaxx bbbb cccc", Some(6), shape(10));
    assert_eq!(out.text, "aaaaxx\nbbbb cccc");
    assert_eq!(out.reference, Some(6));
}

#[test]
fn overlong_word_keeps_its_own_line() {
    let out = wrap_single_line("a bcdefghijk l", None, shape(4));
    assert_eq!(out.text, "a\nbcdefghijk\nl");
}

#[test]
fn continuation_lines_get_their_indent() {
    let shape = WrapShape {
        first_indent: "> ",
        indent: "  ",
        width: 5,
        delimiter: "\r\n",
    };
    let out = wrap_single_line("one two three", Some(13), shape);
    assert_eq!(out.text, "> one\r\n  two\r\n  three");
    assert_eq!(out.reference, Some(out.text.len()));
}

#[test]
fn trailing_space_survives_wrapping() {
    let out = wrap_single_line("one two ", Some(8), shape(20));
    assert_eq!(out.text, "one two ");
    assert_eq!(out.reference, Some(8));
}

#[test]
fn sentinel_forces_a_break() {
    let line = format!("ab{S}cd");
    let out = wrap_single_line(&line, Some(5), shape(20));
    assert_eq!(out.text, format!("ab{S}\ncd"));
    assert_eq!(out.reference, Some(6));
}

#[test]
fn blank_line_keeps_first_indent() {
    let out = wrap_single_line("", Some(0), WrapShape {
        first_indent: "  ",
        ..shape(10)
    });
    assert_eq!(out.text, "  ");
    assert_eq!(out.reference, Some(2));
}

#[rstest]
#[case(format!("ab{S}\ncd"), Some(6), "ab\n\ncd", Some(4))]
#[case(format!("ab{S}"), Some(5), "ab\n\n", Some(4))]
#[case(format!("ab{S}"), Some(2), "ab\n\n", Some(2))]
#[case("plain".to_string(), Some(3), "plain", Some(3))]
fn sentinels_become_paragraph_breaks(
    #[case] text: String,
    #[case] reference: Option<usize>,
    #[case] expected: &str,
    #[case] expected_ref: Option<usize>,
) {
    let out = replace_internal_sentinels(&text, reference, "\n");
    assert_eq!(out.text, expected);
    assert_eq!(out.reference, expected_ref);
}

#[test]
fn default_handler_keeps_paragraph_indent() {
    let mut handler = DefaultWrappingHandler::new();
    let text = "  alpha beta\n  gamma delta epsilon";
    let edit = PendingEdit::noop(0);
    let (out, _) = run(&mut handler, text, &edit, 14).expect("wrapped");
    assert_eq!(out, "  alpha beta\n  gamma delta\n  epsilon");
}

#[test]
fn default_handler_caret_follows_typed_text() {
    let mut handler = DefaultWrappingHandler::new();
    let text = "one two three";
    let edit = PendingEdit::insert(13, "s");
    let (out, caret) = run(&mut handler, text, &edit, 10).expect("wrapped");
    assert_eq!(out, "one two\nthrees");
    assert_eq!(caret, Some(out.len()));
}

#[rstest]
#[case("hello world", PendingEdit::insert(0, " "), " hello world", 1)]
#[case("  hello world", PendingEdit::delete(0, 2), "hello world", 0)]
#[case("  hello world", PendingEdit::delete(0, 1), " hello world", 0)]
#[case("  hi yo", PendingEdit::insert(2, "\t"), "  \thi yo", 3)]
#[case("  aaaa bbbb\n  cccc", PendingEdit::insert(0, "  "), "    aaaa\n    bbbb\n    cccc", 2)]
fn default_handler_keeps_indentation_edits(
    #[case] text: &str,
    #[case] edit: PendingEdit,
    #[case] expected: &str,
    #[case] caret: usize,
) {
    let mut handler = DefaultWrappingHandler::new();
    let (out, reference) = run(&mut handler, text, &edit, 12).expect("wrapped");
    assert_eq!(out, expected);
    assert_eq!(reference, Some(caret));
}

#[test]
fn placeholder_in_block_is_refused() {
    let mut handler = DefaultWrappingHandler::new();
    let result = run(&mut handler, "a\u{E000}b", &PendingEdit::noop(0), 20);
    assert_eq!(result, Err(ReflowError::ReservedCharacter { offset: 1 }));
}

#[test]
fn inserted_placeholder_is_refused() {
    let mut handler = ListWrappingHandler::new();
    let edit = PendingEdit::insert(3, "x\u{E000}");
    let result = run(&mut handler, "* ab", &edit, 20);
    assert_eq!(result, Err(ReflowError::ReservedCharacter { offset: 4 }));
}

#[test]
fn enter_splits_paragraph() {
    let mut handler = DefaultWrappingHandler::new();
    let edit = PendingEdit::insert(3, "\n");
    let (out, caret) = run(&mut handler, "abcdef", &edit, 20).expect("wrapped");
    assert_eq!(out, "abc\n\ndef");
    assert_eq!(caret, Some(5));
}

#[test]
fn list_handler_aligns_continuation() {
    let mut handler = ListWrappingHandler::new();
    let text = "* This is a fairly long list item that should wrap";
    let edit = PendingEdit::noop(0);
    let (out, _) = run(&mut handler, text, &edit, 20).expect("wrapped");
    assert_eq!(out, "* This is a fairly\n  long list item\n  that should wrap");
}

#[test]
fn list_handler_joins_continuation_lines() {
    let mut handler = ListWrappingHandler::new();
    let text = "10. first\n    second third";
    let edit = PendingEdit::noop(0);
    let (out, _) = run(&mut handler, text, &edit, 40).expect("wrapped");
    assert_eq!(out, "10. first second third");
}

#[test]
fn list_handler_keeps_caret_in_bullet() {
    let mut handler = ListWrappingHandler::new();
    let edit = PendingEdit::noop(1);
    let (_, caret) = run(&mut handler, "- item", &edit, 40).expect("wrapped");
    assert_eq!(caret, Some(1));
}

#[test]
fn list_handler_rejects_plain_text() {
    let mut handler = ListWrappingHandler::new();
    let result = run(&mut handler, "no bullet", &PendingEdit::noop(0), 20);
    assert_eq!(
        result,
        Err(ReflowError::MalformedListItem("no bullet".into()))
    );
}

#[test]
fn list_handler_rejects_deleted_bullet() {
    let mut handler = ListWrappingHandler::new();
    let result = run(&mut handler, "* item", &PendingEdit::delete(0, 2), 20);
    assert!(matches!(result, Err(ReflowError::MalformedListItem(_))));
}

#[test]
fn steps_before_setup_fail() {
    let mut handler = DefaultWrappingHandler::new();
    assert_eq!(
        handler.apply_edit(&PendingEdit::noop(0)),
        Err(ReflowError::HandlerNotReady(DEFAULT_HANDLER_TYPE))
    );
    assert!(handler.wrap(layout(20)).is_err());
    assert_eq!(handler.reference_offset(), None);
}

#[test]
fn stale_span_is_rejected() {
    let doc = Document::new("short\ntext");
    let span = BlockSpan {
        offset: 1,
        length: 3,
        first_line: 0,
        last_line: 0,
    };
    let mut handler = DefaultWrappingHandler::new();
    assert_eq!(
        handler.setup(&doc, &span, 1),
        Err(ReflowError::StaleSpan { offset: 1, end: 4 })
    );
}

#[test]
fn edit_before_block_is_rejected() {
    let doc = Document::new("first\nsecond");
    let span = BlockSpan::from_lines(&doc, 1, 1).expect("span");
    let mut handler = DefaultWrappingHandler::new();
    handler.setup(&doc, &span, 6).expect("setup");
    assert_eq!(
        handler.apply_edit(&PendingEdit::insert(2, "x")),
        Err(ReflowError::EditOutsideBlock {
            offset: 2,
            deleted: 0
        })
    );
}

#[test]
fn layout_never_leaves_zero_columns() {
    assert_eq!(layout(10).available(4), 6);
    assert_eq!(layout(10).available(12), 1);
}
