use crate::buffer::{DefaultInputBuffer, IndentDedentBuffer};
use crate::{Char, InputBuffer};

#[test]
fn eoi_past_end() {
    let buf = DefaultInputBuffer::new("ab");
    assert_eq!(buf.char_at(0), Char::Value('a'));
    assert_eq!(buf.char_at(1), Char::Value('b'));
    assert_eq!(buf.char_at(2), Char::Eoi);
    assert_eq!(buf.char_at(1000), Char::Eoi);
}

#[test]
fn extract_range() {
    let buf = DefaultInputBuffer::new("hello world");
    assert_eq!(buf.extract(0, 5), "hello");
    assert_eq!(buf.extract(6, 11), "world");
    assert_eq!(buf.extract(6, 1000), "world");
}

#[test]
fn position_and_lines_lf() {
    let buf = DefaultInputBuffer::new("abc\ndef\nghi");
    assert_eq!(buf.extract_line(1), "abc");
    assert_eq!(buf.extract_line(2), "def");
    assert_eq!(buf.extract_line(3), "ghi");

    let pos = buf.position(5); // 'e' in "def"
    assert_eq!(pos.line, 2);
    assert_eq!(pos.column, 2);
}

#[test]
fn position_and_lines_crlf() {
    let buf = DefaultInputBuffer::new("abc\r\ndef");
    assert_eq!(buf.extract_line(1), "abc");
    assert_eq!(buf.extract_line(2), "def");
    let pos = buf.position(5); // 'd'
    assert_eq!(pos.line, 2);
    assert_eq!(pos.column, 1);
}

#[test]
fn position_and_lines_cr_only() {
    let buf = DefaultInputBuffer::new("abc\rdef");
    assert_eq!(buf.extract_line(1), "abc");
    assert_eq!(buf.extract_line(2), "def");
}

#[test]
fn indent_dedent_basic() {
    let src = "a\n  b\n  c\nd\n";
    let buf = IndentDedentBuffer::new(src).expect("valid indentation");
    let mut kinds = Vec::new();
    let mut i = 0;
    loop {
        let c = buf.char_at(i);
        if c == Char::Eoi {
            break;
        }
        kinds.push(c);
        i += 1;
    }
    // a \n INDENT b \n c \n DEDENT d \n
    assert!(kinds.contains(&Char::Indent));
    assert!(kinds.contains(&Char::Dedent));
    assert_eq!(kinds.iter().filter(|c| **c == Char::Indent).count(), 1);
    assert_eq!(kinds.iter().filter(|c| **c == Char::Dedent).count(), 1);
}

#[test]
fn indent_dedent_mixed_is_error() {
    let src = "a\n \t b\n";
    let err = IndentDedentBuffer::new(src).unwrap_err();
    assert_eq!(err.index, 2);
}

#[test]
fn indent_dedent_closes_at_eof() {
    let src = "a\n  b\n    c";
    let buf = IndentDedentBuffer::new(src).unwrap();
    let mut dedents = 0;
    let mut i = 0;
    loop {
        match buf.char_at(i) {
            Char::Eoi => break,
            Char::Dedent => dedents += 1,
            _ => {}
        }
        i += 1;
    }
    // two opened levels must both close by EOF
    assert_eq!(dedents, 2);
}
