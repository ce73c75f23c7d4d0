//! Lexer
//!
//!     Scans reflowed markup once, left to right, and classifies every substring. The output is
//!     lossless: concatenating the token texts in order gives back the input exactly, so no
//!     token kind ever rewrites or drops source text.
//!
//! Scanning
//!
//!     The [markers](markers) logos lexer splits text runs from tag starts and tells the tag
//!     kinds apart:
//!
//!         - `<!--` is a comment. One comment token covers `<!--` through the first `-->`.
//!         - `<?` is a processing instruction, emitted as a single token up to the `>`.
//!         - `</` is a closing tag. Its whole body is the tag-close-name, no attributes.
//!         - Any other `<` is an opening tag: the leading non-whitespace run is the name and
//!           the rest is split on whitespace into attribute segments.
//!
//!     The body ends at the first `>` outside a quoted attribute value. Inside a quoted value
//!     (or a `<![CDATA[` section, which runs to `]]>`) a `>` ends the tag only when a `<`
//!     follows it, and with [LexOptions::guard_literals] not even then. A `/` right before the
//!     closing `>` belongs to the bracket-close token.
//!
//! Attribute Segments
//!
//!     Text before the first `=` of a segment is the attribute name, then comes the equals
//!     token and the rest of the segment verbatim as the value, quotes included. A segment
//!     without `=` (or starting with one) is a lone attribute-name. Whitespace between segments
//!     is emitted as text.
//!
//! Truncated Input
//!
//!     A tag with no terminating `>` before end of input becomes one token of the tag's own
//!     kind holding the remaining text, and scanning stops there. An unterminated comment runs
//!     to the end of input.

pub mod markers;
pub mod token;

pub use token::{Token, TokenKind, TokenStream};

use logos::Logos;
use markers::Marker;
use std::ops::Range;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const CDATA_BODY_OPEN: &str = "![CDATA[";
const CDATA_CLOSE: &str = "]]";

/// Knobs for [tokenize_with].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Never end a tag inside a quoted attribute value and keep its whitespace.
    pub guard_literals: bool,
}

/// Tokenize with the default options.
pub fn tokenize(text: &str) -> TokenStream<'_> {
    tokenize_with(text, LexOptions::default())
}

pub fn tokenize_with(source: &str, options: LexOptions) -> TokenStream<'_> {
    let mut stream = TokenStream::new();
    let mut lexer = Marker::lexer(source);

    while let Some(marker) = lexer.next() {
        let span = lexer.span();
        let kind = match marker {
            Ok(Marker::CommentStart) => None,
            Ok(Marker::InstructionStart) => Some(TagKind::Instruction),
            Ok(Marker::CloseStart) => Some(TagKind::Closing),
            Ok(Marker::TagStart) => Some(TagKind::Opening),
            Ok(Marker::Text) | Err(()) => {
                stream.push(TokenKind::Text, source, span);
                continue;
            }
        };
        let end = match kind {
            Some(kind) => lex_tag(source, span.start, kind, options, &mut stream),
            None => lex_comment(source, span.start, &mut stream),
        };
        match end {
            Some(end) => lexer.bump(end - span.end),
            None => break,
        }
    }

    stream
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Opening,
    Closing,
    Instruction,
}

impl TagKind {
    /// Kind given to the rest of the input when the tag never closes.
    fn unterminated(self) -> TokenKind {
        match self {
            TagKind::Opening => TokenKind::TagOpenName,
            TagKind::Closing => TokenKind::TagCloseName,
            TagKind::Instruction => TokenKind::ProcessingInstruction,
        }
    }
}

/// Lex the comment whose `<!--` sits at `open`, returning the offset just past its `-->`.
fn lex_comment<'src>(
    source: &'src str,
    open: usize,
    out: &mut TokenStream<'src>,
) -> Option<usize> {
    let search_from = open + COMMENT_OPEN.len();
    match source[search_from..].find(COMMENT_CLOSE) {
        Some(offset) => {
            let end = search_from + offset + COMMENT_CLOSE.len();
            out.push(TokenKind::Comment, source, open..end);
            Some(end)
        }
        None => {
            out.push(TokenKind::Comment, source, open..source.len());
            None
        }
    }
}

/// Lex the tag whose `<` sits at `open`. Returns the offset just past the tag, or `None`
/// when the input ran out first.
fn lex_tag<'src>(
    source: &'src str,
    open: usize,
    kind: TagKind,
    options: LexOptions,
    out: &mut TokenStream<'src>,
) -> Option<usize> {
    let body_start = open + 1;
    let rest = &source[body_start..];

    out.push(TokenKind::BracketOpen, source, open..body_start);

    let Some(length) = find_tag_end(rest, options.guard_literals) else {
        out.push(kind.unterminated(), source, body_start..source.len());
        return None;
    };
    let body_end = body_start + length;

    let close_start = match kind {
        TagKind::Instruction => {
            out.push(TokenKind::ProcessingInstruction, source, body_start..body_end);
            body_end
        }
        TagKind::Closing => {
            out.push(TokenKind::TagCloseName, source, body_start..body_end);
            body_end
        }
        TagKind::Opening => {
            let attributes_end = if source[body_start..body_end].ends_with('/') {
                body_end - 1
            } else {
                body_end
            };
            lex_opening_body(source, body_start..attributes_end, options, out);
            attributes_end
        }
    };

    out.push(TokenKind::BracketClose, source, close_start..body_end + 1);
    Some(body_end + 1)
}

/// Offset of the `>` that ends a tag body.
fn find_tag_end(body: &str, guard_literals: bool) -> Option<usize> {
    let bytes = body.as_bytes();
    // A `>` inside a literal still ends the tag when `<` comes next, unless guarded.
    let splits = |index: usize| !guard_literals && bytes.get(index + 1) == Some(&b'<');

    if body.starts_with(CDATA_BODY_OPEN) {
        return (CDATA_BODY_OPEN.len()..bytes.len()).find(|&index| {
            bytes[index] == b'>' && (body[..index].ends_with(CDATA_CLOSE) || splits(index))
        });
    }

    let mut quote = None;
    for (index, &byte) in bytes.iter().enumerate() {
        match quote {
            Some(open) if byte == open => quote = None,
            Some(_) if byte == b'>' && splits(index) => return Some(index),
            Some(_) => {}
            None => match byte {
                b'>' => return Some(index),
                b'"' | b'\'' if index > 0 && bytes[index - 1] == b'=' => quote = Some(byte),
                _ => {}
            },
        }
    }
    None
}

fn lex_opening_body<'src>(
    source: &'src str,
    body: Range<usize>,
    options: LexOptions,
    out: &mut TokenStream<'src>,
) {
    let text = &source[body.clone()];
    let name_length = text.find(char::is_whitespace).unwrap_or(text.len());
    out.push(TokenKind::TagOpenName, source, body.start..body.start + name_length);

    let mut position = name_length;
    while position < text.len() {
        let rest = &text[position..];
        let start = body.start + position;
        let gap = rest.len() - rest.trim_start().len();

        let length = if gap > 0 {
            out.push(TokenKind::Text, source, start..start + gap);
            gap
        } else {
            let length = segment_length(rest, options.guard_literals);
            lex_attribute(source, start, &rest[..length], out);
            length
        };
        position += length;
    }
}

/// Length of the attribute segment at the start of `rest`, which begins with a
/// non-whitespace character.
fn segment_length(rest: &str, guard_literals: bool) -> usize {
    if !guard_literals {
        return rest.find(char::is_whitespace).unwrap_or(rest.len());
    }

    let mut quote = None;
    let mut previous = None;
    for (index, c) in rest.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => return index,
            None if (c == '"' || c == '\'') && previous == Some('=') => quote = Some(c),
            None => {}
        }
        previous = Some(c);
    }
    rest.len()
}

fn lex_attribute<'src>(
    source: &'src str,
    start: usize,
    segment: &str,
    out: &mut TokenStream<'src>,
) {
    let end = start + segment.len();
    match segment.find('=') {
        Some(equals) if equals > 0 => {
            let equals = start + equals;
            out.push(TokenKind::AttributeName, source, start..equals);
            out.push(TokenKind::Equals, source, equals..equals + 1);
            out.push(TokenKind::AttributeValue, source, equals + 1..end);
        }
        _ => out.push(TokenKind::AttributeName, source, start..end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn pairs(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(pairs("hello world"), vec![(Text, "hello world")]);
    }

    #[test]
    fn test_element_with_text() {
        assert_eq!(
            pairs("<b>x</b>"),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "b"),
                (BracketClose, ">"),
                (Text, "x"),
                (BracketOpen, "<"),
                (TagCloseName, "/b"),
                (BracketClose, ">"),
            ]
        );
    }

    #[test]
    fn test_comment_then_self_closing_tag() {
        let source = "<!-- note -->\n<x a=\"1\" b='two'/>";
        let stream = tokenize(source);
        let significant: Vec<_> = stream
            .significant()
            .map(|token| (token.kind, token.text))
            .collect();
        assert_eq!(
            significant,
            vec![
                (Comment, "<!-- note -->"),
                (BracketOpen, "<"),
                (TagOpenName, "x"),
                (AttributeName, "a"),
                (Equals, "="),
                (AttributeValue, "\"1\""),
                (AttributeName, "b"),
                (Equals, "="),
                (AttributeValue, "'two'"),
                (BracketClose, "/>"),
            ]
        );
        assert_eq!(stream.detokenize(), source);
    }

    #[test]
    fn test_processing_instruction() {
        assert_eq!(
            pairs(r#"<?xml version="1.0"?>"#),
            vec![
                (BracketOpen, "<"),
                (ProcessingInstruction, r#"?xml version="1.0"?"#),
                (BracketClose, ">"),
            ]
        );
    }

    #[test]
    fn test_attribute_without_value() {
        assert_eq!(
            pairs("<input disabled x=>"),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "input"),
                (Text, " "),
                (AttributeName, "disabled"),
                (Text, " "),
                (AttributeName, "x"),
                (Equals, "="),
                (BracketClose, ">"),
            ]
        );
    }

    #[test]
    fn test_segment_starting_with_equals() {
        assert_eq!(
            pairs("<a =b>"),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (Text, " "),
                (AttributeName, "=b"),
                (BracketClose, ">"),
            ]
        );
    }

    #[test]
    fn test_value_with_space_is_split_by_default() {
        assert_eq!(
            pairs(r#"<a t="x y">"#),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (Text, " "),
                (AttributeName, "t"),
                (Equals, "="),
                (AttributeValue, "\"x"),
                (Text, " "),
                (AttributeName, "y\""),
                (BracketClose, ">"),
            ]
        );
    }

    #[test]
    fn test_gt_inside_quoted_value_stays_in_tag() {
        assert_eq!(
            pairs(r#"<a t="1>2"/>z"#),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (Text, " "),
                (AttributeName, "t"),
                (Equals, "="),
                (AttributeValue, r#""1>2""#),
                (BracketClose, "/>"),
                (Text, "z"),
            ]
        );
    }

    #[test]
    fn test_literal_gt_lt_in_value_ends_tag_unless_guarded() {
        let source = r#"<a t="x><y">"#;
        assert_eq!(
            pairs(source),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (Text, " "),
                (AttributeName, "t"),
                (Equals, "="),
                (AttributeValue, "\"x"),
                (BracketClose, ">"),
                (BracketOpen, "<"),
                (TagOpenName, "y\""),
                (BracketClose, ">"),
            ]
        );

        let guarded = tokenize_with(source, LexOptions { guard_literals: true });
        let values: Vec<_> = guarded
            .iter()
            .filter(|token| token.kind == AttributeValue)
            .map(|token| token.text)
            .collect();
        assert_eq!(values, vec![r#""x><y""#]);
    }

    #[test]
    fn test_cdata_section_runs_to_its_close() {
        let source = "<![CDATA[a > b]]>t";
        let stream = tokenize(source);
        let closes: Vec<_> = stream
            .iter()
            .filter(|token| token.kind == BracketClose)
            .map(|token| token.range.clone())
            .collect();
        assert_eq!(closes, vec![16..17]);
        assert_eq!(stream.tokens().last().map(|token| token.text), Some("t"));
        assert_eq!(stream.detokenize(), source);
    }

    #[test]
    fn test_guarded_value_keeps_space_and_gt() {
        let source = r#"<a t="x >y">z"#;
        let stream = tokenize_with(source, LexOptions { guard_literals: true });
        let found: Vec<_> = stream.iter().map(|token| (token.kind, token.text)).collect();
        assert_eq!(
            found,
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (Text, " "),
                (AttributeName, "t"),
                (Equals, "="),
                (AttributeValue, "\"x >y\""),
                (BracketClose, ">"),
                (Text, "z"),
            ]
        );
    }

    #[test]
    fn test_unterminated_opening_tag() {
        assert_eq!(
            pairs("<a><b c=\"1\""),
            vec![
                (BracketOpen, "<"),
                (TagOpenName, "a"),
                (BracketClose, ">"),
                (BracketOpen, "<"),
                (TagOpenName, "b c=\"1\""),
            ]
        );
    }

    #[test]
    fn test_unterminated_closing_tag_and_instruction() {
        assert_eq!(pairs("</a"), vec![(BracketOpen, "<"), (TagCloseName, "/a")]);
        assert_eq!(
            pairs("<?pi"),
            vec![(BracketOpen, "<"), (ProcessingInstruction, "?pi")]
        );
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(pairs("x<!-- open"), vec![(Text, "x"), (Comment, "<!-- open")]);
        assert_eq!(pairs("<!-->"), vec![(Comment, "<!-->")]);
    }

    #[test]
    fn test_lone_bracket_at_end() {
        assert_eq!(pairs("a<"), vec![(Text, "a"), (BracketOpen, "<")]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let source = "<r>\n  <c k='v'/>\n  <!-- c -->\n  t\n</r>";
        let stream = tokenize(source);
        let mut expected_start = 0;
        for token in &stream {
            assert_eq!(token.range.start, expected_start);
            assert_eq!(&source[token.range.clone()], token.text);
            expected_start = token.range.end;
        }
        assert_eq!(expected_start, source.len());
    }
}
