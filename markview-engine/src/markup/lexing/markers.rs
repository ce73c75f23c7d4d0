//! Marker tokenization using the logos lexer library.
//!
//! Markup text is either a run of character data or a tag. Logos finds the boundaries and
//! tells the tag kinds apart by the characters after `<`; everything up to the end of the tag
//! is scanned by hand in the parent module, which then bumps the logos lexer past it.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    #[token("<!--")]
    CommentStart,

    #[token("<?")]
    InstructionStart,

    #[token("</")]
    CloseStart,

    /// Opening tags and every other `<`, declarations included.
    #[token("<")]
    TagStart,

    #[regex(r"[^<]+")]
    Text,
}
