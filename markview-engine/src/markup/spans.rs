//! Span materializer
//!
//! Maps each token to one of seven display categories. This is the only thing a renderer
//! needs: it applies styling per category and never looks at token kinds. The text of every
//! span is the token text untouched.

use super::lexing::{TokenKind, TokenStream};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Both brackets and the `=` between an attribute and its value.
    Punctuation,
    /// Opening and closing tag names alike.
    TagName,
    AttributeName,
    AttributeValue,
    Text,
    Comment,
    ProcessingInstruction,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Punctuation,
        Category::TagName,
        Category::AttributeName,
        Category::AttributeValue,
        Category::Text,
        Category::Comment,
        Category::ProcessingInstruction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Punctuation => "punctuation",
            Category::TagName => "tag_name",
            Category::AttributeName => "attribute_name",
            Category::AttributeValue => "attribute_value",
            Category::Text => "text",
            Category::Comment => "comment",
            Category::ProcessingInstruction => "processing_instruction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TokenKind {
    pub fn category(self) -> Category {
        match self {
            TokenKind::BracketOpen | TokenKind::BracketClose | TokenKind::Equals => {
                Category::Punctuation
            }
            TokenKind::TagOpenName | TokenKind::TagCloseName => Category::TagName,
            TokenKind::AttributeName => Category::AttributeName,
            TokenKind::AttributeValue => Category::AttributeValue,
            TokenKind::Text => Category::Text,
            TokenKind::Comment => Category::Comment,
            TokenKind::ProcessingInstruction => Category::ProcessingInstruction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span<'src> {
    pub text: &'src str,
    pub category: Category,
}

pub fn to_spans<'src>(stream: &TokenStream<'src>) -> Vec<Span<'src>> {
    stream
        .iter()
        .map(|token| Span {
            text: token.text,
            category: token.kind.category(),
        })
        .collect()
}
