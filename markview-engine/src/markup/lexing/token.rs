//! Core token types shared by the lexer and the span materializer.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// The closed set of things the lexer can classify a substring as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// `<`
    BracketOpen,
    /// `>` or `/>`
    BracketClose,
    TagOpenName,
    /// The whole body of a closing tag, leading `/` included.
    TagCloseName,
    AttributeName,
    Equals,
    /// Verbatim value, quotes and entities untouched.
    AttributeValue,
    /// Character data, plus whitespace between attributes.
    Text,
    /// A whole `<!-- … -->`, delimiters included.
    Comment,
    /// `?…` between the brackets of a `<?…?>` tag.
    ProcessingInstruction,
}

impl TokenKind {
    pub const ALL: [TokenKind; 10] = [
        TokenKind::BracketOpen,
        TokenKind::BracketClose,
        TokenKind::TagOpenName,
        TokenKind::TagCloseName,
        TokenKind::AttributeName,
        TokenKind::Equals,
        TokenKind::AttributeValue,
        TokenKind::Text,
        TokenKind::Comment,
        TokenKind::ProcessingInstruction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::BracketOpen => "bracket-open",
            TokenKind::BracketClose => "bracket-close",
            TokenKind::TagOpenName => "tag-open-name",
            TokenKind::TagCloseName => "tag-close-name",
            TokenKind::AttributeName => "attribute-name",
            TokenKind::Equals => "equals",
            TokenKind::AttributeValue => "attribute-value",
            TokenKind::Text => "text",
            TokenKind::Comment => "comment",
            TokenKind::ProcessingInstruction => "processing-instruction",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the lexed text.
///
/// `text` always equals `source[range]` for the source the token came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub range: Range<usize>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, source: &'src str, range: Range<usize>) -> Self {
        Self {
            kind,
            text: &source[range.clone()],
            range,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}

/// Ordered output of the lexer. Empty slices are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenStream<'src> {
    tokens: Vec<Token<'src>>,
}

impl<'src> TokenStream<'src> {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub(crate) fn push(&mut self, kind: TokenKind, source: &'src str, range: Range<usize>) {
        if range.start < range.end {
            self.tokens.push(Token::new(kind, source, range));
        }
    }

    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<'src>> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.kind).collect()
    }

    /// Concatenate the token texts back into the lexed string.
    pub fn detokenize(&self) -> String {
        self.tokens.iter().map(|token| token.text).collect()
    }

    /// Tokens other than whitespace-only text, i.e. line breaks, indentation and the gaps
    /// between attributes.
    pub fn significant(&self) -> impl Iterator<Item = &Token<'src>> {
        self.tokens
            .iter()
            .filter(|token| !(token.kind == TokenKind::Text && token.is_whitespace()))
    }
}

impl<'src> IntoIterator for TokenStream<'src> {
    type Item = Token<'src>;
    type IntoIter = std::vec::IntoIter<Token<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a, 'src> IntoIterator for &'a TokenStream<'src> {
    type Item = &'a Token<'src>;
    type IntoIter = std::slice::Iter<'a, Token<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
