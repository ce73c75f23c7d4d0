//! # markview-engine
//!
//! Pretty-printing and syntax highlighting for raw markup (XML-like) text.
//!
//! The engine never parses a document. It re-derives line breaks and nesting depth from a
//! flat string, then classifies every substring of the result for display. Malformed,
//! truncated or empty input always produces output, never an error.
//!
//! Layout
//!
//! src/markup
//!   ├── reflow     Flat text to indented lines
//!   ├── lexing     Indented text to a lossless token stream
//!   ├── spans      Token kinds to display categories
//!   └── pipeline   The three stages composed

pub mod markup;

pub use markup::lexing::{tokenize, tokenize_with, LexOptions, Token, TokenKind, TokenStream};
pub use markup::pipeline::{highlight, Highlighted};
pub use markup::reflow::{reflow, reflow_with, Line, ReflowOptions, ReflowedDocument};
pub use markup::spans::{to_spans, Category, Span};
