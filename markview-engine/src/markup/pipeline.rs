//! Reflow, lex and materialize in one call.

use super::lexing::{tokenize_with, LexOptions, TokenStream};
use super::reflow::{reflow_with, ReflowOptions, ReflowedDocument};
use super::spans::{to_spans, Span};
use serde::Serialize;

/// A reflowed document together with its rendered text.
///
/// Tokens and spans borrow from the rendered text, so they are produced on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlighted {
    document: ReflowedDocument,
    text: String,
    #[serde(skip)]
    guard_literals: bool,
}

impl Highlighted {
    pub fn document(&self) -> &ReflowedDocument {
        &self.document
    }

    /// The pretty-printed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> TokenStream<'_> {
        tokenize_with(
            &self.text,
            LexOptions {
                guard_literals: self.guard_literals,
            },
        )
    }

    pub fn spans(&self) -> Vec<Span<'_>> {
        to_spans(&self.tokens())
    }
}

pub fn highlight(raw: &str, options: &ReflowOptions) -> Highlighted {
    let document = reflow_with(raw, options);
    let text = document.render();
    tracing::debug!(
        input_bytes = raw.len(),
        lines = document.len(),
        max_depth = document.max_depth(),
        final_depth = document.final_depth(),
        "reflowed document"
    );
    if document.final_depth() > 0 {
        tracing::trace!(
            open_scopes = document.final_depth(),
            "document ends with unclosed tags"
        );
    }

    Highlighted {
        document,
        text,
        guard_literals: options.guard_literals,
    }
}
