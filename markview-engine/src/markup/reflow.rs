//! Reflow
//!
//!     Turns a flat markup string into indented lines. Nothing here parses: a tag is a `<` up
//!     to the `>` that closes it, a text run is whatever sits between two tags, and the nesting
//!     depth is a counter bumped by opening tags and dropped by closing ones.
//!
//! Fragments
//!
//!     Every tag becomes its own fragment and so does every text run between tags. Line breaks
//!     in text are fragment boundaries as well, while line breaks inside a tag or a comment fold
//!     into a single space so that a start tag spread over several lines comes out as one.
//!     Fragments are trimmed and empty ones are dropped.
//!
//! Depth
//!
//!     A closing tag (`</…`) decrements the depth before it is emitted, never below zero. An
//!     opening tag increments it after being emitted unless it self-closes (`/>`), is a
//!     processing instruction (`<?…`) or is a comment (`<!--…`). Other markup declarations
//!     such as `<!DOCTYPE …>` and `<![CDATA[…]]>` open a level like any start tag, unless
//!     [ReflowOptions::flat_declarations] is set.
//!
//! Literals
//!
//!     A `>` inside a quoted attribute value (`="…"` or `='…'`), a comment or a CDATA section
//!     does not end it, except when a `<` follows directly: a literal `><` is always taken as
//!     the boundary between two tags. With [ReflowOptions::guard_literals] even that split is
//!     suppressed, so comments run to their `-->`, CDATA sections to their `]]>` and quoted
//!     values to the matching quote.

use serde::Serialize;
use std::fmt;

/// Indent unit used when no other is configured.
pub const DEFAULT_INDENT_UNIT: &str = "  ";

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Knobs for [reflow_with].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflowOptions {
    /// Repeated once per depth level in front of every line.
    pub indent_unit: String,
    /// Keep comments, CDATA sections and quoted attribute values from being split on `><`.
    pub guard_literals: bool,
    /// Treat every `<!…>` declaration, not only comments, as leaving the depth unchanged.
    pub flat_declarations: bool,
}

impl ReflowOptions {
    pub fn with_indent_unit(mut self, indent_unit: impl Into<String>) -> Self {
        self.indent_unit = indent_unit.into();
        self
    }

    pub fn with_guard_literals(mut self, guard_literals: bool) -> Self {
        self.guard_literals = guard_literals;
        self
    }

    pub fn with_flat_declarations(mut self, flat_declarations: bool) -> Self {
        self.flat_declarations = flat_declarations;
        self
    }
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            guard_literals: false,
            flat_declarations: false,
        }
    }
}

/// One output line: a trimmed fragment and the nesting depth it is indented at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub text: String,
    pub depth: usize,
}

impl Line {
    pub fn new(text: impl Into<String>, depth: usize) -> Self {
        Self {
            text: text.into(),
            depth,
        }
    }
}

/// The ordered lines produced by [reflow].
///
/// The `Display` impl (and [ReflowedDocument::render]) joins the lines with `\n`, each one
/// prefixed by `depth` copies of the indent unit. There is no trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflowedDocument {
    lines: Vec<Line>,
    #[serde(skip)]
    indent_unit: String,
    final_depth: usize,
}

impl ReflowedDocument {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Deepest indentation of any line, 0 for an empty document.
    pub fn max_depth(&self) -> usize {
        self.lines.iter().map(|line| line.depth).max().unwrap_or(0)
    }

    /// Depth a line appended after the last one would get.
    ///
    /// Non-zero means more scopes were opened than closed.
    pub fn final_depth(&self) -> usize {
        self.final_depth
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReflowedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            for _ in 0..line.depth {
                f.write_str(&self.indent_unit)?;
            }
            f.write_str(&line.text)?;
        }
        Ok(())
    }
}

/// Reflow with the default options (two-space indent, no literal guarding).
pub fn reflow(raw: &str) -> ReflowedDocument {
    reflow_with(raw, &ReflowOptions::default())
}

/// A leading byte order mark is dropped before splitting.
pub fn reflow_with(raw: &str, options: &ReflowOptions) -> ReflowedDocument {
    let raw = raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw);
    let mut depth = 0usize;
    let mut lines = Vec::new();

    for fragment in Splitter::new(options.guard_literals).split(raw) {
        if fragment.starts_with("</") {
            depth = depth.saturating_sub(1);
        }
        let opens = opens_scope(&fragment, options.flat_declarations);
        lines.push(Line::new(fragment, depth));
        if opens {
            depth += 1;
        }
    }

    ReflowedDocument {
        lines,
        indent_unit: options.indent_unit.clone(),
        final_depth: depth,
    }
}

fn opens_scope(fragment: &str, flat_declarations: bool) -> bool {
    let declaration = if flat_declarations { "<!" } else { COMMENT_OPEN };
    fragment.starts_with('<')
        && !fragment.starts_with("</")
        && !fragment.ends_with("/>")
        && !fragment.starts_with("<?")
        && !fragment.starts_with(declaration)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Text,
    Tag,
    Comment,
    Cdata,
    Quoted(char),
}

/// Single pass fragment splitter.
struct Splitter {
    guard_literals: bool,
    region: Region,
    current: String,
    // Set after a line break inside a tag was folded; swallows the indentation that follows.
    folding: bool,
    fragments: Vec<String>,
}

impl Splitter {
    fn new(guard_literals: bool) -> Self {
        Self {
            guard_literals,
            region: Region::Text,
            current: String::new(),
            folding: false,
            fragments: Vec::new(),
        }
    }

    fn split(mut self, raw: &str) -> Vec<String> {
        for (index, c) in raw.char_indices() {
            match self.region {
                Region::Text => match c {
                    '<' => {
                        self.flush();
                        self.current.push(c);
                        let rest = &raw[index..];
                        self.region = if rest.starts_with(COMMENT_OPEN) {
                            Region::Comment
                        } else if rest.starts_with(CDATA_OPEN) {
                            Region::Cdata
                        } else {
                            Region::Tag
                        };
                    }
                    '\n' => self.flush(),
                    _ => self.current.push(c),
                },
                Region::Tag => match c {
                    '>' => {
                        self.push(c);
                        self.flush();
                        self.region = Region::Text;
                    }
                    '\r' | '\n' => self.fold_line_break(),
                    '"' | '\'' if self.current.ends_with('=') => {
                        self.push(c);
                        self.region = Region::Quoted(c);
                    }
                    _ => self.push(c),
                },
                Region::Quoted(quote) => match c {
                    '\r' | '\n' => self.fold_line_break(),
                    '>' => {
                        self.push(c);
                        if self.literal_split(raw, index) {
                            self.flush();
                            self.region = Region::Text;
                        }
                    }
                    _ => {
                        self.push(c);
                        if c == quote {
                            self.region = Region::Tag;
                        }
                    }
                },
                Region::Comment | Region::Cdata => match c {
                    '\r' | '\n' => self.fold_line_break(),
                    '>' => {
                        self.push(c);
                        if self.closes_section() || self.literal_split(raw, index) {
                            self.flush();
                            self.region = Region::Text;
                        }
                    }
                    _ => self.push(c),
                },
            }
        }

        self.flush();
        self.fragments
    }

    fn push(&mut self, c: char) {
        if self.folding && c.is_whitespace() {
            return;
        }
        self.folding = false;
        self.current.push(c);
    }

    fn fold_line_break(&mut self) {
        if self.folding {
            return;
        }
        let kept = self.current.trim_end().len();
        self.current.truncate(kept);
        self.current.push(' ');
        self.folding = true;
    }

    /// Whether the `>` at `index` splits a literal because a `<` follows it.
    fn literal_split(&self, raw: &str, index: usize) -> bool {
        !self.guard_literals && raw[index + 1..].starts_with('<')
    }

    fn closes_section(&self) -> bool {
        let (open, close) = match self.region {
            Region::Cdata => (CDATA_OPEN, CDATA_CLOSE),
            _ => (COMMENT_OPEN, COMMENT_CLOSE),
        };
        // The opener's own dashes never count: `<!-->` is still open.
        self.current.len() >= open.len() + close.len() && self.current.ends_with(close)
    }

    fn flush(&mut self) {
        let trimmed = self.current.trim();
        if !trimmed.is_empty() {
            self.fragments.push(trimmed.to_string());
        }
        self.current.clear();
        self.folding = false;
    }
}
