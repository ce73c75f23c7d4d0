//! Terminal rendering of highlight spans.

use crossterm::style::{Color, Stylize};
use markview_config::{PaletteColor, RenderConfig};
use markview_engine::{Category, Span};

pub fn terminal_color(color: PaletteColor) -> Color {
    match color {
        PaletteColor::Reset => Color::Reset,
        PaletteColor::Black => Color::Black,
        PaletteColor::DarkGrey => Color::DarkGrey,
        PaletteColor::Grey => Color::Grey,
        PaletteColor::Red => Color::Red,
        PaletteColor::DarkRed => Color::DarkRed,
        PaletteColor::Green => Color::Green,
        PaletteColor::DarkGreen => Color::DarkGreen,
        PaletteColor::Yellow => Color::Yellow,
        PaletteColor::DarkYellow => Color::DarkYellow,
        PaletteColor::Blue => Color::Blue,
        PaletteColor::DarkBlue => Color::DarkBlue,
        PaletteColor::Magenta => Color::Magenta,
        PaletteColor::DarkMagenta => Color::DarkMagenta,
        PaletteColor::Cyan => Color::Cyan,
        PaletteColor::DarkCyan => Color::DarkCyan,
        PaletteColor::White => Color::White,
    }
}

/// Render spans with ANSI styling. Stripping the escape sequences gives back the span texts.
pub fn ansi(spans: &[Span<'_>], render: &RenderConfig) -> String {
    let mut out = String::new();
    for span in spans {
        let color = terminal_color(render.palette.color_for(span.category));
        let mut styled = span.text.with(color);
        if render.italic_comments && span.category == Category::Comment {
            styled = styled.italic();
        }
        if render.bold_tag_names && span.category == Category::TagName {
            styled = styled.bold();
        }
        out.push_str(&styled.to_string());
    }
    out
}
