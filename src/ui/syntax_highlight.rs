use fltk::{
    enums::{Color, Font},
    text::StyleTableEntry,
};

use crate::content::{TokenKind, TokenizedLine};
use crate::ui::theme;

// Style characters for different token types
pub const STYLE_DEFAULT: char = 'A';
pub const STYLE_KEYWORD: char = 'B';
pub const STYLE_DOUBLE_QUOTED: char = 'C';
pub const STYLE_SINGLE_QUOTED: char = 'D';
pub const STYLE_NUMBER: char = 'E';
pub const STYLE_LINE_NUMBER: char = 'F';

/// Width of the line-number column, not counting the separator.
const GUTTER_WIDTH: usize = 2;
const GUTTER_SEPARATOR: &str = "  ";

/// Creates the style table for SQL blocks. Entries follow the style chars above.
pub fn create_style_table(font: Font, bold: Font, size: i32) -> Vec<StyleTableEntry> {
    vec![
        // A - Default text
        StyleTableEntry {
            color: theme::text_primary(),
            font,
            size,
        },
        // B - SQL Keywords (amber)
        StyleTableEntry {
            color: Color::from_rgb(251, 191, 36),
            font: bold,
            size,
        },
        // C - Double-quoted identifiers (emerald)
        StyleTableEntry {
            color: Color::from_rgb(52, 211, 153),
            font,
            size,
        },
        // D - Single-quoted strings (sky)
        StyleTableEntry {
            color: Color::from_rgb(56, 189, 248),
            font,
            size,
        },
        // E - Numbers (light blue)
        StyleTableEntry {
            color: Color::from_rgb(147, 197, 253),
            font,
            size,
        },
        // F - Line numbers
        StyleTableEntry {
            color: theme::text_muted(),
            font,
            size,
        },
    ]
}

pub fn style_for(kind: TokenKind) -> char {
    match kind {
        TokenKind::Keyword => STYLE_KEYWORD,
        TokenKind::DoubleQuotedString => STYLE_DOUBLE_QUOTED,
        TokenKind::SingleQuotedString => STYLE_SINGLE_QUOTED,
        TokenKind::Number => STYLE_NUMBER,
        TokenKind::Plain => STYLE_DEFAULT,
    }
}

/// Display text of an SQL block together with its style string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub styles: String,
}

impl StyledText {
    fn push(&mut self, text: &str, style: char) {
        self.text.push_str(text);
        self.styles.extend(std::iter::repeat(style).take(text.len()));
    }
}

/// Lays out tokenized lines with a right-aligned line-number gutter.
///
/// IMPORTANT: FLTK TextBuffer uses byte-based indexing, so the style string
/// carries one style character per byte of `text`, not per char.
pub fn render_sql_lines(lines: &[TokenizedLine]) -> StyledText {
    let mut styled = StyledText::default();

    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            styled.push("\n", STYLE_DEFAULT);
        }
        let gutter = format!(
            "{:>width$}{}",
            line.line_number,
            GUTTER_SEPARATOR,
            width = GUTTER_WIDTH
        );
        styled.push(&gutter, STYLE_LINE_NUMBER);
        for token in &line.tokens {
            styled.push(&token.text, style_for(token.kind));
        }
    }

    styled
}

#[cfg(test)]
mod syntax_highlight_tests;
