use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{Token, TokenKind, TokenizedLine};

/// Keywords highlighted inside SQL blocks. Multi-word entries match a single space.
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "ON", "GROUP BY", "ORDER BY", "HAVING", "LIMIT", "INSERT",
    "UPDATE", "DELETE", "SET", "VALUES", "AND", "OR", "AS", "COUNT", "SUM", "AVG", "MIN", "MAX",
    "INNER", "OUTER", "LEFT", "RIGHT",
];

// Candidates bucketed by their (uppercase) first byte, table order preserved.
static KEYWORDS_BY_INITIAL: Lazy<HashMap<u8, Vec<&'static str>>> = Lazy::new(|| {
    let mut table: HashMap<u8, Vec<&'static str>> = HashMap::new();
    for keyword in SQL_KEYWORDS {
        table.entry(keyword.as_bytes()[0]).or_default().push(keyword);
    }
    table
});

/// Tokenizes a single line. The returned line is numbered 1.
pub fn tokenize_line(line: &str) -> TokenizedLine {
    TokenizedLine {
        line_number: 1,
        tokens: scan_line(line),
    }
}

/// Splits `raw` on `\n` and tokenizes every line, blank lines included.
pub fn tokenize_block(raw: &str) -> Vec<TokenizedLine> {
    raw.split('\n')
        .enumerate()
        .map(|(index, line)| TokenizedLine {
            line_number: index + 1,
            tokens: scan_line(line),
        })
        .collect()
}

/// Keyword pass over the whole line; the spans between keywords go through
/// the literal scanner. Keywords win even inside quotes because this pass
/// runs first.
fn scan_line(line: &str) -> Vec<Token> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut gap_start = 0usize;
    let mut idx = 0usize;

    while idx < bytes.len() {
        if let Some(len) = keyword_at(bytes, idx) {
            scan_literals(line, gap_start, idx, &mut tokens);
            tokens.push(Token::new(TokenKind::Keyword, &line[idx..idx + len]));
            idx += len;
            gap_start = idx;
            continue;
        }
        idx += 1;
    }

    scan_literals(line, gap_start, bytes.len(), &mut tokens);
    tokens
}

fn keyword_at(bytes: &[u8], idx: usize) -> Option<usize> {
    let first = bytes[idx];
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if idx > 0 && is_word_byte(bytes[idx - 1]) {
        return None;
    }

    let candidates = KEYWORDS_BY_INITIAL.get(&first.to_ascii_uppercase())?;
    candidates.iter().find_map(|keyword| {
        let end = idx + keyword.len();
        let matches = end <= bytes.len()
            && bytes[idx..end].eq_ignore_ascii_case(keyword.as_bytes())
            && (end == bytes.len() || !is_word_byte(bytes[end]));
        matches.then_some(keyword.len())
    })
}

/// Single left-to-right scan of `line[start..end]` for quoted strings and
/// standalone integers. Word boundaries are checked against the whole line.
fn scan_literals(line: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
    let bytes = line.as_bytes();
    let mut plain_start = start;
    let mut idx = start;

    while idx < end {
        let byte = bytes[idx];

        if byte == b'"' || byte == b'\'' {
            let closing = bytes[idx + 1..end]
                .iter()
                .position(|&b| b == byte)
                .map(|offset| idx + 1 + offset);
            if let Some(close) = closing {
                let kind = if byte == b'"' {
                    TokenKind::DoubleQuotedString
                } else {
                    TokenKind::SingleQuotedString
                };
                push_plain(tokens, &line[plain_start..idx]);
                tokens.push(Token::new(kind, &line[idx..=close]));
                idx = close + 1;
                plain_start = idx;
                continue;
            }
        } else if byte.is_ascii_digit() && (idx == 0 || !is_word_byte(bytes[idx - 1])) {
            let mut digits_end = idx;
            while digits_end < end && bytes[digits_end].is_ascii_digit() {
                digits_end += 1;
            }
            if digits_end == bytes.len() || !is_word_byte(bytes[digits_end]) {
                push_plain(tokens, &line[plain_start..idx]);
                tokens.push(Token::new(TokenKind::Number, &line[idx..digits_end]));
                plain_start = digits_end;
            }
            idx = digits_end;
            continue;
        }

        idx += 1;
    }

    push_plain(tokens, &line[plain_start..end]);
}

fn push_plain(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(last) if last.kind == TokenKind::Plain => last.text.push_str(text),
        _ => tokens.push(Token::new(TokenKind::Plain, text)),
    }
}

// ASCII word characters, matching a regex `\b` without Unicode mode.
pub(super) fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
