use tracing::debug;

use super::tokenizer::{is_word_byte, tokenize_block};
use super::types::Segment;

const FENCE: &str = "```";
const SQL_FENCE_TAG: &[u8] = b"```sql";

/// Statement verbs that open a bare (unfenced) SQL block.
pub const SQL_VERBS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];

/// Literal substrings whose absence lets a message skip extraction entirely.
const SQL_MARKERS: &[&str] = &["```sql", "SELECT", "FROM"];

/// A recognised SQL region: byte range in the source plus the SQL text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SqlRegion<'a> {
    start: usize,
    end: usize,
    sql: &'a str,
}

/// Returns true when `text` may hold SQL worth extracting.
pub fn contains_sql_markers(text: &str) -> bool {
    SQL_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Splits `text` into plain and SQL segments in document order.
///
/// Blocks are only recognised at the start of a line (leading spaces and
/// tabs allowed). Whitespace touching a block is trimmed from the neighbouring
/// plain text and empty plain spans are dropped.
pub fn extract_blocks(text: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    if !contains_sql_markers(text) {
        return vec![Segment::plain(text)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    let mut after_block = false;
    let mut line_start = Some(0usize);

    while let Some(start) = line_start {
        match match_block_at(text, start) {
            Some(region) => {
                push_plain(&mut segments, &text[cursor..region.start], after_block, true);
                if region.sql.is_empty() {
                    debug!(offset = region.start, "skipping empty sql fence");
                } else {
                    segments.push(Segment::SqlBlock {
                        raw_text: region.sql.to_string(),
                        lines: tokenize_block(region.sql),
                    });
                }
                cursor = region.end;
                after_block = true;
                line_start = next_line_start(text, region.end);
            }
            None => line_start = next_line_start(text, start),
        }
    }

    push_plain(&mut segments, &text[cursor..], after_block, false);
    segments
}

fn match_block_at(text: &str, line_start: usize) -> Option<SqlRegion<'_>> {
    let line = &text[line_start..];
    let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
    let start = line_start + indent;

    match_fence(text, start).or_else(|| match_bare_statement(text, start))
}

fn match_fence(text: &str, start: usize) -> Option<SqlRegion<'_>> {
    let bytes = &text.as_bytes()[start..];
    if bytes.len() < SQL_FENCE_TAG.len()
        || !bytes[..SQL_FENCE_TAG.len()].eq_ignore_ascii_case(SQL_FENCE_TAG)
    {
        return None;
    }
    if bytes.get(SQL_FENCE_TAG.len()).is_some_and(|&b| is_word_byte(b)) {
        return None;
    }

    let content_start = start + SQL_FENCE_TAG.len();
    let (content_end, end) = match text[content_start..].find(FENCE) {
        Some(offset) => (content_start + offset, content_start + offset + FENCE.len()),
        None => {
            debug!(offset = start, "unterminated sql fence, block runs to end of text");
            (text.len(), text.len())
        }
    };

    Some(SqlRegion {
        start,
        end,
        sql: text[content_start..content_end].trim(),
    })
}

fn match_bare_statement(text: &str, start: usize) -> Option<SqlRegion<'_>> {
    let bytes = &text.as_bytes()[start..];
    let verb = SQL_VERBS.iter().find(|verb| {
        bytes.len() >= verb.len()
            && bytes[..verb.len()].eq_ignore_ascii_case(verb.as_bytes())
            && bytes.get(verb.len()).map_or(true, |&b| !is_word_byte(b))
    })?;

    let end = match bytes[verb.len()..]
        .iter()
        .position(|&b| b == b';' || b == b'\n')
    {
        Some(offset) => {
            let terminator = start + verb.len() + offset;
            if bytes[verb.len() + offset] == b';' {
                terminator + 1
            } else {
                terminator
            }
        }
        None => text.len(),
    };

    Some(SqlRegion {
        start,
        end,
        sql: text[start..end].trim_end(),
    })
}

fn next_line_start(text: &str, from: usize) -> Option<usize> {
    text[from..].find('\n').map(|offset| from + offset + 1)
}

fn push_plain(segments: &mut Vec<Segment>, span: &str, trim_start: bool, trim_end: bool) {
    let mut span = span;
    if trim_start {
        span = span.trim_start();
    }
    if trim_end {
        span = span.trim_end();
    }
    if !span.is_empty() {
        segments.push(Segment::plain(span));
    }
}
