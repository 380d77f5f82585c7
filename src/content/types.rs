use std::fmt;

/// Highlight class of a single token inside an SQL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    DoubleQuotedString,
    SingleQuotedString,
    Number,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, quote characters included for string literals.
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Literal content of the token: string literals without their quotes,
    /// every other kind unchanged.
    pub fn literal(&self) -> &str {
        let quote = match self.kind {
            TokenKind::DoubleQuotedString => '"',
            TokenKind::SingleQuotedString => '\'',
            _ => return &self.text,
        };
        self.text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .unwrap_or(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// 1-based position of the line inside its block.
    pub line_number: usize,
    pub tokens: Vec<Token>,
}

impl TokenizedLine {
    /// Reassembles the original line from its tokens.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }
}

/// Scalar value of a result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

/// One record of a tabular result, keeping the key order of the payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    cells: Vec<(String, CellValue)>,
}

impl ResultRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Display text of every column in `columns` order; absent keys become `None`.
    pub fn display_cells(&self, columns: &[String]) -> Vec<Option<String>> {
        columns
            .iter()
            .map(|column| self.get(column).map(ToString::to_string))
            .collect()
    }
}

/// A contiguous piece of an assistant message rendered as one visual block.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    PlainText {
        text: String,
    },
    SqlBlock {
        raw_text: String,
        lines: Vec<TokenizedLine>,
    },
    ResultTable {
        columns: Vec<String>,
        rows: Vec<ResultRow>,
    },
    ResultText {
        text: String,
    },
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Segment::PlainText { text: text.into() }
    }

    pub fn is_sql(&self) -> bool {
        matches!(self, Segment::SqlBlock { .. })
    }

    pub fn is_result(&self) -> bool {
        matches!(
            self,
            Segment::ResultTable { .. } | Segment::ResultText { .. }
        )
    }
}

/// Output of the result splitter: the extracted preamble and the optional
/// result payload that followed the `Result:` marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitMessage {
    pub preamble: Vec<Segment>,
    pub result: Option<Segment>,
}

impl SplitMessage {
    pub fn into_segments(self) -> Vec<Segment> {
        let mut segments = self.preamble;
        segments.extend(self.result);
        segments
    }
}
