use super::*;
use crate::content::tokenize_block;

#[test]
fn test_keyword_highlighting() {
    let styled = render_sql_lines(&tokenize_block("SELECT * FROM"));

    // Gutter " 1  " then "SELECT" as keyword (B)
    assert!(styled.styles.starts_with("FFFFBBBBBB"));
    assert_eq!(styled.text, " 1  SELECT * FROM");
}

#[test]
fn test_string_and_number_highlighting() {
    let styled = render_sql_lines(&tokenize_block("WHERE \"a\" = 'b' OR n > 7"));
    let body = &styled.styles[4..];

    assert_eq!(body, "BBBBBACCCAAADDDABBAAAAAE");
}

#[test]
fn test_one_style_per_byte() {
    let styled = render_sql_lines(&tokenize_block("SELECT 'héllo'\nFROM \"naïve\""));

    assert_eq!(styled.styles.len(), styled.text.len());
}

#[test]
fn test_line_numbers_are_right_aligned() {
    let source = (1..=10)
        .map(|n| format!("SELECT {n}"))
        .collect::<Vec<_>>()
        .join("\n");
    let styled = render_sql_lines(&tokenize_block(&source));
    let lines: Vec<&str> = styled.text.split('\n').collect();

    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with(" 1  SELECT"));
    assert!(lines[9].starts_with("10  SELECT"));
}

#[test]
fn test_blank_lines_keep_their_gutter() {
    let styled = render_sql_lines(&tokenize_block("SELECT 1\n\nFROM t"));

    assert_eq!(styled.text, " 1  SELECT 1\n 2  \n 3  FROM t");
}

#[test]
fn test_style_table_matches_style_chars() {
    let table = create_style_table(Font::Courier, Font::CourierBold, 13);

    let last = STYLE_LINE_NUMBER as usize - STYLE_DEFAULT as usize;
    assert_eq!(table.len(), last + 1);
    assert_eq!(style_for(TokenKind::Plain), STYLE_DEFAULT);
}
