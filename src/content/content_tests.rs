use super::*;

fn kw(text: &str) -> Token {
    Token::new(TokenKind::Keyword, text)
}

fn plain(text: &str) -> Token {
    Token::new(TokenKind::Plain, text)
}

fn num(text: &str) -> Token {
    Token::new(TokenKind::Number, text)
}

fn dq(text: &str) -> Token {
    Token::new(TokenKind::DoubleQuotedString, text)
}

fn sql_text(segment: &Segment) -> &str {
    match segment {
        Segment::SqlBlock { raw_text, .. } => raw_text,
        other => panic!("expected SqlBlock, got {:?}", other),
    }
}

// -- Block extraction --

#[test]
fn test_plain_message_passes_through_unchanged() {
    let text = "Hello, how can I help you today?";
    assert_eq!(extract_blocks(text), vec![Segment::plain(text)]);
}

#[test]
fn test_empty_message_has_no_segments() {
    assert!(extract_blocks("").is_empty());
    assert_eq!(split_result(""), SplitMessage::default());
}

#[test]
fn test_fenced_block_between_prose() {
    let segments = extract_blocks("Here is your query:\n```sql\nSELECT 1;\n```\nDone.");
    assert_eq!(segments.len(), 3, "got: {:?}", segments);
    assert_eq!(segments[0], Segment::plain("Here is your query:"));
    assert_eq!(sql_text(&segments[1]), "SELECT 1;");
    assert_eq!(segments[2], Segment::plain("Done."));

    let Segment::SqlBlock { lines, .. } = &segments[1] else {
        unreachable!();
    };
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].tokens,
        vec![kw("SELECT"), plain(" "), num("1"), plain(";")]
    );
}

#[test]
fn test_unterminated_fence_runs_to_end_of_text() {
    let segments = extract_blocks("Try this:\n```sql\nSELECT *\nFROM t");
    assert_eq!(segments.len(), 2, "got: {:?}", segments);
    assert_eq!(segments[0], Segment::plain("Try this:"));
    assert_eq!(sql_text(&segments[1]), "SELECT *\nFROM t");

    let Segment::SqlBlock { lines, .. } = &segments[1] else {
        unreachable!();
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].line_number, 2);
}

#[test]
fn test_empty_fence_produces_no_block() {
    assert!(parse_assistant_message("```sql```").is_empty());
    assert!(extract_blocks("```sql").is_empty());

    let segments = extract_blocks("Nothing to run:
```sql
   
```
Sorry.");
    assert_eq!(
        segments,
        vec![Segment::plain("Nothing to run:"), Segment::plain("Sorry.")]
    );
}

#[test]
fn test_indented_fence_with_uppercase_tag() {
    let segments = extract_blocks("Query:\n  ```SQL\nSELECT 1\n  ```");
    assert_eq!(segments.len(), 2, "got: {:?}", segments);
    assert_eq!(segments[0], Segment::plain("Query:"));
    assert_eq!(sql_text(&segments[1]), "SELECT 1");
}

#[test]
fn test_bare_statement_ends_at_semicolon() {
    let segments =
        extract_blocks("Sure.\nSELECT id FROM users WHERE id = 1;\nThat returns the row.");
    assert_eq!(segments.len(), 3, "got: {:?}", segments);
    assert_eq!(segments[0], Segment::plain("Sure."));
    assert_eq!(sql_text(&segments[1]), "SELECT id FROM users WHERE id = 1;");
    assert_eq!(segments[2], Segment::plain("That returns the row."));
}

#[test]
fn test_bare_statement_ends_at_newline_and_ignores_case() {
    let segments = extract_blocks("Run this:\nselect name from users\nThen SELECT again");
    assert_eq!(segments.len(), 3, "got: {:?}", segments);
    assert_eq!(sql_text(&segments[1]), "select name from users");
    assert_eq!(segments[2], Segment::plain("Then SELECT again"));
}

#[test]
fn test_consecutive_bare_statements() {
    let segments = extract_blocks("SELECT 1;\nDELETE FROM t;");
    assert_eq!(segments.len(), 2, "got: {:?}", segments);
    assert_eq!(sql_text(&segments[0]), "SELECT 1;");
    assert_eq!(sql_text(&segments[1]), "DELETE FROM t;");
}

#[test]
fn test_statement_verb_mid_line_is_prose() {
    let text = "You can use SELECT to read data.";
    assert_eq!(extract_blocks(text), vec![Segment::plain(text)]);
}

#[test]
fn test_verb_prefix_of_longer_word_is_prose() {
    let text = "Selected rows FROM the table";
    assert_eq!(extract_blocks(text), vec![Segment::plain(text)]);
}

#[test]
fn test_extraction_keeps_every_non_whitespace_character() {
    let text = "Intro\n```sql\nSELECT a\nFROM b\n```\nmiddle\nUPDATE t SET x = 1;\nend";
    let joined: String = extract_blocks(text)
        .iter()
        .map(|segment| match segment {
            Segment::PlainText { text } => text.as_str(),
            Segment::SqlBlock { raw_text, .. } => raw_text.as_str(),
            other => panic!("unexpected segment {:?}", other),
        })
        .collect();
    let strip = |s: &str| -> String {
        s.replace("```sql", "")
            .replace("```", "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    };
    assert_eq!(strip(&joined), strip(text));
}

// -- Line tokenizer --

#[test]
fn test_keywords_strings_and_numbers() {
    let line = tokenize_line(r#"SELECT "name" FROM "users" WHERE "age" > 30"#);
    assert_eq!(line.line_number, 1);
    assert_eq!(
        line.tokens,
        vec![
            kw("SELECT"),
            plain(" "),
            dq(r#""name""#),
            plain(" "),
            kw("FROM"),
            plain(" "),
            dq(r#""users""#),
            plain(" "),
            kw("WHERE"),
            plain(" "),
            dq(r#""age""#),
            plain(" > "),
            num("30"),
        ]
    );
}

#[test]
fn test_tokens_reconstruct_the_line() {
    let lines = [
        "",
        "   ",
        "SELECT * FROM users;",
        r#"select 'héllo', "naïve" from t -- ünïcode 42x 7"#,
        "WHERE a = 'unterminated",
        "GROUP BY region ORDER BY total DESC LIMIT 10",
        "\"\"''\"'",
        "x\r",
    ];
    for source in lines {
        let tokenized = tokenize_line(source);
        assert_eq!(tokenized.text(), source);
        assert!(tokenized.tokens.iter().all(|token| !token.text.is_empty()));
    }
}

#[test]
fn test_multi_word_keywords_keep_original_case() {
    let line = tokenize_line("group by region ORDER BY total");
    assert_eq!(
        line.tokens,
        vec![
            kw("group by"),
            plain(" region "),
            kw("ORDER BY"),
            plain(" total"),
        ]
    );
}

#[test]
fn test_keywords_need_word_boundaries() {
    let line = tokenize_line("SELECTED ORDERS FROM t_on");
    assert_eq!(
        line.tokens,
        vec![plain("SELECTED ORDERS "), kw("FROM"), plain(" t_on")]
    );
}

#[test]
fn test_numbers_need_word_boundaries() {
    let line = tokenize_line("LIMIT 10 OFFSET x1 2.5");
    assert_eq!(
        line.tokens,
        vec![
            kw("LIMIT"),
            plain(" "),
            num("10"),
            plain(" OFFSET x1 "),
            num("2"),
            plain("."),
            num("5"),
        ]
    );
}

#[test]
fn test_single_quoted_string_literal() {
    let line = tokenize_line("WHERE city = 'Oslo'");
    let string = line
        .tokens
        .iter()
        .find(|token| token.kind == TokenKind::SingleQuotedString)
        .expect("single-quoted token");
    assert_eq!(string.text, "'Oslo'");
    assert_eq!(string.literal(), "Oslo");
}

#[test]
fn test_unclosed_quote_is_plain() {
    let line = tokenize_line(r#"WHERE a = "oops"#);
    assert_eq!(line.tokens, vec![kw("WHERE"), plain(r#" a = "oops"#)]);
}

#[test]
fn test_keyword_inside_quotes_is_still_a_keyword() {
    let line = tokenize_line("WHERE name = 'AND' AND x = 1");
    assert_eq!(
        line.tokens,
        vec![
            kw("WHERE"),
            plain(" name = '"),
            kw("AND"),
            plain("' "),
            kw("AND"),
            plain(" x = "),
            num("1"),
        ]
    );
}

#[test]
fn test_block_numbers_lines_including_blank_ones() {
    let lines = tokenize_block("SELECT a\n\nFROM b");
    let numbers: Vec<usize> = lines.iter().map(|line| line.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(lines[1].tokens.is_empty());
    assert_eq!(lines[2].text(), "FROM b");
}

#[test]
fn test_literal_of_non_string_token_is_its_text() {
    assert_eq!(dq(r#""name""#).literal(), "name");
    assert_eq!(num("42").literal(), "42");
}

// -- Result splitter --

#[test]
fn test_result_table_after_statement() {
    let split = split_result(
        r#"SELECT * FROM users; Result: [{"id":1,"name":"Ann"},{"id":2,"name":"Bo"}]"#,
    );

    assert_eq!(split.preamble.len(), 1);
    assert_eq!(sql_text(&split.preamble[0]), "SELECT * FROM users;");

    let Some(Segment::ResultTable { columns, rows }) = split.result else {
        panic!("expected a result table");
    };
    assert_eq!(columns, vec!["id".to_string(), "name".to_string()]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some(&CellValue::Number(1u64.into())));
    assert_eq!(rows[0].get("name"), Some(&CellValue::Text("Ann".into())));
    assert_eq!(rows[1].get("id"), Some(&CellValue::Number(2u64.into())));
    assert_eq!(rows[1].get("name"), Some(&CellValue::Text("Bo".into())));
}

#[test]
fn test_non_tabular_result_falls_back_to_text() {
    let split = split_result("Result: no rows found");
    assert!(split.preamble.is_empty());
    assert_eq!(
        split.result,
        Some(Segment::ResultText {
            text: "no rows found".into()
        })
    );
}

#[test]
fn test_message_without_marker_has_no_result() {
    let split = split_result("SELECT 1;");
    assert!(split.result.is_none());
    assert_eq!(split.preamble.len(), 1);
}

#[test]
fn test_empty_payload_is_text() {
    let split = split_result("SELECT 1;\nResult:   ");
    assert_eq!(
        split.result,
        Some(Segment::ResultText {
            text: String::new()
        })
    );
}

#[test]
fn test_nested_or_non_array_payloads_are_text() {
    for payload in [r#"{"a":1}"#, r#"[{"a":[1,2]}]"#, r#"[1,2]"#, "[{\"a\":1}"] {
        let split = split_result(&format!("Result: {payload}"));
        assert_eq!(
            split.result,
            Some(Segment::ResultText {
                text: payload.to_string()
            }),
            "payload: {payload}"
        );
    }
}

#[test]
fn test_payload_errors_are_typed() {
    assert!(matches!(
        parse_result_payload(""),
        Err(ResultParseError::Empty)
    ));
    assert!(matches!(
        parse_result_payload("{}"),
        Err(ResultParseError::NotAnArray)
    ));
    assert!(matches!(
        parse_result_payload("[1]"),
        Err(ResultParseError::RowNotObject { index: 0 })
    ));
    assert!(matches!(
        parse_result_payload(r#"[{"a":1},{"b":{"c":2}}]"#),
        Err(ResultParseError::NestedValue { index: 1, .. })
    ));
    assert!(matches!(
        parse_result_payload("not json"),
        Err(ResultParseError::Json(_))
    ));
}

#[test]
fn test_missing_keys_become_absent_cells() {
    let (columns, rows) =
        parse_result_payload(r#"[{"a":1,"b":2},{"a":3}]"#).expect("tabular payload");
    assert_eq!(columns, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(rows[1].get("b"), None);
    assert_eq!(
        rows[1].display_cells(&columns),
        vec![Some("3".to_string()), None]
    );
}

#[test]
fn test_empty_array_is_an_empty_table() {
    let split = split_result("Result: []");
    assert_eq!(
        split.result,
        Some(Segment::ResultTable {
            columns: Vec::new(),
            rows: Vec::new(),
        })
    );
}

#[test]
fn test_scalar_cells_display_like_json() {
    let (columns, rows) =
        parse_result_payload(r#"[{"z":true,"a":null,"n":1.5,"s":"x"}]"#).expect("tabular");
    assert_eq!(columns, vec!["z", "a", "n", "s"]);
    assert_eq!(
        rows[0].display_cells(&columns),
        vec![
            Some("true".to_string()),
            Some("null".to_string()),
            Some("1.5".to_string()),
            Some("x".to_string()),
        ]
    );
}

#[test]
fn test_only_first_marker_splits() {
    let split = split_result("Result: Result: x");
    assert_eq!(
        split.result,
        Some(Segment::ResultText {
            text: "Result: x".into()
        })
    );
}

#[test]
fn test_full_message_pipeline_order() {
    let segments =
        parse_assistant_message("Here:\n```sql\nSELECT 1\n```\nResult: [{\"one\":1}]");
    assert_eq!(segments.len(), 3, "got: {:?}", segments);
    assert_eq!(segments[0], Segment::plain("Here:"));
    assert!(segments[1].is_sql());
    assert!(segments[2].is_result());
}
