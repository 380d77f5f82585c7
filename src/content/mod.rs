mod extract;
mod result;
mod tokenizer;
mod types;

pub use extract::*;
pub use result::*;
pub use tokenizer::*;
pub use types::*;

/// Splits off any `Result:` payload, then extracts and tokenizes SQL blocks
/// in the preamble.
pub fn parse_assistant_message(content: &str) -> Vec<Segment> {
    split_result(content).into_segments()
}

#[cfg(test)]
mod content_tests;
