//! Tokenizer for IPPcode24 source lines.

/// Split a source line into tokens separated by ASCII whitespace.
/// Other Unicode whitespace belongs to the token it appears in.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line. A literal `#`
/// inside a string constant must be written as `\035`, so the first `#`
/// always starts a comment.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_ascii_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() {
        assert!(tokenize_line("").is_empty());
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize_line("   \t  ").is_empty());
    }

    #[test]
    fn comment_only() {
        assert!(tokenize_line("# this is a comment").is_empty());
    }

    #[test]
    fn instruction_with_comment() {
        assert_eq!(
            tokenize_line("ADD GF@x GF@x int@1# increment"),
            vec!["ADD", "GF@x", "GF@x", "int@1"]
        );
    }

    #[test]
    fn tabs_and_repeated_spaces() {
        assert_eq!(
            tokenize_line("\tWRITE   string@a\\032b  "),
            vec!["WRITE", "string@a\\032b"]
        );
    }

    #[test]
    fn unicode_whitespace_is_not_a_separator() {
        assert_eq!(
            tokenize_line("WRITE string@a\u{3000}b\u{2028}"),
            vec!["WRITE", "string@a\u{3000}b\u{2028}"]
        );
    }
}
