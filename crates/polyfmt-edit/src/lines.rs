/// Splits `text` into lines, each keeping its `\n` terminator.
///
/// The last element is whatever follows the final terminator and is empty
/// when `text` ends with a newline, so joining the result gives back `text`.
pub fn break_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
    if text.is_empty() || text.ends_with('\n') {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_lines_keeps_terminators() {
        assert_eq!(break_lines("a\nb\n"), vec!["a\n", "b\n", ""]);
    }

    #[test]
    fn test_break_lines_unterminated_tail() {
        assert_eq!(break_lines("a\nb"), vec!["a\n", "b"]);
    }

    #[test]
    fn test_break_lines_empty() {
        assert_eq!(break_lines(""), vec![""]);
    }

    #[test]
    fn test_break_lines_crlf_stays_in_line() {
        assert_eq!(break_lines("a\r\nb"), vec!["a\r\n", "b"]);
    }

    #[test]
    fn test_break_lines_joins_back() {
        let text = "\n\nfn main() {}\n  \n";
        assert_eq!(break_lines(text).concat(), text);
    }
}
