//! Splitting a single shell-like string into tokens.

use crate::error::ParseError;

/// Splits `line` on unquoted whitespace.
///
/// Single quotes keep everything literally. Double quotes keep whitespace
/// and allow `\"` and `\\` escapes. Outside quotes a backslash escapes the
/// next character. Adjacent quoted and unquoted pieces join into one token.
///
/// # Examples
///
/// ```
/// use argdecl_core::split_command_line;
///
/// let tokens = split_command_line(r#"--flag value 'quoted arg' "a \"b\"" c\ d"#).unwrap();
/// assert_eq!(tokens, vec!["--flag", "value", "quoted arg", "a \"b\"", "c d"]);
/// ```
pub fn split_command_line(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // A token has started even if it is still empty, e.g. after `''`.
    let mut started = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(ParseError::UnterminatedQuote(line.to_string())),
                    }
                }
            }
            '"' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(ParseError::UnterminatedQuote(line.to_string())),
                        },
                        Some(c) => current.push(c),
                        None => return Err(ParseError::UnterminatedQuote(line.to_string())),
                    }
                }
            }
            '\\' => {
                started = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c if c.is_whitespace() => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                started = true;
                current.push(c);
            }
        }
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(
            split_command_line("  -t 2   World ").unwrap(),
            vec!["-t", "2", "World"]
        );
        assert!(split_command_line("   ").unwrap().is_empty());
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        assert_eq!(split_command_line("a '' b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_adjacent_pieces_join() {
        assert_eq!(
            split_command_line(r#"--name='my file'.txt"#).unwrap(),
            vec!["--name=my file.txt"]
        );
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(split_command_line(r"'a\b'").unwrap(), vec![r"a\b"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            split_command_line("say 'hello"),
            Err(ParseError::UnterminatedQuote("say 'hello".into()))
        );
        assert!(split_command_line(r#"say "hi"#).is_err());
    }
}
