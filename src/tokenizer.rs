use crate::data::is_boundary;
use crate::errors::{SyntaxError, SyntaxErrorKind};

/// A lexeme extracted from raw text, tagged with the 1-based line it starts on
///
/// Lexemes borrow from the input. String lexemes retain their surrounding
/// quotes and their escape sequences verbatim. A comment is two lexemes: the
/// `#` itself followed by the comment body (possibly empty), both on the
/// same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    text: &'a str,
    line: u32,
}

impl<'a> Lexeme<'a> {
    /// The raw text of the lexeme
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The 1-based line the lexeme starts on
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// Split raw text into a flat sequence of lexemes
///
/// A single pass over the input. `\r\n` counts as one line break. The only
/// failure is an unterminated string, reported at the last line of the
/// input.
///
/// ```
/// use moltke::tokenize;
///
/// let lexemes = tokenize("a = 1 # done")?;
/// let texts: Vec<_> = lexemes.iter().map(|l| l.text()).collect();
/// assert_eq!(texts, vec!["a", "=", "1", "#", " done"]);
/// # Ok::<(), moltke::SyntaxError>(())
/// ```
pub fn tokenize(data: &str) -> Result<Vec<Lexeme<'_>>, SyntaxError> {
    let bytes = data.as_bytes();
    let mut lexemes = Vec::with_capacity(data.len() / 8);
    let mut line: u32 = 1;
    let mut word_start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' | b'=' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                lexemes.push(Lexeme {
                    text: &data[i..i + 1],
                    line,
                });
                i += 1;
            }
            b'#' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                lexemes.push(Lexeme {
                    text: &data[i..i + 1],
                    line,
                });

                let body = i + 1;
                let len = memchr::memchr2(b'\r', b'\n', &bytes[body..])
                    .unwrap_or(bytes.len() - body);
                lexemes.push(Lexeme {
                    text: &data[body..body + len],
                    line,
                });
                i = body + len;
            }
            b'"' if i == 0 || bytes[i - 1] != b'\\' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                let (lexeme, rest, new_line) = quoted(data, i, line)?;
                lexemes.push(lexeme);
                line = new_line;
                i = rest;
            }
            b' ' | b'\t' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                i += 1;
            }
            b'\r' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                line += 1;
                i += 1;
            }
            b'\n' => {
                flush_word(data, &mut lexemes, &mut word_start, i, line);
                if i == 0 || bytes[i - 1] != b'\r' {
                    line += 1;
                }
                i += 1;
            }
            _ => {
                if word_start.is_none() {
                    word_start = Some(i);
                }

                i += 1;
                while i < bytes.len() && bytes[i] != b'"' && !is_boundary(bytes[i]) {
                    i += 1;
                }
            }
        }
    }

    flush_word(data, &mut lexemes, &mut word_start, bytes.len(), line);
    Ok(lexemes)
}

fn flush_word<'a>(
    data: &'a str,
    lexemes: &mut Vec<Lexeme<'a>>,
    word_start: &mut Option<usize>,
    end: usize,
    line: u32,
) {
    if let Some(start) = word_start.take() {
        lexemes.push(Lexeme {
            text: &data[start..end],
            line,
        });
    }
}

/// Scan a string lexeme starting at the opening quote. Returns the lexeme
/// (quotes included), the index after the closing quote, and the line after
/// the string. A `"` preceded by `\` does not close the string.
fn quoted(data: &str, start: usize, line: u32) -> Result<(Lexeme<'_>, usize, u32), SyntaxError> {
    let bytes = data.as_bytes();
    let mut search = start + 1;
    loop {
        match memchr::memchr(b'"', &bytes[search..]) {
            Some(offset) => {
                let close = search + offset;
                if bytes[close - 1] == b'\\' {
                    search = close + 1;
                    continue;
                }

                let lexeme = Lexeme {
                    text: &data[start..=close],
                    line,
                };
                return Ok((lexeme, close + 1, line + count_newlines(&bytes[start..close])));
            }
            None => {
                let last = line + count_newlines(&bytes[start..]);
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnterminatedString,
                    last,
                    &data[start..],
                ));
            }
        }
    }
}

fn count_newlines(span: &[u8]) -> u32 {
    let mut count = 0;
    let mut i = 0;
    while i < span.len() {
        match span[i] {
            b'\r' => {
                count += 1;
                if span.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => count += 1,
            _ => {}
        }
        i += 1;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn raw(data: &str) -> Vec<(&str, u32)> {
        tokenize(data)
            .unwrap()
            .iter()
            .map(|l| (l.text(), l.line()))
            .collect()
    }

    #[rstest]
    #[case("a = 1", &[("a", 1), ("=", 1), ("1", 1)])]
    #[case("a=1", &[("a", 1), ("=", 1), ("1", 1)])]
    #[case("list = { a b }", &[("list", 1), ("=", 1), ("{", 1), ("a", 1), ("b", 1), ("}", 1)])]
    #[case("a = 1\nb = 2", &[("a", 1), ("=", 1), ("1", 1), ("b", 2), ("=", 2), ("2", 2)])]
    #[case("a = 1\r\nb = 2", &[("a", 1), ("=", 1), ("1", 1), ("b", 2), ("=", 2), ("2", 2)])]
    #[case("a\rb", &[("a", 1), ("b", 2)])]
    fn test_words(#[case] input: &str, #[case] expected: &[(&str, u32)]) {
        assert_eq!(raw(input), expected);
    }

    #[rstest]
    #[case("# a comment", &[("#", 1), (" a comment", 1)])]
    #[case("#\nx", &[("#", 1), ("", 1), ("x", 2)])]
    #[case("#", &[("#", 1), ("", 1)])]
    #[case("x = 1 # note\ny = 2", &[("x", 1), ("=", 1), ("1", 1), ("#", 1), (" note", 1), ("y", 2), ("=", 2), ("2", 2)])]
    #[case("# contains = { } \" inside\nx", &[("#", 1), (" contains = { } \" inside", 1), ("x", 2)])]
    #[case("# crlf\r\nx", &[("#", 1), (" crlf", 1), ("x", 2)])]
    fn test_comments(#[case] input: &str, #[case] expected: &[(&str, u32)]) {
        assert_eq!(raw(input), expected);
    }

    #[rstest]
    #[case("name = \"foo bar\"", &[("name", 1), ("=", 1), ("\"foo bar\"", 1)])]
    #[case("\"\"", &[("\"\"", 1)])]
    #[case(r#""a \" b""#, &[(r#""a \" b""#, 1)])]
    #[case("\"a = { # b\"", &[("\"a = { # b\"", 1)])]
    #[case("ab\"cd\"", &[("ab", 1), ("\"cd\"", 1)])]
    fn test_quotes(#[case] input: &str, #[case] expected: &[(&str, u32)]) {
        assert_eq!(raw(input), expected);
    }

    #[test]
    fn test_multiline_quote_line_tracking() {
        let lexemes = tokenize("\"a\nb\" c").unwrap();
        assert_eq!(lexemes[0].text(), "\"a\nb\"");
        assert_eq!(lexemes[0].line(), 1);
        assert_eq!(lexemes[1].text(), "c");
        assert_eq!(lexemes[1].line(), 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("a = 1\nb = \"oops").unwrap_err();
        assert_eq!(err.kind(), SyntaxErrorKind::UnterminatedString);
        assert_eq!(err.line(), 2);
        assert_eq!(err.token(), "\"oops");
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
    }
}
