use std::error;
use std::fmt;

/// An error from parsing a document
///
/// The payload is boxed so that results stay pointer sized on the
/// happy path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError(Box<SyntaxErrorRepr>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxErrorRepr {
    kind: SyntaxErrorKind,
    address: String,
    line: u32,
    token: String,
}

/// Specific kind of syntax failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// End of input was reached inside a quoted string
    UnterminatedString,

    /// `name = { ... }` where the name is not a valid value
    InvalidNameAtScopeBinding,

    /// `name = value` where the name is not a valid value
    InvalidNameAtBinding,

    /// `name = value` where the value is not a valid value
    InvalidValueAtBinding,

    /// A `}` was seen while already at the file root
    UnmatchedClosingBrace,

    /// End of input was reached with unclosed scopes
    MissingClosingBrace,

    /// A bare lexeme that is neither a valid value nor part of a binding
    UnexpectedToken,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, line: u32, token: impl Into<String>) -> SyntaxError {
        SyntaxError(Box::new(SyntaxErrorRepr {
            kind,
            address: String::new(),
            line,
            token: token.into(),
        }))
    }

    pub(crate) fn with_address(mut self, address: &str) -> SyntaxError {
        self.0.address = address.to_string();
        self
    }

    /// Return the specific kind of error
    pub fn kind(&self) -> SyntaxErrorKind {
        self.0.kind
    }

    /// Unwrap this error into its underlying kind
    pub fn into_kind(self) -> SyntaxErrorKind {
        self.0.kind
    }

    /// The 1-based line of the offending lexeme (the last line of the input
    /// for errors raised at end of input)
    pub fn line(&self) -> u32 {
        self.0.line
    }

    /// The offending lexeme
    pub fn token(&self) -> &str {
        &self.0.token
    }

    /// The address of the document that failed to parse
    pub fn address(&self) -> &str {
        &self.0.address
    }

    /// Format the multi-line detail block for user-facing reports
    ///
    /// ```
    /// let err = moltke::parse_file("= 5", "common/units.txt").unwrap_err();
    /// assert_eq!(err.detail(), "Token: '='\nLine: 1\nFile: common/units.txt");
    /// ```
    pub fn detail(&self) -> String {
        format!(
            "Token: '{}'\nLine: {}\nFile: {}",
            self.0.token, self.0.line, self.0.address
        )
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self.0.kind {
            SyntaxErrorKind::UnterminatedString => "unterminated string",
            SyntaxErrorKind::InvalidNameAtScopeBinding => "invalid name at scope binding",
            SyntaxErrorKind::InvalidNameAtBinding => "invalid name at binding",
            SyntaxErrorKind::InvalidValueAtBinding => "invalid value at binding",
            SyntaxErrorKind::UnmatchedClosingBrace => "unmatched closing brace",
            SyntaxErrorKind::MissingClosingBrace => "missing closing brace",
            SyntaxErrorKind::UnexpectedToken => "unexpected token",
        };

        write!(f, "{} (line: {})", msg, self.0.line)
    }
}

impl error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_error_struct() {
        assert!(std::mem::size_of::<SyntaxError>() <= 8);
    }

    #[test]
    fn test_display() {
        let err = SyntaxError::new(SyntaxErrorKind::UnexpectedToken, 3, "!!")
            .with_address("events/war.txt");
        assert_eq!(err.to_string(), "unexpected token (line: 3)");
        assert_eq!(err.detail(), "Token: '!!'\nLine: 3\nFile: events/war.txt");
        assert_eq!(err.kind(), SyntaxErrorKind::UnexpectedToken);
        assert_eq!(err.line(), 3);
        assert_eq!(err.token(), "!!");
        assert_eq!(err.address(), "events/war.txt");
    }
}
