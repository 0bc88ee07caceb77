use crate::data::is_valid_value;
use crate::errors::{SyntaxError, SyntaxErrorKind};
use crate::tokenizer::{tokenize, Lexeme};
use crate::tree::{Binding, Construct, FileScope, Scope, Token};

/// Parse a complete document into a file tree
///
/// The address names the document in reported errors; it is not opened or
/// otherwise interpreted.
///
/// ```
/// use moltke::parse_file;
///
/// let file = parse_file("name = \"Johan\"\ncores = { HAB FRA }\n", "save.txt")?;
/// assert_eq!(file.bindings().next().map(|b| b.value()), Some("\"Johan\""));
///
/// let cores = file.get("cores").and_then(|c| c.as_scope()).unwrap();
/// let values: Vec<_> = cores.tokens().map(|t| t.value()).collect();
/// assert_eq!(values, vec!["HAB", "FRA"]);
/// # Ok::<(), moltke::SyntaxError>(())
/// ```
pub fn parse_file(text: &str, address: &str) -> Result<FileScope, SyntaxError> {
    let lexemes = tokenize(text).map_err(|e| e.with_address(address))?;
    let root = Parser::new(&lexemes)
        .run()
        .map_err(|e| e.with_address(address))?;
    Ok(FileScope::from_root(address, root))
}

/// Walks the lexeme sequence left to right, dispatching on the current
/// lexeme with a look-behind window. The bottom of the stack is the file
/// root; the top is the scope under construction.
struct Parser<'a, 'b> {
    lexemes: &'b [Lexeme<'a>],
    bodies: Vec<bool>,
    stack: Vec<Scope>,
    pending: Vec<(String, u32)>,
}

impl<'a, 'b> Parser<'a, 'b> {
    fn new(lexemes: &'b [Lexeme<'a>]) -> Parser<'a, 'b> {
        // a comment body is the lexeme right after a `#`, where that `#` is
        // a comment marker and not itself a body (a `##` comment has the
        // body "#")
        let mut bodies = vec![false; lexemes.len()];
        for i in 1..lexemes.len() {
            bodies[i] = lexemes[i - 1].text() == "#" && !bodies[i - 1];
        }

        Parser {
            lexemes,
            bodies,
            stack: vec![Scope::new(None, 0)],
            pending: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Scope, SyntaxError> {
        for i in 0..self.lexemes.len() {
            if self.bodies[i] {
                // comment body, consumed by the comment rule
                continue;
            }

            let cur = self.lexemes[i];
            match cur.text() {
                "{" => self.open_scope(i)?,
                "}" => self.close_scope(cur)?,
                "=" => self.binding(i)?,
                "#" => self.comment(i),
                _ => self.bare_token(i)?,
            }
        }

        self.finish()
    }

    /// The lexeme at `idx` unless it is a comment body; a body never acts
    /// as a name, value, or binder.
    fn value_lexeme(&self, idx: Option<usize>) -> Option<Lexeme<'a>> {
        let idx = idx?;
        (!self.bodies[idx]).then(|| self.lexemes[idx])
    }

    fn at_root_first_member(&self) -> bool {
        self.stack.len() == 1 && self.stack[0].members.is_empty()
    }

    /// Drain the pending queue for a newly created construct. For the first
    /// member of the file root the queue is split at the first line gap,
    /// scanning backwards: the trailing contiguous block belongs to the
    /// member, anything before the gap is the file preamble.
    fn take_pending(&mut self, first_of_root: bool) -> Vec<String> {
        if self.pending.is_empty() {
            return Vec::new();
        }

        let mut pending = std::mem::take(&mut self.pending);
        let mut split = 0;
        if first_of_root {
            split = pending.len() - 1;
            while split > 0 && pending[split - 1].1 + 1 == pending[split].1 {
                split -= 1;
            }
        }

        let own = pending.split_off(split);
        self.stack[0]
            .comments
            .extend(pending.into_iter().map(|(text, _)| text));
        own.into_iter().map(|(text, _)| text).collect()
    }

    fn open_scope(&mut self, i: usize) -> Result<(), SyntaxError> {
        let binder = self.value_lexeme(i.checked_sub(1));
        let name = self.value_lexeme(i.checked_sub(2));
        let scope = if binder.map(|b| b.text()) == Some("=") {
            match name {
                Some(n) if is_valid_value(n.text()) => {
                    Scope::new(Some(n.text().to_string()), self.stack.len())
                }
                Some(n) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::InvalidNameAtScopeBinding,
                        n.line(),
                        n.text(),
                    ))
                }
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::InvalidNameAtScopeBinding,
                        self.lexemes[i].line(),
                        "=",
                    ))
                }
            }
        } else {
            Scope::new(None, self.stack.len())
        };

        let first_of_root = self.at_root_first_member();
        self.stack.push(scope);
        let leading = self.take_pending(first_of_root);
        if let Some(top) = self.stack.last_mut() {
            top.comments.extend(leading);
        }

        Ok(())
    }

    fn close_scope(&mut self, cur: Lexeme) -> Result<(), SyntaxError> {
        let ends: Vec<String> = self.pending.drain(..).map(|(text, _)| text).collect();
        if let Some(top) = self.stack.last_mut() {
            top.end_comments.extend(ends);
        }

        if self.stack.len() == 1 {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnmatchedClosingBrace,
                cur.line(),
                cur.text(),
            ));
        }

        if let Some(mut scope) = self.stack.pop() {
            if scope.sorted {
                scope.sort_members();
            }

            if let Some(parent) = self.stack.last_mut() {
                parent.members.push(Construct::Scope(scope));
            }
        }

        Ok(())
    }

    fn binding(&mut self, i: usize) -> Result<(), SyntaxError> {
        let cur = self.lexemes[i];
        let next = self.lexemes.get(i + 1).copied();
        if next.map(|n| n.text()) == Some("{") {
            // the scope rule consumes this binding when it reaches the brace
            return Ok(());
        }

        let name = match self.value_lexeme(i.checked_sub(1)) {
            Some(n) if is_valid_value(n.text()) => n,
            Some(n) => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidNameAtBinding,
                    n.line(),
                    n.text(),
                ))
            }
            None => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidNameAtBinding,
                    cur.line(),
                    cur.text(),
                ))
            }
        };

        let value = match next {
            Some(v) if is_valid_value(v.text()) => v,
            Some(v) => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidValueAtBinding,
                    v.line(),
                    v.text(),
                ))
            }
            None => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidValueAtBinding,
                    cur.line(),
                    cur.text(),
                ))
            }
        };

        let first_of_root = self.at_root_first_member();
        let mut binding = Binding::new(name.text(), value.text());
        binding.comments = self.take_pending(first_of_root);
        if let Some(top) = self.stack.last_mut() {
            top.members.push(Construct::Binding(binding));
        }

        Ok(())
    }

    fn comment(&mut self, i: usize) {
        let cur = self.lexemes[i];
        let body = self.lexemes.get(i + 1).map(|b| b.text()).unwrap_or("");
        let text = body.trim().to_string();
        let prev = i.checked_sub(1).map(|j| self.lexemes[j]);

        let attached = prev.map_or(false, |p| p.line() == cur.line());
        if attached {
            if prev.map(|p| p.text()) == Some("{") {
                if let Some(top) = self.stack.last_mut() {
                    top.comments.push(text);
                }
            } else if let Some(member) = self.stack.last_mut().and_then(|s| s.members.last_mut()) {
                member.comments_mut().push(text);
            } else {
                self.pending.push((text, cur.line()));
            }
        } else {
            self.pending.push((text, cur.line()));
        }
    }

    fn bare_token(&mut self, i: usize) -> Result<(), SyntaxError> {
        let cur = self.lexemes[i];
        let prev = self.value_lexeme(i.checked_sub(1));
        let next = self.lexemes.get(i + 1).copied();
        if prev.map(|p| p.text()) == Some("=") || next.map(|n| n.text()) == Some("=") {
            // part of a binding
            return Ok(());
        }

        if !is_valid_value(cur.text()) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedToken,
                cur.line(),
                cur.text(),
            ));
        }

        let first_of_root = self.at_root_first_member();
        let mut token = Token::new(cur.text());
        token.comments = self.take_pending(first_of_root);
        if let Some(top) = self.stack.last_mut() {
            top.members.push(Construct::Token(token));
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Scope, SyntaxError> {
        if self.stack.len() > 1 {
            let (line, token) = self
                .lexemes
                .last()
                .map(|l| (l.line(), l.text()))
                .unwrap_or((1, ""));
            return Err(SyntaxError::new(
                SyntaxErrorKind::MissingClosingBrace,
                line,
                token,
            ));
        }

        let mut root = self.stack.pop().unwrap_or_else(|| Scope::new(None, 0));
        root.end_comments
            .extend(self.pending.drain(..).map(|(text, _)| text));
        Ok(root)
    }
}
