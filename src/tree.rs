use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};

/// A node of the document tree
///
/// The tree owns its strings; binding names and values are raw lexemes, so
/// quoted values retain their surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    /// A nested `{ ... }` scope, named or anonymous
    Scope(Scope),

    /// A `name = value` pair
    Binding(Binding),

    /// A bare positional value inside a list-like scope
    Token(Token),
}

impl Construct {
    /// Leading comments attached to this construct
    pub fn comments(&self) -> &[String] {
        match self {
            Construct::Scope(s) => &s.comments,
            Construct::Binding(b) => &b.comments,
            Construct::Token(t) => &t.comments,
        }
    }

    pub(crate) fn comments_mut(&mut self) -> &mut Vec<String> {
        match self {
            Construct::Scope(s) => &mut s.comments,
            Construct::Binding(b) => &mut b.comments,
            Construct::Token(t) => &mut t.comments,
        }
    }

    /// Returns the scope if this construct is one
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Construct::Scope(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the binding if this construct is one
    pub fn as_binding(&self) -> Option<&Binding> {
        match self {
            Construct::Binding(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the bare token if this construct is one
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Construct::Token(t) => Some(t),
            _ => None,
        }
    }

    /// The key a stable member sort orders this construct by. Anonymous
    /// scopes have no key and sort last.
    fn sort_key(&self) -> Option<&str> {
        match self {
            Construct::Scope(s) => s.name.as_deref(),
            Construct::Binding(b) => Some(&b.name),
            Construct::Token(t) => Some(&t.value),
        }
    }
}

/// A container of ordered members delimited by `{ ... }`, optionally named
///
/// Scopes are produced by the parser or assembled by hand through
/// [`new_child`](Scope::new_child), [`add_binding`](Scope::add_binding), and
/// [`add_token`](Scope::add_token), which keep the nesting level consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub(crate) name: Option<String>,
    pub(crate) members: Vec<Construct>,
    pub(crate) comments: Vec<String>,
    pub(crate) end_comments: Vec<String>,
    pub(crate) indented: bool,
    pub(crate) sorted: bool,
    pub(crate) level: usize,
}

impl Scope {
    pub(crate) fn new(name: Option<String>, level: usize) -> Scope {
        Scope {
            name,
            members: Vec::new(),
            comments: Vec::new(),
            end_comments: Vec::new(),
            indented: false,
            sorted: false,
            level,
        }
    }

    /// The name of the scope, or `None` when anonymous
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Nesting depth; the file root is level 0
    pub fn level(&self) -> usize {
        self.level
    }

    /// The members in document order
    pub fn members(&self) -> &[Construct] {
        &self.members
    }

    /// Mutable access to the members for reordering and removal
    pub fn members_mut(&mut self) -> &mut Vec<Construct> {
        &mut self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the scope has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Leading comments of the scope
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Mutable access to the leading comments
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }

    /// Comments sitting just before the closing brace
    pub fn end_comments(&self) -> &[String] {
        &self.end_comments
    }

    /// Mutable access to the end comments
    pub fn end_comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.end_comments
    }

    /// Whether bare tokens render one per line instead of inline
    pub fn indented(&self) -> bool {
        self.indented
    }

    /// Set whether bare tokens render one per line
    pub fn set_indented(&mut self, indented: bool) {
        self.indented = indented;
    }

    /// Whether members are sorted when the parser closes the scope
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Request a member sort when the parser closes the scope. Hand-built
    /// trees should call [`sort_members`](Scope::sort_members) instead.
    pub fn set_sorted(&mut self, sorted: bool) {
        self.sorted = sorted;
    }

    /// Append an empty child scope and return a handle to it
    ///
    /// ```
    /// use moltke::{serialize, FileScope};
    ///
    /// let mut file = FileScope::new("map/area.txt");
    /// let area = file.new_child(Some("brittany_area"));
    /// area.add_token("169");
    /// area.add_token("170");
    /// assert_eq!(serialize(&file), "brittany_area = {\n\t169 170\n}\n");
    /// ```
    pub fn new_child(&mut self, name: Option<&str>) -> &mut Scope {
        let child = Scope::new(name.map(String::from), self.level + 1);
        self.members.push(Construct::Scope(child));
        match self.members.last_mut() {
            Some(Construct::Scope(s)) => s,
            _ => unreachable!(),
        }
    }

    /// Append a `name = value` binding and return a handle to it
    pub fn add_binding(&mut self, name: &str, value: &str) -> &mut Binding {
        self.members.push(Construct::Binding(Binding::new(name, value)));
        match self.members.last_mut() {
            Some(Construct::Binding(b)) => b,
            _ => unreachable!(),
        }
    }

    /// Append a bare token and return a handle to it
    pub fn add_token(&mut self, value: &str) -> &mut Token {
        self.members.push(Construct::Token(Token::new(value)));
        match self.members.last_mut() {
            Some(Construct::Token(t)) => t,
            _ => unreachable!(),
        }
    }

    /// Find the first member with the given name: a binding named `name` or
    /// a child scope named `name`
    pub fn get(&self, name: &str) -> Option<&Construct> {
        self.members.iter().find(|m| match m {
            Construct::Scope(s) => s.name.as_deref() == Some(name),
            Construct::Binding(b) => b.name == name,
            Construct::Token(_) => false,
        })
    }

    /// Iterate over the child scopes in document order
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.members.iter().filter_map(Construct::as_scope)
    }

    /// Iterate over the bindings in document order
    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.members.iter().filter_map(Construct::as_binding)
    }

    /// Iterate over the bare tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.members.iter().filter_map(Construct::as_token)
    }

    /// Stably sort members: bindings and named scopes by name, bare tokens
    /// by value, anonymous scopes last in their original order
    pub fn sort_members(&mut self) {
        self.members.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

/// The root scope of a parsed or hand-built document
///
/// Dereferences to [`Scope`], so all scope operations apply. The root is
/// always at level 0; its `comments` are the file preamble and its
/// `end_comments` trail the last member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScope {
    pub(crate) address: String,
    pub(crate) scope: Scope,
}

impl FileScope {
    /// Create an empty document with the given address
    pub fn new(address: &str) -> FileScope {
        FileScope {
            address: address.to_string(),
            scope: Scope::new(None, 0),
        }
    }

    pub(crate) fn from_root(address: &str, scope: Scope) -> FileScope {
        FileScope {
            address: address.to_string(),
            scope,
        }
    }

    /// The address the document was parsed from or will be written to
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Deref for FileScope {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.scope
    }
}

impl DerefMut for FileScope {
    fn deref_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }
}

/// A `name = value` pair
///
/// Both halves are raw lexemes: a quoted value keeps its quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) comments: Vec<String>,
}

impl Binding {
    pub(crate) fn new(name: &str, value: &str) -> Binding {
        Binding {
            name: name.to_string(),
            value: value.to_string(),
            comments: Vec::new(),
        }
    }

    /// The binding name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value lexeme
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value lexeme
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Leading comments of the binding
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Mutable access to the leading comments
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }
}

/// A bare positional value inside a list-like scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) value: String,
    pub(crate) comments: Vec<String>,
}

impl Token {
    pub(crate) fn new(value: &str) -> Token {
        Token {
            value: value.to_string(),
            comments: Vec::new(),
        }
    }

    /// The raw value lexeme
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Leading comments of the token
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Mutable access to the leading comments
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_levels() {
        let mut file = FileScope::new("a.txt");
        assert_eq!(file.level(), 0);
        let outer = file.new_child(Some("outer"));
        assert_eq!(outer.level(), 1);
        let inner = outer.new_child(None);
        assert_eq!(inner.level(), 2);
    }

    #[test]
    fn test_get_and_iterators() {
        let mut file = FileScope::new("a.txt");
        file.add_binding("name", "\"Johan\"");
        file.add_token("4384");
        file.new_child(Some("traits"));

        assert!(file.get("name").and_then(Construct::as_binding).is_some());
        assert!(file.get("traits").and_then(Construct::as_scope).is_some());
        assert!(file.get("4384").is_none());
        assert_eq!(file.bindings().count(), 1);
        assert_eq!(file.tokens().count(), 1);
        assert_eq!(file.scopes().count(), 1);
        assert_eq!(file.len(), 3);
    }

    #[test]
    fn test_sort_members_is_stable() {
        let mut file = FileScope::new("a.txt");
        file.new_child(None).add_token("second");
        file.add_binding("b", "1");
        file.add_binding("a", "2");
        file.new_child(None).add_token("first");
        file.add_binding("a", "3");
        file.sort_members();

        let keys: Vec<_> = file
            .members()
            .iter()
            .map(|m| match m {
                Construct::Binding(b) => format!("{}={}", b.name(), b.value()),
                Construct::Scope(s) => {
                    let inner = s.tokens().next().map(Token::value).unwrap_or("");
                    format!("anon:{}", inner)
                }
                Construct::Token(t) => t.value().to_string(),
            })
            .collect();

        assert_eq!(keys, vec!["a=2", "a=3", "b=1", "anon:second", "anon:first"]);
    }
}
