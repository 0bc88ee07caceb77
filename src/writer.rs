use crate::tree::{Construct, FileScope, Scope, Token};
use std::io::{self, Write};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Serialize a document to canonical text
///
/// Members render in order with tab indentation, one tab per nesting level.
/// Comments render symmetrically to how the parser attached them: leading
/// comments as full lines before their construct, end comments before the
/// closing brace, the file preamble separated from the first member by a
/// blank line. Attached comments normalize to leading lines, so serializing
/// a freshly parsed tree and parsing the result yields an equal tree.
///
/// ```
/// use moltke::{parse_file, serialize};
///
/// let file = parse_file("list = { a b c }", "units.txt")?;
/// assert_eq!(serialize(&file), "list = {\n\ta b c\n}\n");
/// # Ok::<(), moltke::SyntaxError>(())
/// ```
pub fn serialize(file: &FileScope) -> String {
    let mut out = String::new();
    if !file.comments().is_empty() {
        write_comments(&mut out, file.comments(), 0);
        out.push_str(LINE_ENDING);
    }

    write_members(&mut out, file, 0);

    for comment in file.end_comments() {
        out.push_str(LINE_ENDING);
        out.push_str("# ");
        out.push_str(comment);
    }

    if !file.end_comments().is_empty() {
        out.push_str(LINE_ENDING);
    }

    out
}

/// Serialize a single scope subtree, starting at column zero
pub fn serialize_scope(scope: &Scope) -> String {
    let mut out = String::new();
    write_scope(&mut out, scope, 0);
    out
}

/// Write the canonical form of a document to a sink
pub fn write<W: Write>(file: &FileScope, mut sink: W) -> io::Result<()> {
    sink.write_all(serialize(file).as_bytes())
}

fn write_members(out: &mut String, scope: &Scope, indent: usize) {
    for (idx, member) in scope.members.iter().enumerate() {
        match member {
            Construct::Scope(s) => {
                write_comments(out, &s.comments, indent);
                write_scope(out, s, indent);
            }
            Construct::Binding(b) => {
                write_comments(out, &b.comments, indent);
                push_indent(out, indent);
                out.push_str(&b.name);
                out.push_str(" = ");
                out.push_str(&b.value);
                out.push_str(LINE_ENDING);
            }
            Construct::Token(t) => {
                if scope.indented {
                    write_comments(out, &t.comments, indent);
                    push_indent(out, indent);
                    out.push_str(&t.value);
                    out.push_str(LINE_ENDING);
                } else {
                    write_inline_token(out, scope.members(), idx, t, indent);
                }
            }
        }
    }
}

fn write_scope(out: &mut String, scope: &Scope, indent: usize) {
    push_indent(out, indent);
    if let Some(name) = &scope.name {
        out.push_str(name);
        out.push_str(" = {");
    } else {
        out.push('{');
    }

    // an empty scope closes inline, but trailing comments still need the
    // multi-line form
    if scope.members.is_empty() && scope.end_comments.is_empty() {
        out.push('}');
        out.push_str(LINE_ENDING);
        return;
    }

    out.push_str(LINE_ENDING);
    write_members(out, scope, indent + 1);
    write_comments(out, &scope.end_comments, indent + 1);
    push_indent(out, indent);
    out.push('}');
    out.push_str(LINE_ENDING);
}

/// Tokens in a non-indented scope flow inline, separated by spaces. A line
/// break is forced around a token adjacent to a non-token member or to a
/// commented token.
fn write_inline_token(
    out: &mut String,
    members: &[Construct],
    idx: usize,
    token: &Token,
    indent: usize,
) {
    write_comments(out, &token.comments, indent);

    let fresh_line = idx == 0
        || !token.comments.is_empty()
        || !matches!(members[idx - 1], Construct::Token(_));
    if fresh_line {
        push_indent(out, indent);
    } else {
        out.push(' ');
    }

    out.push_str(&token.value);

    let line_break = match members.get(idx + 1) {
        Some(Construct::Token(next)) => !next.comments.is_empty(),
        Some(_) | None => true,
    };
    if line_break {
        out.push_str(LINE_ENDING);
    }
}

fn write_comments(out: &mut String, comments: &[String], indent: usize) {
    for comment in comments {
        push_indent(out, indent);
        out.push_str("# ");
        out.push_str(comment);
        out.push_str(LINE_ENDING);
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push('\t');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;

    fn canonical(data: &str) -> String {
        serialize(&parse_file(data, "test.txt").unwrap())
    }

    #[test]
    fn test_simple_bindings() {
        assert_eq!(canonical("a=1 b=hello"), "a = 1\nb = hello\n");
    }

    #[test]
    fn test_nested_scopes() {
        assert_eq!(
            canonical("a = { b = { c = 1 } }"),
            "a = {\n\tb = {\n\t\tc = 1\n\t}\n}\n"
        );
    }

    #[test]
    fn test_inline_tokens() {
        assert_eq!(canonical("list = { a b c }"), "list = {\n\ta b c\n}\n");
    }

    #[test]
    fn test_indented_tokens() {
        let mut file = parse_file("list = { a b c }", "test.txt").unwrap();
        if let Some(Construct::Scope(list)) = file.members_mut().first_mut() {
            list.set_indented(true);
        }

        assert_eq!(serialize(&file), "list = {\n\ta\n\tb\n\tc\n}\n");
    }

    #[test]
    fn test_empty_scope_closes_inline() {
        assert_eq!(canonical("e = {}"), "e = {}\n");
        assert_eq!(canonical("e = {\n}"), "e = {}\n");
    }

    #[test]
    fn test_empty_scope_with_end_comments_stays_open() {
        assert_eq!(canonical("e = {\n# unused\n}"), "e = {\n\t# unused\n}\n");
    }

    #[test]
    fn test_scope_comment_renders_leading() {
        assert_eq!(
            canonical("outer = { # header\nx = 1\n}"),
            "# header\nouter = {\n\tx = 1\n}\n"
        );
    }

    #[test]
    fn test_file_preamble_blank_line() {
        assert_eq!(
            canonical("# copyright\n# author\n\n# about foo\nfoo = 1"),
            "# copyright\n# author\n\n# about foo\nfoo = 1\n"
        );
    }

    #[test]
    fn test_file_end_comments() {
        assert_eq!(canonical("a = 1\n# done"), "a = 1\n\n# done\n");
    }

    #[test]
    fn test_commented_token_breaks_line() {
        assert_eq!(
            canonical("list = {\na b # note\nc\n}"),
            "list = {\n\ta\n\t# note\n\tb c\n}\n"
        );
    }

    #[test]
    fn test_token_after_binding_breaks_line() {
        assert_eq!(
            canonical("mixed = { a = 1 b c }"),
            "mixed = {\n\ta = 1\n\tb c\n}\n"
        );
    }

    #[test]
    fn test_tokens_at_root() {
        assert_eq!(canonical("a b c"), "a b c\n");
    }

    #[test]
    fn test_serialize_scope_subtree() {
        let file = parse_file("outer = { x = 1 }", "test.txt").unwrap();
        let outer = file.scopes().next().unwrap();
        assert_eq!(serialize_scope(outer), "outer = {\n\tx = 1\n}\n");
    }

    #[test]
    fn test_write_to_sink() {
        let file = parse_file("a = 1", "test.txt").unwrap();
        let mut out: Vec<u8> = Vec::new();
        write(&file, &mut out).unwrap();
        assert_eq!(out, b"a = 1\n");
    }
}
