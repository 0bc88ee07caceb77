/*!

A round-tripping parser and serializer for the Clausewitz script format: the
curly-brace key/value text format [Paradox Development
Studio](https://en.wikipedia.org/wiki/Paradox_Development_Studio) titles use
for game data such as events, localization, modifiers, and map definitions.

Unlike throughput-oriented parsers for the same family of formats, moltke
keeps the comments: leading comment lines, comments attached at the end of a
line, and trailing comments before a closing brace all land on the tree node
they annotate, and serializing writes them back out. That makes the crate
suited for tooling that rewrites game files a human still has to read —
formatters, mod mergers, bulk editors.

## Quick Start

```rust
use moltke::{parse_file, serialize};

let data = "# capital of the realm\ncapital = 236\ncores = {\n\tHAB FRA\n}\n";
let file = parse_file(data, "common/countries/austria.txt")?;

let capital = file.bindings().next().unwrap();
assert_eq!(capital.value(), "236");
assert_eq!(capital.comments(), ["capital of the realm"]);

assert_eq!(serialize(&file), data);
# Ok::<(), moltke::SyntaxError>(())
```

Parsing then serializing produces canonical text: tab indentation, one
binding per line, inline bare-token lists. Re-parsing canonical text yields
a structurally equal tree, and serializing is idempotent from then on.

## Editing trees

Documents can be assembled or modified through the tree API and written back
out:

```rust
use moltke::{serialize, FileScope};

let mut file = FileScope::new("common/units/infantry.txt");
file.add_binding("type", "infantry");
let levels = file.new_child(Some("levels"));
levels.add_token("1");
levels.add_token("2");
assert_eq!(
    serialize(&file),
    "type = infantry\nlevels = {\n\t1 2\n}\n"
);
```

## Errors

Failures carry the offending lexeme, its 1-based line, and the document
address, and can be formatted as a detail block for user-facing reports:

```rust
use moltke::SyntaxErrorKind;

let err = moltke::parse_file("= 5", "events/war.txt").unwrap_err();
assert_eq!(err.kind(), SyntaxErrorKind::InvalidNameAtBinding);
assert_eq!(err.detail(), "Token: '='\nLine: 1\nFile: events/war.txt");
```

A single error aborts the parse of its document; no partial tree is
returned. Callers traversing a directory decide whether to continue with the
next file (the bundled `check` binary does).

## Caveats

Before calling moltke, callers are expected to:

- Decode on-disk bytes to a string (historically these files are
  windows-1252; `String::from_utf8_lossy` is usually sufficient for
  structural work).
- Accept canonical output: insignificant whitespace such as blank-line runs
  and horizontal alignment is not preserved, and attached comments
  normalize to leading comment lines.

*/
#![warn(missing_docs)]

mod data;
mod errors;
mod parser;
mod tokenizer;
mod tree;
mod writer;

pub use self::data::is_valid_value;
pub use self::errors::{SyntaxError, SyntaxErrorKind};
pub use self::parser::parse_file;
pub use self::tokenizer::{tokenize, Lexeme};
pub use self::tree::{Binding, Construct, FileScope, Scope, Token};
pub use self::writer::{serialize, serialize_scope, write};
