const WORD_BOUNDARY: u8 = 1;
const VALUE_CHAR: u8 = 2;

const fn create_character_class_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    table[b'\t' as usize] = WORD_BOUNDARY;
    table[b'\n' as usize] = WORD_BOUNDARY;
    table[b'\r' as usize] = WORD_BOUNDARY;
    table[b' ' as usize] = WORD_BOUNDARY;
    table[b'#' as usize] = WORD_BOUNDARY;
    table[b'=' as usize] = WORD_BOUNDARY;
    table[b'{' as usize] = WORD_BOUNDARY;
    table[b'}' as usize] = WORD_BOUNDARY;

    let mut i = 0usize;
    while i < 256 {
        let b = i as u8;
        if (b >= b'0' && b <= b'9') || (b >= b'a' && b <= b'z') || (b >= b'A' && b <= b'Z') {
            table[i] = table[i] | VALUE_CHAR;
        }
        i += 1;
    }

    table[b'_' as usize] = table[b'_' as usize] | VALUE_CHAR;
    table[b'.' as usize] = table[b'.' as usize] | VALUE_CHAR;
    table[b':' as usize] = table[b':' as usize] | VALUE_CHAR;
    table[b'"' as usize] = table[b'"' as usize] | VALUE_CHAR;
    table
}

/// One lookup answers both questions asked of a byte: does it end a word
/// lexeme, and does it count toward value validity. The two classes overlap
/// on nothing, so they share a table instead of two scans.
pub(crate) static CHARACTER_CLASS: [u8; 256] = create_character_class_table();

/// Whether a byte terminates a word lexeme: whitespace, a newline, or one of
/// the single character lexemes. Quotes are handled separately by the
/// tokenizer as they are sensitive to a preceding backslash.
#[inline]
pub(crate) fn is_boundary(b: u8) -> bool {
    CHARACTER_CLASS[usize::from(b)] & WORD_BOUNDARY != 0
}

#[inline]
pub(crate) fn is_value_char(b: u8) -> bool {
    CHARACTER_CLASS[usize::from(b)] & VALUE_CHAR != 0
}

/// Returns true if the lexeme can act as a binding name, binding value, or
/// bare token.
///
/// A lexeme qualifies if it carries a decimal digit, is the `---` sentinel
/// used by some game files to denote an absent value, or contains at least
/// one identifier character (letters, digits, underscore, dot, colon, or the
/// quotes surrounding a string lexeme). Quoted lexemes always qualify since
/// they retain their surrounding quotes.
///
/// ```
/// use moltke::is_valid_value;
///
/// assert!(is_valid_value("infantry"));
/// assert!(is_valid_value("1444.11.11"));
/// assert!(is_valid_value("\"a quoted value\""));
/// assert!(is_valid_value("---"));
/// assert!(!is_valid_value("="));
/// assert!(!is_valid_value("!!"));
/// ```
pub fn is_valid_value(lexeme: &str) -> bool {
    lexeme.bytes().any(|b| b.is_ascii_digit())
        || lexeme == "---"
        || lexeme.bytes().any(is_value_char)
}
