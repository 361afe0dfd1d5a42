//! Implicit-string rules: balance scanning and escaping.
//!
//! The writer consults this module to decide whether a string can stand
//! unquoted and how to escape it; the parser applies the same rules at
//! token level when it slices implicit keys and values out of the source.
//!
//! Balance rules:
//! - `(` `[` `{` nest and must close in LIFO order.
//! - `'`, `"` and `'''` open quoted regions closed by the same delimiter;
//!   a raw newline inside a single-line quote is illegal.
//! - `\c` consumes `c` literally.
//! - `//` and `#` consume through end of line; `/* */` must nest-close.

/// Whether text is being considered as an object key or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringContext {
    Key,
    Value,
}

struct ScanOutcome {
    balanced: bool,
    saw_line_comment: bool,
}

/// True when every container, quote and block comment in `text` closes
/// properly.
pub fn is_balanced(text: &str) -> bool {
    walk(text, |_, _| {}).balanced
}

/// True when `text` can be written as an implicit string and read back
/// to the same text in the same context.
///
/// Beyond balance this rejects top-level line comments (a reparse would
/// swallow the rest of the line), edge whitespace (a reparse trims it),
/// and value text a reparse would promote to a number or literal.
pub(crate) fn is_eligible(text: &str, context: StringContext) -> bool {
    if text.is_empty() {
        // Only the void slot of an array writes an empty implicit; keys
        // and standalone values quote instead.
        return false;
    }
    if text.trim() != text {
        return false;
    }

    let outcome = walk(text, |_, _| {});
    if !outcome.balanced || outcome.saw_line_comment {
        return false;
    }

    match context {
        StringContext::Key => true,
        StringContext::Value => !is_literal_text(text) && !is_number_text(text),
    }
}

/// Escape `text` for implicit emission: keys escape `:`, values escape
/// `\n` and `,`, and only at the top level of the balance scan.
/// Imbalanced text is returned verbatim; the writer falls back to
/// quoting it instead.
pub fn escape(text: &str, context: StringContext) -> String {
    if !is_balanced(text) {
        return text.to_string();
    }

    let escaped: &[char] = match context {
        StringContext::Key => &[':'],
        StringContext::Value => &['\n', ','],
    };

    let mut out = String::with_capacity(text.len());
    walk(text, |c, top_level| {
        if top_level && escaped.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    });
    out
}

/// Drive the balance state machine over `text`, reporting every char in
/// order. `top_level` is true only for plain chars outside all
/// containers, quotes, comments and escapes.
fn walk(text: &str, mut on_char: impl FnMut(char, bool)) -> ScanOutcome {
    let mut iter = text.char_indices().peekable();
    let mut stack: Vec<char> = Vec::new();
    let mut balanced = true;
    let mut saw_line_comment = false;

    while let Some((idx, c)) = iter.next() {
        let top = stack.is_empty();
        match c {
            '\\' => {
                on_char(c, false);
                if let Some((_, escaped)) = iter.next() {
                    on_char(escaped, false);
                }
            }
            '(' | '[' | '{' => {
                on_char(c, false);
                stack.push(closer_for(c));
            }
            ')' | ']' | '}' => {
                on_char(c, false);
                if stack.last() == Some(&c) {
                    stack.pop();
                } else {
                    // A closer without a matching opener aborts.
                    balanced = false;
                    break;
                }
            }
            '\'' if text[idx..].starts_with("'''") => {
                on_char(c, false);
                for _ in 0..2 {
                    if let Some((_, quote)) = iter.next() {
                        on_char(quote, false);
                    }
                }
                if !consume_multi_quote(&mut iter, &mut on_char) {
                    balanced = false;
                    break;
                }
            }
            '\'' | '"' => {
                on_char(c, false);
                if !consume_quote(&mut iter, c, &mut on_char) {
                    balanced = false;
                    break;
                }
            }
            '/' if iter.peek().is_some_and(|(_, n)| *n == '/') => {
                if top {
                    saw_line_comment = true;
                }
                on_char(c, false);
                consume_to_newline(&mut iter, &mut on_char);
            }
            '#' => {
                if top {
                    saw_line_comment = true;
                }
                on_char(c, false);
                consume_to_newline(&mut iter, &mut on_char);
            }
            '/' if iter.peek().is_some_and(|(_, n)| *n == '*') => {
                on_char(c, false);
                if !consume_block_comment(&mut iter, &mut on_char) {
                    balanced = false;
                    break;
                }
            }
            _ => on_char(c, top),
        }
    }

    if !stack.is_empty() {
        balanced = false;
    }

    ScanOutcome {
        balanced,
        saw_line_comment,
    }
}

type CharIter<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Consume up to (not including) the next newline.
fn consume_to_newline(iter: &mut CharIter<'_>, on_char: &mut impl FnMut(char, bool)) {
    while let Some((_, c)) = iter.peek().copied() {
        if c == '\n' {
            return;
        }
        iter.next();
        on_char(c, false);
    }
}

/// Entry: the opener was consumed. Returns false on EOF or an illegal
/// raw newline.
fn consume_quote(
    iter: &mut CharIter<'_>,
    quote: char,
    on_char: &mut impl FnMut(char, bool),
) -> bool {
    while let Some((_, c)) = iter.next() {
        on_char(c, false);
        match c {
            '\\' => {
                if let Some((_, escaped)) = iter.next() {
                    on_char(escaped, false);
                }
            }
            '\n' => return false,
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}

/// Entry: all three opening quotes were consumed.
fn consume_multi_quote(iter: &mut CharIter<'_>, on_char: &mut impl FnMut(char, bool)) -> bool {
    let mut streak = 0;
    for (_, c) in iter.by_ref() {
        on_char(c, false);
        if c == '\'' {
            streak += 1;
            if streak == 3 {
                return true;
            }
        } else {
            streak = 0;
        }
    }
    false
}

/// Entry: the `/` was consumed, the `*` is next. Nested pairs count.
fn consume_block_comment(iter: &mut CharIter<'_>, on_char: &mut impl FnMut(char, bool)) -> bool {
    if let Some((_, star)) = iter.next() {
        on_char(star, false);
    }

    let mut depth = 1usize;
    while let Some((_, c)) = iter.next() {
        on_char(c, false);
        match c {
            '*' if iter.peek().is_some_and(|(_, n)| *n == '/') => {
                let (_, slash) = iter.next().unwrap_or((0, '/'));
                on_char(slash, false);
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            '/' if iter.peek().is_some_and(|(_, n)| *n == '*') => {
                let (_, star) = iter.next().unwrap_or((0, '*'));
                on_char(star, false);
                depth += 1;
            }
            _ => {}
        }
    }
    false
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_literal_text(text: &str) -> bool {
    matches!(text, "true" | "false" | "null")
}

/// Mirror of the tokenizer's number rules: text that would tokenize as a
/// lone number must be quoted to stay a string.
pub(crate) fn is_number_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let mut rest = digits;
    let int_len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if rest.starts_with('0') && int_len > 1 {
        return false;
    }
    rest = &rest[int_len..];

    if let Some(fraction) = rest.strip_prefix('.') {
        let frac_len = fraction
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fraction.len());
        if frac_len == 0 {
            return false;
        }
        rest = &fraction[frac_len..];
    }

    if rest.is_empty() {
        return true;
    }

    let Some(exponent) = rest.strip_prefix(['e', 'E']) else {
        return false;
    };
    let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    !exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_must_close_in_order() {
        assert!(is_balanced("(a [b] c)"));
        assert!(!is_balanced("(a [b) c]"));
        assert!(!is_balanced("a)"));
        assert!(!is_balanced("(a"));
    }

    #[test]
    fn quotes_open_balanced_regions() {
        assert!(is_balanced(r#"a "b (" c"#));
        assert!(!is_balanced(r#"a "b"#));
        assert!(is_balanced("'''\nmulti\n''' x"));
        assert!(!is_balanced("'single\nline'"));
    }

    #[test]
    fn escapes_hide_the_next_char() {
        assert!(is_balanced(r"a \) b"));
        assert!(is_balanced(r"a \( b"));
    }

    #[test]
    fn block_comments_must_close() {
        assert!(is_balanced("a /* c */ b"));
        assert!(is_balanced("a /* x /* y */ z */ b"));
        assert!(!is_balanced("a /* c"));
    }

    #[test]
    fn line_comments_block_eligibility_but_not_balance() {
        assert!(is_balanced("a // c"));
        assert!(!is_eligible("a // c", StringContext::Value));
        assert!(!is_eligible("a # c", StringContext::Value));
        assert!(is_eligible("a (# c\n) b", StringContext::Value));
    }

    #[test]
    fn numbers_and_literals_are_not_eligible_values() {
        assert!(!is_eligible("true", StringContext::Value));
        assert!(!is_eligible("-1.5e3", StringContext::Value));
        assert!(is_eligible("01", StringContext::Value));
        assert!(is_eligible("1e", StringContext::Value));
        assert!(is_eligible("truely", StringContext::Value));
        // Keys never promote, so literal-looking text is a fine key.
        assert!(is_eligible("true", StringContext::Key));
    }

    #[test]
    fn edge_whitespace_is_not_eligible() {
        assert!(!is_eligible(" a", StringContext::Value));
        assert!(!is_eligible("a ", StringContext::Value));
        assert!(is_eligible("a b", StringContext::Value));
    }

    #[test]
    fn escape_targets_only_top_level_chars() {
        assert_eq!(escape("a:b", StringContext::Key), r"a\:b");
        assert_eq!(escape("a,b", StringContext::Value), r"a\,b");
        assert_eq!(escape("(a,b)", StringContext::Value), "(a,b)");
        assert_eq!(escape(r#""a,b""#, StringContext::Value), r#""a,b""#);
    }

    #[test]
    fn escape_leaves_imbalanced_text_verbatim() {
        assert_eq!(escape("a)b,", StringContext::Value), "a)b,");
    }

    #[test]
    fn number_text_follows_tokenizer_rules() {
        assert!(is_number_text("0"));
        assert!(is_number_text("0.5"));
        assert!(is_number_text("-12e+4"));
        assert!(!is_number_text("01"));
        assert!(!is_number_text("1e"));
        assert!(!is_number_text("1."));
        assert!(!is_number_text("--1"));
    }
}
