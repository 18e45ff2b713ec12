//! SQL text scanning.
//!
//! The scanner is a single left-to-right pass over the SQL text with one
//! explicit state per lexical region. It does not tokenize SQL; it only
//! knows enough to tell "code" apart from comments and quoted literals, so
//! that a placeholder mentioned inside `-- a comment` or `'a string'` is not
//! mistaken for a parameter reference.
//!
//! ## Regions
//!
//! | Region        | Opens with | Closes with           | Escape |
//! |---------------|------------|-----------------------|--------|
//! | line comment  | `--`       | end of line or input  | none   |
//! | block comment | `/*`       | `*/`                  | none   |
//! | single quoted | `'`        | `'`                   | `''`   |
//! | double quoted | `"`        | `"`                   | `""`   |
//! | backtick      | `` ` ``    | `` ` ``               | ` `` ` |
//!
//! A region that is still open at end of input is kept verbatim, except for
//! a line comment, which legitimately runs to end of input.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
    Backtick,
}

impl State {
    fn closing_quote(self) -> Option<char> {
        match self {
            Self::SingleQuoted => Some('\''),
            Self::DoubleQuoted => Some('"'),
            Self::Backtick => Some('`'),
            Self::Normal | Self::LineComment | Self::BlockComment => None,
        }
    }
}

/// Remove comments and quoted literals from SQL text.
///
/// Every stripped region is replaced by a single space followed by the
/// newlines it contained, so the remaining text keeps its line structure.
/// Text outside of those regions is preserved verbatim and in order.
///
/// Unterminated block comments and unterminated quoted regions are not
/// stripped: they are copied to the output as-is.
///
/// # Example
///
/// ```
/// use dao_sql::scanner::strip;
///
/// assert_eq!(strip("before--commentsToEndOfText"), "before ");
/// assert_eq!(strip("a /* b */ c"), "a   c");
/// assert_eq!(strip("x = 'unterminated"), "x = 'unterminated");
/// ```
#[must_use]
pub fn strip(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut state = State::Normal;
    let mut region_start = 0;
    let mut newlines = 0usize;
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);

        match state {
            State::Normal => {
                let opened = match (c, next) {
                    ('-', Some('-')) => {
                        chars.next();
                        Some(State::LineComment)
                    }
                    ('/', Some('*')) => {
                        chars.next();
                        Some(State::BlockComment)
                    }
                    ('\'', _) => Some(State::SingleQuoted),
                    ('"', _) => Some(State::DoubleQuoted),
                    ('`', _) => Some(State::Backtick),
                    _ => None,
                };

                match opened {
                    Some(region) => {
                        state = region;
                        region_start = i;
                        newlines = 0;
                    }
                    None => out.push(c),
                }
            }
            State::LineComment => {
                if c == '\n' || c == '\r' {
                    close_region(&mut out, newlines);
                    out.push(c);
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' && next == Some('/') {
                    chars.next();
                    close_region(&mut out, newlines);
                    state = State::Normal;
                } else if c == '\n' {
                    newlines += 1;
                }
            }
            State::SingleQuoted | State::DoubleQuoted | State::Backtick => {
                let quote = state.closing_quote();
                if Some(c) == quote {
                    if next == quote {
                        // Doubled delimiter is an escaped literal delimiter.
                        chars.next();
                    } else {
                        close_region(&mut out, newlines);
                        state = State::Normal;
                    }
                } else if c == '\n' {
                    newlines += 1;
                }
            }
        }
    }

    match state {
        State::Normal => {}
        State::LineComment => close_region(&mut out, newlines),
        State::BlockComment | State::SingleQuoted | State::DoubleQuoted | State::Backtick => {
            out.push_str(&sql[region_start..]);
        }
    }

    out
}

fn close_region(out: &mut String, newlines: usize) {
    out.push(' ');
    out.extend(std::iter::repeat_n('\n', newlines));
}

/// Whether `c` may appear in a parameter name.
#[must_use]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Every parameter token referenced by the SQL text, in order of
/// appearance, without de-duplication.
///
/// A token is `prefix` immediately followed by one or more identifier
/// characters, found outside comments and quoted literals. The returned
/// names do not include the prefix.
///
/// A prefix directly preceded by another copy of the whole prefix is not a
/// reference, so `@@ROWCOUNT` is not the parameter `ROWCOUNT` and the cast
/// in `x::int` is not the parameter `int`.
#[must_use]
pub fn scan_parameter_tokens(sql: &str, prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        return Vec::new();
    }

    let stripped = strip(sql);
    let mut tokens = Vec::new();
    let mut search_from = 0;

    while let Some(offset) = stripped[search_from..].find(prefix) {
        let start = search_from + offset;
        let name_start = start + prefix.len();
        let rest = &stripped[name_start..];
        let name_len = rest
            .char_indices()
            .find(|&(_, c)| !is_identifier_char(c))
            .map_or(rest.len(), |(idx, _)| idx);
        let doubled = stripped[..start].ends_with(prefix);

        if name_len > 0 && !doubled {
            tokens.push(rest[..name_len].to_string());
        }
        search_from = name_start + name_len;
    }

    tokens
}

/// The distinct parameter names referenced by the SQL text.
///
/// Same as [`scan_parameter_tokens`], with duplicates collapsed
/// case-insensitively. The first occurrence wins, both for position and
/// for the spelling that is returned.
///
/// # Example
///
/// ```
/// use dao_sql::scanner::extract_parameter_names;
///
/// let names = extract_parameter_names("UPDATE t SET a = :A WHERE b = :b OR a2 = :a", ":");
/// assert_eq!(names, vec!["A".to_string(), "b".to_string()]);
/// ```
#[must_use]
pub fn extract_parameter_names(sql: &str, prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scan_parameter_tokens(sql, prefix)
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_line_comment_to_end_of_text() {
        assert_eq!(strip("before--commentsToEndOfText"), "before ");
    }

    #[test]
    fn test_strip_line_comment_keeps_newline() {
        assert_eq!(strip("a -- one\nb -- two\r\nc"), "a  \nb  \r\nc");
    }

    #[test]
    fn test_strip_doubled_quote_is_part_of_literal() {
        assert_eq!(strip("'a''b' after"), "  after");
        assert_eq!(strip("x = 'it''s' + y"), "x =   + y");
    }

    #[test]
    fn test_strip_all_quote_styles() {
        assert_eq!(strip(r#"select "col""x" from t"#), "select   from t");
        assert_eq!(strip("select `col``x` from t"), "select   from t");
        assert_eq!(strip("'a' \"b\" `c`"), "     ");
    }

    #[test]
    fn test_strip_block_comment_preserves_lines() {
        assert_eq!(strip("a/* one\ntwo\nthree */b"), "a \n\nb");
    }

    #[test]
    fn test_strip_block_comment_is_not_nested() {
        assert_eq!(strip("a /* x /* y */ b */ c"), "a   b */ c");
    }

    #[test]
    fn test_strip_unterminated_block_comment_kept() {
        assert_eq!(strip("select 1 /* open"), "select 1 /* open");
        assert_eq!(strip("a /* b -- c"), "a /* b -- c");
    }

    #[test]
    fn test_strip_unterminated_quote_kept() {
        assert_eq!(strip("select 'abc"), "select 'abc");
        assert_eq!(strip("select 'a''b"), "select 'a''b");
        assert_eq!(strip("'done' then \"open"), "  then \"open");
    }

    #[test]
    fn test_strip_single_dash_is_text() {
        assert_eq!(strip("a - b"), "a - b");
        assert_eq!(strip("a -"), "a -");
        assert_eq!(strip("a / b * c"), "a / b * c");
    }

    #[test]
    fn test_strip_comment_markers_inside_quotes() {
        assert_eq!(strip("'--not a comment' x"), "  x");
        assert_eq!(strip("'/*' x '*/'"), "  x  ");
    }

    #[test]
    fn test_extract_ignores_comments_and_literals() {
        let sql = "select * from t -- where a = @a\n\
                   where b = @b /* and c = @c */ and d = '@d' and e = \"@e\"";
        assert_eq!(extract_parameter_names(sql, "@"), vec!["b"]);
    }

    #[test]
    fn test_extract_prefix_without_identifier() {
        assert!(extract_parameter_names("select @ from t", "@").is_empty());
        assert!(extract_parameter_names("select a @", "@").is_empty());
        assert!(extract_parameter_names("where x = @ + @-1", "@").is_empty());
    }

    #[test]
    fn test_extract_stops_at_non_identifier() {
        assert_eq!(
            extract_parameter_names("values (:id,:name_2):x.y", ":"),
            vec!["id", "name_2", "x"]
        );
    }

    #[test]
    fn test_extract_dedup_case_insensitive_first_wins() {
        assert_eq!(
            extract_parameter_names("~Id ~name ~ID ~Name ~other", "~"),
            vec!["Id", "name", "other"]
        );
        assert_eq!(scan_parameter_tokens("~Id ~name ~ID", "~").len(), 3);
    }

    #[test]
    fn test_extract_skips_doubled_prefix() {
        assert_eq!(
            extract_parameter_names("select @@ROWCOUNT, @@identity where x = @x", "@"),
            vec!["x"]
        );
        assert_eq!(
            extract_parameter_names("select a::int from t where b = :b", ":"),
            vec!["b"]
        );
    }

    #[test]
    fn test_extract_multi_char_prefix() {
        assert_eq!(
            extract_parameter_names("select ${a}, $b, ${c}", "${"),
            vec!["a", "c"]
        );
    }

    #[test]
    fn test_extract_multi_char_prefix_after_punctuation() {
        assert_eq!(extract_parameter_names("x = {${a}", "${"), vec!["a"]);
        assert_eq!(
            extract_parameter_names("f(${a},${b}) + $${c} - ${${d}", "${"),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            extract_parameter_names("where x = (:y) and z = ::w", "::"),
            vec!["w"]
        );
    }

    #[test]
    fn test_extract_in_unterminated_region_is_visible() {
        assert_eq!(extract_parameter_names("x = @a /* @b", "@"), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_empty_prefix() {
        assert!(extract_parameter_names("select @a", "").is_empty());
    }

    #[test]
    fn test_extract_unicode_identifier() {
        assert_eq!(
            extract_parameter_names("where name = :naïve and x = :日付", ":"),
            vec!["naïve", "日付"]
        );
    }

    proptest! {
        #[test]
        fn prop_plain_text_is_unchanged(sql in "[a-zA-Z0-9 ,=()@:_*+]*") {
            prop_assert_eq!(strip(&sql), sql);
        }

        #[test]
        fn prop_unterminated_quote_kept_verbatim(body in "[^']*") {
            let sql = format!("select x from t where y = '{body}");
            prop_assert_eq!(strip(&sql), sql);
        }

        #[test]
        fn prop_unterminated_block_kept_verbatim(body in "[^*]*") {
            let sql = format!("select 1 /*{body}");
            prop_assert_eq!(strip(&sql), sql);
        }

        #[test]
        fn prop_extracted_names_are_identifiers(sql in ".*") {
            for name in scan_parameter_tokens(&sql, "@") {
                prop_assert!(!name.is_empty());
                prop_assert!(name.chars().all(is_identifier_char));
            }
        }

        #[test]
        fn prop_extracted_names_are_distinct(sql in "[a-c@ ]*") {
            let names = extract_parameter_names(&sql, "@");
            let lowered: HashSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
            prop_assert_eq!(lowered.len(), names.len());
        }
    }
}
