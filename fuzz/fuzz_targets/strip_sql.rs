//! Fuzz target for comment and literal stripping.
//!
//! Stripping must never panic, keep every newline, and must be
//! idempotent.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|sql: &str| {
    let stripped = dao_sql::strip(sql);

    let newlines = |s: &str| s.matches('\n').count();
    assert_eq!(newlines(&stripped), newlines(sql));

    // Whatever survives the first pass is plain text or an unterminated tail.
    assert_eq!(dao_sql::strip(&stripped), stripped);
});
