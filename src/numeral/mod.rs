//! Roman numeral codec with early modern input and output dialects.
//!
//! Input accepts the early modern interchangeable letters (`u` for `v`, `j`
//! for `i`); output renders the accounting style where the final `i` of a run
//! becomes `j` (4 → `iiij`) and the hundreds-and-up letters are uppercased.

use crate::errors::DomainError;

const ROMAN_TABLE: [(i64, &str); 13] = [
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

const VALID_SUBTRACTIVE: [&str; 6] = ["iv", "ix", "xl", "xc", "cd", "cm"];

fn char_value(c: char) -> Option<i64> {
    match c {
        'i' | 'j' => Some(1),
        'v' => Some(5),
        'x' => Some(10),
        'l' => Some(50),
        'c' => Some(100),
        'd' => Some(500),
        'm' => Some(1000),
        _ => None,
    }
}

/// Normalizes user input to the standard lowercase form: lowercase, `u` → `v`,
/// `j` → `i`. Total; never fails.
pub fn normalize_input(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'u' => 'v',
            'j' => 'i',
            other => other,
        })
        .collect()
}

/// Validates a Roman numeral string, case-insensitively.
///
/// Accepts additive repetition (`iiii`) and the six canonical subtractive
/// pairs (`iv`, `ix`, `xl`, `xc`, `cd`, `cm`). Rejects the empty string,
/// characters outside the numeral alphabet, doubled `v`/`l`/`d`, and any
/// other smaller-before-larger pair.
pub fn is_valid(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    let s = input.to_lowercase();
    if s.chars().any(|c| char_value(c).is_none()) {
        return false;
    }
    if s.contains("vv") || s.contains("ll") || s.contains("dd") {
        return false;
    }
    let chars: Vec<char> = s.chars().collect();
    for pair in chars.windows(2) {
        let curr = char_value(pair[0]).unwrap_or(0);
        let next = char_value(pair[1]).unwrap_or(0);
        if curr < next {
            let joined: String = pair.iter().collect();
            if !VALID_SUBTRACTIVE.contains(&joined.as_str()) {
                return false;
            }
        }
    }
    true
}

/// Converts a Roman numeral string to an integer with a left-to-right scan:
/// subtract the current character when the next one is larger, else add.
///
/// Does not validate; call [`is_valid`] first. The result for an invalid
/// numeral is unspecified (unknown characters count as zero).
pub fn to_integer(input: &str) -> i64 {
    let chars: Vec<char> = input.to_lowercase().chars().collect();
    let mut total = 0;
    for (i, c) in chars.iter().enumerate() {
        let curr = char_value(*c).unwrap_or(0);
        let next = chars
            .get(i + 1)
            .and_then(|n| char_value(*n))
            .unwrap_or(0);
        if curr < next {
            total -= curr;
        } else {
            total += curr;
        }
    }
    total
}

fn encode(value: i64) -> String {
    let mut result = String::new();
    let mut remaining = value;
    for (num, text) in ROMAN_TABLE {
        while remaining >= num {
            result.push_str(text);
            remaining -= num;
        }
    }
    result
}

/// Converts a positive integer to the canonical subtractive lowercase form,
/// e.g. 4 → `iv`, 1999 → `mcmxcix`.
pub fn from_integer(value: i64) -> Result<String, DomainError> {
    if value <= 0 {
        return Err(DomainError::NonPositiveNumeral(value));
    }
    Ok(encode(value))
}

/// Formats a canonical lowercase Roman numeral in early modern accounting
/// style. Three ordered rewrites: `iv` → `iiij`, then the last character of
/// every `i`/`j` run becomes `j`, then `l`/`c`/`d`/`m` are uppercased.
pub fn to_early_modern(roman: &str) -> String {
    let expanded = roman.replace("iv", "iiij");

    let mut result = String::with_capacity(expanded.len());
    let mut run = 0usize;
    for c in expanded.chars() {
        if c == 'i' || c == 'j' {
            run += 1;
            continue;
        }
        flush_unit_run(&mut result, run);
        run = 0;
        result.push(match c {
            'l' | 'c' | 'd' | 'm' => c.to_ascii_uppercase(),
            other => other,
        });
    }
    flush_unit_run(&mut result, run);
    result
}

// A run of n unit characters renders as (n - 1) `i`s followed by one `j`.
fn flush_unit_run(out: &mut String, run: usize) {
    if run == 0 {
        return;
    }
    for _ in 0..run - 1 {
        out.push('i');
    }
    out.push('j');
}

/// Renders a non-negative total component for display: `"0"` for zero,
/// otherwise the early modern form of the canonical encoding.
pub fn format_component(value: i64) -> String {
    if value == 0 {
        return "0".into();
    }
    to_early_modern(&encode(value))
}
