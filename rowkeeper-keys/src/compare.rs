//! Natural ordering over normalized keys.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// True for characters that participate in ordering. Punctuation, symbols,
/// and combining marks (the residue of compatibility decomposition) are
/// insignificant.
fn is_significant(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace()
}

fn significant(s: &str) -> Peekable<impl Iterator<Item = char> + '_> {
    s.chars().filter(|c| is_significant(*c)).peekable()
}

/// Consumes a run of ASCII digits from the iterator.
fn take_digits(iter: &mut Peekable<impl Iterator<Item = char>>) -> String {
    let mut run = String::new();
    while let Some(&c) = iter.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        iter.next();
    }
    run
}

/// Compares two digit runs by numeric value, without parsing into a fixed
/// width (runs can be arbitrarily long). "02" and "2" compare equal here;
/// the overall comparison then continues with the remainders.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        longer_is_bigger => longer_is_bigger,
    }
}

/// Natural comparison of two normalized keys.
///
/// Numeric substrings compare by value, insignificant characters are
/// skipped, and remaining characters compare by codepoint. Inputs are
/// expected to be [`normalize_key`](crate::normalize_key) output (already
/// case-folded); the function is still total for arbitrary strings.
///
/// Equal keys return `Ordering::Equal`; relative order of such rows is then
/// decided by the stability of the caller's sort.
#[must_use]
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let mut ia = significant(a);
    let mut ib = significant(b);
    loop {
        match (ia.peek().copied(), ib.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let run_a = take_digits(&mut ia);
                    let run_b = take_digits(&mut ib);
                    match compare_digit_runs(&run_a, &run_b) {
                        Ordering::Equal => continue,
                        decided => return decided,
                    }
                }
                match ca.cmp(&cb) {
                    Ordering::Equal => {
                        ia.next();
                        ib.next();
                    }
                    decided => return decided,
                }
            }
        }
    }
}
