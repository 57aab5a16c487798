//! Natural-order filename comparison.
//!
//! Splits names into runs of digits and non-digits so numeric runs compare
//! by value rather than lexically: "img2" sorts before "img10". Non-digit
//! runs compare with ASCII case folding, matching what file managers show.

use std::cmp::Ordering;

/// Compares two names in natural order.
///
/// Numeric runs are compared by value (leading zeros ignored), everything
/// else byte-wise after ASCII lowercasing. Names that only differ in zero
/// padding or letter case fall back to plain ordering so the result is a
/// total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match natural_cmp_runs(a, b) {
        Ordering::Equal => a.cmp(b),
        ord => ord,
    }
}

fn natural_cmp_runs(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_digit_run(&mut ca);
                let nb = take_digit_run(&mut cb);
                match compare_digit_runs(&na, &nb) {
                    Ordering::Equal => {}
                    ord => return ord,
                }
            }
            (Some(x), Some(y)) => {
                match x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()) {
                    Ordering::Equal => {
                        ca.next();
                        cb.next();
                    }
                    ord => return ord,
                }
            }
        }
    }
}

fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compares two digit runs by numeric value without parsing into a fixed
/// width integer, so arbitrarily long runs cannot overflow.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
