//! Line-wise interleaving of two subtitle renderings into one bilingual file.
//!
//! Both inputs are expected to share their block structure (indices, time
//! ranges and blank separators), so equal lines act as synchronisation points.
//! The walk is greedy: it looks at one line of each side, never backtracks,
//! and stops as soon as either side runs out.

use tracing::debug;

pub fn merge<A, B>(lines_a: &[A], lines_b: &[B]) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut merged = Vec::with_capacity(lines_a.len() + lines_b.len());
    let (mut i, mut j) = (0, 0);

    while let (Some(a), Some(b)) = (lines_a.get(i), lines_b.get(j)) {
        let (a, b) = (a.as_ref(), b.as_ref());
        if a == b {
            merged.push(a.to_string());
            i += 1;
            j += 1;
        } else if a.is_empty() {
            // B wrapped onto an extra line.
            merged.push(b.to_string());
            j += 1;
        } else if b.is_empty() {
            merged.push(a.to_string());
            i += 1;
        } else {
            merged.push(a.to_string());
            merged.push(b.to_string());
            i += 1;
            j += 1;
        }
    }

    let dropped = (lines_a.len() - i) + (lines_b.len() - j);
    if dropped > 0 {
        debug!("merge dropped {} trailing unmatched lines", dropped);
    }
    merged
}

/// Splits both documents into lines, merges them and joins the result with `\n`.
pub fn merge_text(a: &str, b: &str) -> String {
    let lines_a: Vec<&str> = a.lines().collect();
    let lines_b: Vec<&str> = b.lines().collect();
    merge(&lines_a, &lines_b).join("\n")
}
