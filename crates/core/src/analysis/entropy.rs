//! Shannon entropy over discrete symbols.

use std::collections::HashMap;
use std::hash::Hash;

/// Shannon entropy, in bits, of the empirical distribution of `symbols`.
///
/// Returns 0.0 for an empty sequence and for a sequence of one repeated
/// symbol. Order does not affect the result.
pub fn shannon_entropy<I, T>(symbols: I) -> f64
where
    I: IntoIterator<Item = T>,
    T: Hash + Eq,
{
    let mut histogram: HashMap<T, usize> = HashMap::new();
    let mut total = 0usize;
    for symbol in symbols {
        *histogram.entry(symbol).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let len = total as f64;
    let mut entropy = 0.0;
    for &count in histogram.values() {
        let p = count as f64 / len;
        entropy -= p * p.log2();
    }

    // A single symbol yields -1 * log2(1) == -0.0.
    entropy.max(0.0)
}
