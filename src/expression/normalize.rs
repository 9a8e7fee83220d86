//! Factor-set normalization shared by products and quotients.

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use xxhash_rust::xxh3::Xxh3Builder;

use super::scalar::{GroupKey, Scalar};

const MULTIPLICATION_GLYPH: &str = "·";

/// Merge the factors of two multiplied expressions.
///
/// Scalars that render identically (same prefix, unit symbol and displayed power) are
/// folded into one by adding exponents. Anything that cancels to a zero exponent is
/// dropped. The result is in display order, ties keeping their first-seen order.
pub(crate) fn multiply_factors(left: &[Scalar], right: &[Scalar]) -> Vec<Scalar> {
    let mut groups: LinkedHashMap<GroupKey, Scalar, Xxh3Builder> =
        LinkedHashMap::with_hasher(Xxh3Builder::new());

    for scalar in left.iter().chain(right).filter(|s| !s.unit().is_zero()) {
        let key = scalar.group_key();
        if let Some(merged) = groups.get_mut(&key) {
            *merged = merged.multiply_unchecked(scalar);
        } else {
            groups.insert(key, scalar.clone());
        }
    }

    groups
        .into_iter()
        .map(|(_, scalar)| scalar)
        .filter(|s| !s.unit().is_zero())
        .sorted_by(|a, b| a.unit().display_cmp(b.unit()))
        .collect()
}

/// Merge the factors of a numerator and a denominator.
///
/// Each denominator scalar cancels against the first unmatched numerator scalar with an
/// identical unit token (symbol and exponent). Unmatched denominator scalars are kept
/// with an inverted exponent, so the result is a single signed factor set.
pub(crate) fn divide_factors(numerator: &[Scalar], denominator: &[Scalar]) -> Vec<Scalar> {
    let mut combined = numerator
        .iter()
        .filter(|s| !s.unit().is_zero())
        .cloned()
        .map(Some)
        .collect_vec();
    let mut matched = vec![false; combined.len()];
    let mut carried = Vec::new();

    for scalar in denominator.iter().filter(|s| !s.unit().is_zero()) {
        let partner = combined.iter().enumerate().position(|(idx, candidate)| {
            !matched[idx] && candidate.as_ref().is_some_and(|c| c.unit() == scalar.unit())
        });

        match partner {
            Some(idx) => {
                matched[idx] = true;
                combined[idx] = combined[idx]
                    .take()
                    .map(|n| n.divide_unchecked(scalar))
                    .filter(|n| !n.unit().is_zero());
            }
            None => carried.push(scalar.invert()),
        }
    }

    combined.into_iter().flatten().chain(carried).collect()
}

/// Render a signed factor set.
///
/// Positive powers form the numerator and negative powers, shown as positive, form the
/// denominator. A side with several terms is parenthesized when a slash follows or
/// precedes it: `m/s²`, `kg/(m·s²)`, `(N·A)/(m·s)`, `1/s`.
pub(crate) fn render(factors: &[Scalar]) -> String {
    let (positive, negative): (Vec<&Scalar>, Vec<&Scalar>) = factors
        .iter()
        .filter(|s| !s.unit().is_zero())
        .partition(|s| s.unit().is_positive());

    let numerator = join(positive.iter().map(|&s| s.clone()));
    let denominator = join(negative.iter().map(|s| s.invert()));

    match (positive.len(), negative.len()) {
        (0, 0) => String::new(),
        (_, 0) => numerator,
        (0, n) => format!("1/{}", group(denominator, n)),
        (p, n) => format!("{}/{}", group(numerator, p), group(denominator, n)),
    }
}

fn join(terms: impl Iterator<Item = Scalar>) -> String {
    terms
        .sorted_by(|a, b| a.unit().display_cmp(b.unit()))
        .map(|s| s.symbol().to_string())
        .join(MULTIPLICATION_GLYPH)
}

fn group(text: String, terms: usize) -> String {
    if terms > 1 { format!("({text})") } else { text }
}
