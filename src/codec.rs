//! Binary persistence of unit expressions.
//!
//! An expression tree is flattened into a post-order node list and encoded with `bitcode`.
//! Prefixes are stored by family and power and resolved against the static systems on the
//! way back in, so the encoding carries no prefix tables of its own. The envelope holds an
//! xxh3 checksum of the rendered symbol, which is checked once the tree has been rebuilt.

use std::path::Path;

use bitcode::{Decode, Encode};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::{
    error::{UnitError, UnitResult},
    exponent::Exponent,
    expression::{Expression, Product, Quotient, Scalar},
    precision::{Precision, Rounding},
    prefix::Family,
    unit::UnitToken,
};

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
struct ScalarRecord {
    family: Family,
    power: i32,
    symbol: String,
    exponent: Exponent,
    overflow_numer: Vec<u8>,
    overflow_denom: Vec<u8>,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
enum Node {
    Scalar(ScalarRecord),
    /// Combines the two most recent subtrees.
    Product,
    /// Combines the two most recent subtrees as numerator and denominator.
    Quotient { digits: u32, rounding: Rounding },
}

/// Deepest tree `decode` will rebuild. Normalization recurses once per level.
pub const MAX_DEPTH: usize = 256;

/// Most nodes `decode` will accept in one envelope.
pub const MAX_NODES: usize = 1 << 16;

#[derive(Encode, Decode, Debug)]
struct Envelope {
    checksum: u64,
    nodes: Vec<Node>,
}

pub fn encode(expression: &Expression) -> Vec<u8> {
    let mut nodes = Vec::new();
    flatten(expression, &mut nodes);
    bitcode::encode(&Envelope {
        checksum: compute_checksum(expression.symbol()),
        nodes,
    })
}

/// Return
/// ------
/// Err if the data is not a valid encoding, exceeds [`MAX_NODES`] or [`MAX_DEPTH`],
/// references an unknown prefix or an invalid precision, or rebuilds into an expression
/// whose symbol does not match the stored checksum.
pub fn decode(data: &[u8]) -> UnitResult<Expression> {
    let envelope = bitcode::decode::<Envelope>(data)
        .map_err(|e| UnitError::DecodeError(format!("Failed to decode expression: {}", e)))?;
    if envelope.nodes.len() > MAX_NODES {
        return Err(UnitError::DecodeError(format!(
            "Encoded expression has {} nodes, at most {} are allowed",
            envelope.nodes.len(),
            MAX_NODES
        )));
    }

    // Each entry carries the depth of its subtree.
    let mut stack: Vec<(Expression, usize)> = Vec::new();
    for node in envelope.nodes {
        let entry = match node {
            Node::Scalar(record) => (Expression::Scalar(rebuild_scalar(record)?), 1),
            Node::Product => {
                let ((left, right), depth) = pop_pair(&mut stack)?;
                (Expression::Product(Product::new(left, right)), depth)
            }
            Node::Quotient { digits, rounding } => {
                let precision = Precision::checked(digits, rounding).ok_or_else(|| {
                    UnitError::DecodeError(format!(
                        "Precision of {} digits is outside 1..={}",
                        digits,
                        Precision::MAX_DIGITS
                    ))
                })?;
                let ((numerator, denominator), depth) = pop_pair(&mut stack)?;
                (
                    Expression::Quotient(Quotient::with_precision(numerator, denominator, precision)),
                    depth,
                )
            }
        };
        stack.push(entry);
    }

    let expression = match (stack.pop(), stack.is_empty()) {
        (Some((expression, _)), true) => expression,
        (None, _) => return Err(UnitError::DecodeError("Encoded expression is empty".into())),
        (Some(_), false) => {
            return Err(UnitError::DecodeError(format!(
                "Encoded expression has {} dangling subtrees",
                stack.len()
            )));
        }
    };

    let checksum = compute_checksum(expression.symbol());
    if checksum != envelope.checksum {
        return Err(UnitError::DecodeError(format!(
            "Checksum mismatch for decoded expression {}",
            expression
        )));
    }
    Ok(expression)
}

/// Persist an expression to `path`, replacing any existing file.
pub fn write_to(expression: &Expression, path: impl AsRef<Path>) -> UnitResult<()> {
    let path = path.as_ref();
    std::fs::write(path, encode(expression))
        .map_err(|e| UnitError::FileError(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), %expression, "wrote expression");
    Ok(())
}

pub fn read_from(path: impl AsRef<Path>) -> UnitResult<Expression> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| UnitError::FileError(format!("{}: {}", path.display(), e)))?;
    let expression = decode(&data)?;
    debug!(path = %path.display(), %expression, "read expression");
    Ok(expression)
}

fn flatten(expression: &Expression, nodes: &mut Vec<Node>) {
    match expression {
        Expression::Scalar(s) => nodes.push(Node::Scalar(ScalarRecord {
            family: s.prefix().family(),
            power: s.prefix().power(),
            symbol: s.unit().symbol().to_string(),
            exponent: s.unit().exponent(),
            overflow_numer: s.overflow().numer().to_signed_bytes_le(),
            overflow_denom: s.overflow().denom().to_signed_bytes_le(),
        })),
        Expression::Product(p) => {
            flatten(p.left(), nodes);
            flatten(p.right(), nodes);
            nodes.push(Node::Product);
        }
        Expression::Quotient(q) => {
            flatten(q.numerator(), nodes);
            flatten(q.denominator(), nodes);
            nodes.push(Node::Quotient {
                digits: q.precision().digits(),
                rounding: q.precision().rounding(),
            });
        }
    }
}

fn rebuild_scalar(record: ScalarRecord) -> UnitResult<Scalar> {
    let prefix = record
        .family
        .system()
        .by_power(record.power)
        .copied()
        .ok_or_else(|| {
            UnitError::DecodeError(format!(
                "No {} prefix with power {}",
                record.family.name(),
                record.power
            ))
        })?;

    let denom = BigInt::from_signed_bytes_le(&record.overflow_denom);
    if denom.is_zero() {
        return Err(UnitError::DecodeError(format!(
            "Zero overflow denominator for unit {}",
            record.symbol
        )));
    }
    let overflow = BigRational::new(BigInt::from_signed_bytes_le(&record.overflow_numer), denom);

    let unit = UnitToken::with_exponent(record.symbol, record.exponent);
    Scalar::with_overflow(prefix, unit, overflow).map_err(|e| UnitError::DecodeError(e.to_string()))
}

/// Pop the two most recent subtrees, returning them in push order along with the depth
/// of the node that joins them.
fn pop_pair(
    stack: &mut Vec<(Expression, usize)>,
) -> UnitResult<((Expression, Expression), usize)> {
    let ((right, right_depth), (left, left_depth)) = match (stack.pop(), stack.pop()) {
        (Some(right), Some(left)) => (right, left),
        _ => {
            return Err(UnitError::DecodeError(
                "Encoded expression references a missing operand".into(),
            ));
        }
    };

    let depth = left_depth.max(right_depth) + 1;
    if depth > MAX_DEPTH {
        return Err(UnitError::DecodeError(format!(
            "Encoded expression is deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(((left, right), depth))
}

fn compute_checksum(symbol: &str) -> u64 {
    xxh3_64(symbol.as_bytes())
}

//==================================================
// Unit tests
//==================================================
#[cfg(test)]
mod test_codec {
    use test_case::case;

    use super::*;
    use crate::{
        prefix::{binary, decimal, metric},
        test_utils::{base_expr, ratio, scalar_expr},
    };

    fn pressure() -> Expression {
        let area = base_expr("m").multiply(&base_expr("s").multiply(&base_expr("s")));
        scalar_expr(metric::KILO, "g").divide(&area)
    }

    #[case(scalar_expr(binary::GIBI, "B"); "Binary scalar")]
    #[case(pressure(); "Nested quotient")]
    #[case(scalar_expr(decimal::MEGA, "B").divide(&scalar_expr(metric::MICRO, "s")); "Mixed families")]
    fn test_decode_restores_symbol_and_factor(expression: Expression) -> UnitResult<()> {
        let decoded = decode(&encode(&expression))?;

        assert_eq!(decoded.symbol(), expression.symbol());
        assert_eq!(decoded.factor(), expression.factor());
        Ok(())
    }

    #[test]
    fn test_decode_keeps_precision_and_overflow() -> UnitResult<()> {
        let thirds = Expression::from(Scalar::with_overflow(
            metric::BASE,
            UnitToken::new("s"),
            ratio(3, 1),
        )?);
        let precision = Precision::new(5, Rounding::Down);
        let expression = base_expr("m").divide_with(&thirds, precision);

        let decoded = decode(&encode(&expression))?;

        let Expression::Quotient(q) = &decoded else {
            panic!("Expected a quotient, got {:?}", decoded);
        };
        assert_eq!(q.precision(), precision);
        assert_eq!(*q.denominator().factor(), ratio(3, 1));
        assert_eq!(*decoded.factor(), ratio(33_333, 100_000));
        Ok(())
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode(&[0xff, 0x01, 0x02]);
        assert!(matches!(result, Err(UnitError::DecodeError(_))));
    }

    #[test]
    fn test_decode_unknown_prefix_fails() {
        let data = bitcode::encode(&Envelope {
            checksum: compute_checksum("m"),
            nodes: vec![Node::Scalar(ScalarRecord {
                family: Family::Binary,
                power: 7,
                symbol: "m".into(),
                exponent: Exponent::ONE,
                overflow_numer: BigInt::from(1).to_signed_bytes_le(),
                overflow_denom: BigInt::from(1).to_signed_bytes_le(),
            })],
        });
        assert!(matches!(decode(&data), Err(UnitError::DecodeError(_))));
    }

    #[case(vec![Node::Product]; "Missing operands")]
    #[case(vec![]; "Empty")]
    fn test_decode_malformed_tree_fails(nodes: Vec<Node>) {
        let data = bitcode::encode(&Envelope { checksum: 0, nodes });
        assert!(matches!(decode(&data), Err(UnitError::DecodeError(_))));
    }

    fn nodes_of(expression: &Expression) -> Vec<Node> {
        let mut nodes = Vec::new();
        flatten(expression, &mut nodes);
        nodes
    }

    #[case(0; "Zero digits")]
    #[case(Precision::MAX_DIGITS + 1; "Too many digits")]
    #[case(u32::MAX; "Max digits")]
    fn test_decode_invalid_precision_fails(digits: u32) {
        let mut nodes = nodes_of(&base_expr("m"));
        nodes.extend(nodes_of(&base_expr("s")));
        nodes.push(Node::Quotient {
            digits,
            rounding: Rounding::HalfEven,
        });
        let data = bitcode::encode(&Envelope {
            checksum: compute_checksum("m/s"),
            nodes,
        });

        assert!(matches!(decode(&data), Err(UnitError::DecodeError(_))));
    }

    #[test]
    fn test_decode_rejects_deep_trees() {
        let seconds = nodes_of(&base_expr("s"));
        let mut nodes = seconds.clone();
        for _ in 0..MAX_DEPTH {
            nodes.extend(seconds.iter().cloned());
            nodes.push(Node::Product);
        }
        let data = bitcode::encode(&Envelope { checksum: 0, nodes });

        let result = decode(&data);
        assert!(matches!(result, Err(UnitError::DecodeError(msg)) if msg.contains("deeper")));
    }

    #[test]
    fn test_decode_accepts_trees_at_depth_limit() -> UnitResult<()> {
        let seconds = base_expr("s");
        let mut expression = seconds.clone();
        for _ in 1..MAX_DEPTH {
            expression = expression.multiply(&seconds);
        }

        let decoded = decode(&encode(&expression))?;
        assert_eq!(decoded, expression);
        assert_eq!(decoded.factor(), expression.factor());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_too_many_nodes() {
        let data = bitcode::encode(&Envelope {
            checksum: 0,
            nodes: vec![Node::Product; MAX_NODES + 1],
        });

        let result = decode(&data);
        assert!(matches!(result, Err(UnitError::DecodeError(msg)) if msg.contains("nodes")));
    }

    #[test]
    fn test_decode_checksum_mismatch_fails() {
        let mut nodes = Vec::new();
        flatten(&base_expr("m"), &mut nodes);
        let data = bitcode::encode(&Envelope {
            checksum: compute_checksum("s"),
            nodes,
        });
        assert!(matches!(decode(&data), Err(UnitError::DecodeError(_))));
    }

    #[test]
    fn test_write_and_read_file() -> UnitResult<()> {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("pressure.bin");

        write_to(&pressure(), &path)?;
        let restored = read_from(&path)?;

        assert_eq!(restored, pressure());
        Ok(())
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = read_from(dir.path().join("missing.bin"));
        assert!(matches!(result, Err(UnitError::FileError(_))));
    }
}
