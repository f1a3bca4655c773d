//! Deal text encoding
//!
//! Deals are persisted as a single line of space-separated integers: a type tag followed by
//! the type's parameters in a fixed order.
//!
//! | Deal | Line |
//! |---|---|
//! | [`CheapestFreeInSetDeal`] | `0 <count> <id>...` |
//! | [`QuantityThresholdDeal`] | `1 <A> <X> <B> <Y> <Z>` |
//!
//! Prices are in minor units of the currency supplied when decoding. Composite deals have no
//! text form.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    deals::{CheapestFreeInSetDeal, Deal, DealKey, QuantityThresholdDeal},
    products::{ProductId, ProductSet},
};

/// Type tag for [`CheapestFreeInSetDeal`]
pub const CHEAPEST_FREE_IN_SET_TAG: u32 = 0;

/// Type tag for [`QuantityThresholdDeal`]
pub const QUANTITY_THRESHOLD_TAG: u32 = 1;

/// Errors encoding or decoding deals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DealEncodingError {
    /// The line had no tokens.
    #[error("bad deal encoding: empty input")]
    Empty,

    /// The type tag is not a known deal type.
    #[error("bad deal encoding: unknown deal type {0}")]
    UnknownType(String),

    /// A token could not be parsed as a number.
    #[error("bad deal encoding: invalid token {0:?}")]
    InvalidToken(String),

    /// The wrong number of parameters for the deal type.
    #[error("bad deal encoding: expected {expected} parameters, found {found}")]
    WrongArity {
        /// Parameters required by the deal type
        expected: usize,

        /// Parameters present in the line
        found: usize,
    },

    /// The deal type has no text encoding.
    #[error("deal type {0} has no text encoding")]
    Unsupported(&'static str),
}

/// Encode a deal as a text line.
///
/// # Errors
///
/// Returns [`DealEncodingError::Unsupported`] for composite deals.
pub fn encode(deal: &Deal<'_>) -> Result<String, DealEncodingError> {
    match deal {
        Deal::CheapestFreeInSet(deal) => {
            let mut line = format!("{CHEAPEST_FREE_IN_SET_TAG} {}", deal.target_count());

            for id in deal.products().iter() {
                line.push(' ');
                line.push_str(&id.to_string());
            }

            Ok(line)
        }
        Deal::QuantityThreshold(deal) => Ok(format!(
            "{QUANTITY_THRESHOLD_TAG} {} {} {} {} {}",
            deal.selection_count(),
            deal.selection_product(),
            deal.target_count(),
            deal.target_product(),
            deal.target_price().to_minor_units()
        )),
        Deal::Composite(_) => Err(DealEncodingError::Unsupported("composite")),
    }
}

/// Decode a deal from a text line.
///
/// # Errors
///
/// Returns a [`DealEncodingError`] if the line is empty, has an unknown type tag, contains a
/// non-numeric token or has the wrong number of parameters. No partial deal is ever produced.
pub fn decode<'a>(
    line: &str,
    key: DealKey,
    currency: &'a Currency,
) -> Result<Deal<'a>, DealEncodingError> {
    let mut tokens = line.split_whitespace();

    let tag = tokens.next().ok_or(DealEncodingError::Empty)?;
    let params: Vec<&str> = tokens.collect();

    let tag: u32 = tag
        .parse()
        .map_err(|_err| DealEncodingError::UnknownType(tag.to_string()))?;

    match tag {
        CHEAPEST_FREE_IN_SET_TAG => decode_cheapest_free(&params, key),
        QUANTITY_THRESHOLD_TAG => decode_quantity_threshold(&params, key, currency),
        other => Err(DealEncodingError::UnknownType(other.to_string())),
    }
}

fn decode_cheapest_free<'a>(params: &[&str], key: DealKey) -> Result<Deal<'a>, DealEncodingError> {
    let Some((count, ids)) = params.split_first() else {
        return Err(DealEncodingError::WrongArity {
            expected: 1,
            found: 0,
        });
    };

    let count = parse_count(count)?;

    let products = ids
        .iter()
        .map(|id| parse_product(id))
        .collect::<Result<ProductSet, _>>()?;

    Ok(Deal::CheapestFreeInSet(CheapestFreeInSetDeal::new(
        key, products, count,
    )))
}

fn decode_quantity_threshold<'a>(
    params: &[&str],
    key: DealKey,
    currency: &'a Currency,
) -> Result<Deal<'a>, DealEncodingError> {
    let &[selection_count, selection_product, target_count, target_product, target_price] =
        params
    else {
        return Err(DealEncodingError::WrongArity {
            expected: 5,
            found: params.len(),
        });
    };

    let target_price: i64 = target_price
        .parse()
        .map_err(|_err| DealEncodingError::InvalidToken(target_price.to_string()))?;

    Ok(Deal::QuantityThreshold(QuantityThresholdDeal::new(
        key,
        parse_count(selection_count)?,
        parse_product(selection_product)?,
        parse_count(target_count)?,
        parse_product(target_product)?,
        Money::from_minor(target_price, currency),
    )))
}

fn parse_count(token: &str) -> Result<usize, DealEncodingError> {
    token
        .parse()
        .map_err(|_err| DealEncodingError::InvalidToken(token.to_string()))
}

fn parse_product(token: &str) -> Result<ProductId, DealEncodingError> {
    token
        .parse()
        .map_err(|_err| DealEncodingError::InvalidToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{deals::CompositeDeal, products::ProductSet};

    use super::*;

    #[test]
    fn encodes_cheapest_free_with_sorted_ids() -> TestResult {
        let deal = Deal::from(CheapestFreeInSetDeal::new(
            DealKey::default(),
            ProductSet::from_ids(&[2, 1]),
            2,
        ));

        assert_eq!(encode(&deal)?, "0 2 1 2");

        Ok(())
    }

    #[test]
    fn encodes_quantity_threshold() -> TestResult {
        let deal = Deal::from(QuantityThresholdDeal::new(
            DealKey::default(),
            1,
            ProductId::new(2),
            3,
            ProductId::new(4),
            Money::from_minor(5, GBP),
        ));

        assert_eq!(encode(&deal)?, "1 1 2 3 4 5");

        Ok(())
    }

    #[test]
    fn decodes_cheapest_free() -> TestResult {
        let Deal::CheapestFreeInSet(deal) = decode("0 2 1 2", DealKey::default(), GBP)? else {
            panic!("expected a cheapest free deal");
        };

        assert_eq!(deal.products(), &ProductSet::from_ids(&[1, 2]));
        assert_eq!(deal.target_count(), 2);

        Ok(())
    }

    #[test]
    fn decodes_quantity_threshold() -> TestResult {
        let Deal::QuantityThreshold(deal) = decode("1 1 2 3 4 5", DealKey::default(), GBP)?
        else {
            panic!("expected a quantity threshold deal");
        };

        assert_eq!(deal.selection_count(), 1);
        assert_eq!(deal.selection_product(), ProductId::new(2));
        assert_eq!(deal.target_count(), 3);
        assert_eq!(deal.target_product(), ProductId::new(4));
        assert_eq!(deal.target_price(), &Money::from_minor(5, GBP));

        Ok(())
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            decode("   ", DealKey::default(), GBP).err(),
            Some(DealEncodingError::Empty)
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            decode("7 1 2", DealKey::default(), GBP).err(),
            Some(DealEncodingError::UnknownType("7".to_string()))
        );

        assert_eq!(
            decode("x 1 2", DealKey::default(), GBP).err(),
            Some(DealEncodingError::UnknownType("x".to_string()))
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert_eq!(
            decode("0 2 1 b", DealKey::default(), GBP).err(),
            Some(DealEncodingError::InvalidToken("b".to_string()))
        );

        assert_eq!(
            decode("1 1 2 3 4 five", DealKey::default(), GBP).err(),
            Some(DealEncodingError::InvalidToken("five".to_string()))
        );
    }

    #[test]
    fn rejects_wrong_arity() {
        assert_eq!(
            decode("1 1 2 3", DealKey::default(), GBP).err(),
            Some(DealEncodingError::WrongArity {
                expected: 5,
                found: 3
            })
        );

        assert_eq!(
            decode("0", DealKey::default(), GBP).err(),
            Some(DealEncodingError::WrongArity {
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn composite_deals_are_unsupported() {
        let deal = Deal::from(CompositeDeal::new(DealKey::default(), Vec::new()));

        assert_eq!(
            encode(&deal),
            Err(DealEncodingError::Unsupported("composite"))
        );
    }

    #[test]
    fn encoded_deals_decode_to_the_same_line() -> TestResult {
        for line in ["0 3 4 7 9", "1 3 1 1 2 22"] {
            let deal = decode(line, DealKey::default(), GBP)?;

            assert_eq!(encode(&deal)?, line);
        }

        Ok(())
    }
}
