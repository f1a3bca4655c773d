//! Receipt

use std::{fmt, io};

use decimal_percentage::Percentage;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    deals::{Deal, DealKey, applications::DealApplication},
    pricing::TotalPriceError,
    solvers::SolverResult,
};

/// Width of a printed receipt, in characters
pub const RECEIPT_WIDTH: usize = 20;

const ELLIPSIS: &str = "... ";

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating total price from basket items.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// An attribution refers to an item missing from the basket.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// An attribution refers to a deal missing from the catalog.
    #[error("missing deal {0:?}")]
    MissingDeal(DealKey),

    /// Formatting error
    #[error(transparent)]
    Format(#[from] fmt::Error),

    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Final receipt for a processed basket.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Item attributions, in the order they are printed
    applications: SmallVec<[DealApplication<'a>; 10]>,

    /// Indexes of items in the basket that were purchased at full price
    full_price_items: SmallVec<[usize; 10]>,

    /// Total cost before any deals
    subtotal: Money<'a, Currency>,

    /// Total amount paid for all items after deals
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a basket and solver result.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the basket subtotal cannot be calculated.
    pub fn from_solver_result(
        basket: &Basket<'a>,
        result: SolverResult<'a>,
    ) -> Result<Self, ReceiptError> {
        Ok(Receipt {
            applications: result.applications,
            full_price_items: result.unaffected_items,
            subtotal: basket.subtotal()?,
            total: result.total,
            currency: basket.currency(),
        })
    }

    /// Total cost before any deals
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Item attributions, in print order
    pub fn applications(&self) -> &[DealApplication<'a>] {
        &self.applications
    }

    /// Indexes of items purchased at full price
    pub fn full_price_items(&self) -> &[usize] {
        &self.full_price_items
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying deals.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings made by applying deals as a percentage of the subtotal
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Savings in percent points of the subtotal, rounded to two places.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent_points(&self) -> Result<Decimal, MoneyError> {
        let percent = self.savings_percent()?;

        // `Percentage` is a fraction, e.g. 0.25
        Ok(((percent * Decimal::ONE) * Decimal::from(100)).round_dp(2))
    }

    /// Render the receipt as fixed-width text.
    ///
    /// Every item gets a line with its name and price. Items repriced by a deal show their
    /// original price in parentheses, followed by a line with the deal name and the price
    /// charged. Prices are printed in minor units.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an attribution refers to an item or deal that does not
    /// exist.
    pub fn render(&self, basket: &Basket<'_>, deals: &[Deal<'_>]) -> Result<String, ReceiptError> {
        use fmt::Write;

        let mut text = String::new();
        let fill = " ".repeat((RECEIPT_WIDTH - "RECEIPT".len()) / 2);
        let rule = "-".repeat(RECEIPT_WIDTH);

        writeln!(text, "{fill}RECEIPT{fill}")?;
        writeln!(text, "{rule}")?;

        for app in &self.applications {
            let item = basket.get_item(app.item_idx)?;
            let original = app.original_price.to_minor_units().to_string();
            let price = app.final_price.to_minor_units().to_string();

            let shown = match (app.is_deal(), app.is_repriced()) {
                (true, true) => format!("({original})"),
                (true, false) => original,
                (false, _) => price.clone(),
            };

            writeln!(text, "{}", columns(&item.name(), &shown))?;

            if let Some(key) = app.deal_key.filter(|_| app.is_repriced()) {
                let deal = deals
                    .iter()
                    .find(|deal| deal.key() == key)
                    .ok_or(ReceiptError::MissingDeal(key))?;

                writeln!(text, "{}", deal_line(&deal.name(), &price))?;
            }
        }

        writeln!(text, "{rule}")?;
        writeln!(
            text,
            "{}",
            columns("Total:", &self.total.to_minor_units().to_string())
        )?;

        Ok(text)
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be rendered or written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        basket: &Basket<'_>,
        deals: &[Deal<'_>],
    ) -> Result<(), ReceiptError> {
        let text = self.render(basket, deals)?;

        out.write_all(text.as_bytes())?;

        Ok(())
    }
}

/// Left text and right-aligned text on one receipt line. The right text wins when they overlap.
fn columns(left: &str, right: &str) -> String {
    let right_len = right.chars().count();
    let space = RECEIPT_WIDTH.saturating_sub(right_len);
    let left: String = left.chars().take(space).collect();

    format!("{left:<space$}{right}")
}

/// Deal name and price on one receipt line, with the name cut short when both do not fit.
fn deal_line(name: &str, price: &str) -> String {
    let price_len = price.chars().count();
    let space = RECEIPT_WIDTH.saturating_sub(price_len);

    // One space must separate the name from the price
    if name.chars().count() < space {
        return columns(name, price);
    }

    let kept = space.saturating_sub(ELLIPSIS.len());
    let name: String = name.chars().take(kept).collect();

    columns(&format!("{name}{ELLIPSIS}"), price)
}
