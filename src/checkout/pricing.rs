//! Order totals.

use serde::Serialize;

/// Orders strictly above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: f64 = 200.0;
pub const FLAT_SHIPPING: f64 = 15.0;
pub const TAX_RATE: f64 = 0.1;

/// Rounds to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + f64::EPSILON).round() / 100.0
}

/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let cents = (round2(amount.abs()) * 100.0).round() as u64;
    let (dollars, cents) = (cents / 100, cents % 100);

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub items_price: f64,
    pub shipping_price: f64,
    pub total_price_before_tax: f64,
    pub tax_price: f64,
    pub total_price: f64,
}

impl OrderTotals {
    /// Totals for `(unit price, quantity)` pairs.
    pub fn from_lines(lines: impl IntoIterator<Item = (f64, u32)>) -> Self {
        let items_price = round2(
            lines
                .into_iter()
                .map(|(price, quantity)| price * f64::from(quantity))
                .sum(),
        );
        let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
            0.0
        } else {
            FLAT_SHIPPING
        };
        let tax_price = round2(items_price * TAX_RATE);

        Self {
            items_price,
            shipping_price,
            total_price_before_tax: round2(items_price + shipping_price),
            tax_price,
            total_price: round2(items_price + shipping_price + tax_price),
        }
    }
}
