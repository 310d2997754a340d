//! Input snapshot for a budget calculation.
//!
//! Raw values coming from a form or request are normalized here so the
//! engine only ever sees non-negative amounts no larger than [`MAX_AMOUNT`].

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;

/// Largest amount the engine accepts: 10^15 currency units.
///
/// Larger inputs are clamped to this value so that sums and products of
/// two inputs stay well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Normalizes an amount into `[0, MAX_AMOUNT]`.
///
/// # Example
///
/// ```
/// use budget_engine::models::{MAX_AMOUNT, normalize_amount};
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize_amount(Decimal::from(-5)), Decimal::ZERO);
/// assert_eq!(normalize_amount(Decimal::MAX), MAX_AMOUNT);
/// ```
pub fn normalize_amount(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO).min(MAX_AMOUNT)
}

/// Parses a user-entered amount leniently.
///
/// Thousands separators and surrounding whitespace are ignored. Empty,
/// unparseable or negative text yields zero; numbers too large for a
/// `Decimal` are clamped like any other amount above [`MAX_AMOUNT`].
///
/// # Example
///
/// ```
/// use budget_engine::models::{MAX_AMOUNT, parse_amount};
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("25,000"), Decimal::from(25000));
/// assert_eq!(parse_amount("abc"), Decimal::ZERO);
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// assert_eq!(parse_amount("1e40"), MAX_AMOUNT);
/// ```
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(normalize_amount)
        .or_else(|_| cleaned.parse::<f64>().map(amount_from_f64))
        .unwrap_or(Decimal::ZERO)
}

/// Converts a floating-point amount.
///
/// NaN, infinities and negatives yield zero; finite values beyond the
/// `Decimal` range are clamped to [`MAX_AMOUNT`].
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    match Decimal::from_f64(value) {
        Some(amount) => normalize_amount(amount),
        None if value > 0.0 => MAX_AMOUNT,
        None => Decimal::ZERO,
    }
}

/// An immutable, normalized snapshot of calculation inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BudgetInput {
    basic_salary: Decimal,
    non_taxable_allowance: Decimal,
    precise: bool,
}

impl BudgetInput {
    /// Creates an input, clamping each amount into `[0, MAX_AMOUNT]`.
    ///
    /// # Example
    ///
    /// ```
    /// use budget_engine::models::BudgetInput;
    /// use rust_decimal::Decimal;
    ///
    /// let input = BudgetInput::new(Decimal::from(-5), Decimal::from(1000), false);
    /// assert_eq!(input.basic_salary(), Decimal::ZERO);
    /// assert_eq!(input.non_taxable_allowance(), Decimal::from(1000));
    /// ```
    pub fn new(basic_salary: Decimal, non_taxable_allowance: Decimal, precise: bool) -> Self {
        Self {
            basic_salary: normalize_amount(basic_salary),
            non_taxable_allowance: normalize_amount(non_taxable_allowance),
            precise,
        }
    }

    /// Creates an input from optional amounts; missing amounts are zero.
    pub fn from_options(
        basic_salary: Option<Decimal>,
        non_taxable_allowance: Option<Decimal>,
        precise: bool,
    ) -> Self {
        Self::new(
            basic_salary.unwrap_or_default(),
            non_taxable_allowance.unwrap_or_default(),
            precise,
        )
    }

    /// Creates an input from floating-point amounts.
    pub fn from_f64(basic_salary: f64, non_taxable_allowance: f64, precise: bool) -> Self {
        Self::new(
            amount_from_f64(basic_salary),
            amount_from_f64(non_taxable_allowance),
            precise,
        )
    }

    /// Creates an input from user-entered text.
    pub fn parse(basic_salary: &str, non_taxable_allowance: &str, precise: bool) -> Self {
        Self::new(
            parse_amount(basic_salary),
            parse_amount(non_taxable_allowance),
            precise,
        )
    }

    /// The basic salary.
    pub fn basic_salary(&self) -> Decimal {
        self.basic_salary
    }

    /// The non-taxable allowance.
    pub fn non_taxable_allowance(&self) -> Decimal {
        self.non_taxable_allowance
    }

    /// Whether allocations keep fractional amounts.
    pub fn precise(&self) -> bool {
        self.precise
    }
}
