//! Withholding-tax bracket tables.
//!
//! A [`BracketTable`] is an ordered, validated sequence of [`TaxBracket`]s.
//! The table is immutable once built and is walked by
//! [`compute_tax`](crate::calculation::compute_tax).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const TABLE: &str = "tax_brackets";

/// A single progressive tax bracket.
///
/// Income in `(base, upper_bound]` is taxed at `rate`. The final bracket
/// has no upper bound.
///
/// # Example
///
/// ```
/// use budget_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracket::new(Some(Decimal::new(3333333, 2)), Decimal::new(15, 2), Decimal::new(2083333, 2));
/// assert_eq!(bracket.width(), Some(Decimal::new(1250000, 2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the bracket; `None` means unbounded.
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    /// Marginal rate applied within the bracket, in `[0, 1]`.
    pub rate: Decimal,
    /// Lower edge of the bracket; equals the previous bracket's upper bound.
    pub base: Decimal,
}

impl TaxBracket {
    /// Creates a bracket.
    pub fn new(upper_bound: Option<Decimal>, rate: Decimal, base: Decimal) -> Self {
        Self {
            upper_bound,
            rate,
            base,
        }
    }

    /// Returns true if `income` falls at or below this bracket's upper bound.
    pub fn contains(&self, income: Decimal) -> bool {
        match self.upper_bound {
            Some(upper) => income <= upper,
            None => true,
        }
    }

    /// Returns the width of a bounded bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.upper_bound.map(|upper| upper - self.base)
    }
}

/// An ordered, validated table of tax brackets.
///
/// Construction through [`BracketTable::new`] enforces:
/// - at least one bracket,
/// - the first bracket starts at zero,
/// - each bracket's `base` equals the previous bracket's `upper_bound`,
/// - upper bounds strictly increase,
/// - only the last bracket is unbounded, and it must be,
/// - every rate lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a bracket table, rejecting any table that breaks the chaining invariants.
    ///
    /// # Example
    ///
    /// ```
    /// use budget_engine::models::{BracketTable, TaxBracket};
    /// use rust_decimal::Decimal;
    ///
    /// let table = BracketTable::new(vec![
    ///     TaxBracket::new(Some(Decimal::from(1000)), Decimal::ZERO, Decimal::ZERO),
    ///     TaxBracket::new(None, Decimal::new(10, 2), Decimal::from(1000)),
    /// ])
    /// .unwrap();
    /// assert_eq!(table.len(), 2);
    ///
    /// let broken = BracketTable::new(vec![
    ///     TaxBracket::new(Some(Decimal::from(1000)), Decimal::ZERO, Decimal::ZERO),
    ///     TaxBracket::new(None, Decimal::new(10, 2), Decimal::from(900)),
    /// ]);
    /// assert!(broken.is_err());
    /// ```
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let Some(first) = brackets.first() else {
            return Err(EngineError::invalid_schedule(TABLE, "at least one bracket is required"));
        };
        if first.base != Decimal::ZERO {
            return Err(EngineError::invalid_schedule(
                TABLE,
                format!("first bracket must start at 0, found {}", first.base),
            ));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(EngineError::invalid_schedule(
                    TABLE,
                    format!("bracket {} has rate {} outside [0, 1]", index, bracket.rate),
                ));
            }

            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(EngineError::invalid_schedule(
                        TABLE,
                        format!("bracket {} is unbounded but is not the last bracket", index),
                    ));
                }
                Some(_) if index == last_index => {
                    return Err(EngineError::invalid_schedule(
                        TABLE,
                        "last bracket must be unbounded",
                    ));
                }
                Some(upper) if upper <= bracket.base => {
                    return Err(EngineError::invalid_schedule(
                        TABLE,
                        format!(
                            "bracket {} upper bound {} does not exceed its base {}",
                            index, upper, bracket.base
                        ),
                    ));
                }
                _ => {}
            }

            if index > 0 {
                let previous_upper = brackets[index - 1].upper_bound;
                if previous_upper != Some(bracket.base) {
                    return Err(EngineError::invalid_schedule(
                        TABLE,
                        format!(
                            "bracket {} base {} does not chain to the previous upper bound",
                            index, bracket.base
                        ),
                    ));
                }
            }
        }

        Ok(Self { brackets })
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the number of brackets.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false for a validated table.
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl Default for BracketTable {
    /// The monthly withholding table: 0% to 20,833.33, then 15%, 20%, 25%,
    /// 30%, and 35% above 666,666.66.
    fn default() -> Self {
        let bounds = [
            Decimal::new(2083333, 2),
            Decimal::new(3333333, 2),
            Decimal::new(6666666, 2),
            Decimal::new(16666666, 2),
            Decimal::new(66666666, 2),
        ];
        let rates = [
            Decimal::ZERO,
            Decimal::new(15, 2),
            Decimal::new(20, 2),
            Decimal::new(25, 2),
            Decimal::new(30, 2),
            Decimal::new(35, 2),
        ];

        let mut brackets = Vec::with_capacity(rates.len());
        let mut base = Decimal::ZERO;
        for (index, rate) in rates.iter().enumerate() {
            let upper_bound = bounds.get(index).copied();
            brackets.push(TaxBracket::new(upper_bound, *rate, base));
            if let Some(upper) = upper_bound {
                base = upper;
            }
        }

        Self { brackets }
    }
}
