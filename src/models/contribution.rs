//! Mandatory contribution rules and amounts.
//!
//! Each contribution kind is a flat rate on basic salary clamped between a
//! floor and a ceiling. PAG-IBIG is the degenerate case where floor and
//! ceiling coincide, producing a constant for any positive salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The three mandatory contribution kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Social Security System.
    Sss,
    /// National health insurance.
    PhilHealth,
    /// Home Development Mutual Fund.
    PagIbig,
}

impl ContributionKind {
    /// All kinds, in reporting order.
    pub const ALL: [ContributionKind; 3] = [
        ContributionKind::Sss,
        ContributionKind::PhilHealth,
        ContributionKind::PagIbig,
    ];

    /// Stable identifier used in audit steps and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Sss => "sss",
            ContributionKind::PhilHealth => "phil_health",
            ContributionKind::PagIbig => "pag_ibig",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ContributionKind::Sss => "SSS",
            ContributionKind::PhilHealth => "PhilHealth",
            ContributionKind::PagIbig => "PAG-IBIG",
        }
    }
}

/// A clamped flat-rate contribution rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    /// Fraction of basic salary contributed.
    pub rate: Decimal,
    /// Minimum contribution for a positive salary.
    pub floor: Decimal,
    /// Maximum contribution.
    pub ceiling: Decimal,
}

impl ContributionRule {
    /// SSS: 4.5% within [400, 1750].
    pub const SSS: ContributionRule = ContributionRule::new(
        Decimal::from_parts(45, 0, 0, false, 3),
        Decimal::from_parts(400, 0, 0, false, 0),
        Decimal::from_parts(1750, 0, 0, false, 0),
    );

    /// PhilHealth: 2.5% within [200, 1600].
    pub const PHIL_HEALTH: ContributionRule = ContributionRule::new(
        Decimal::from_parts(25, 0, 0, false, 3),
        Decimal::from_parts(200, 0, 0, false, 0),
        Decimal::from_parts(1600, 0, 0, false, 0),
    );

    /// PAG-IBIG: a flat 200.
    pub const PAG_IBIG: ContributionRule =
        ContributionRule::fixed(Decimal::from_parts(200, 0, 0, false, 0));

    /// Creates a rule without validating it.
    pub const fn new(rate: Decimal, floor: Decimal, ceiling: Decimal) -> Self {
        Self {
            rate,
            floor,
            ceiling,
        }
    }

    /// A rule that yields `amount` for every positive salary.
    pub const fn fixed(amount: Decimal) -> Self {
        Self::new(Decimal::ZERO, amount, amount)
    }

    fn validate(&self, kind: ContributionKind) -> EngineResult<()> {
        let table = format!("contributions.{}", kind.as_str());
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(EngineError::invalid_schedule(
                table,
                format!("rate {} outside [0, 1]", self.rate),
            ));
        }
        if self.floor < Decimal::ZERO {
            return Err(EngineError::invalid_schedule(
                table,
                format!("floor {} is negative", self.floor),
            ));
        }
        if self.floor > self.ceiling {
            return Err(EngineError::invalid_schedule(
                table,
                format!("floor {} exceeds ceiling {}", self.floor, self.ceiling),
            ));
        }
        Ok(())
    }
}

/// The validated set of contribution rules, one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    sss: ContributionRule,
    phil_health: ContributionRule,
    pag_ibig: ContributionRule,
}

impl ContributionSchedule {
    /// Builds a schedule, rejecting any rule with `floor > ceiling`, a
    /// negative floor, or a rate outside `[0, 1]`.
    pub fn new(
        sss: ContributionRule,
        phil_health: ContributionRule,
        pag_ibig: ContributionRule,
    ) -> EngineResult<Self> {
        let schedule = Self {
            sss,
            phil_health,
            pag_ibig,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Re-checks every rule. Used after deserialization.
    pub fn validate(&self) -> EngineResult<()> {
        for kind in ContributionKind::ALL {
            self.rule(kind).validate(kind)?;
        }
        Ok(())
    }

    /// Returns the rule for a contribution kind.
    pub fn rule(&self, kind: ContributionKind) -> &ContributionRule {
        match kind {
            ContributionKind::Sss => &self.sss,
            ContributionKind::PhilHealth => &self.phil_health,
            ContributionKind::PagIbig => &self.pag_ibig,
        }
    }
}

impl Default for ContributionSchedule {
    fn default() -> Self {
        Self {
            sss: ContributionRule::SSS,
            phil_health: ContributionRule::PHIL_HEALTH,
            pag_ibig: ContributionRule::PAG_IBIG,
        }
    }
}

/// The computed contribution amounts for one calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    /// SSS contribution.
    pub sss: Decimal,
    /// PhilHealth contribution.
    pub phil_health: Decimal,
    /// PAG-IBIG contribution.
    pub pag_ibig: Decimal,
}

impl Contributions {
    /// Returns the amount for a contribution kind.
    pub fn get(&self, kind: ContributionKind) -> Decimal {
        match kind {
            ContributionKind::Sss => self.sss,
            ContributionKind::PhilHealth => self.phil_health,
            ContributionKind::PagIbig => self.pag_ibig,
        }
    }

    /// Sum of all three contributions.
    pub fn total(&self) -> Decimal {
        self.sss + self.phil_health + self.pag_ibig
    }
}
