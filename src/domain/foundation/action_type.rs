//! Erasmus+ key action types and education sectors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Partnership format a proposal applies under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActionType {
    /// Small-scale partnership with a fixed lump sum.
    #[serde(rename = "KA210")]
    Ka210,
    /// Cooperation partnership.
    #[default]
    #[serde(rename = "KA220")]
    Ka220,
}

impl ActionType {
    /// Eligible lump-sum amounts in euro.
    pub fn budget_tiers(&self) -> &'static [u64] {
        match self {
            ActionType::Ka210 => &[30_000, 60_000],
            ActionType::Ka220 => &[120_000, 250_000, 400_000],
        }
    }

    /// Returns true if the amount is one of the eligible tiers.
    pub fn is_valid_budget(&self, amount: u64) -> bool {
        self.budget_tiers().contains(&amount)
    }

    pub fn min_partners(&self) -> usize {
        match self {
            ActionType::Ka210 => 2,
            ActionType::Ka220 => 3,
        }
    }

    pub fn min_countries(&self) -> usize {
        match self {
            ActionType::Ka210 => 2,
            ActionType::Ka220 => 3,
        }
    }

    /// Short programme code, e.g. "KA220".
    pub fn code(&self) -> &'static str {
        match self {
            ActionType::Ka210 => "KA210",
            ActionType::Ka220 => "KA220",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Ka210 => "KA210 Small-scale Partnership",
            ActionType::Ka220 => "KA220 Cooperation Partnership",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Education and training field a project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sector {
    #[default]
    Adu,
    Vet,
    Sch,
    You,
    Hed,
}

impl Sector {
    pub fn code(&self) -> &'static str {
        match self {
            Sector::Adu => "ADU",
            Sector::Vet => "VET",
            Sector::Sch => "SCH",
            Sector::You => "YOU",
            Sector::Hed => "HED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Adu => "Adult Education",
            Sector::Vet => "Vocational Education and Training",
            Sector::Sch => "School Education",
            Sector::You => "Youth",
            Sector::Hed => "Higher Education",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
