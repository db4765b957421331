//! Lump-sum budget plan: partners, work packages and the amounts between them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::distribution::{
    distribute_work_package, split_amount, suggest_partner_percentages, CategoryAmounts,
    CostCategory, PartnerShare, WorkPackageKind,
};
use crate::domain::foundation::ActionType;
use crate::domain::pipeline::PipelineState;
use crate::domain::validation::Severity;

/// Highest share of the lump sum project management may take.
pub const MANAGEMENT_CAP_PERCENT: f64 = 20.0;

/// Share of the lump sum above which the coordinator is flagged.
pub const COORDINATOR_CAP_PERCENT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetRole {
    Coordinator,
    #[default]
    Partner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPartner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub role: BudgetRole,
}

impl BudgetPartner {
    pub fn is_coordinator(&self) -> bool {
        self.role == BudgetRole::Coordinator
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWorkPackage {
    pub id: String,
    pub number: u32,
    pub title: String,
    /// Share of the lump sum planned for this work package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_percent: Option<f64>,
}

/// How [`BudgetPlan::distribute`] fills the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Equal partner shares with a fixed category split.
    Even,
    /// Partner percentages weighted by country cost level.
    #[default]
    Weighted,
}

/// One finding of [`BudgetPlan::check`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetIssue {
    pub severity: Severity,
    pub message: String,
}

impl BudgetIssue {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlan {
    #[serde(default)]
    pub action_type: ActionType,
    /// The lump sum applied for, in euro.
    pub budget_tier: u64,
    #[serde(default)]
    pub partners: Vec<BudgetPartner>,
    #[serde(default)]
    pub work_packages: Vec<BudgetWorkPackage>,
    /// Work package id, then partner id.
    #[serde(default)]
    pub cells: BTreeMap<String, BTreeMap<String, CategoryAmounts>>,
    /// Partner id to percentage of the lump sum.
    #[serde(default)]
    pub partner_percentages: BTreeMap<String, u32>,
}

const STANDARD_KA220: &[(&str, f64)] = &[
    ("Project Management", 18.0),
    ("Research & Analysis", 20.0),
    ("Development", 30.0),
    ("Piloting & Testing", 16.0),
    ("Dissemination & Exploitation", 16.0),
];

const STANDARD_KA210: &[(&str, f64)] = &[
    ("Project Management", 20.0),
    ("Development & Implementation", 50.0),
    ("Dissemination & Follow-up", 30.0),
];

impl BudgetPlan {
    /// An empty plan at the largest lump sum of the action type.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            budget_tier: action_type.budget_tiers().last().copied().unwrap_or_default(),
            partners: Vec::new(),
            work_packages: Vec::new(),
            cells: BTreeMap::new(),
            partner_percentages: BTreeMap::new(),
        }
    }

    /// Replaces the work packages with the usual layout for the action type.
    pub fn load_standard_work_packages(&mut self) {
        let template = match self.action_type {
            ActionType::Ka210 => STANDARD_KA210,
            ActionType::Ka220 => STANDARD_KA220,
        };
        self.work_packages = template
            .iter()
            .zip(1u32..)
            .map(|((title, percent), number)| BudgetWorkPackage {
                id: format!("wp{}", number),
                number,
                title: title.to_string(),
                target_percent: Some(*percent),
            })
            .collect();
        self.cells.clear();
    }

    /// Starts a plan from a proposal-writing session.
    ///
    /// The lead partner, or the first one when none is marked, coordinates.
    /// Sessions without work packages get the standard layout.
    pub fn from_pipeline(state: &PipelineState) -> Self {
        let action_type = state.action_type();
        let mut plan = Self::new(action_type);
        if state.configuration.total_budget > 0 {
            plan.budget_tier = state.configuration.total_budget;
        }

        let lead = state.consortium.iter().position(|p| p.is_lead).unwrap_or(0);
        plan.partners = state
            .consortium
            .iter()
            .enumerate()
            .map(|(i, p)| BudgetPartner {
                id: p.id.clone(),
                name: p.name.clone(),
                country: p.country.clone(),
                role: if i == lead {
                    BudgetRole::Coordinator
                } else {
                    BudgetRole::Partner
                },
            })
            .collect();

        if state.work_packages.is_empty() {
            plan.load_standard_work_packages();
        } else {
            plan.work_packages = state
                .work_packages
                .iter()
                .map(|wp| BudgetWorkPackage {
                    id: format!("wp{}", wp.number),
                    number: wp.number,
                    title: wp.title.clone(),
                    target_percent: None,
                })
                .collect();
        }
        plan.suggest_percentages();
        plan
    }

    pub fn suggest_percentages(&mut self) {
        self.partner_percentages = suggest_partner_percentages(&self.partners);
    }

    pub fn set_partner_percentage(&mut self, partner_id: &str, percent: u32) {
        self.partner_percentages.insert(partner_id.to_string(), percent.min(100));
    }

    pub fn amount(&self, wp_id: &str, partner_id: &str, category: CostCategory) -> u64 {
        self.cell(wp_id, partner_id).get(category)
    }

    /// Stores a rounded, non-negative amount.
    pub fn set_amount(&mut self, wp_id: &str, partner_id: &str, category: CostCategory, amount: f64) {
        let amount = super::distribution::round_eur(amount);
        self.cells
            .entry(wp_id.to_string())
            .or_default()
            .entry(partner_id.to_string())
            .or_default()
            .set(category, amount);
    }

    /// Drops a partner together with its amounts and percentage.
    pub fn remove_partner(&mut self, partner_id: &str) {
        self.partners.retain(|p| p.id != partner_id);
        self.partner_percentages.remove(partner_id);
        for row in self.cells.values_mut() {
            row.remove(partner_id);
        }
    }

    /// Drops a work package and its amounts; the rest are numbered 1..n again.
    pub fn remove_work_package(&mut self, wp_id: &str) {
        self.work_packages.retain(|wp| wp.id != wp_id);
        self.cells.remove(wp_id);
        for (wp, number) in self.work_packages.iter_mut().zip(1u32..) {
            wp.number = number;
        }
    }

    fn cell(&self, wp_id: &str, partner_id: &str) -> CategoryAmounts {
        self.cells
            .get(wp_id)
            .and_then(|row| row.get(partner_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn work_package_partner_total(&self, wp_id: &str, partner_id: &str) -> u64 {
        self.cell(wp_id, partner_id).total()
    }

    pub fn work_package_total(&self, wp_id: &str) -> u64 {
        self.partners
            .iter()
            .map(|p| self.work_package_partner_total(wp_id, &p.id))
            .sum()
    }

    pub fn category_total(&self, wp_id: &str, category: CostCategory) -> u64 {
        self.partners
            .iter()
            .map(|p| self.amount(wp_id, &p.id, category))
            .sum()
    }

    pub fn partner_total(&self, partner_id: &str) -> u64 {
        self.work_packages
            .iter()
            .map(|wp| self.work_package_partner_total(&wp.id, partner_id))
            .sum()
    }

    pub fn grand_total(&self) -> u64 {
        self.work_packages
            .iter()
            .map(|wp| self.work_package_total(&wp.id))
            .sum()
    }

    /// Work package budgets in euro.
    ///
    /// Without any target percentages the lump sum is split evenly. Once some
    /// package has a target, packages without one get nothing.
    fn work_package_budgets(&self) -> Vec<(&BudgetWorkPackage, u64)> {
        let any_target = self
            .work_packages
            .iter()
            .any(|wp| wp.target_percent.is_some_and(|p| p > 0.0));
        let even = 100.0 / self.work_packages.len().max(1) as f64;
        self.work_packages
            .iter()
            .filter_map(|wp| {
                let percent = match wp.target_percent.filter(|p| *p > 0.0) {
                    Some(p) => p,
                    None if any_target => return None,
                    None => even,
                };
                Some((wp, super::distribution::round_eur(self.budget_tier as f64 * percent / 100.0)))
            })
            .collect()
    }

    /// Fills the whole table, replacing every amount.
    pub fn distribute(&mut self, mode: DistributionMode) {
        if self.partners.is_empty() || self.work_packages.is_empty() {
            return;
        }
        let cells = match mode {
            DistributionMode::Even => self.even_cells(),
            DistributionMode::Weighted => self.weighted_cells(),
        };
        self.cells = cells;
    }

    fn even_cells(&self) -> BTreeMap<String, BTreeMap<String, CategoryAmounts>> {
        let n = self.partners.len() as u64;
        self.work_package_budgets()
            .into_iter()
            .map(|(wp, budget)| {
                let split = if wp.number == 1 {
                    WorkPackageKind::Management.split()
                } else {
                    WorkPackageKind::General.split()
                };
                let per_partner = budget / n;
                let remainder = budget - per_partner * n;
                let row = self
                    .partners
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let amount = per_partner + if i == 0 { remainder } else { 0 };
                        (p.id.clone(), split_amount(amount, &split))
                    })
                    .collect();
                (wp.id.clone(), row)
            })
            .collect()
    }

    fn weighted_cells(&self) -> BTreeMap<String, BTreeMap<String, CategoryAmounts>> {
        let percentages = if self.partner_percentages.is_empty() {
            equal_percentages(&self.partners)
        } else {
            self.partner_percentages.clone()
        };
        let shares: Vec<PartnerShare<'_>> = self
            .partners
            .iter()
            .map(|p| PartnerShare {
                partner_id: &p.id,
                country: &p.country,
                percent: f64::from(percentages.get(&p.id).copied().unwrap_or(0)),
            })
            .collect();

        self.work_package_budgets()
            .into_iter()
            .map(|(wp, budget)| {
                let row = distribute_work_package(budget, WorkPackageKind::detect(&wp.title), &shares)
                    .into_iter()
                    .filter(|(_, amounts)| !amounts.is_empty())
                    .collect();
                (wp.id.clone(), row)
            })
            .collect()
    }

    /// Checks the plan against the lump-sum rules.
    pub fn check(&self) -> Vec<BudgetIssue> {
        let mut issues = Vec::new();

        if !self.action_type.is_valid_budget(self.budget_tier) {
            issues.push(BudgetIssue::error(format!(
                "{} EUR is not a lump sum offered for {} ({})",
                self.budget_tier,
                self.action_type.code(),
                self.action_type
                    .budget_tiers()
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let grand_total = self.grand_total();
        if grand_total == 0 || self.budget_tier == 0 {
            return issues;
        }
        let percent_of_tier = |amount: u64| amount as f64 / self.budget_tier as f64 * 100.0;

        if grand_total != self.budget_tier {
            issues.push(BudgetIssue::error(format!(
                "Grand total ({} EUR) does not match budget ({} EUR). Difference: {} EUR",
                grand_total,
                self.budget_tier,
                self.budget_tier as i64 - grand_total as i64
            )));
        }

        let management = self.work_packages.iter().find(|wp| wp.number == 1);
        if let Some(wp1) = management {
            let pct = percent_of_tier(self.work_package_total(&wp1.id));
            if pct > MANAGEMENT_CAP_PERCENT {
                issues.push(BudgetIssue::error(format!(
                    "WP1 Management at {:.1}% exceeds the {}% maximum",
                    pct, MANAGEMENT_CAP_PERCENT
                )));
            }
        }

        if let Some(coordinator) = self.partners.iter().find(|p| p.is_coordinator()) {
            let pct = percent_of_tier(self.partner_total(&coordinator.id));
            if pct > COORDINATOR_CAP_PERCENT {
                issues.push(BudgetIssue::warning(format!(
                    "Coordinator \"{}\" has {:.1}% of budget (recommended max {}%)",
                    coordinator.name, pct, COORDINATOR_CAP_PERCENT
                )));
            }
        }

        for partner in &self.partners {
            if self.partner_total(&partner.id) == 0 {
                issues.push(BudgetIssue::warning(format!("{} has no budget allocated", partner.name)));
            }
        }

        let development = self
            .work_packages
            .iter()
            .find(|wp| WorkPackageKind::detect(&wp.title) == WorkPackageKind::Development);
        if let (Some(wp1), Some(dev)) = (management, development) {
            let dev_total = self.work_package_total(&dev.id);
            if dev_total > 0 && dev_total < self.work_package_total(&wp1.id) {
                issues.push(BudgetIssue::error(
                    "Development WP has less budget than Management WP".to_string(),
                ));
            }
        }

        issues
    }
}

fn equal_percentages(partners: &[BudgetPartner]) -> BTreeMap<String, u32> {
    let n = partners.len() as u32;
    if n == 0 {
        return BTreeMap::new();
    }
    let equal = (100.0 / f64::from(n)).round() as u32;
    partners
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let pct = if i as u32 == n - 1 {
                100u32.saturating_sub(equal * (n - 1))
            } else {
                equal
            };
            (p.id.clone(), pct)
        })
        .collect()
}
