//! Budget planning queries. Pure calculation, no model involved.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::budget::{BudgetIssue, BudgetPlan, DistributionMode};
use crate::domain::pipeline::PipelineState;

/// Command to fill a plan's table from its lump sum.
#[derive(Debug, Clone)]
pub struct DistributeBudgetCommand {
    pub plan: BudgetPlan,
    pub mode: DistributionMode,
    /// Recompute partner percentages from country cost levels first.
    pub suggest_percentages: bool,
}

/// A plan with its totals and rule findings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub plan: BudgetPlan,
    pub grand_total: u64,
    pub work_package_totals: BTreeMap<String, u64>,
    pub partner_totals: BTreeMap<String, u64>,
    pub issues: Vec<BudgetIssue>,
}

impl From<BudgetPlan> for BudgetReport {
    fn from(plan: BudgetPlan) -> Self {
        let work_package_totals = plan
            .work_packages
            .iter()
            .map(|wp| (wp.id.clone(), plan.work_package_total(&wp.id)))
            .collect();
        let partner_totals = plan
            .partners
            .iter()
            .map(|p| (p.id.clone(), plan.partner_total(&p.id)))
            .collect();
        Self {
            grand_total: plan.grand_total(),
            work_package_totals,
            partner_totals,
            issues: plan.check(),
            plan,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BudgetHandler;

impl BudgetHandler {
    pub fn new() -> Self {
        Self
    }

    /// Starts a plan from a writing session, already distributed by country cost level.
    pub fn from_pipeline(&self, state: &PipelineState) -> BudgetReport {
        let mut plan = BudgetPlan::from_pipeline(state);
        plan.distribute(DistributionMode::Weighted);
        tracing::debug!(partners = plan.partners.len(), tier = plan.budget_tier, "Budget plan imported");
        plan.into()
    }

    pub fn distribute(&self, cmd: DistributeBudgetCommand) -> BudgetReport {
        let mut plan = cmd.plan;
        if cmd.suggest_percentages {
            plan.suggest_percentages();
        }
        plan.distribute(cmd.mode);
        plan.into()
    }

    pub fn check(&self, plan: BudgetPlan) -> BudgetReport {
        plan.into()
    }
}
