//! Budget module - Lump-sum planning across work packages and partners.
//!
//! A plan holds one table of euro amounts per work package, partner and
//! cost category. Distribution fills it from the lump sum; [`BudgetPlan::check`]
//! reports what breaks the programme's budget rules.

mod country;
mod distribution;
mod plan;

pub use country::{country_profile, CostGroup, CountryProfile, COUNTRY_PROFILES};
pub use distribution::{
    distribute_work_package, suggest_partner_percentages, CategoryAmounts, CategorySplit,
    CostCategory, PartnerShare, WorkPackageKind, COORDINATOR_BONUS,
};
pub use plan::{
    BudgetIssue, BudgetPartner, BudgetPlan, BudgetRole, BudgetWorkPackage, DistributionMode,
    COORDINATOR_CAP_PERCENT, MANAGEMENT_CAP_PERCENT,
};
