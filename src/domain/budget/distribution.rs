//! Cost categories, work package splits and partner shares.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::country::country_profile;
use super::plan::BudgetPartner;

/// Extra percentage points the coordinator receives on top of its weighted share.
pub const COORDINATOR_BONUS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Staff,
    Travel,
    Equipment,
    Subcontracting,
    Other,
}

impl CostCategory {
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Staff,
        CostCategory::Travel,
        CostCategory::Equipment,
        CostCategory::Subcontracting,
        CostCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Staff => "Staff Costs",
            CostCategory::Travel => "Travel & Subsistence",
            CostCategory::Equipment => "Equipment",
            CostCategory::Subcontracting => "Subcontracting",
            CostCategory::Other => "Other Direct Costs",
        }
    }
}

/// Euro amounts of one partner in one work package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryAmounts {
    pub staff: u64,
    pub travel: u64,
    pub equipment: u64,
    pub subcontracting: u64,
    pub other: u64,
}

impl CategoryAmounts {
    pub fn get(&self, category: CostCategory) -> u64 {
        match category {
            CostCategory::Staff => self.staff,
            CostCategory::Travel => self.travel,
            CostCategory::Equipment => self.equipment,
            CostCategory::Subcontracting => self.subcontracting,
            CostCategory::Other => self.other,
        }
    }

    pub fn set(&mut self, category: CostCategory, amount: u64) {
        let slot = match category {
            CostCategory::Staff => &mut self.staff,
            CostCategory::Travel => &mut self.travel,
            CostCategory::Equipment => &mut self.equipment,
            CostCategory::Subcontracting => &mut self.subcontracting,
            CostCategory::Other => &mut self.other,
        };
        *slot = amount;
    }

    pub fn total(&self) -> u64 {
        CostCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Fraction of a budget going to each category. Fractions sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySplit {
    pub staff: f64,
    pub travel: f64,
    pub equipment: f64,
    pub subcontracting: f64,
    pub other: f64,
}

impl CategorySplit {
    fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Staff => self.staff,
            CostCategory::Travel => self.travel,
            CostCategory::Equipment => self.equipment,
            CostCategory::Subcontracting => self.subcontracting,
            CostCategory::Other => self.other,
        }
    }
}

/// What a work package mostly spends on, guessed from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkPackageKind {
    Management,
    Research,
    Development,
    Piloting,
    Dissemination,
    General,
}

impl WorkPackageKind {
    /// Matches English and German title keywords.
    pub fn detect(title: &str) -> Self {
        let lower = title.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if any(&["management", "projektmanagement", "koordination"]) {
            WorkPackageKind::Management
        } else if any(&["research", "forschung", "analyse", "analysis"]) {
            WorkPackageKind::Research
        } else if any(&["develop", "entwicklung", "creation", "erstellung"]) {
            WorkPackageKind::Development
        } else if any(&["pilot", "test", "erprobung", "validation"]) {
            WorkPackageKind::Piloting
        } else if any(&["dissemination", "verbreitung", "exploitation", "verwertung", "multiplier"]) {
            WorkPackageKind::Dissemination
        } else {
            WorkPackageKind::General
        }
    }

    pub fn split(&self) -> CategorySplit {
        let (staff, travel, equipment, subcontracting, other) = match self {
            WorkPackageKind::Management => (0.70, 0.20, 0.0, 0.0, 0.10),
            WorkPackageKind::Research => (0.55, 0.15, 0.10, 0.05, 0.15),
            WorkPackageKind::Development => (0.50, 0.10, 0.15, 0.10, 0.15),
            WorkPackageKind::Piloting => (0.45, 0.25, 0.05, 0.05, 0.20),
            WorkPackageKind::Dissemination => (0.40, 0.25, 0.05, 0.10, 0.20),
            WorkPackageKind::General => (0.55, 0.20, 0.05, 0.05, 0.15),
        };
        CategorySplit {
            staff,
            travel,
            equipment,
            subcontracting,
            other,
        }
    }
}

/// One partner's percentage of a work package budget.
#[derive(Debug, Clone, Copy)]
pub struct PartnerShare<'a> {
    pub partner_id: &'a str,
    pub country: &'a str,
    pub percent: f64,
}

pub(crate) fn round_eur(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    }
}

/// Splits an amount over the categories in order, the last one taking the remainder.
pub(crate) fn split_amount(amount: u64, split: &CategorySplit) -> CategoryAmounts {
    let mut amounts = CategoryAmounts::default();
    let mut allocated = 0;
    for (i, category) in CostCategory::ALL.iter().enumerate() {
        let value = if i == CostCategory::ALL.len() - 1 {
            amount.saturating_sub(allocated)
        } else {
            round_eur(amount as f64 * split.get(*category)).min(amount - allocated)
        };
        amounts.set(*category, value);
        allocated += value;
    }
    amounts
}

/// Suggested budget percentages, summing to 100.
///
/// The coordinator gets [`COORDINATOR_BONUS`] points; the rest is shared in
/// proportion to each country's staff cost level.
pub fn suggest_partner_percentages(partners: &[BudgetPartner]) -> BTreeMap<String, u32> {
    match partners {
        [] => return BTreeMap::new(),
        [only] => return BTreeMap::from([(only.id.clone(), 100)]),
        _ => {}
    }

    let has_coordinator = partners.iter().any(BudgetPartner::is_coordinator);
    let remaining = if has_coordinator { 100 - COORDINATOR_BONUS } else { 100 };
    let weights: Vec<f64> = partners
        .iter()
        .map(|p| country_profile(&p.country).staff_multiplier)
        .collect();
    let total_weight: f64 = weights.iter().sum();

    let mut result = BTreeMap::new();
    let mut allocated = 0;
    for (i, (partner, weight)) in partners.iter().zip(&weights).enumerate() {
        let base = if i == partners.len() - 1 {
            remaining.saturating_sub(allocated)
        } else {
            (round_eur(weight / total_weight * remaining as f64) as u32).min(remaining - allocated)
        };
        allocated += base;
        let bonus = if partner.is_coordinator() { COORDINATOR_BONUS } else { 0 };
        result.insert(partner.id.clone(), base + bonus);
    }
    result
}

/// Distributes a work package budget over partners and categories.
///
/// Staff and travel are weighted by each partner's country cost level, then
/// scaled back so every partner receives exactly its percentage.
pub fn distribute_work_package(
    wp_budget: u64,
    kind: WorkPackageKind,
    shares: &[PartnerShare<'_>],
) -> BTreeMap<String, CategoryAmounts> {
    let split = kind.split();
    shares
        .iter()
        .map(|share| {
            let budget = round_eur(wp_budget as f64 * share.percent / 100.0);
            let profile = country_profile(share.country);
            let b = budget as f64;
            let raw = [
                b * split.staff * profile.staff_multiplier,
                b * split.travel * profile.travel_multiplier,
                b * split.equipment,
                b * split.subcontracting,
            ];
            let raw_total = raw.iter().sum::<f64>() + b * split.other;
            let scale = if raw_total > 0.0 { b / raw_total } else { 0.0 };

            let staff = round_eur(raw[0] * scale);
            let travel = round_eur(raw[1] * scale);
            let equipment = round_eur(raw[2] * scale);
            let subcontracting = round_eur(raw[3] * scale);
            let amounts = CategoryAmounts {
                staff,
                travel,
                equipment,
                subcontracting,
                other: budget.saturating_sub(staff + travel + equipment + subcontracting),
            };
            (share.partner_id.to_string(), amounts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::budget::BudgetRole;

    fn partner(id: &str, country: &str, role: BudgetRole) -> BudgetPartner {
        BudgetPartner {
            id: id.into(),
            name: id.to_uppercase(),
            country: country.into(),
            role,
        }
    }

    #[test]
    fn titles_pick_their_kind() {
        assert_eq!(WorkPackageKind::detect("Project Management"), WorkPackageKind::Management);
        assert_eq!(WorkPackageKind::detect("Forschung & Analyse"), WorkPackageKind::Research);
        assert_eq!(WorkPackageKind::detect("Piloting & Testing"), WorkPackageKind::Piloting);
        assert_eq!(WorkPackageKind::detect("Multiplier events"), WorkPackageKind::Dissemination);
        assert_eq!(WorkPackageKind::detect("Something else"), WorkPackageKind::General);
    }

    #[test]
    fn every_split_sums_to_one() {
        for kind in [
            WorkPackageKind::Management,
            WorkPackageKind::Research,
            WorkPackageKind::Development,
            WorkPackageKind::Piloting,
            WorkPackageKind::Dissemination,
            WorkPackageKind::General,
        ] {
            let s = kind.split();
            let sum = s.staff + s.travel + s.equipment + s.subcontracting + s.other;
            assert!((sum - 1.0).abs() < 1e-9, "{:?}", kind);
        }
    }

    #[test]
    fn coordinator_gets_bonus_and_total_is_100() {
        let partners = vec![
            partner("at", "AT", BudgetRole::Coordinator),
            partner("rs", "RS", BudgetRole::Partner),
            partner("de", "DE", BudgetRole::Partner),
        ];

        let pcts = suggest_partner_percentages(&partners);

        assert_eq!(pcts["at"], 47);
        assert_eq!(pcts["rs"], 19);
        assert_eq!(pcts["de"], 34);
        assert_eq!(pcts.values().sum::<u32>(), 100);
    }

    #[test]
    fn single_partner_takes_everything() {
        let pcts = suggest_partner_percentages(&[partner("a", "DE", BudgetRole::Partner)]);
        assert_eq!(pcts["a"], 100);
        assert!(suggest_partner_percentages(&[]).is_empty());
    }

    #[test]
    fn cheaper_country_shifts_money_away_from_staff() {
        let shares = [
            PartnerShare { partner_id: "at", country: "AT", percent: 50.0 },
            PartnerShare { partner_id: "rs", country: "RS", percent: 50.0 },
        ];

        let result = distribute_work_package(100_000, WorkPackageKind::Management, &shares);

        let at = result["at"];
        let rs = result["rs"];
        assert_eq!(at, CategoryAmounts { staff: 35_000, travel: 10_000, other: 5_000, ..Default::default() });
        assert_eq!(rs.total(), 50_000);
        assert!(rs.staff < at.staff);
        assert!(rs.other > at.other);
    }

    #[test]
    fn split_amount_keeps_the_total() {
        let amounts = split_amount(33_333, &WorkPackageKind::General.split());
        assert_eq!(amounts.total(), 33_333);
        assert_eq!(amounts.staff, 18_333);
    }
}
