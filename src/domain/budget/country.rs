//! Country cost groups used to weight partner shares.

use serde::{Deserialize, Serialize};

/// Cost level of a participating country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostGroup {
    /// Northern Europe.
    A,
    /// Western Europe, the baseline.
    B,
    /// Southern and Central Europe.
    C,
    /// Balkans, Eastern Europe and neighbouring countries.
    D,
}

impl CostGroup {
    pub fn label(&self) -> &'static str {
        match self {
            CostGroup::A => "Northern Europe",
            CostGroup::B => "Western Europe",
            CostGroup::C => "Southern/Central Europe",
            CostGroup::D => "Balkans/Eastern Europe",
        }
    }
}

/// Cost multipliers relative to Western Europe (1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryProfile {
    pub code: &'static str,
    pub name: &'static str,
    pub group: CostGroup,
    pub staff_multiplier: f64,
    pub travel_multiplier: f64,
}

const fn profile(code: &'static str, name: &'static str, group: CostGroup, staff: f64, travel: f64) -> CountryProfile {
    CountryProfile {
        code,
        name,
        group,
        staff_multiplier: staff,
        travel_multiplier: travel,
    }
}

use CostGroup::{A, B, C, D};

pub static COUNTRY_PROFILES: &[CountryProfile] = &[
    profile("DK", "Denmark", A, 1.20, 1.15),
    profile("SE", "Sweden", A, 1.15, 1.15),
    profile("FI", "Finland", A, 1.10, 1.10),
    profile("NO", "Norway", A, 1.25, 1.20),
    profile("IS", "Iceland", A, 1.20, 1.20),
    profile("IE", "Ireland", A, 1.15, 1.10),
    profile("LU", "Luxembourg", A, 1.20, 1.10),
    profile("LI", "Liechtenstein", A, 1.20, 1.15),
    profile("AT", "Austria", B, 1.0, 1.0),
    profile("DE", "Germany", B, 1.0, 1.0),
    profile("FR", "France", B, 1.0, 1.0),
    profile("NL", "Netherlands", B, 1.05, 1.0),
    profile("BE", "Belgium", B, 1.0, 1.0),
    profile("IT", "Italy", B, 0.90, 0.90),
    profile("ES", "Spain", C, 0.80, 0.85),
    profile("PT", "Portugal", C, 0.75, 0.80),
    profile("GR", "Greece", C, 0.75, 0.80),
    profile("CY", "Cyprus", C, 0.80, 0.85),
    profile("MT", "Malta", C, 0.80, 0.85),
    profile("SI", "Slovenia", C, 0.75, 0.80),
    profile("HR", "Croatia", C, 0.70, 0.75),
    profile("CZ", "Czech Republic", C, 0.70, 0.75),
    profile("EE", "Estonia", C, 0.70, 0.75),
    profile("LV", "Latvia", C, 0.65, 0.70),
    profile("LT", "Lithuania", C, 0.65, 0.70),
    profile("SK", "Slovakia", C, 0.65, 0.70),
    profile("PL", "Poland", C, 0.65, 0.70),
    profile("HU", "Hungary", C, 0.65, 0.70),
    profile("RS", "Serbia", D, 0.55, 0.60),
    profile("BA", "Bosnia and Herzegovina", D, 0.50, 0.55),
    profile("AL", "Albania", D, 0.45, 0.50),
    profile("ME", "Montenegro", D, 0.50, 0.55),
    profile("MK", "North Macedonia", D, 0.45, 0.50),
    profile("XK", "Kosovo", D, 0.45, 0.50),
    profile("BG", "Bulgaria", D, 0.50, 0.55),
    profile("RO", "Romania", D, 0.55, 0.60),
    profile("TR", "Turkey", D, 0.50, 0.55),
    profile("MD", "Moldova", D, 0.40, 0.45),
    profile("GE", "Georgia", D, 0.40, 0.45),
    profile("UA", "Ukraine", D, 0.40, 0.45),
    profile("AM", "Armenia", D, 0.40, 0.45),
    profile("AZ", "Azerbaijan", D, 0.40, 0.45),
];

const BASELINE: CountryProfile = profile("", "", B, 1.0, 1.0);

/// Looks up a country by ISO code, ignoring case and surrounding space.
///
/// Unknown codes get the Western European baseline.
pub fn country_profile(code: &str) -> CountryProfile {
    let code = code.trim();
    COUNTRY_PROFILES
        .iter()
        .find(|p| p.code.eq_ignore_ascii_case(code))
        .copied()
        .unwrap_or(BASELINE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let rs = country_profile(" rs ");
        assert_eq!(rs.group, CostGroup::D);
        assert_eq!(rs.staff_multiplier, 0.55);
    }

    #[test]
    fn unknown_country_is_baseline() {
        let unknown = country_profile("ZZ");
        assert_eq!(unknown.group, CostGroup::B);
        assert_eq!(unknown.staff_multiplier, 1.0);
        assert_eq!(unknown.travel_multiplier, 1.0);
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = COUNTRY_PROFILES.iter().map(|p| p.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), COUNTRY_PROFILES.len());
    }
}
