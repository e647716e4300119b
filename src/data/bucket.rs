//! Program Bucket Classifier
//! Maps free-text program labels onto the fixed set of reporting buckets.

use serde::Serialize;
use std::fmt;

/// Reporting category for a grant. Variant order is the canonical
/// declaration order and doubles as the match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Bucket {
    CultureRaceEquity,
    Cyber,
    EconomySociety,
    Education,
    EnvironmentClimate,
    GenderEquityGovernance,
    InitiativesSpecialProjects,
    PerformingArts,
    Philanthropy,
    RegionalSbac,
    UsDemocracy,
    Other,
}

impl Bucket {
    /// Keyword-matched buckets in match priority order. `Other` is never matched.
    pub const CLASSIFIED: [Bucket; 11] = [
        Bucket::CultureRaceEquity,
        Bucket::Cyber,
        Bucket::EconomySociety,
        Bucket::Education,
        Bucket::EnvironmentClimate,
        Bucket::GenderEquityGovernance,
        Bucket::InitiativesSpecialProjects,
        Bucket::PerformingArts,
        Bucket::Philanthropy,
        Bucket::RegionalSbac,
        Bucket::UsDemocracy,
    ];

    /// Display name used in legends.
    pub fn name(&self) -> &'static str {
        match self {
            Bucket::CultureRaceEquity => "Culture, Race, & Equity",
            Bucket::Cyber => "Cyber",
            Bucket::EconomySociety => "Economy and Society",
            Bucket::Education => "Education",
            Bucket::EnvironmentClimate => "Environment and Special Initiative on Climate",
            Bucket::GenderEquityGovernance => "Gender, Equity & Governance",
            Bucket::InitiativesSpecialProjects => "Initiatives and Special Projects",
            Bucket::PerformingArts => "Performing Arts",
            Bucket::Philanthropy => "Philanthropy",
            Bucket::RegionalSbac => "Regional and SBAC",
            Bucket::UsDemocracy => "U.S. Democracy",
            Bucket::Other => "Other",
        }
    }

    /// Substrings that place a label in this bucket.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Bucket::CultureRaceEquity => &["Culture, Race, & Equity"],
            Bucket::Cyber => &["Cyber", "Cybersecurity"],
            Bucket::EconomySociety => &["Economy", "Society", "Economy and Society"],
            Bucket::Education => &["Education"],
            Bucket::EnvironmentClimate => {
                &["Environment", "Climate", "Special Initiative on Climate"]
            }
            Bucket::GenderEquityGovernance => {
                &["Gender", "Gender Equity & Governance", "Governance"]
            }
            Bucket::InitiativesSpecialProjects => {
                &["Initiatives", "Special Projects", "Initiative"]
            }
            Bucket::PerformingArts => &["Performing Arts", "Arts"],
            Bucket::Philanthropy => &["Philanthropy"],
            Bucket::RegionalSbac => &["Regional", "SBAC"],
            Bucket::UsDemocracy => &["U.S. Democracy", "Democracy", "US Democracy"],
            Bucket::Other => &[],
        }
    }

    /// Position in the canonical order, used for palette lookup.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Classify a program label. First bucket (in declaration order) with a
    /// keyword contained in the label wins; missing or unmatched labels fall
    /// into `Other`. Matching is case-sensitive.
    pub fn classify(label: Option<&str>) -> Bucket {
        let Some(label) = label else {
            return Bucket::Other;
        };

        Self::CLASSIFIED
            .iter()
            .copied()
            .find(|bucket| bucket.keywords().iter().any(|kw| label.contains(kw)))
            .unwrap_or(Bucket::Other)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
