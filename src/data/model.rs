use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::risk::classify;

// ---------------------------------------------------------------------------
// Smoker – yes/no flag as written in the source file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

impl Smoker {
    pub const ALL: [Smoker; 2] = [Smoker::Yes, Smoker::No];

    /// Parse the textual flag used by the dataset (`yes` / `no`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Smoker::Yes),
            "no" => Some(Smoker::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }

    /// Label shown next to the checkbox.
    pub fn label(self) -> &'static str {
        match self {
            Smoker::Yes => "Smoker",
            Smoker::No => "Non-Smoker",
        }
    }
}

impl From<bool> for Smoker {
    fn from(b: bool) -> Self {
        if b { Smoker::Yes } else { Smoker::No }
    }
}

impl fmt::Display for Smoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RiskLabel – ordinal risk derived from smoker flag and BMI
// ---------------------------------------------------------------------------

/// Declaration order is the display order (High first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk",
            RiskLabel::Medium => "Medium Risk",
            RiskLabel::Low => "Low Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one policyholder row
// ---------------------------------------------------------------------------

/// A single policyholder. Fields are private so `risk_category` can never
/// drift from the attributes it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    age: u32,
    bmi: f64,
    children: u32,
    smoker: Smoker,
    region: String,
    charges: f64,
    risk_category: RiskLabel,
}

impl Record {
    pub fn new(
        age: u32,
        bmi: f64,
        children: u32,
        smoker: Smoker,
        region: impl Into<String>,
        charges: f64,
    ) -> Self {
        Record {
            age,
            bmi,
            children,
            smoker,
            region: region.into(),
            charges,
            risk_category: classify(smoker, bmi),
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn smoker(&self) -> Smoker {
        self.smoker
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn charges(&self) -> f64 {
        self.charges
    }

    pub fn risk_category(&self) -> RiskLabel {
        self.risk_category
    }
}

// ---------------------------------------------------------------------------
// InsuranceDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed control bounds.
#[derive(Debug, Clone)]
pub struct InsuranceDataset {
    records: Vec<Record>,
    /// Distinct regions in order of first appearance.
    regions: Vec<String>,
    /// Inclusive (min, max) age; `(0, 0)` for an empty dataset.
    age_bounds: (u32, u32),
}

impl InsuranceDataset {
    /// Build the region index and age bounds from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut regions = Vec::new();
        for r in &records {
            if seen.insert(r.region()) {
                regions.push(r.region().to_string());
            }
        }

        let age_bounds = records
            .iter()
            .map(Record::age)
            .fold(None, |acc: Option<(u32, u32)>, age| match acc {
                None => Some((age, age)),
                Some((lo, hi)) => Some((lo.min(age), hi.max(age))),
            })
            .unwrap_or((0, 0));

        InsuranceDataset {
            records,
            regions,
            age_bounds,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn age_bounds(&self) -> (u32, u32) {
        self.age_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
