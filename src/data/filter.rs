use std::collections::BTreeSet;

use super::model::{InsuranceDataset, Record, Smoker};

// ---------------------------------------------------------------------------
// Filter criteria: region, inclusive age interval, smoker flags
// ---------------------------------------------------------------------------

/// Selection driving one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact region match (single-select).
    pub region: String,
    pub age_min: u32,
    pub age_max: u32,
    /// Smoker flags to keep. Empty means nothing passes.
    pub smokers: BTreeSet<Smoker>,
}

impl FilterCriteria {
    /// Everything in `region`: full age range, both smoker flags.
    pub fn full_range(dataset: &InsuranceDataset, region: impl Into<String>) -> Self {
        let (age_min, age_max) = dataset.age_bounds();
        FilterCriteria {
            region: region.into(),
            age_min,
            age_max,
            smokers: Smoker::ALL.into_iter().collect(),
        }
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        record.region() == self.region
            && (self.age_min..=self.age_max).contains(&record.age())
            && self.smokers.contains(&record.smoker())
    }

    /// Flip one smoker flag on or off.
    pub fn toggle_smoker(&mut self, smoker: Smoker) {
        if !self.smokers.remove(&smoker) {
            self.smokers.insert(smoker);
        }
    }
}

/// Return the records that pass the criteria, in dataset order.
///
/// An empty result is valid; so is an inverted age interval, which simply
/// matches nothing.
pub fn filtered_records<'a>(
    dataset: &'a InsuranceDataset,
    criteria: &FilterCriteria,
) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| criteria.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InsuranceDataset {
        InsuranceDataset::from_records(vec![
            Record::new(25, 32.0, 0, Smoker::Yes, "southeast", 20000.0),
            Record::new(40, 22.0, 1, Smoker::No, "southeast", 8000.0),
            Record::new(60, 31.0, 2, Smoker::No, "northwest", 15000.0),
            Record::new(33, 28.0, 3, Smoker::No, "southeast", 5000.0),
            Record::new(51, 35.0, 0, Smoker::Yes, "northeast", 42000.0),
        ])
    }

    #[test]
    fn test_full_range_returns_exactly_the_region() {
        let ds = sample();
        for region in ds.regions() {
            let criteria = FilterCriteria::full_range(&ds, region.clone());
            let got = filtered_records(&ds, &criteria);
            let expected: Vec<&Record> =
                ds.records().iter().filter(|r| r.region() == region).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_result_is_narrowing_and_every_member_matches() {
        let ds = sample();
        let criteria = FilterCriteria {
            region: "southeast".into(),
            age_min: 30,
            age_max: 45,
            smokers: [Smoker::No].into_iter().collect(),
        };
        let got = filtered_records(&ds, &criteria);
        assert_eq!(got.len(), 2);
        for r in got {
            assert!(ds.records().contains(r));
            assert_eq!(r.region(), "southeast");
            assert!((30..=45).contains(&r.age()));
            assert_eq!(r.smoker(), Smoker::No);
        }
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let ds = sample();
        let mut criteria = FilterCriteria::full_range(&ds, "southeast");
        criteria.age_min = 25;
        criteria.age_max = 25;
        let got = filtered_records(&ds, &criteria);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].age(), 25);
    }

    #[test]
    fn test_degenerate_criteria_yield_empty() {
        let ds = sample();

        let unknown = FilterCriteria::full_range(&ds, "atlantis");
        assert!(filtered_records(&ds, &unknown).is_empty());

        let mut inverted = FilterCriteria::full_range(&ds, "southeast");
        inverted.age_min = 50;
        inverted.age_max = 20;
        assert!(filtered_records(&ds, &inverted).is_empty());

        let mut no_smokers = FilterCriteria::full_range(&ds, "southeast");
        no_smokers.smokers.clear();
        assert!(filtered_records(&ds, &no_smokers).is_empty());
    }

    #[test]
    fn test_toggle_smoker() {
        let ds = sample();
        let mut criteria = FilterCriteria::full_range(&ds, "southeast");
        criteria.toggle_smoker(Smoker::Yes);
        assert!(!criteria.smokers.contains(&Smoker::Yes));
        criteria.toggle_smoker(Smoker::Yes);
        assert!(criteria.smokers.contains(&Smoker::Yes));
    }
}
