use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::{filtered_records, FilterCriteria};
use super::model::{InsuranceDataset, Record, RiskLabel, Smoker};

// ---------------------------------------------------------------------------
// Aggregate types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMean {
    pub region: String,
    pub mean_charges: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub age: u32,
    pub charges: f64,
    pub smoker: Smoker,
}

/// Five-number summary plus plot whiskers and outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDistribution {
    pub risk: RiskLabel,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
    /// Share of the filtered subset, in percent.
    pub share: f64,
}

pub const CORRELATION_COLUMNS: [&str; 4] = ["age", "bmi", "children", "charges"];

/// Pearson correlation over [`CORRELATION_COLUMNS`]. `None` marks an
/// undefined cell (fewer than two rows, or a constant column).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: [&'static str; 4],
    pub values: [[Option<f64>; 4]; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_customers: usize,
    /// 0.0 when the subset is empty.
    pub avg_charges: f64,
    pub smoker_percentage: f64,
    pub high_risk_percentage: f64,
}

/// Everything the dashboard displays for one set of criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardArtifacts {
    pub charges_by_region: Vec<RegionMean>,
    pub age_vs_charges: Vec<ScatterPoint>,
    pub charges_by_risk: Vec<RiskDistribution>,
    pub customer_distribution: Vec<RegionCount>,
    pub correlation: CorrelationMatrix,
    pub metrics: SummaryMetrics,
}

#[cfg(test)]
impl DashboardArtifacts {
    /// Artifacts for an empty subset.
    pub fn empty() -> Self {
        aggregate(&[])
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter once and derive every aggregate from that same subset.
pub fn compute_dashboard(
    dataset: &InsuranceDataset,
    criteria: &FilterCriteria,
) -> DashboardArtifacts {
    let subset = filtered_records(dataset, criteria);
    aggregate(&subset)
}

fn aggregate(subset: &[&Record]) -> DashboardArtifacts {
    DashboardArtifacts {
        charges_by_region: charges_by_region(subset),
        age_vs_charges: age_vs_charges(subset),
        charges_by_risk: charges_by_risk(subset),
        customer_distribution: customer_distribution(subset),
        correlation: correlation_matrix(subset),
        metrics: summary_metrics(subset),
    }
}

/// Mean charges per region, sorted by region name.
pub fn charges_by_region(subset: &[&Record]) -> Vec<RegionMean> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in subset {
        let entry = groups.entry(r.region()).or_insert((0.0, 0));
        entry.0 += r.charges();
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(region, (sum, count))| RegionMean {
            region: region.to_string(),
            mean_charges: sum / count as f64,
            count,
        })
        .collect()
}

pub fn age_vs_charges(subset: &[&Record]) -> Vec<ScatterPoint> {
    subset
        .iter()
        .map(|r| ScatterPoint {
            age: r.age(),
            charges: r.charges(),
            smoker: r.smoker(),
        })
        .collect()
}

/// Box summary of charges per risk label present, High first.
pub fn charges_by_risk(subset: &[&Record]) -> Vec<RiskDistribution> {
    let mut groups: BTreeMap<RiskLabel, Vec<f64>> = BTreeMap::new();
    for r in subset {
        groups.entry(r.risk_category()).or_default().push(r.charges());
    }
    groups
        .into_iter()
        .filter_map(|(risk, values)| {
            box_summary(values).map(|summary| RiskDistribution { risk, summary })
        })
        .collect()
}

/// Record count per region, largest first (ties by name).
pub fn customer_distribution(subset: &[&Record]) -> Vec<RegionCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in subset {
        *counts.entry(r.region()).or_default() += 1;
    }
    let total = subset.len();
    let mut out: Vec<RegionCount> = counts
        .into_iter()
        .map(|(region, count)| RegionCount {
            region: region.to_string(),
            count,
            share: percentage(count, total),
        })
        .collect();
    // Stable sort keeps the name order for ties.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

pub fn correlation_matrix(subset: &[&Record]) -> CorrelationMatrix {
    let columns: [Vec<f64>; 4] = [
        subset.iter().map(|r| f64::from(r.age())).collect(),
        subset.iter().map(|r| r.bmi()).collect(),
        subset.iter().map(|r| f64::from(r.children())).collect(),
        subset.iter().map(|r| r.charges()).collect(),
    ];

    let mut values = [[None; 4]; 4];
    for i in 0..4 {
        for j in i..4 {
            let r = if i == j {
                has_variance(&columns[i]).then_some(1.0)
            } else {
                pearson(&columns[i], &columns[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: CORRELATION_COLUMNS,
        values,
    }
}

pub fn summary_metrics(subset: &[&Record]) -> SummaryMetrics {
    let total = subset.len();
    let smokers = subset.iter().filter(|r| r.smoker() == Smoker::Yes).count();
    let high_risk = subset
        .iter()
        .filter(|r| r.risk_category() == RiskLabel::High)
        .count();

    SummaryMetrics {
        total_customers: total,
        avg_charges: mean(subset.iter().map(|r| r.charges())).unwrap_or(0.0),
        smoker_percentage: percentage(smokers, total),
        high_risk_percentage: percentage(high_risk, total),
    }
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn has_variance(xs: &[f64]) -> bool {
    match xs.first() {
        Some(&first) => xs.len() > 1 && xs.iter().any(|&x| x != first),
        None => false,
    }
}

/// Sample Pearson correlation of two equally long columns.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let mx = mean(xs.iter().copied())?;
    let my = mean(ys.iter().copied())?;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// `None` for an empty group.
fn box_summary(mut values: Vec<f64>) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25);
    let median = quantile(&values, 0.5);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = values.iter().copied().find(|&v| v >= low_fence).unwrap_or(q1);
    let upper_whisker = values
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);
    let outliers = values
        .iter()
        .copied()
        .filter(|&v| v < low_fence || v > high_fence)
        .collect();

    Some(BoxSummary {
        count: values.len(),
        min: values[0],
        q1,
        median,
        q3,
        max: values[values.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn three_records() -> InsuranceDataset {
        InsuranceDataset::from_records(vec![
            Record::new(25, 32.0, 0, Smoker::Yes, "southeast", 20000.0),
            Record::new(40, 22.0, 1, Smoker::No, "southeast", 8000.0),
            Record::new(60, 31.0, 2, Smoker::No, "northwest", 15000.0),
        ])
    }

    fn varied() -> InsuranceDataset {
        InsuranceDataset::from_records(vec![
            Record::new(19, 27.9, 0, Smoker::Yes, "southwest", 16884.92),
            Record::new(18, 33.77, 1, Smoker::No, "southeast", 1725.55),
            Record::new(28, 33.0, 3, Smoker::No, "southeast", 4449.46),
            Record::new(33, 22.705, 0, Smoker::No, "northwest", 21984.47),
            Record::new(32, 28.88, 0, Smoker::No, "northwest", 3866.86),
            Record::new(31, 25.74, 0, Smoker::No, "southeast", 3756.62),
            Record::new(46, 33.44, 1, Smoker::No, "southeast", 8240.59),
            Record::new(37, 27.74, 3, Smoker::No, "northwest", 7281.51),
            Record::new(60, 25.84, 0, Smoker::No, "northwest", 28923.14),
            Record::new(62, 26.29, 0, Smoker::Yes, "southeast", 27808.73),
            Record::new(27, 42.13, 0, Smoker::Yes, "southeast", 39611.76),
        ])
    }

    #[test]
    fn test_three_record_scenario() {
        let ds = three_records();
        let criteria = FilterCriteria {
            region: "southeast".into(),
            age_min: 0,
            age_max: 100,
            smokers: Smoker::ALL.into_iter().collect(),
        };
        let out = compute_dashboard(&ds, &criteria);

        assert_eq!(
            out.metrics,
            SummaryMetrics {
                total_customers: 2,
                avg_charges: 14000.0,
                smoker_percentage: 50.0,
                high_risk_percentage: 50.0,
            }
        );
        assert_eq!(out.charges_by_region.len(), 1);
        assert_eq!(out.charges_by_region[0].region, "southeast");
        assert_eq!(out.charges_by_region[0].mean_charges, 14000.0);
        assert_eq!(out.age_vs_charges.len(), 2);
        assert_eq!(
            out.customer_distribution,
            vec![RegionCount {
                region: "southeast".into(),
                count: 2,
                share: 100.0
            }]
        );
        let risks: Vec<RiskLabel> = out.charges_by_risk.iter().map(|d| d.risk).collect();
        assert_eq!(risks, vec![RiskLabel::High, RiskLabel::Low]);
    }

    #[test]
    fn test_empty_subset_uses_zero_defaults() {
        let ds = three_records();
        let criteria = FilterCriteria::full_range(&ds, "nowhere");
        let out = compute_dashboard(&ds, &criteria);

        assert_eq!(
            out.metrics,
            SummaryMetrics {
                total_customers: 0,
                avg_charges: 0.0,
                smoker_percentage: 0.0,
                high_risk_percentage: 0.0,
            }
        );
        assert!(out.charges_by_region.is_empty());
        assert!(out.age_vs_charges.is_empty());
        assert!(out.charges_by_risk.is_empty());
        assert!(out.customer_distribution.is_empty());
        assert!(out.correlation.values.iter().flatten().all(Option::is_none));
        assert_eq!(out, DashboardArtifacts::empty());
    }

    #[test]
    fn test_age_interval_excluding_everyone_is_empty() {
        let ds = three_records();
        let mut criteria = FilterCriteria::full_range(&ds, "southeast");
        criteria.age_min = 70;
        criteria.age_max = 90;
        let out = compute_dashboard(&ds, &criteria);
        assert_eq!(out.metrics.total_customers, 0);
        assert_eq!(out.metrics.avg_charges, 0.0);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let ds = varied();
        let criteria = FilterCriteria::full_range(&ds, "southeast");
        let a = serde_json::to_vec(&compute_dashboard(&ds, &criteria)).unwrap();
        let b = serde_json::to_vec(&compute_dashboard(&ds, &criteria)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_correlation_symmetric_with_unit_diagonal() {
        let ds = varied();
        let subset: Vec<&Record> = ds.records().iter().collect();
        let m = correlation_matrix(&subset);
        for i in 0..4 {
            assert_eq!(m.values[i][i], Some(1.0));
            for j in 0..4 {
                assert_eq!(m.values[i][j], m.values[j][i]);
                let v = m.values[i][j].unwrap();
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_correlation_of_perfectly_linear_columns() {
        let records: Vec<Record> = (0..5)
            .map(|i| {
                Record::new(20 + i, 20.0 + f64::from(i), i, Smoker::No, "x", 1000.0 * f64::from(i))
            })
            .collect();
        let refs: Vec<&Record> = records.iter().collect();
        let m = correlation_matrix(&refs);
        for row in m.values {
            for v in row {
                assert!((v.unwrap() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_constant_column_is_undefined() {
        let records = vec![
            Record::new(30, 25.0, 0, Smoker::No, "x", 1000.0),
            Record::new(40, 28.0, 0, Smoker::No, "x", 2000.0),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let m = correlation_matrix(&refs);
        // children is constant
        assert_eq!(m.values[2][2], None);
        assert_eq!(m.values[0][2], None);
        assert_eq!(m.values[0][0], Some(1.0));
    }

    #[test]
    fn test_regional_rows_match_distinct_regions() {
        let ds = varied();
        let subset: Vec<&Record> = ds.records().iter().collect();
        let means = charges_by_region(&subset);
        let names: Vec<&str> = means.iter().map(|m| m.region.as_str()).collect();
        assert_eq!(names, vec!["northwest", "southeast", "southwest"]);
        assert_eq!(means.len(), ds.regions().len());
    }

    #[test]
    fn test_customer_distribution_sorted_by_count() {
        let ds = varied();
        let subset: Vec<&Record> = ds.records().iter().collect();
        let dist = customer_distribution(&subset);
        let counts: Vec<(&str, usize)> =
            dist.iter().map(|d| (d.region.as_str(), d.count)).collect();
        assert_eq!(counts, vec![("southeast", 6), ("northwest", 4), ("southwest", 1)]);
        let total_share: f64 = dist.iter().map(|d| d.share).sum();
        assert!((total_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_box_summary_quartiles_and_outliers() {
        let s = box_summary(vec![5.0, 1.0, 3.0, 2.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.count, 6);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 100.0);
        assert_eq!(s.q1, 2.25);
        assert_eq!(s.median, 3.5);
        assert_eq!(s.q3, 4.75);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 5.0);
        assert_eq!(s.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_summary_single_value() {
        let s = box_summary(vec![7.0]).unwrap();
        assert_eq!((s.q1, s.median, s.q3), (7.0, 7.0, 7.0));
        assert!(s.outliers.is_empty());
        assert!(box_summary(Vec::new()).is_none());
    }
}
