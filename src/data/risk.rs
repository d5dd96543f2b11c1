use super::model::{RiskLabel, Smoker};

/// BMI at or above which a non-smoker is considered medium risk.
pub const OBESITY_BMI: f64 = 30.0;

/// Classify a policyholder. Smoking dominates BMI: a smoker is high risk
/// whatever their BMI.
pub fn classify(smoker: Smoker, bmi: f64) -> RiskLabel {
    match smoker {
        Smoker::Yes => RiskLabel::High,
        Smoker::No if bmi >= OBESITY_BMI => RiskLabel::Medium,
        Smoker::No => RiskLabel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoker_is_high_risk_regardless_of_bmi() {
        assert_eq!(classify(Smoker::Yes, 18.0), RiskLabel::High);
        assert_eq!(classify(Smoker::Yes, 42.0), RiskLabel::High);
    }

    #[test]
    fn test_non_smoker_bmi_threshold_is_inclusive() {
        assert_eq!(classify(Smoker::No, 30.0), RiskLabel::Medium);
        assert_eq!(classify(Smoker::No, 29.99), RiskLabel::Low);
        assert_eq!(classify(Smoker::No, 35.5), RiskLabel::Medium);
    }

    #[test]
    fn test_invariant_over_grid() {
        for smoker in Smoker::ALL {
            for tenths in 150..=500 {
                let bmi = f64::from(tenths) / 10.0;
                let expected = if smoker == Smoker::Yes {
                    RiskLabel::High
                } else if bmi >= 30.0 {
                    RiskLabel::Medium
                } else {
                    RiskLabel::Low
                };
                assert_eq!(classify(smoker, bmi), expected, "{smoker} bmi={bmi}");
            }
        }
    }
}
