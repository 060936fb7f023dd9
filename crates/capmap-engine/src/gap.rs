//! Gap Categorizer.

use capmap_core::config::GapConfig;
use capmap_core::models::{FitScore, GapAssessment, GapCategory, Importance};

/// Thresholds separating liability, concern, and aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapPolicy {
    concern_min_gap: i8,
    liability_min_gap: i8,
}

impl GapPolicy {
    /// Build a policy. `liability_min_gap` must exceed `concern_min_gap`,
    /// which `CapmapConfig::validate` enforces for configured values.
    pub fn new(concern_min_gap: i8, liability_min_gap: i8) -> Self {
        Self {
            concern_min_gap,
            liability_min_gap,
        }
    }

    /// Category of a gap. Monotonic: a larger gap never maps to a better
    /// category.
    pub fn category_for_gap(&self, gap: i8) -> GapCategory {
        if gap >= self.liability_min_gap {
            GapCategory::Liability
        } else if gap >= self.concern_min_gap {
            GapCategory::Concern
        } else {
            GapCategory::Aligned
        }
    }

    /// Assess `importance - fit_score`. `None` unless both are present.
    pub fn categorize(
        &self,
        importance: Option<Importance>,
        fit_score: Option<FitScore>,
    ) -> Option<GapAssessment> {
        let (importance, fit_score) = (importance?.value(), fit_score?.value());
        // Both sit in 1..=5, so the difference always fits.
        let gap = i8::try_from(i16::from(importance) - i16::from(fit_score)).ok()?;
        Some(GapAssessment {
            importance,
            fit_score,
            gap,
            category: self.category_for_gap(gap),
        })
    }
}

impl Default for GapPolicy {
    fn default() -> Self {
        Self::from(&GapConfig::default())
    }
}

impl From<&GapConfig> for GapPolicy {
    fn from(config: &GapConfig) -> Self {
        Self::new(config.concern_min_gap, config.liability_min_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(value: u8) -> Option<Importance> {
        Some(Importance::new(value).unwrap())
    }

    fn f(value: u8) -> Option<FitScore> {
        Some(FitScore::new(value).unwrap())
    }

    #[test]
    fn large_gap_is_liability() {
        let assessment = GapPolicy::default().categorize(i(5), f(2)).unwrap();
        assert_eq!(assessment.gap, 3);
        assert_eq!(assessment.category, GapCategory::Liability);
    }

    #[test]
    fn equal_scores_are_aligned() {
        let assessment = GapPolicy::default().categorize(i(4), f(4)).unwrap();
        assert_eq!(assessment.gap, 0);
        assert_eq!(assessment.category, GapCategory::Aligned);
    }

    #[test]
    fn gap_of_two_on_high_importance_is_liability() {
        let policy = GapPolicy::default();
        assert_eq!(policy.categorize(i(4), f(2)).unwrap().category, GapCategory::Liability);
        assert_eq!(policy.categorize(i(5), f(3)).unwrap().category, GapCategory::Liability);
    }

    #[test]
    fn small_positive_gap_is_concern() {
        assert_eq!(
            GapPolicy::default().categorize(i(3), f(2)).unwrap().category,
            GapCategory::Concern
        );
    }

    #[test]
    fn negative_gap_is_aligned() {
        assert_eq!(
            GapPolicy::default().categorize(i(1), f(5)).unwrap().category,
            GapCategory::Aligned
        );
    }

    #[test]
    fn missing_inputs_yield_nothing() {
        let policy = GapPolicy::default();
        assert!(policy.categorize(None, f(3)).is_none());
        assert!(policy.categorize(i(3), None).is_none());
        assert!(policy.categorize(None, None).is_none());
    }

    #[test]
    fn extremes_of_the_rating_range() {
        let policy = GapPolicy::default();
        let worst = policy.categorize(i(5), f(1)).unwrap();
        assert_eq!(worst.gap, 4);
        assert_eq!(worst.category, GapCategory::Liability);
        let best = policy.categorize(i(1), f(5)).unwrap();
        assert_eq!(best.gap, -4);
        assert_eq!(best.category, GapCategory::Aligned);
        // Raw scores outside the range never reach the categorizer.
        assert!(Importance::new(128).is_err());
        assert!(FitScore::new(0).is_err());
    }

    #[test]
    fn category_is_monotonic_in_gap() {
        let policy = GapPolicy::new(1, 3);
        let mut previous = GapCategory::Aligned;
        for gap in -4..=4 {
            let category = policy.category_for_gap(gap);
            // Ord runs Liability < Concern < Aligned.
            assert!(category <= previous, "gap {gap} improved the category");
            previous = category;
        }
    }
}
