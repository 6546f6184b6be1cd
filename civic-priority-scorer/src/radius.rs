//! Search radius planning from area type, density and declared accuracy.

use civic_priority_core::{AreaType, FacilityTypeConfig, finite_or_zero};

/// Smallest radius the density adjustment may shrink to, in metres.
pub const MIN_RADIUS_M: f64 = 500.0;

/// Largest accuracy allowance added to the radius, in metres.
pub const MAX_ACCURACY_ALLOWANCE_M: f64 = 500.0;

/// Declared accuracy above which the radius is widened, in metres.
const ACCURACY_THRESHOLD_M: f64 = 100.0;

/// Base radius and cap for one area type, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBand {
    /// Starting radius.
    pub base_m: f64,
    /// Upper bound after every adjustment.
    pub cap_m: f64,
}

impl RadiusBand {
    /// Band for `area`.
    #[must_use]
    pub const fn for_area(area: AreaType) -> Self {
        let (base_m, cap_m) = match area {
            AreaType::DenseUrban => (800.0, 1500.0),
            AreaType::Urban => (1200.0, 2000.0),
            AreaType::Suburban => (2000.0, 3500.0),
            AreaType::Rural => (3500.0, 5000.0),
            AreaType::Unknown => (1500.0, 2500.0),
        };
        Self { base_m, cap_m }
    }
}

/// Pure mapping from surroundings to a search radius.
///
/// # Examples
/// ```
/// use civic_priority_core::AreaType;
/// use civic_priority_scorer::SearchRadiusPlanner;
///
/// let planner = SearchRadiusPlanner;
/// assert_eq!(planner.plan(AreaType::Urban, 20, 0.0), 1200);
/// assert_eq!(planner.plan(AreaType::Urban, 5, 0.0), 1800);
/// assert_eq!(planner.plan(AreaType::DenseUrban, 90, 0.0), 560);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchRadiusPlanner;

impl SearchRadiusPlanner {
    /// Plan the radius for `area` given probe `density` and the reporter's
    /// declared accuracy in metres.
    ///
    /// Sparse areas (density below 10) widen by half, dense areas (above 50)
    /// shrink by 30% but not below [`MIN_RADIUS_M`]. Accuracy worse than
    /// 100 m adds half the declared accuracy, at most
    /// [`MAX_ACCURACY_ALLOWANCE_M`]. The result never exceeds the area cap.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "radius adjustments scale and offset metre values"
    )]
    pub fn plan(self, area: AreaType, density: usize, accuracy_m: f64) -> u32 {
        let band = RadiusBand::for_area(area);
        let mut radius = band.base_m;
        if density < 10 {
            radius = (radius * 1.5).min(band.cap_m);
        } else if density > 50 {
            radius = (radius * 0.7).max(MIN_RADIUS_M);
        }
        let accuracy = finite_or_zero(accuracy_m);
        if accuracy > ACCURACY_THRESHOLD_M {
            radius += (accuracy / 2.0).min(MAX_ACCURACY_ALLOWANCE_M);
        }
        metres(radius.min(band.cap_m))
    }

    /// Radius actually searched for one facility type.
    #[must_use]
    pub fn effective_radius(self, planned_m: u32, config: &FacilityTypeConfig) -> u32 {
        planned_m.min(config.max_radius_m)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "radius is clamped to a small positive range before conversion"
)]
fn metres(radius: f64) -> u32 {
    finite_or_zero(radius).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(AreaType::DenseUrban, 800)]
    #[case(AreaType::Urban, 1200)]
    #[case(AreaType::Suburban, 2000)]
    #[case(AreaType::Rural, 3500)]
    #[case(AreaType::Unknown, 1500)]
    fn base_radius_for_moderate_density(#[case] area: AreaType, #[case] expected: u32) {
        assert_eq!(SearchRadiusPlanner.plan(area, 30, 0.0), expected);
    }

    #[rstest]
    #[case(AreaType::DenseUrban, 1200)]
    #[case(AreaType::Suburban, 3000)]
    #[case(AreaType::Rural, 5000)]
    #[case(AreaType::Unknown, 2250)]
    fn sparse_areas_widen_within_cap(#[case] area: AreaType, #[case] expected: u32) {
        assert_eq!(SearchRadiusPlanner.plan(area, 0, 0.0), expected);
    }

    #[rstest]
    #[case(AreaType::DenseUrban, 560)]
    #[case(AreaType::Urban, 840)]
    fn dense_areas_shrink(#[case] area: AreaType, #[case] expected: u32) {
        assert_eq!(SearchRadiusPlanner.plan(area, 60, 0.0), expected);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "test derives the shrunken radius from the band"
    )]
    fn shrinking_respects_floor() {
        let band = RadiusBand::for_area(AreaType::DenseUrban);
        assert!(band.base_m * 0.7 > MIN_RADIUS_M);
        assert!(SearchRadiusPlanner.plan(AreaType::DenseUrban, 500, 0.0) >= 500);
    }

    #[rstest]
    #[case(100.0, 1200)]
    #[case(300.0, 1350)]
    #[case(2000.0, 1700)]
    fn accuracy_allowance(#[case] accuracy: f64, #[case] expected: u32) {
        assert_eq!(SearchRadiusPlanner.plan(AreaType::Urban, 30, accuracy), expected);
    }

    #[rstest]
    fn accuracy_allowance_respects_cap() {
        assert_eq!(SearchRadiusPlanner.plan(AreaType::Urban, 5, 5000.0), 2000);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-250.0)]
    fn unusable_accuracy_is_ignored(#[case] accuracy: f64) {
        assert_eq!(SearchRadiusPlanner.plan(AreaType::Urban, 30, accuracy), 1200);
    }

    #[rstest]
    fn effective_radius_respects_type_cap() {
        let bank = FacilityTypeConfig::new("bank", 0.5, 2000);
        assert_eq!(SearchRadiusPlanner.effective_radius(3500, &bank), 2000);
        assert_eq!(SearchRadiusPlanner.effective_radius(800, &bank), 800);
    }

    fn any_area() -> impl Strategy<Value = AreaType> {
        prop::sample::select(vec![
            AreaType::DenseUrban,
            AreaType::Urban,
            AreaType::Suburban,
            AreaType::Rural,
            AreaType::Unknown,
        ])
    }

    proptest! {
        #[test]
        fn planning_is_deterministic_and_bounded(
            area in any_area(),
            density in 0_usize..200,
            accuracy in -100.0_f64..10_000.0,
        ) {
            let first = SearchRadiusPlanner.plan(area, density, accuracy);
            let second = SearchRadiusPlanner.plan(area, density, accuracy);
            prop_assert_eq!(first, second);
            let band = RadiusBand::for_area(area);
            prop_assert!(f64::from(first) <= band.cap_m);
            prop_assert!(f64::from(first) >= MIN_RADIUS_M);
        }
    }
}
