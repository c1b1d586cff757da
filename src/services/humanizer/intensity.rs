// Intensity utilities
// Intensity sets the probability every stage fires with; it never changes mid-run.

use crate::models::Intensity;

const HIGH_THRESHOLD: f64 = 80.0;
const MEDIUM_THRESHOLD: f64 = 60.0;

impl Intensity {
    /// Step function over the machine-likeness score.
    /// Out-of-range scores land in the nearest tier; NaN selects Low.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_THRESHOLD {
            Intensity::High
        } else if score > MEDIUM_THRESHOLD {
            Intensity::Medium
        } else {
            Intensity::Low
        }
    }

    pub fn profile(self) -> IntensityProfile {
        intensity_profile(self)
    }

    pub fn is_elevated(self) -> bool {
        matches!(self, Intensity::Medium | Intensity::High)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IntensityProfile {
    pub variation: f64,
    pub lexical: f64,
    pub orality: f64,
    pub reference: f64,
    pub formality: f64,
    /// Zero means the noise stage is skipped
    pub noise: f64,
}

fn intensity_profile(intensity: Intensity) -> IntensityProfile {
    match intensity {
        Intensity::Low => IntensityProfile {
            variation: 0.2,
            lexical: 0.1,
            orality: 0.05,
            reference: 0.05,
            formality: 0.3,
            noise: 0.0,
        },
        Intensity::Medium => IntensityProfile {
            variation: 0.4,
            lexical: 0.25,
            orality: 0.15,
            reference: 0.1,
            formality: 0.6,
            noise: 0.1,
        },
        Intensity::High => IntensityProfile {
            variation: 0.6,
            lexical: 0.4,
            orality: 0.25,
            reference: 0.2,
            formality: 0.9,
            noise: 0.2,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_thresholds() {
        assert_eq!(Intensity::from_score(85.0), Intensity::High);
        assert_eq!(Intensity::from_score(70.0), Intensity::Medium);
        assert_eq!(Intensity::from_score(30.0), Intensity::Low);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert_eq!(Intensity::from_score(80.0), Intensity::Medium);
        assert_eq!(Intensity::from_score(60.0), Intensity::Low);
        assert_eq!(Intensity::from_score(80.01), Intensity::High);
    }

    #[test]
    fn test_out_of_range_is_clamped_into_tiers() {
        assert_eq!(Intensity::from_score(150.0), Intensity::High);
        assert_eq!(Intensity::from_score(-5.0), Intensity::Low);
        assert_eq!(Intensity::from_score(f64::NAN), Intensity::Low);
    }

    #[test]
    fn test_profiles_increase_with_intensity() {
        let low = Intensity::Low.profile();
        let mid = Intensity::Medium.profile();
        let high = Intensity::High.profile();
        assert!(low.variation < mid.variation && mid.variation < high.variation);
        assert!(low.formality < mid.formality && mid.formality < high.formality);
        assert_eq!(low.noise, 0.0);
        assert_eq!(high.lexical, 0.4);
    }
}
