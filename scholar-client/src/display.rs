//! Shared formatting helpers for list and detail views.

use scholar_core::Timestamp;

/// Performance tier of a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Strong,
    Ok,
    NeedsSupport,
}

/// Colour a band is rendered with. Front-ends map this to their palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Green,
    Yellow,
    Red,
}

impl Band {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Ok => "OK",
            Self::NeedsSupport => "Needs Support",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Strong => Tone::Green,
            Self::Ok => Tone::Yellow,
            Self::NeedsSupport => Tone::Red,
        }
    }
}

/// Lower bounds (inclusive) of the upper two bands.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandThresholds {
    pub strong: f64,
    pub ok: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            strong: 80.0,
            ok: 50.0,
        }
    }
}

impl BandThresholds {
    pub fn band(&self, value: f64) -> Band {
        if value >= self.strong {
            Band::Strong
        } else if value >= self.ok {
            Band::Ok
        } else {
            Band::NeedsSupport
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ok.is_finite() && self.strong.is_finite() && self.ok <= self.strong
    }
}

/// Band with the default thresholds (>= 80 strong, >= 50 OK).
pub fn band(value: f64) -> Band {
    BandThresholds::default().band(value)
}

/// `part / whole` as a percentage, `None` when `whole` is zero.
pub fn percent(part: u32, whole: u32) -> Option<f64> {
    (whole > 0).then(|| f64::from(part) * 100.0 / f64::from(whole))
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.0}%"),
        None => "n/a".to_string(),
    }
}

/// `18 Oct 2026`, or `-` when unknown.
pub fn format_date(value: Option<Timestamp>) -> String {
    value
        .map(|ts| ts.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub use scholar_core::full_name;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn bands_match_reference_points() {
        assert_eq!(band(85.0), Band::Strong);
        assert_eq!(band(65.0), Band::Ok);
        assert_eq!(band(30.0), Band::NeedsSupport);
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(band(80.0), Band::Strong);
        assert_eq!(band(79.99), Band::Ok);
        assert_eq!(band(50.0), Band::Ok);
        assert_eq!(band(49.99), Band::NeedsSupport);
        assert_eq!(band(80.0).tone(), Tone::Green);
        assert_eq!(band(50.0).tone(), Tone::Yellow);
        assert_eq!(band(0.0).label(), "Needs Support");
    }

    #[test]
    fn custom_thresholds() {
        let thresholds = BandThresholds {
            strong: 90.0,
            ok: 60.0,
        };
        assert_eq!(thresholds.band(85.0), Band::Ok);
        assert!(!BandThresholds { strong: 40.0, ok: 60.0 }.is_valid());
    }

    #[test]
    fn percent_and_dates() {
        assert_eq!(percent(1, 4), Some(25.0));
        assert_eq!(percent(3, 0), None);
        assert_eq!(format_percent(Some(83.4)), "83%");
        assert_eq!(format_percent(None), "n/a");
        let ts = chrono::Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        assert_eq!(format_date(Some(ts)), "18 Oct 2026");
        assert_eq!(format_date(None), "-");
    }

    proptest! {
        #[test]
        fn band_is_monotonic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let rank = |band: Band| match band {
                Band::NeedsSupport => 0,
                Band::Ok => 1,
                Band::Strong => 2,
            };
            if a <= b {
                prop_assert!(rank(super::band(a)) <= rank(super::band(b)));
            }
        }
    }
}
