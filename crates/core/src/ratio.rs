//! Aspect-ratio value type and named presets.
//!
//! An [`AspectRatio`] is an immutable width:height ratio with an optional
//! display name. The smaller component is always normalized to 1.00 (two
//! decimals) and the larger scaled proportionally, so `1920x1080` and
//! `16:9` both become `1.78:1`. Malformed input degrades to a 1:1 square
//! instead of failing.

use serde::{Deserialize, Serialize};

use crate::context::MIN_RESOLUTION;
use crate::error::EaselError;

/// All recognized preset names.
const PRESET_NAMES: &[&str] = &[
    "square",
    "widescreen",
    "ultrawide",
    "portrait",
    "story",
    "classic",
];

/// Which edge a target resolution pins when computing pixel dimensions.
///
/// `Long` fits the ratio inside a container of that size; `Short` keeps a
/// uniform surface density regardless of how elongated the ratio is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Edge {
    #[default]
    Long,
    Short,
}

/// Serde carrier for building an [`AspectRatio`] from ratio components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AspectRatioConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

/// An immutable width:height ratio with a display name.
///
/// Invariant: both components are >= 1 after construction, rounded to two
/// decimals. Value object with no identity beyond its fields; recreated on
/// every aspect-ratio change rather than mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectRatio {
    name: Option<String>,
    width_ratio: f64,
    height_ratio: f64,
}

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a ratio component without trailing zeros: `1` / `1.5` / `1.78`.
fn format_component(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl AspectRatio {
    /// Builds a ratio from raw pixel dimensions.
    ///
    /// The smaller dimension normalizes to 1.00 and the larger scales
    /// proportionally, both rounded to two decimals. If either dimension is
    /// below [`MIN_RESOLUTION`], the input is degenerate and the result
    /// falls back to 1:1.
    pub fn from_dimensions(width: f64, height: f64, name: Option<&str>) -> Self {
        if width < MIN_RESOLUTION || height < MIN_RESOLUTION {
            log::warn!("degenerate dimensions {width}x{height}; falling back to 1:1");
            return Self {
                name: name.map(String::from),
                width_ratio: 1.0,
                height_ratio: 1.0,
            };
        }
        let short = width.min(height);
        Self {
            name: name.map(String::from),
            width_ratio: round2(width / short),
            height_ratio: round2(height / short),
        }
    }

    /// Builds a ratio from explicit components.
    ///
    /// A poison config (either component below 1) degrades to 1:1 rather
    /// than raising; the explicit name, if any, is kept.
    pub fn from_config(config: AspectRatioConfig) -> Self {
        if config.width_ratio < 1.0 || config.height_ratio < 1.0 {
            log::warn!(
                "ratio components {}:{} below 1; falling back to 1:1",
                config.width_ratio,
                config.height_ratio
            );
            return Self {
                name: config.name,
                width_ratio: 1.0,
                height_ratio: 1.0,
            };
        }
        Self {
            name: config.name,
            width_ratio: round2(config.width_ratio),
            height_ratio: round2(config.height_ratio),
        }
    }

    /// 1:1.
    pub fn square() -> Self {
        Self::from_dimensions(1000.0, 1000.0, Some("square"))
    }

    /// 16:9.
    pub fn widescreen() -> Self {
        Self::from_dimensions(1600.0, 900.0, Some("widescreen"))
    }

    /// 21:9.
    pub fn ultrawide() -> Self {
        Self::from_dimensions(2100.0, 900.0, Some("ultrawide"))
    }

    /// 4:5, the common social feed ratio.
    pub fn portrait() -> Self {
        Self::from_dimensions(1080.0, 1350.0, Some("portrait"))
    }

    /// 9:16, full-height vertical.
    pub fn story() -> Self {
        Self::from_dimensions(900.0, 1600.0, Some("story"))
    }

    /// 3:2.
    pub fn classic() -> Self {
        Self::from_dimensions(1500.0, 1000.0, Some("classic"))
    }

    /// Looks up a preset by name.
    pub fn from_name(name: &str) -> Result<Self, EaselError> {
        match name {
            "square" => Ok(Self::square()),
            "widescreen" => Ok(Self::widescreen()),
            "ultrawide" => Ok(Self::ultrawide()),
            "portrait" => Ok(Self::portrait()),
            "story" => Ok(Self::story()),
            "classic" => Ok(Self::classic()),
            _ => Err(EaselError::UnknownPreset(name.to_string())),
        }
    }

    /// Returns a slice of all recognized preset names.
    pub fn preset_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// Returns the explicit name, or a generated `"{w}:{h}"` string.
    pub fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}:{}",
                format_component(self.width_ratio),
                format_component(self.height_ratio)
            ),
        }
    }

    /// Returns the width component (>= 1).
    pub fn width_ratio(&self) -> f64 {
        self.width_ratio
    }

    /// Returns the height component (>= 1).
    pub fn height_ratio(&self) -> f64 {
        self.height_ratio
    }

    /// Pixel width at the given resolution, pinning the long edge.
    pub fn width(&self, resolution: f64) -> u32 {
        self.width_pinned(resolution, Edge::Long)
    }

    /// Pixel height at the given resolution, pinning the long edge.
    pub fn height(&self, resolution: f64) -> u32 {
        self.height_pinned(resolution, Edge::Long)
    }

    /// Pixel width at the given resolution, pinning the chosen edge.
    ///
    /// `unit = resolution / (Long ? max : min)(components)`; the returned
    /// dimension is `floor(unit * width_ratio)`. A resolution at or below
    /// zero yields 0.
    pub fn width_pinned(&self, resolution: f64, pin: Edge) -> u32 {
        (self.unit(resolution, pin) * self.width_ratio).floor() as u32
    }

    /// Pixel height at the given resolution, pinning the chosen edge.
    pub fn height_pinned(&self, resolution: f64, pin: Edge) -> u32 {
        (self.unit(resolution, pin) * self.height_ratio).floor() as u32
    }

    fn unit(&self, resolution: f64, pin: Edge) -> f64 {
        if resolution <= 0.0 {
            return 0.0;
        }
        let denominator = match pin {
            Edge::Long => self.width_ratio.max(self.height_ratio),
            Edge::Short => self.width_ratio.min(self.height_ratio),
        };
        resolution / denominator
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::square()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Normalization ──────────────────────────────────────────────

    #[test]
    fn from_dimensions_normalizes_short_side_to_one() {
        let ratio = AspectRatio::from_dimensions(720.0, 1080.0, None);
        assert_eq!(ratio.width_ratio(), 1.0);
        assert_eq!(ratio.height_ratio(), 1.5);
    }

    #[test]
    fn from_dimensions_rounds_to_two_decimals() {
        let ratio = AspectRatio::from_dimensions(1920.0, 1080.0, None);
        assert_eq!(ratio.width_ratio(), 1.78);
        assert_eq!(ratio.height_ratio(), 1.0);
    }

    #[test]
    fn from_dimensions_square_input() {
        let ratio = AspectRatio::from_dimensions(500.0, 500.0, None);
        assert_eq!(ratio.width_ratio(), 1.0);
        assert_eq!(ratio.height_ratio(), 1.0);
    }

    #[test]
    fn degenerate_dimensions_fall_back_to_square() {
        let cases = [
            (0.0, 0.0),
            (-100.0, -100.0),
            (-100.0, 720.0),
            (720.0, -100.0),
            (0.0, 720.0),
            (720.0, 0.0),
        ];
        for (w, h) in cases {
            let ratio = AspectRatio::from_dimensions(w, h, None);
            assert_eq!(ratio.width_ratio(), 1.0, "width ratio for {w}x{h}");
            assert_eq!(ratio.height_ratio(), 1.0, "height ratio for {w}x{h}");
            assert_eq!(ratio.name(), "1:1", "name for {w}x{h}");
        }
    }

    #[test]
    fn dimensions_below_minimum_resolution_fall_back() {
        let ratio = AspectRatio::from_dimensions(99.0, 720.0, None);
        assert_eq!(ratio.width_ratio(), 1.0);
        assert_eq!(ratio.height_ratio(), 1.0);
    }

    // ── Config construction ────────────────────────────────────────

    #[test]
    fn from_config_keeps_valid_components() {
        let ratio = AspectRatio::from_config(AspectRatioConfig {
            name: None,
            width_ratio: 2.35,
            height_ratio: 1.0,
        });
        assert_eq!(ratio.width_ratio(), 2.35);
        assert_eq!(ratio.height_ratio(), 1.0);
    }

    #[test]
    fn from_config_poison_degrades_to_square() {
        let ratio = AspectRatio::from_config(AspectRatioConfig {
            name: None,
            width_ratio: 0.5,
            height_ratio: 2.0,
        });
        assert_eq!(ratio.width_ratio(), 1.0);
        assert_eq!(ratio.height_ratio(), 1.0);
    }

    #[test]
    fn from_config_poison_keeps_explicit_name() {
        let ratio = AspectRatio::from_config(AspectRatioConfig {
            name: Some("banner".into()),
            width_ratio: 2.0,
            height_ratio: 0.0,
        });
        assert_eq!(ratio.name(), "banner");
        assert_eq!(ratio.width_ratio(), 1.0);
    }

    #[test]
    fn config_json_round_trip() {
        let config = AspectRatioConfig {
            name: Some("wide".into()),
            width_ratio: 1.78,
            height_ratio: 1.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: AspectRatioConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn config_name_defaults_to_none() {
        let config: AspectRatioConfig =
            serde_json::from_str(r#"{"width_ratio": 1.5, "height_ratio": 1.0}"#).unwrap();
        assert_eq!(config.name, None);
    }

    // ── Names ──────────────────────────────────────────────────────

    #[test]
    fn generated_name_drops_trailing_zeros() {
        let ratio = AspectRatio::from_dimensions(720.0, 1080.0, None);
        assert_eq!(ratio.name(), "1:1.5");
    }

    #[test]
    fn generated_name_keeps_two_decimals_when_needed() {
        let ratio = AspectRatio::from_dimensions(1920.0, 1080.0, None);
        assert_eq!(ratio.name(), "1.78:1");
    }

    #[test]
    fn explicit_name_wins_over_generated() {
        let ratio = AspectRatio::from_dimensions(1920.0, 1080.0, Some("hd"));
        assert_eq!(ratio.name(), "hd");
    }

    // ── Presets ────────────────────────────────────────────────────

    #[test]
    fn presets_have_expected_components() {
        assert_eq!(AspectRatio::square().width_ratio(), 1.0);
        assert_eq!(AspectRatio::square().height_ratio(), 1.0);
        assert_eq!(AspectRatio::widescreen().width_ratio(), 1.78);
        assert_eq!(AspectRatio::ultrawide().width_ratio(), 2.33);
        assert_eq!(AspectRatio::portrait().height_ratio(), 1.25);
        assert_eq!(AspectRatio::story().height_ratio(), 1.78);
        assert_eq!(AspectRatio::classic().width_ratio(), 1.5);
    }

    #[test]
    fn every_preset_name_resolves() {
        for name in AspectRatio::preset_names() {
            let ratio = AspectRatio::from_name(name).unwrap();
            assert_eq!(&ratio.name(), name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = AspectRatio::from_name("cinema");
        assert!(matches!(result, Err(EaselError::UnknownPreset(_))));
    }

    #[test]
    fn default_is_square() {
        assert_eq!(AspectRatio::default(), AspectRatio::square());
    }

    // ── Pixel dimensions ───────────────────────────────────────────

    #[test]
    fn long_edge_dimensions_for_portrait_ratio() {
        let ratio = AspectRatio::from_dimensions(720.0, 1080.0, None);
        assert_eq!(ratio.width(500.0), 333);
        assert_eq!(ratio.height(500.0), 500);
    }

    #[test]
    fn short_edge_dimensions_for_portrait_ratio() {
        let ratio = AspectRatio::from_dimensions(720.0, 1080.0, None);
        assert_eq!(ratio.width_pinned(500.0, Edge::Short), 500);
        assert_eq!(ratio.height_pinned(500.0, Edge::Short), 750);
    }

    #[test]
    fn square_dimensions_are_resolution_on_both_edges() {
        let ratio = AspectRatio::square();
        assert_eq!(ratio.width(1080.0), 1080);
        assert_eq!(ratio.height(1080.0), 1080);
        assert_eq!(ratio.width_pinned(1080.0, Edge::Short), 1080);
    }

    #[test]
    fn negative_resolution_yields_zero() {
        let ratio = AspectRatio::widescreen();
        assert_eq!(ratio.width(-500.0), 0);
        assert_eq!(ratio.height(-500.0), 0);
    }

    #[test]
    fn zero_resolution_yields_zero() {
        let ratio = AspectRatio::widescreen();
        assert_eq!(ratio.width(0.0), 0);
        assert_eq!(ratio.height(0.0), 0);
    }

    #[test]
    fn long_edge_never_exceeds_resolution() {
        let ratio = AspectRatio::ultrawide();
        let w = ratio.width(1000.0);
        let h = ratio.height(1000.0);
        assert!(w <= 1000, "width {w}");
        assert!(h <= 1000, "height {h}");
        assert_eq!(w.max(h), 1000);
    }

    // ── Property-based tests ───────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn short_component_always_one(
                w in 100.0_f64..4000.0,
                h in 100.0_f64..4000.0,
            ) {
                let ratio = AspectRatio::from_dimensions(w, h, None);
                let short = ratio.width_ratio().min(ratio.height_ratio());
                prop_assert!((short - 1.0).abs() < 1e-9, "short component {short}");
            }

            #[test]
            fn long_component_matches_dimension_ratio(
                w in 100.0_f64..4000.0,
                h in 100.0_f64..4000.0,
            ) {
                let ratio = AspectRatio::from_dimensions(w, h, None);
                let long = ratio.width_ratio().max(ratio.height_ratio());
                let expected = (w.max(h) / w.min(h) * 100.0).round() / 100.0;
                prop_assert!((long - expected).abs() < 1e-9, "long {long} vs {expected}");
            }

            #[test]
            fn dimension_ratio_round_trips(
                w in 100.0_f64..4000.0,
                h in 100.0_f64..4000.0,
                resolution in 100.0_f64..4000.0,
            ) {
                let ratio = AspectRatio::from_dimensions(w, h, None);
                let pw = ratio.width(resolution) as f64;
                let ph = ratio.height(resolution) as f64;
                // floor-rounding tolerance of one unit on either dimension
                let expected = ratio.width_ratio() / ratio.height_ratio();
                let lo = (pw - 1.0) / (ph + 1.0);
                let hi = (pw + 1.0) / (ph - 1.0);
                prop_assert!(lo <= expected && expected <= hi,
                    "{pw}x{ph} vs component ratio {expected}");
            }

            #[test]
            fn long_edge_is_pinned_to_resolution(
                w in 100.0_f64..4000.0,
                h in 100.0_f64..4000.0,
                resolution in 100.0_f64..4000.0,
            ) {
                let ratio = AspectRatio::from_dimensions(w, h, None);
                let long = ratio.width(resolution).max(ratio.height(resolution)) as f64;
                prop_assert!(long <= resolution);
                prop_assert!(long >= resolution - 1.0);
            }
        }
    }
}
