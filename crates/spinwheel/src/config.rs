use crate::outcome::{AssetUrl, Outcome};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const DEFAULT_BASE_DURATION_MS: u64 = 4000;
pub const MIN_DURATION_MS: u64 = 500;
pub const DEFAULT_WIN_PROBABILITY: f64 = 0.1;
pub const DEFAULT_BULB_COUNT: usize = 16;
pub const DEFAULT_PATTERN_MIN_THICKNESS: f64 = 10.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    #[strum(serialize = "slow")]
    Slow,
    #[default]
    #[strum(serialize = "medium", serialize = "normal")]
    Medium,
    #[strum(serialize = "fast")]
    Fast,
}

impl Speed {
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Slow => 1.5,
            Self::Medium => 1.0,
            Self::Fast => 0.7,
        }
    }

    /// Scales `base` by the speed multiplier, never going below 500 ms.
    pub fn scale(&self, base: Duration) -> Duration {
        base.mul_f64(self.multiplier())
            .max(Duration::from_millis(MIN_DURATION_MS))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    #[default]
    #[strum(serialize = "random", serialize = "uniform")]
    Random,
    #[strum(serialize = "probability", serialize = "weighted")]
    Probability,
    #[strum(
        serialize = "instant_winner",
        serialize = "instant-winner",
        serialize = "instantwinner"
    )]
    InstantWinner,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AssetRefs {
    #[serde(default)]
    pub pointer: Option<AssetUrl>,
    #[serde(default)]
    pub center: Option<AssetUrl>,
    #[serde(default)]
    pub border_pattern: Option<AssetUrl>,
}

fn default_theme() -> String {
    "classic".to_string()
}

fn default_border_style() -> String {
    "classic".to_string()
}

fn default_base_duration_ms() -> u64 {
    DEFAULT_BASE_DURATION_MS
}

fn default_bulb_count() -> usize {
    DEFAULT_BULB_COUNT
}

fn default_pattern_min_thickness() -> f64 {
    DEFAULT_PATTERN_MIN_THICKNESS
}

/// Everything a host hands to the engine to build one wheel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WheelConfig {
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
    #[serde(default)]
    pub speed: Speed,
    #[serde(default)]
    pub spin_mode: SpinMode,
    #[serde(default)]
    pub win_probability: Option<f64>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_border_style")]
    pub border_style: String,
    #[serde(default)]
    pub show_decorative_bulbs: bool,
    #[serde(default = "default_bulb_count")]
    pub bulb_count: usize,
    #[serde(default)]
    pub disable_pointer_physics: bool,
    #[serde(default)]
    pub freeze_pointer_during_spin: bool,
    #[serde(default = "default_base_duration_ms")]
    pub base_duration_ms: u64,
    #[serde(default = "default_pattern_min_thickness")]
    pub pattern_min_thickness: f64,
    #[serde(default)]
    pub assets: AssetRefs,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
            speed: Speed::default(),
            spin_mode: SpinMode::default(),
            win_probability: None,
            theme: default_theme(),
            border_style: default_border_style(),
            show_decorative_bulbs: false,
            bulb_count: DEFAULT_BULB_COUNT,
            disable_pointer_physics: false,
            freeze_pointer_during_spin: false,
            base_duration_ms: DEFAULT_BASE_DURATION_MS,
            pattern_min_thickness: DEFAULT_PATTERN_MIN_THICKNESS,
            assets: AssetRefs::default(),
        }
    }
}

impl WheelConfig {
    pub fn with_outcomes(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            ..Self::default()
        }
    }

    pub fn effective_duration(&self) -> Duration {
        self.speed
            .scale(Duration::from_millis(self.base_duration_ms))
    }

    /// Win rate for `instant_winner`, clamped to `[0, 1]`.
    pub fn win_rate(&self) -> f64 {
        self.win_probability
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_WIN_PROBABILITY)
            .clamp(0.0, 1.0)
    }
}
