use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct OutcomeId(String);

crate::impl_string_newtype!(OutcomeId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AssetUrl(String);

crate::impl_string_newtype!(AssetUrl);

/// An sRGB color written as `#rrggbb` (or `#rgb`) in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    pub fn to_f64(self) -> Srgb<f64> {
        self.0.into_format()
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

/// Label fragments that mark an outcome as a loss. Matched against the
/// lower-cased label.
pub const LOSS_SYNONYMS: &[&str] = &[
    "perdu",
    "perdant",
    "dommage",
    "pas de chance",
    "retente",
    "raté",
    "lose",
    "lost",
    "try again",
    "no luck",
    "nothing",
    "sorry",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Outcome {
    pub id: OutcomeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub text_color: Option<HexColor>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub image_url: Option<AssetUrl>,
    /// Explicit win flag. Takes precedence over the label heuristic.
    #[serde(default)]
    pub winning: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Image,
    Text,
}

impl Outcome {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: OutcomeId::new(id),
            label: label.into(),
            color: None,
            text_color: None,
            probability: None,
            image_url: None,
            winning: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    pub fn with_color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(AssetUrl::new(url));
        self
    }

    pub fn content_type(&self) -> ContentType {
        match &self.image_url {
            Some(url) if !url.trim().is_empty() => ContentType::Image,
            _ => ContentType::Text,
        }
    }

    pub fn is_losing(&self) -> bool {
        if let Some(winning) = self.winning {
            return !winning;
        }
        let label = self.label.to_lowercase();
        LOSS_SYNONYMS.iter().any(|word| label.contains(word))
    }

    pub fn is_winning(&self) -> bool {
        !self.is_losing()
    }
}
