use super::color::rgb;
use bitflags::bitflags;
use palette::Srgb;
use std::sync::OnceLock;

pub const DEFAULT_BORDER_STYLE: &str = "classic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Solid,
    Gradient,
    Metallic,
    Luxury,
    Neon,
    Animated,
    ImagePattern,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BorderEffects: u8 {
        const GLOW = 1 << 0;
        const SHADOW = 1 << 1;
        const METALLIC = 1 << 2;
        const ANIMATED = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyleDefinition {
    pub name: &'static str,
    pub kind: BorderKind,
    pub colors: Vec<Srgb<f64>>,
    pub stroke_width: f64,
    pub effects: BorderEffects,
}

impl BorderStyleDefinition {
    fn new(
        name: &'static str,
        kind: BorderKind,
        colors: &[u32],
        stroke_width: f64,
        effects: BorderEffects,
    ) -> Self {
        Self {
            name,
            kind,
            colors: colors.iter().map(|c| rgb(*c)).collect(),
            stroke_width,
            effects,
        }
    }

    pub fn is_image_pattern(&self) -> bool {
        self.kind == BorderKind::ImagePattern
    }

    pub fn primary(&self) -> Srgb<f64> {
        self.colors
            .first()
            .copied()
            .unwrap_or_else(|| rgb(0x2b2b2b))
    }

    /// Colors spread evenly over `[0, 1]` for gradient construction.
    pub fn gradient_stops(&self) -> Vec<(f64, Srgb<f64>)> {
        match self.colors.len() {
            0 => Vec::new(),
            1 => vec![(0.0, self.colors[0]), (1.0, self.colors[0])],
            n => self
                .colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f64 / (n - 1) as f64, *c))
                .collect(),
        }
    }
}

fn build() -> Vec<BorderStyleDefinition> {
    use BorderKind::*;
    let (glow, shadow, metallic, animated) = (
        BorderEffects::GLOW,
        BorderEffects::SHADOW,
        BorderEffects::METALLIC,
        BorderEffects::ANIMATED,
    );

    vec![
        BorderStyleDefinition::new("classic", Solid, &[0x2b2b2b], 8.0, shadow),
        BorderStyleDefinition::new("white", Solid, &[0xfafafa], 8.0, shadow),
        BorderStyleDefinition::new(
            "sunset",
            Gradient,
            &[0xff5f6d, 0xffc371, 0xff5f6d],
            10.0,
            shadow,
        ),
        BorderStyleDefinition::new(
            "ocean",
            Gradient,
            &[0x2193b0, 0x6dd5ed, 0x2193b0],
            10.0,
            shadow,
        ),
        BorderStyleDefinition::new(
            "gold",
            Metallic,
            &[0x8a6a1f, 0xf6e27a, 0xb8860b, 0xfff3b0, 0x8a6a1f],
            12.0,
            metallic | shadow,
        ),
        BorderStyleDefinition::new(
            "silver",
            Metallic,
            &[0x6e6e6e, 0xf5f5f5, 0xa9a9a9, 0xffffff, 0x6e6e6e],
            12.0,
            metallic | shadow,
        ),
        BorderStyleDefinition::new(
            "bronze",
            Metallic,
            &[0x5c3a1e, 0xd9a066, 0x8c5a2b, 0xf0c090, 0x5c3a1e],
            12.0,
            metallic | shadow,
        ),
        BorderStyleDefinition::new(
            "luxury",
            Luxury,
            &[0x1a1a1a, 0xd4af37, 0xfff6c7, 0xd4af37, 0x1a1a1a],
            16.0,
            metallic | glow | shadow,
        ),
        BorderStyleDefinition::new("neon-pink", Neon, &[0xff2bd6], 6.0, glow),
        BorderStyleDefinition::new("neon-blue", Neon, &[0x00e5ff], 6.0, glow),
        BorderStyleDefinition::new("neon-green", Neon, &[0x39ff14], 6.0, glow),
        BorderStyleDefinition::new("rainbow", Animated, &[], 10.0, animated | glow),
        BorderStyleDefinition::new("pattern", ImagePattern, &[0x2b2b2b], 18.0, shadow),
    ]
}

fn registry() -> &'static [BorderStyleDefinition] {
    static STYLES: OnceLock<Vec<BorderStyleDefinition>> = OnceLock::new();
    STYLES.get_or_init(build)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    registry().iter().map(|s| s.name)
}

/// Resolves a style by name. Unknown names get the `classic` style.
pub fn lookup(name: &str) -> &'static BorderStyleDefinition {
    let wanted = name.trim();
    let styles = registry();
    styles
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(wanted))
        .unwrap_or_else(|| {
            log::debug!("unknown border style '{}', using classic", wanted);
            &styles[0]
        })
}
