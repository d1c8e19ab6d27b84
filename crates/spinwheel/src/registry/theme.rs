use super::color::{rgb, rgba};
use palette::{Srgb, Srgba};
use std::sync::OnceLock;

pub const DEFAULT_THEME: &str = "classic";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Flat(Srgb<f64>),
    Radial { inner: Srgb<f64>, outer: Srgb<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Background,
    /// Alternating sector fills, by index parity.
    pub segments: [Srgb<f64>; 2],
    pub separator: Srgba<f64>,
    pub text: Srgb<f64>,
    pub inner_shadow: Srgba<f64>,
    pub center_highlight: Srgb<f64>,
    pub center_base: Srgb<f64>,
    pub pointer_light: Srgb<f64>,
    pub pointer_dark: Srgb<f64>,
    pub bulb_on: Srgb<f64>,
    pub bulb_off: Srgb<f64>,
}

impl Theme {
    pub fn segment_color(&self, index: usize) -> Srgb<f64> {
        self.segments[index % 2]
    }
}

fn build() -> Vec<Theme> {
    vec![
        Theme {
            name: "classic",
            background: Background::Flat(rgb(0xffffff)),
            segments: [rgb(0xe53935), rgb(0xfafafa)],
            separator: rgba(0xffffff, 0.8),
            text: rgb(0x212121),
            inner_shadow: rgba(0x000000, 0.25),
            center_highlight: rgb(0xffffff),
            center_base: rgb(0x9e9e9e),
            pointer_light: rgb(0xff6f60),
            pointer_dark: rgb(0xab000d),
            bulb_on: rgb(0xfff59d),
            bulb_off: rgb(0xbdbdbd),
        },
        Theme {
            name: "midnight",
            background: Background::Radial {
                inner: rgb(0x283593),
                outer: rgb(0x0d0f2b),
            },
            segments: [rgb(0x3949ab), rgb(0x1a237e)],
            separator: rgba(0x9fa8da, 0.6),
            text: rgb(0xe8eaf6),
            inner_shadow: rgba(0x000000, 0.4),
            center_highlight: rgb(0xc5cae9),
            center_base: rgb(0x303f9f),
            pointer_light: rgb(0xffd54f),
            pointer_dark: rgb(0xc79a00),
            bulb_on: rgb(0xffffff),
            bulb_off: rgb(0x5c6bc0),
        },
        Theme {
            name: "pastel",
            background: Background::Flat(rgb(0xfff8f0)),
            segments: [rgb(0xffd1dc), rgb(0xc1e1c1)],
            separator: rgba(0xffffff, 0.9),
            text: rgb(0x4a4a4a),
            inner_shadow: rgba(0x000000, 0.12),
            center_highlight: rgb(0xffffff),
            center_base: rgb(0xe0bbe4),
            pointer_light: rgb(0xb5ead7),
            pointer_dark: rgb(0x5fa58a),
            bulb_on: rgb(0xfffacd),
            bulb_off: rgb(0xe0e0e0),
        },
        Theme {
            name: "casino",
            background: Background::Radial {
                inner: rgb(0x1b5e20),
                outer: rgb(0x0b2a0e),
            },
            segments: [rgb(0xb71c1c), rgb(0x111111)],
            separator: rgba(0xd4af37, 0.9),
            text: rgb(0xffffff),
            inner_shadow: rgba(0x000000, 0.35),
            center_highlight: rgb(0xfff6c7),
            center_base: rgb(0xb8860b),
            pointer_light: rgb(0xfff3b0),
            pointer_dark: rgb(0x8a6a1f),
            bulb_on: rgb(0xffeb3b),
            bulb_off: rgb(0x6d4c41),
        },
    ]
}

fn registry() -> &'static [Theme] {
    static THEMES: OnceLock<Vec<Theme>> = OnceLock::new();
    THEMES.get_or_init(build)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    registry().iter().map(|t| t.name)
}

/// Resolves a theme by name. Unknown names get the `classic` theme.
pub fn lookup(name: &str) -> &'static Theme {
    let wanted = name.trim();
    let themes = registry();
    themes
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(wanted))
        .unwrap_or_else(|| {
            log::debug!("unknown theme '{}', using classic", wanted);
            &themes[0]
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        assert_eq!(lookup("Midnight").name, "midnight");
        assert_eq!(lookup("vaporwave").name, DEFAULT_THEME);
        assert_eq!(names().count(), 4);
    }

    #[test]
    fn test_segment_parity() {
        let theme = lookup("classic");
        assert_eq!(theme.segment_color(0), theme.segments[0]);
        assert_eq!(theme.segment_color(1), theme.segments[1]);
        assert_eq!(theme.segment_color(4), theme.segments[0]);
    }
}
