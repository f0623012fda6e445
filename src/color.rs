//! Canonical color representation.
//!
//! The page hands us colors in two shapes, `#rrggbb` (color inputs) and
//! `rgb(r, g, b)` (swatch styles). Both are parsed into one RGB triple at the
//! boundary; only [`Color::css`] formats back out, so the rest of the crate
//! never touches color strings.

/// Fixed overlay color for the sparkle brush.
pub const GOLD: Color = Color { r: 0xFF, g: 0xD7, b: 0x00 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Parse either external form. Returns `None` for anything else; callers
    /// fall back to the previous color rather than guessing.
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            return Self::parse_rgb(body);
        }
        None
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Color {
                    r: (v >> 16) as u8,
                    g: (v >> 8) as u8,
                    b: v as u8,
                })
            }
            // Short form: #abc expands to #aabbcc.
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((v >> 8) as u8 & 0xF, (v >> 4) as u8 & 0xF, v as u8 & 0xF);
                Some(Color {
                    r: r << 4 | r,
                    g: g << 4 | g,
                    b: b << 4 | b,
                })
            }
            _ => None,
        }
    }

    fn parse_rgb(body: &str) -> Option<Color> {
        let mut parts = body.split(',').map(|p| p.trim().parse::<u8>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Color { r, g, b })
    }

    /// Canonical external form, produced only at render time.
    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}
