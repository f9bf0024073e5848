use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("color {:?} must start with '#'", hex))?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            anyhow::bail!("color {:?} must have 6 or 8 hex digits", hex);
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| anyhow!("invalid color {:?}: {}", hex, e))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// 2D affine transform, column-major `[a c e; b d f]` like a canvas matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translation(x: f32, y: f32) -> Self {
        Self { e: x, f: y, ..Self::IDENTITY }
    }

    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// `self * other`: `other` is applied first, as canvas transforms compose.
    pub fn then(self, other: Affine) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2 {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Uniform scale factor, used to scale stroke widths.
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn parses_hex_colors() {
        let c = Color::from_hex("#2196F3").unwrap();
        assert_eq!(c, Color::rgba(0x21, 0x96, 0xF3, 255));

        let c = Color::from_hex("#00000080").unwrap();
        assert_eq!(c, Color::rgba(0, 0, 0, 0x80));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Color::from_hex("2196F3").is_err());
        assert!(Color::from_hex("#21").is_err());
        assert!(Color::from_hex("#GG96F3").is_err());
    }

    #[test]
    fn translate_then_rotate_applies_rotation_first() {
        let m = Affine::translation(100.0, 50.0).then(Affine::rotation(FRAC_PI_2));
        let p = m.apply(Vec2::new(10.0, 0.0));
        assert!(close(p, Vec2::new(100.0, 60.0)), "got {:?}", p);
    }

    #[test]
    fn rotation_keeps_unit_scale() {
        let m = Affine::rotation(1.234).then(Affine::rotation(-0.5));
        assert!((m.scale_factor() - 1.0).abs() < 1e-5);
    }
}
