/// Math utility functions.
///
/// Scalar clamping, interpolation, and color conversion helpers shared by
/// the shading and compositing passes. The scalar helpers follow shader
/// semantics rather than `f64::clamp`: `clamp` never panics on inverted
/// bounds and lets NaN pass straight through, while `saturate` flushes NaN
/// to zero like the D3D intrinsic.

use crate::engine::types::Rgb;
use crate::error::{GlowError, Result};

/// Clamp a value to [min, max] range.
#[inline(always)]
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v < min { min } else if v > max { max } else { v }
}

/// Clamp to [0, 1]. NaN maps to 0.
#[inline(always)]
pub fn saturate(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { clamp(v, 0.0, 1.0) }
}

/// Clamp every channel to [0, 1].
#[inline(always)]
pub fn saturate_rgb(c: &Rgb) -> Rgb {
    c.map(saturate)
}

/// Smooth step (cubic Hermite interpolation).
///
/// Coincident edges degenerate to a hard step at `edge0` instead of
/// dividing by zero.
#[inline(always)]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 == edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pack a float to a byte [0, 255].
#[inline(always)]
pub fn float_to_byte(v: f64) -> u8 {
    let vi = (v * 255.0) as i32;
    if vi < 0 { 0 } else if vi > 255 { 255 } else { vi as u8 }
}

/// Unpack a byte [0, 255] to a float [0, 1].
#[inline(always)]
pub fn byte_to_float(v: u8) -> f64 {
    v as f64 / 255.0
}

/// Parse a CSS hex color, `#RRGGBB` or `#RGB`, to channels in [0, 1].
pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || GlowError::InvalidColor(hex.to_string());

    // from_str_radix alone would accept a sign
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    let (r, g, b) = match digits.len() {
        6 => (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ),
        3 => {
            // #abc expands to #aabbcc
            let r = channel(&digits[0..1])?;
            let g = channel(&digits[1..2])?;
            let b = channel(&digits[2..3])?;
            (r * 17, g * 17, b * 17)
        }
        _ => return Err(invalid()),
    };

    Ok(Rgb::new(byte_to_float(r), byte_to_float(g), byte_to_float(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_clamp_inverted_bounds_does_not_panic() {
        // Negative opacity is accepted upstream; the lower bound wins for small inputs
        assert_eq!(clamp(-1.0, 0.0, -0.5), 0.0);
        assert_eq!(clamp(0.3, 0.0, -0.5), -0.5);
    }

    #[test]
    fn test_clamp_passes_nan() {
        assert!(clamp(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_saturate_flushes_nan() {
        assert_eq!(saturate(f64::NAN), 0.0);
        assert_eq!(saturate_rgb(&Rgb::new(f64::NAN, 2.0, -1.0)), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_saturate_idempotent() {
        for &x in &[-3.0, -0.0, 0.0, 0.25, 1.0, 1.0001, 42.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(saturate(saturate(x)), saturate(x), "x = {x}");
        }
    }

    #[test]
    fn test_smoothstep_shape() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
        assert!((smoothstep(0.0, 0.1, 0.05) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_smoothstep_degenerate_edges() {
        assert_eq!(smoothstep(0.0, 0.0, -1e-9), 0.0);
        assert_eq!(smoothstep(0.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.0, 0.0, 1e-9), 1.0);
    }

    #[test]
    fn test_float_to_byte() {
        assert_eq!(float_to_byte(-1.0), 0);
        assert_eq!(float_to_byte(1.0), 255);
        assert_eq!(float_to_byte(2.0), 255);
        assert_eq!(float_to_byte(f64::NAN), 0);
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#8039ea").unwrap();
        assert!((c.r - 128.0 / 255.0).abs() < 1e-12);
        assert!((c.g - 57.0 / 255.0).abs() < 1e-12);
        assert!((c.b - 234.0 / 255.0).abs() < 1e-12);

        let short = parse_hex_color("#fff").unwrap();
        assert_eq!(short, Rgb::WHITE);
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
        assert!(parse_hex_color("").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn test_parse_hex_color_needs_plain_digits() {
        assert!(parse_hex_color("#+f+f+f").is_err());
        assert!(parse_hex_color("##fff").is_err());
        assert!(parse_hex_color("#-1-1-1").is_err());
        assert_eq!(parse_hex_color("fff").unwrap(), Rgb::WHITE);
    }
}
