use crate::error::ColorParseError;

/// Packed `0xAARRGGBB` color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const TRANSPARENT: Self = Self(0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl From<Argb> for [f32; 4] {
    /// Straight (non-premultiplied) RGBA in `0.0..=1.0`.
    fn from(color: Argb) -> Self {
        [
            color.red() as f32 / 255.0,
            color.green() as f32 / 255.0,
            color.blue() as f32 / 255.0,
            color.alpha() as f32 / 255.0,
        ]
    }
}

/// Parses a color, substituting opaque black on any failure.
pub fn parse_color(input: &str) -> Argb {
    parse_color_or(input, Argb::BLACK)
}

/// Parses a color, substituting `fallback` on any failure.
pub fn parse_color_or(input: &str, fallback: Argb) -> Argb {
    match try_parse_color(input) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("{e}; using {:#010x}", fallback.0);
            fallback
        }
    }
}

/// Parses `#RGB`, `#RRGGBB`, `#AARRGGBB`, `rgb(r,g,b)` and `rgba(r,g,b,a)`.
///
/// The `rgba` alpha is a `0..=1` float scaled to `0..=255` by truncation.
pub fn try_parse_color(input: &str) -> Result<Argb, ColorParseError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(value.to_string()));
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba")
        .or_else(|| lower.strip_prefix("rgb"))
    {
        return parse_rgb_args(value, args);
    }

    Err(ColorParseError::UnsupportedFormat(value.to_string()))
}

fn parse_hex(hex: &str) -> Option<Argb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits = u32::from_str_radix(hex, 16).ok()?;
    match hex.len() {
        3 => {
            // #RGB expands each nibble: 0xF -> 0xFF
            let r = ((digits >> 8) & 0xF) as u8 * 0x11;
            let g = ((digits >> 4) & 0xF) as u8 * 0x11;
            let b = (digits & 0xF) as u8 * 0x11;
            Some(Argb::from_argb(0xFF, r, g, b))
        }
        6 => Some(Argb(0xFF00_0000 | digits)),
        8 => Some(Argb(digits)),
        _ => None,
    }
}

fn parse_rgb_args(input: &str, args: &str) -> Result<Argb, ColorParseError> {
    let inner = args
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| ColorParseError::UnsupportedFormat(input.to_string()))?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return Err(ColorParseError::UnsupportedFormat(input.to_string()));
    }

    let channel_error = |channel: &str| ColorParseError::InvalidChannel {
        input: input.to_string(),
        channel: channel.to_string(),
    };

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse::<u8>().map_err(|_| channel_error(part))?;
    }

    let alpha = match parts.get(3) {
        Some(part) => {
            let a = part.parse::<f32>().map_err(|_| channel_error(part))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(channel_error(part));
            }
            (a * 255.0) as u8
        }
        None => 0xFF,
    };

    Ok(Argb::from_argb(alpha, rgb[0], rgb[1], rgb[2]))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#112233"), Argb(0xFF11_2233));
        assert_eq!(parse_color("#80112233"), Argb(0x8011_2233));
        assert_eq!(parse_color("#f0a"), Argb(0xFFFF_00AA));
        assert_eq!(parse_color("  #FFFFFF "), Argb::WHITE);
    }

    #[test]
    fn test_rgb_forms() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Argb::from_argb(255, 10, 20, 30));

        let half = parse_color("rgba(10,20,30,0.5)");
        assert_eq!((half.red(), half.green(), half.blue()), (10, 20, 30));
        assert!((half.alpha() as i32 - 128).abs() <= 1);

        assert_eq!(parse_color("RGBA(1,2,3,1)"), Argb::from_argb(255, 1, 2, 3));
    }

    #[test]
    fn test_malformed_falls_back() {
        for bad in ["", "#12", "#GGGGGG", "red", "rgb(1,2)", "rgb(300,0,0)", "rgba(1,2,3,2.0)"] {
            assert_eq!(parse_color(bad), Argb::BLACK, "input {bad:?}");
        }
        assert_eq!(parse_color_or("nope", Argb::WHITE), Argb::WHITE);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(try_parse_color(" "), Err(ColorParseError::Empty));
        assert!(matches!(
            try_parse_color("#1234"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            try_parse_color("rgb(a,2,3)"),
            Err(ColorParseError::InvalidChannel { .. })
        ));
        assert!(matches!(
            try_parse_color("hsl(1,2,3)"),
            Err(ColorParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_to_float_rgba() {
        let rgba: [f32; 4] = Argb(0xFF00_FF00).into();
        assert_eq!(rgba, [0.0, 1.0, 0.0, 1.0]);
    }
}
