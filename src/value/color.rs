use crate::foundation::core::format_number;
use crate::foundation::error::{EaserError, EaserResult};

/// Canonical color: `r`, `g`, `b` in `0..=255`, `a` in `0..=1`.
///
/// Channels stay `f64` so interpolated frames keep sub-integer precision until rendering.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Color {
    /// Build a color, clamping channels into range.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 255.0),
            g: g.clamp(0.0, 255.0),
            b: b.clamp(0.0, 255.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Channels as `[r, g, b, a]`.
    pub fn channels(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Inverse of [`Color::channels`].
    pub fn from_channels(c: [f64; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    /// Render as `rgba(r,g,b,a)` with rounded integer color channels.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            format_number(self.a.clamp(0.0, 1.0), 3),
        )
    }
}

/// Try every supported color grammar against `s`.
///
/// Returns `None` when `s` is not shaped like a color at all (so the caller can fall back to
/// length parsing) and `Some(Err(_))` when it is shaped like one but malformed.
pub(crate) fn parse_color(s: &str) -> Option<EaserResult<Color>> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return Some(parse_hex(hex));
    }

    let lower = s.to_ascii_lowercase();
    let open = lower.find('(')?;
    let name = lower[..open].trim();
    if !matches!(name, "rgb" | "rgba" | "hsl" | "hsla") {
        return None;
    }
    let Some(body) = lower[open + 1..].strip_suffix(')') else {
        return Some(Err(EaserError::parse(format!(
            "unterminated color function \"{s}\""
        ))));
    };
    let args: Vec<&str> = body.split(',').map(str::trim).collect();
    Some(match name {
        "rgb" | "rgba" => parse_rgb_args(name, &args),
        _ => parse_hsl_args(name, &args),
    })
}

fn parse_hex(hex: &str) -> EaserResult<Color> {
    fn nibble(c: u8) -> EaserResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| EaserError::parse(format!("invalid hex digit '{}'", c as char)))
    }

    let bytes = hex.as_bytes();
    let mut out = [0u8; 4];
    out[3] = 255;
    match bytes.len() {
        3 => {
            for (i, &c) in bytes.iter().enumerate() {
                out[i] = nibble(c)? * 17;
            }
        }
        6 | 8 => {
            for (i, pair) in bytes.chunks(2).enumerate() {
                out[i] = nibble(pair[0])? * 16 + nibble(pair[1])?;
            }
        }
        _ => {
            return Err(EaserError::parse(format!(
                "hex color must be #RGB, #RRGGBB or #RRGGBBAA, got \"#{hex}\""
            )));
        }
    }

    Ok(Color::rgba(
        f64::from(out[0]),
        f64::from(out[1]),
        f64::from(out[2]),
        f64::from(out[3]) / 255.0,
    ))
}

fn number_arg(arg: &str) -> EaserResult<f64> {
    arg.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EaserError::parse(format!("invalid color component \"{arg}\"")))
}

fn percent_arg(arg: &str) -> EaserResult<f64> {
    let v = number_arg(arg.strip_suffix('%').unwrap_or(arg).trim())?;
    Ok(v / 100.0)
}

fn check_arity(name: &str, args: &[&str]) -> EaserResult<()> {
    let expected = if name.ends_with('a') { 4 } else { 3 };
    if args.len() != expected {
        return Err(EaserError::parse(format!(
            "{name}() takes {expected} components, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn parse_rgb_args(name: &str, args: &[&str]) -> EaserResult<Color> {
    check_arity(name, args)?;
    let r = number_arg(args[0])?;
    let g = number_arg(args[1])?;
    let b = number_arg(args[2])?;
    let a = match args.get(3) {
        Some(a) => number_arg(a)?,
        None => 1.0,
    };
    Ok(Color::rgba(r, g, b, a))
}

fn parse_hsl_args(name: &str, args: &[&str]) -> EaserResult<Color> {
    check_arity(name, args)?;
    let h = number_arg(args[0].strip_suffix("deg").unwrap_or(args[0]))?;
    let s = percent_arg(args[1])?;
    let l = percent_arg(args[2])?;
    let a = match args.get(3) {
        Some(a) => number_arg(a)?,
        None => 1.0,
    };
    Ok(hsla_to_rgba(h, s, l, a))
}

/// Standard HSL -> RGB conversion; `s` and `l` normalized to `0..=1`.
fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Color {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Color::rgba(l * 255.0, l * 255.0, l * 255.0, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Color::rgba(
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
        a,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/value/color.rs"]
mod tests;
