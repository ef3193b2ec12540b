//! Stroke/fill color for the particle field.
//!
//! Colors arrive as CSS color strings: hex (`"#fff"`, `"#c0ffee80"`),
//! functional `rgb()`/`rgba()`, or a named color. They are stored as sRGB
//! components in [0, 1] with a straight (non-premultiplied) alpha. Blending
//! happens in sRGB space, the way a browser 2D context composites.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components and alpha in [0, 1].
///
/// Serializes as a hex string: `"#rrggbb"` when opaque, `"#rrggbbaa"`
/// otherwise. The hex form has 8-bit quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb::opaque(1.0, 1.0, 1.0);

    pub const BLACK: Srgb = Srgb::opaque(0.0, 0.0, 0.0);

    pub const TRANSPARENT: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Srgb { r, g, b, a: 1.0 }
    }

    /// Parses any supported CSS color: hex, `rgb()`/`rgba()`, `transparent`,
    /// or one of the CSS named colors (case insensitive).
    pub fn parse(css: &str) -> Result<Srgb, FieldError> {
        let css = css.trim();
        if css.starts_with('#') {
            return Srgb::from_hex(css);
        }
        let lower = css.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| invalid(format!("unterminated color function {css:?}")))?;
            return parse_rgb_args(args);
        }
        if lower == "transparent" {
            return Ok(Srgb::TRANSPARENT);
        }
        if let Some(&(_, [r, g, b])) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Ok(Srgb::from_rgb8(r, g, b));
        }
        Srgb::from_hex(css).map_err(|_| invalid(format!("unrecognized color {css:?}")))
    }

    /// Parses a hex color: `"#rgb"`, `"#rgba"`, `"#rrggbb"` or `"#rrggbbaa"`,
    /// with or without the `#` (case insensitive). Short forms double each
    /// digit, as CSS does.
    ///
    /// Returns `FieldError::InvalidColor` for any other input.
    pub fn from_hex(hex: &str) -> Result<Srgb, FieldError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(invalid(format!("non-ascii color {hex:?}")));
        }
        let expanded = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 | 8 => hex.to_string(),
            n => return Err(invalid(format!("expected 3, 4, 6 or 8 hex digits, got {n}"))),
        };
        let component = |at: usize, name: &str| {
            u8::from_str_radix(&expanded[at..at + 2], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| invalid(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: component(0, "red")?,
            g: component(2, "green")?,
            b: component(4, "blue")?,
            a: if expanded.len() == 8 {
                component(6, "alpha")?
            } else {
                1.0
            },
        })
    }

    fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Srgb::opaque(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Hex string: `"#rrggbb"` when opaque, `"#rrggbbaa"` otherwise.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if self.is_opaque() {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// CSS string for a 2D context style: hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.is_opaque() {
            return self.to_hex();
        }
        let [r, g, b] = self.to_rgb8();
        let alpha = (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        format!("rgba({r}, {g}, {b}, {alpha})")
    }

    /// Quantizes the color channels to 8 bits with rounding, clamping out-of-range values.
    pub fn to_rgb8(self) -> [u8; 3] {
        let [r, g, b, _] = self.to_rgba8();
        [r, g, b]
    }

    /// Quantizes all four channels to 8 bits.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

fn invalid(msg: String) -> FieldError {
    FieldError::InvalidColor(msg)
}

/// Arguments of `rgb()`/`rgba()`, comma-separated (`255, 0, 0, 0.5`) or
/// space-separated with a slash before alpha (`255 0 0 / 50%`). Channels are
/// numbers in 0..=255 or percentages; alpha is a number in 0..=1 or a
/// percentage. Out-of-range values clamp.
fn parse_rgb_args(args: &str) -> Result<Srgb, FieldError> {
    let parts: Vec<&str> = if args.contains(',') {
        args.split(',').map(str::trim).collect()
    } else {
        args.split(|c: char| c.is_whitespace() || c == '/')
            .filter(|p| !p.is_empty())
            .collect()
    };
    if parts.len() != 3 && parts.len() != 4 {
        return Err(invalid(format!(
            "expected 3 or 4 color arguments, got {}",
            parts.len()
        )));
    }
    let number = |raw: &str| -> Result<(f64, bool), FieldError> {
        let (digits, percent) = match raw.strip_suffix('%') {
            Some(d) => (d, true),
            None => (raw, false),
        };
        let v = digits
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("invalid color argument {raw:?}")))?;
        if v.is_nan() {
            return Err(invalid(format!("invalid color argument {raw:?}")));
        }
        Ok((v, percent))
    };
    let channel = |raw: &str| {
        number(raw).map(|(v, percent)| {
            let unit = if percent { v / 100.0 } else { v / 255.0 };
            unit.clamp(0.0, 1.0)
        })
    };
    let alpha = match parts.get(3) {
        Some(raw) => {
            let (v, percent) = number(raw)?;
            (if percent { v / 100.0 } else { v }).clamp(0.0, 1.0)
        }
        None => 1.0,
    };
    Ok(Srgb {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

impl Default for Srgb {
    fn default() -> Self {
        Srgb::WHITE
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// CSS named colors.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];
