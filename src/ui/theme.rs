use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

pub fn detect_color_capability() -> ColorCapability {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorCapability::Basic16;
    }
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }
    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

/// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)` and `#rrggbb` / `#rgb`. The
/// alpha channel blends toward `backdrop`.
#[must_use]
pub fn parse_css_color(value: &str, backdrop: (u8, u8, u8)) -> Option<(u8, u8, u8)> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let args = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts = args
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    let (rgb, alpha) = match parts.as_slice() {
        [r, g, b] => ([*r, *g, *b], 1.0),
        [r, g, b, a] => ([*r, *g, *b], a.clamp(0.0, 1.0)),
        _ => return None,
    };
    let blend = |channel: f64, under: u8| -> u8 {
        let mixed = channel.clamp(0.0, 255.0) * alpha + f64::from(under) * (1.0 - alpha);
        mixed.round().clamp(0.0, 255.0) as u8
    };
    Some((
        blend(rgb[0], backdrop.0),
        blend(rgb[1], backdrop.1),
        blend(rgb[2], backdrop.2),
    ))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let short = |idx: usize| channel(&hex[idx..=idx]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

const BASIC16: [(Color, (u8, u8, u8)); 16] = [
    (Color::Black, (0, 0, 0)),
    (Color::Red, (170, 0, 0)),
    (Color::Green, (0, 170, 0)),
    (Color::Yellow, (170, 85, 0)),
    (Color::Blue, (0, 0, 170)),
    (Color::Magenta, (170, 0, 170)),
    (Color::Cyan, (0, 170, 170)),
    (Color::Gray, (170, 170, 170)),
    (Color::DarkGray, (85, 85, 85)),
    (Color::LightRed, (255, 85, 85)),
    (Color::LightGreen, (85, 255, 85)),
    (Color::LightYellow, (255, 255, 85)),
    (Color::LightBlue, (85, 85, 255)),
    (Color::LightMagenta, (255, 85, 255)),
    (Color::LightCyan, (85, 255, 255)),
    (Color::White, (255, 255, 255)),
];

pub fn quantize((r, g, b): (u8, u8, u8), capability: ColorCapability) -> Color {
    match capability {
        ColorCapability::TrueColor => Color::Rgb(r, g, b),
        ColorCapability::Xterm256 => {
            let to_cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * to_cube(r) + 6 * to_cube(g) + to_cube(b))
        }
        ColorCapability::Basic16 => {
            let distance = |(pr, pg, pb): (u8, u8, u8)| {
                let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).pow(2);
                d(r, pr) + d(g, pg) + d(b, pb)
            };
            BASIC16
                .iter()
                .min_by_key(|(_, rgb)| distance(*rgb))
                .map_or(Color::Reset, |(color, _)| *color)
        }
    }
}

/// Card colors resolved for the current terminal.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub capability: ColorCapability,
    pub background: (u8, u8, u8),
}

impl Palette {
    #[must_use]
    pub fn new(background: &str, capability: ColorCapability) -> Self {
        Self {
            capability,
            background: parse_css_color(background, (0, 0, 0)).unwrap_or((28, 28, 28)),
        }
    }

    /// Terminal color for a CSS color string, or `fallback` when it is not
    /// one this parser understands.
    #[must_use]
    pub fn color(&self, value: &str, fallback: Color) -> Color {
        parse_css_color(value, self.background)
            .map_or(fallback, |rgb| quantize(rgb, self.capability))
    }

    #[must_use]
    pub fn background(&self) -> Color {
        quantize(self.background, self.capability)
    }
}
