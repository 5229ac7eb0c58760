use std::fmt;

/// Theme variant the editor renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    /// Dark variant with cool gray surfaces.
    CoolGray,
    /// Dark variant with purple surfaces; also what `Default` means.
    Purple,
}

impl Theme {
    /// Map a `ThemeKey` setting to a variant. Unknown keys fall back to [`Theme::Dark`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "Light" => Self::Light,
            "CoolGray" => Self::CoolGray,
            "Default" | "Purple" => Self::Purple,
            _ => Self::Dark,
        }
    }

    /// Whether the variant inherits from the dark base theme.
    pub fn is_dark(self) -> bool {
        !matches!(self, Self::Light)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::CoolGray => "CoolGray",
            Self::Purple => "Purple",
        };
        f.write_str(name)
    }
}

/// An sRGB accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AccentColor {
    /// Parse `#rrggbb`, ignoring anything after the seventh character.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?.get(..6)?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
