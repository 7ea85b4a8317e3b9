/// Named color variants a card can be rendered in.
///
/// Unrecognized query values fall back to `Light`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Platform-brand green.
    Brand,
    /// Diagonal gradient background, defined inline.
    Gradient,
}

/// Resolved colors for one theme. `background` may reference an inline
/// paint definition instead of a literal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub subtext: &'static str,
    pub line: &'static str,
    pub accent: &'static str,
}

impl Theme {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "dark" => Self::Dark,
            "brand" => Self::Brand,
            "gradient" => Self::Gradient,
            _ => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Brand => "brand",
            Self::Gradient => "gradient",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: "#ffffff",
                text: "#4b4b4b",
                subtext: "#777777",
                line: "#e5e5e5",
                accent: "#1cb0f6",
            },
            Self::Dark => Palette {
                background: "#131f24",
                text: "#ffffff",
                subtext: "#dce6ec",
                line: "#37464f",
                accent: "#1cb0f6",
            },
            Self::Brand => Palette {
                background: "#58cc02",
                text: "#ffffff",
                subtext: "#e5f8d4",
                line: "#89e219",
                accent: "#ffc800",
            },
            Self::Gradient => Palette {
                background: "url(#card-bg)",
                text: "#ffffff",
                subtext: "#f0f4f8",
                line: "#ffffff",
                accent: "#ffc800",
            },
        }
    }
}
