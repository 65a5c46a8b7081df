use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use ratatui::style::Color;

use super::EffectKind;

/// Colour theme, persisted under the `theme` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Cyberpunk,
    Hacker,
    Pastel,
}

/// What applying a theme does to the background effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEffect {
    Start(EffectKind),
    Stop,
    Keep,
}

/// Colours used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub bot: Color,
    pub error: Color,
    pub status_bg: Color,
}

impl Theme {
    pub const ALL: [Theme; 5] = [Theme::Dark, Theme::Light, Theme::Cyberpunk, Theme::Hacker, Theme::Pastel];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Cyberpunk => "cyberpunk",
            Theme::Hacker => "hacker",
            Theme::Pastel => "pastel",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Pastel brings its own bubbles, hacker leaves the chosen effect alone,
    /// cyberpunk flickers instead, plain themes stop any running effect.
    pub fn effect(self) -> ThemeEffect {
        match self {
            Theme::Pastel => ThemeEffect::Start(EffectKind::Bubbles),
            Theme::Hacker | Theme::Cyberpunk => ThemeEffect::Keep,
            Theme::Dark | Theme::Light => ThemeEffect::Stop,
        }
    }

    pub fn flickers(self) -> bool {
        self == Theme::Cyberpunk
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                text: Color::Rgb(250, 250, 250),
                muted: Color::Rgb(113, 113, 122),
                accent: Color::Rgb(16, 185, 129),
                user: Color::Rgb(96, 165, 250),
                bot: Color::Rgb(228, 228, 231),
                error: Color::Rgb(239, 68, 68),
                status_bg: Color::Rgb(24, 24, 27),
            },
            Theme::Light => Palette {
                text: Color::Rgb(24, 24, 27),
                muted: Color::Rgb(82, 82, 91),
                accent: Color::Rgb(5, 150, 105),
                user: Color::Rgb(37, 99, 235),
                bot: Color::Rgb(39, 39, 42),
                error: Color::Rgb(220, 38, 38),
                status_bg: Color::Rgb(228, 228, 231),
            },
            Theme::Cyberpunk => Palette {
                text: Color::Rgb(253, 224, 71),
                muted: Color::Rgb(168, 85, 247),
                accent: Color::Rgb(236, 72, 153),
                user: Color::Rgb(34, 211, 238),
                bot: Color::Rgb(253, 224, 71),
                error: Color::Rgb(248, 113, 113),
                status_bg: Color::Rgb(30, 10, 50),
            },
            Theme::Hacker => Palette {
                text: Color::Rgb(74, 222, 128),
                muted: Color::Rgb(22, 101, 52),
                accent: Color::Rgb(0, 255, 0),
                user: Color::Rgb(134, 239, 172),
                bot: Color::Rgb(74, 222, 128),
                error: Color::Rgb(239, 68, 68),
                status_bg: Color::Rgb(0, 20, 0),
            },
            Theme::Pastel => Palette {
                text: Color::Rgb(71, 85, 105),
                muted: Color::Rgb(148, 163, 184),
                accent: Color::Rgb(244, 114, 182),
                user: Color::Rgb(129, 140, 248),
                bot: Color::Rgb(71, 85, 105),
                error: Color::Rgb(251, 113, 133),
                status_bg: Color::Rgb(253, 242, 248),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown theme '{}' (expected dark|light|cyberpunk|hacker|pastel)", s))
    }
}
