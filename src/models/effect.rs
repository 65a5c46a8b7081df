use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};

/// Background effect selection, persisted under the `bg-theme` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    None,
    Matrix,
    Aurora,
    Stars,
    Bubbles,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::None,
        EffectKind::Matrix,
        EffectKind::Aurora,
        EffectKind::Stars,
        EffectKind::Bubbles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::None => "none",
            EffectKind::Matrix => "matrix",
            EffectKind::Aurora => "aurora",
            EffectKind::Stars => "stars",
            EffectKind::Bubbles => "bubbles",
        }
    }

    /// Next effect in selector order (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown effect '{}' (expected none|matrix|aurora|stars|bubbles)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_effect_names() {
        assert_eq!("matrix".parse::<EffectKind>().unwrap(), EffectKind::Matrix);
        assert_eq!(" Stars ".parse::<EffectKind>().unwrap(), EffectKind::Stars);
        assert_eq!("none".parse::<EffectKind>().unwrap(), EffectKind::None);
        assert!("confetti".parse::<EffectKind>().is_err());
    }

    #[test]
    fn test_next_wraps_around() {
        assert_eq!(EffectKind::None.next(), EffectKind::Matrix);
        assert_eq!(EffectKind::Bubbles.next(), EffectKind::None);
    }

    #[test]
    fn test_display_matches_storage_value() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.to_string().parse::<EffectKind>().unwrap(), kind);
        }
    }
}
