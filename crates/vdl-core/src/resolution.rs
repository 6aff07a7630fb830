//! Resolution selector accepted on the command line and in config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "highest")]
    Highest,
    #[serde(rename = "lowest")]
    Lowest,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl Resolution {
    pub const ALL: [Resolution; 6] = [
        Resolution::Highest,
        Resolution::Lowest,
        Resolution::P1080,
        Resolution::P720,
        Resolution::P480,
        Resolution::P360,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Highest => "highest",
            Resolution::Lowest => "lowest",
            Resolution::P1080 => "1080p",
            Resolution::P720 => "720p",
            Resolution::P480 => "480p",
            Resolution::P360 => "360p",
        }
    }

    /// Pixel height for concrete resolutions; `None` for `highest`/`lowest`.
    pub fn height(self) -> Option<u32> {
        match self {
            Resolution::Highest | Resolution::Lowest => None,
            Resolution::P1080 => Some(1080),
            Resolution::P720 => Some(720),
            Resolution::P480 => Some(480),
            Resolution::P360 => Some(360),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resolution {0:?} (expected one of highest, lowest, 1080p, 720p, 480p, 360p)")]
pub struct UnknownResolution(pub String);

impl FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownResolution(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_values() {
        assert_eq!("highest".parse::<Resolution>().unwrap(), Resolution::Highest);
        assert_eq!("lowest".parse::<Resolution>().unwrap(), Resolution::Lowest);
        assert_eq!("1080p".parse::<Resolution>().unwrap(), Resolution::P1080);
        assert_eq!("720P".parse::<Resolution>().unwrap(), Resolution::P720);
        assert_eq!(" 360p ".parse::<Resolution>().unwrap(), Resolution::P360);
    }

    #[test]
    fn parse_unknown_value() {
        let err = "144p".parse::<Resolution>().unwrap_err();
        assert_eq!(err, UnknownResolution("144p".to_string()));
    }

    #[test]
    fn display_matches_as_str() {
        for r in Resolution::ALL {
            assert_eq!(r.to_string(), r.as_str());
        }
    }

    #[test]
    fn heights() {
        assert_eq!(Resolution::Highest.height(), None);
        assert_eq!(Resolution::Lowest.height(), None);
        assert_eq!(Resolution::P1080.height(), Some(1080));
        assert_eq!(Resolution::P480.height(), Some(480));
    }
}
