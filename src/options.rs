//! Processing options supplied by the caller
//!
//! Options are plain immutable values handed to each component at call
//! time; nothing reads them from shared state.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target resolution for the hitcircle and the forced overlay pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    /// Keep whatever size the opened sprite already has
    #[default]
    Native,
    /// Force a square of this many pixels
    Fixed(NonZeroU32),
}

impl Resolution {
    /// Explicit size, or `None` for [`Resolution::Native`]
    pub fn size(self) -> Option<u32> {
        match self {
            Resolution::Native => None,
            Resolution::Fixed(n) => Some(n.get()),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("native") {
            return Ok(Resolution::Native);
        }
        s.parse::<NonZeroU32>()
            .map(Resolution::Fixed)
            .map_err(|_| format!("invalid resolution '{}': expected 'native' or a positive integer", s))
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Native => write!(f, "native"),
            Resolution::Fixed(n) => write!(f, "{}", n),
        }
    }
}

/// Options for one processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessOptions {
    /// Work on a fresh copy of the skin directory instead of in place
    pub create_copy: bool,
    pub resolution: Resolution,
    /// Rewrite the overlay file itself at the forced resolution
    pub force_overlay: bool,
}
