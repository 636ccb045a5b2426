#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language revision; gates a handful of conversion rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LangVersion {
    V2016,
    V2018,
    #[default]
    V2021,
}

impl LangVersion {
    pub fn year(self) -> u32 {
        match self {
            LangVersion::V2016 => 2016,
            LangVersion::V2018 => 2018,
            LangVersion::V2021 => 2021,
        }
    }
}

impl TryFrom<u32> for LangVersion {
    type Error = String;

    fn try_from(year: u32) -> Result<Self, Self::Error> {
        match year {
            2016 => Ok(LangVersion::V2016),
            2018 => Ok(LangVersion::V2018),
            2021 => Ok(LangVersion::V2021),
            other => Err(format!(
                "unsupported language version {other} (expected 2016, 2018, or 2021)"
            )),
        }
    }
}

impl From<LangVersion> for u32 {
    fn from(v: LangVersion) -> Self {
        v.year()
    }
}

impl FromStr for LangVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid language version `{s}`"))?;
        LangVersion::try_from(year)
    }
}

impl fmt::Display for LangVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year())
    }
}

/// Per-session switches that change how types classify and convert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    pub lang_version: LangVersion,
    /// Treat `min16float` and friends as distinct minimum-precision kinds.
    pub min_precision: bool,
    /// `half` means a real 16-bit float. Implies `min_precision = false`.
    pub enable_16bit_types: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            lang_version: LangVersion::V2021,
            min_precision: true,
            enable_16bit_types: false,
        }
    }
}

impl SessionOptions {
    pub fn uses_min_precision(&self) -> bool {
        self.min_precision && !self.enable_16bit_types
    }
}
