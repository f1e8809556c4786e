use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::mask::Mask;
use crate::HashquineError;

/// Optional configuration file looked up in the template directory.
pub const CONFIG_FILE: &str = "hashquine.json";

/// Largest trailer search space; the counter is written as a `u32`.
pub const MAX_TRAILER_SEARCH: u64 = 1 << 32;

/// Top-left reference point of the rendered digest. Digit `p` is drawn at
/// `left + (p + 1) * glyph_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Origin {
    pub top: u16,
    pub left: u16,
}

impl Default for Origin {
    fn default() -> Self {
        Self { top: 102, left: 143 }
    }
}

/// Runtime configuration for the generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub origin: Origin,
    /// Digest characters already drawn in the background.
    pub mask: Mask,
    /// Text stored in the leading comment extension.
    pub comment: String,
    /// Path to the `fastcoll` binary.
    pub fastcoll: PathBuf,
    /// Collisions requested per (position, digit) before giving up.
    pub max_collision_attempts: u32,
    /// Number of trailer values tried, counting up from zero.
    pub trailer_search_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            mask: Mask::default(),
            comment: "hashquine\nThis GIF displays its own MD5 digest.\n".to_string(),
            fastcoll: PathBuf::from("fastcoll"),
            max_collision_attempts: 32,
            trailer_search_limit: MAX_TRAILER_SEARCH,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, HashquineError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| HashquineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `hashquine.json` from `template_dir`, falling back to defaults
    /// when the file does not exist. A relative `fastcoll` path containing a
    /// directory component is resolved against the template directory.
    pub fn load(template_dir: &Path) -> Result<Self, HashquineError> {
        let path = template_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        let mut config = Self::from_json(&text)?;
        if config.fastcoll.is_relative() && config.fastcoll.components().count() > 1 {
            config.fastcoll = template_dir.join(&config.fastcoll);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HashquineError> {
        if self.max_collision_attempts == 0 {
            return Err(HashquineError::Config(
                "max_collision_attempts must be at least 1".into(),
            ));
        }
        if self.trailer_search_limit == 0 || self.trailer_search_limit > MAX_TRAILER_SEARCH {
            return Err(HashquineError::Config(format!(
                "trailer_search_limit must be between 1 and {MAX_TRAILER_SEARCH}"
            )));
        }
        Ok(())
    }
}
