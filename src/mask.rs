//! Which hex digits of the digest are drawn dynamically and which are
//! already part of the background image.

use std::fmt;

use crate::HashquineError;

/// Number of hex characters in a rendered MD5 digest.
pub const DIGEST_HEX_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Rendered through collision blocks.
    Blank,
    /// Pre-drawn in the background; the digest must carry this character.
    Fixed(char),
}

/// Mask used when no configuration overrides it.
pub const DEFAULT_MASK: &str = "           d5    dead           ";

fn hex_nibble(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        _ => None,
    }
}

fn slots_from(text: &str) -> [Slot; DIGEST_HEX_LEN] {
    let mut slots = [Slot::Blank; DIGEST_HEX_LEN];
    for (slot, c) in slots.iter_mut().zip(text.chars()) {
        if c != ' ' {
            *slot = Slot::Fixed(c);
        }
    }
    slots
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Mask {
    slots: [Slot; DIGEST_HEX_LEN],
}

impl Mask {
    /// Parse a 32 character mask where a space marks a blank position.
    ///
    /// Fixed characters are not restricted to hex digits. A character that
    /// is not a lowercase hex digit can never be matched by a digest.
    pub fn parse(text: &str) -> Result<Self, HashquineError> {
        if !text.is_ascii() {
            return Err(HashquineError::Config("mask must be ASCII".into()));
        }
        if text.len() != DIGEST_HEX_LEN {
            return Err(HashquineError::Config(format!(
                "mask must have {} characters, got {}",
                DIGEST_HEX_LEN,
                text.len()
            )));
        }
        Ok(Self {
            slots: slots_from(text),
        })
    }

    /// Mask with every position rendered dynamically.
    pub fn all_blank() -> Self {
        Self {
            slots: [Slot::Blank; DIGEST_HEX_LEN],
        }
    }

    pub fn slot(&self, position: usize) -> Slot {
        self.slots[position]
    }

    pub fn slots(&self) -> &[Slot; DIGEST_HEX_LEN] {
        &self.slots
    }

    pub fn is_blank(&self, position: usize) -> bool {
        self.slots[position] == Slot::Blank
    }

    pub fn blank_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..DIGEST_HEX_LEN).filter(move |&p| self.is_blank(p))
    }

    /// Check a raw 16 byte digest against every fixed slot.
    pub fn matches(&self, digest: &[u8]) -> bool {
        if digest.len() * 2 != DIGEST_HEX_LEN {
            return false;
        }
        self.slots.iter().enumerate().all(|(pos, slot)| {
            let nibble = if pos % 2 == 0 {
                digest[pos / 2] >> 4
            } else {
                digest[pos / 2] & 0x0f
            };
            match *slot {
                Slot::Blank => true,
                Slot::Fixed(c) => hex_nibble(c) == Some(nibble),
            }
        })
    }

    /// Same check against lowercase hex text.
    pub fn matches_hex(&self, hex_digest: &str) -> bool {
        hex::decode(hex_digest)
            .map(|bytes| self.matches(&bytes))
            .unwrap_or(false)
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self {
            slots: slots_from(DEFAULT_MASK),
        }
    }
}

impl TryFrom<String> for Mask {
    type Error = HashquineError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            match slot {
                Slot::Blank => f.write_str(" ")?,
                Slot::Fixed(c) => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}
