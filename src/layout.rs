use crate::config::Origin;
use crate::mask::{Mask, DIGEST_HEX_LEN};
use crate::template::TemplateSet;
use crate::HashquineError;

/// Where each digit of the digest is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    origin: Origin,
    mask: Mask,
    glyph_width: u16,
    glyph_height: u16,
}

impl Layout {
    /// Check that every blank position's glyph lies inside the background's
    /// logical screen.
    pub fn new(
        origin: Origin,
        mask: Mask,
        templates: &TemplateSet,
    ) -> Result<Self, HashquineError> {
        let (screen_width, screen_height) = templates.background.screen_size();
        let glyph_width = templates.glyphs.width();
        let glyph_height = templates.glyphs.height();
        if mask.blank_positions().next().is_some()
            && origin.top as u32 + glyph_height as u32 > screen_height as u32
        {
            return Err(HashquineError::Config(format!(
                "digits at top {} with height {} do not fit a screen {} pixels high",
                origin.top, glyph_height, screen_height
            )));
        }
        for position in mask.blank_positions() {
            let right = origin.left as u32 + (position as u32 + 2) * glyph_width as u32;
            if right > screen_width as u32 {
                return Err(HashquineError::Config(format!(
                    "digit {position} ends at x={right}, beyond the {screen_width} pixel wide screen"
                )));
            }
        }
        Ok(Self {
            origin,
            mask,
            glyph_width,
            glyph_height,
        })
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn top(&self) -> u16 {
        self.origin.top
    }

    /// Left edge of the glyph drawn for `position`.
    pub fn glyph_left(&self, position: usize) -> u16 {
        debug_assert!(position < DIGEST_HEX_LEN);
        let left = self.origin.left as u32 + (position as u32 + 1) * self.glyph_width as u32;
        u16::try_from(left).unwrap_or(u16::MAX)
    }

    pub fn glyph_size(&self) -> (u16, u16) {
        (self.glyph_width, self.glyph_height)
    }
}
