//! Reads back the digest an image displays.

use crate::gif;
use crate::layout::Layout;
use crate::mask::{Slot, DIGEST_HEX_LEN};
use crate::template::GlyphSet;
use crate::HashquineError;

/// The 32 characters shown by `bytes`.
///
/// Fixed mask positions contribute their mask character. A blank position
/// contributes the digit of the single glyph frame drawn there, a space if
/// nothing is drawn, or `?` if the frames there are not exactly one known
/// glyph.
pub fn displayed_digest(
    bytes: &[u8],
    glyphs: &GlyphSet,
    layout: &Layout,
) -> Result<String, HashquineError> {
    let walked = gif::walk(bytes)?;
    let (width, height) = layout.glyph_size();
    let mut shown = String::with_capacity(DIGEST_HEX_LEN);
    for position in 0..DIGEST_HEX_LEN {
        let c = match layout.mask().slot(position) {
            Slot::Fixed(c) => c,
            Slot::Blank => {
                let mut drawn = walked
                    .images_at(layout.glyph_left(position), layout.top())
                    .filter(|img| img.width == width && img.height == height);
                match (drawn.next(), drawn.next()) {
                    (None, _) => ' ',
                    (Some(img), None) => glyphs
                        .digit_for(&img.data)
                        .and_then(|d| char::from_digit(d as u32, 16))
                        .unwrap_or('?'),
                    (Some(_), Some(_)) => '?',
                }
            }
        };
        shown.push(c);
    }
    Ok(shown)
}
