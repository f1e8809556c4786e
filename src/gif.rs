//! GIF container pieces used while assembling the output, plus a structural
//! walker that reports which image records a decoder would actually render.

use crate::HashquineError;

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const COMMENT_LABEL: u8 = 0xfe;
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xf9;
pub const IMAGE_SEPARATOR: u8 = 0x2c;
pub const TRAILER: u8 = 0x3b;
pub const SUB_BLOCK_TERMINATOR: u8 = 0x00;

/// Opening bytes of a comment extension; sub-blocks follow.
pub const COMMENT_HEADER: [u8; 2] = [EXTENSION_INTRODUCER, COMMENT_LABEL];

/// Graphic control extension placed before every image: disposal method 1
/// (leave in place) and a 20ms delay so viewers draw the frames in order.
pub const GRAPHIC_CONTROL_EXTENSION: [u8; 8] = [
    EXTENSION_INTRODUCER,
    GRAPHIC_CONTROL_LABEL,
    0x04,
    0x04,
    0x02,
    0x00,
    0x00,
    SUB_BLOCK_TERMINATOR,
];

pub const IMAGE_DESCRIPTOR_LEN: usize = 10;

/// Encode `text` as a complete comment extension, splitting it into
/// sub-blocks of at most 255 bytes.
pub fn comment_extension(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + text.len() / 255 + 3);
    out.extend_from_slice(&COMMENT_HEADER);
    for chunk in text.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(SUB_BLOCK_TERMINATOR);
    out
}

/// Image descriptor without a local color table and without interlacing.
pub fn image_descriptor(
    left: u16,
    top: u16,
    width: u16,
    height: u16,
) -> [u8; IMAGE_DESCRIPTOR_LEN] {
    let mut out = [0u8; IMAGE_DESCRIPTOR_LEN];
    out[0] = IMAGE_SEPARATOR;
    out[1..3].copy_from_slice(&left.to_le_bytes());
    out[3..5].copy_from_slice(&top.to_le_bytes());
    out[5..7].copy_from_slice(&width.to_le_bytes());
    out[7..9].copy_from_slice(&height.to_le_bytes());
    out
}

/// Graphic control extension, descriptor and LZW data of one glyph frame.
pub fn image_record(left: u16, top: u16, width: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(GRAPHIC_CONTROL_EXTENSION.len() + IMAGE_DESCRIPTOR_LEN + data.len());
    out.extend_from_slice(&GRAPHIC_CONTROL_EXTENSION);
    out.extend_from_slice(&image_descriptor(left, top, width, height));
    out.extend_from_slice(data);
    out
}

/// An image a decoder renders when reading the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Offset of the image separator byte.
    pub offset: usize,
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    /// LZW minimum code size followed by the sub-blocks and terminator.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GifLayout {
    pub screen_width: u16,
    pub screen_height: u16,
    pub images: Vec<ImageRecord>,
    pub comments: usize,
    pub extensions: usize,
}

impl GifLayout {
    /// Images drawn with their top-left corner at (`left`, `top`).
    pub fn images_at(&self, left: u16, top: u16) -> impl Iterator<Item = &ImageRecord> {
        self.images
            .iter()
            .filter(move |img| img.left == left && img.top == top)
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], HashquineError> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => {
                let out = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(out)
            }
            None => Err(HashquineError::GifStructure(format!(
                "truncated {what} at offset {}",
                self.pos
            ))),
        }
    }

    fn byte(&mut self, what: &str) -> Result<u8, HashquineError> {
        Ok(self.take(1, what)?[0])
    }

    /// Consume sub-blocks up to and including the terminator.
    fn sub_blocks(&mut self, what: &str) -> Result<&'a [u8], HashquineError> {
        let start = self.pos;
        loop {
            let len = self.byte(what)? as usize;
            if len == 0 {
                return Ok(&self.bytes[start..self.pos]);
            }
            self.take(len, what)?;
        }
    }
}

fn color_table_len(packed: u8) -> usize {
    if packed & 0x80 == 0 {
        0
    } else {
        3 << ((packed & 0x07) + 1)
    }
}

fn le16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Walk a GIF stream the way a decoder would and collect what it renders.
pub fn walk(bytes: &[u8]) -> Result<GifLayout, HashquineError> {
    let mut cur = Cursor { bytes, pos: 0 };
    let header = cur.take(6, "header")?;
    if header != b"GIF87a" && header != b"GIF89a" {
        return Err(HashquineError::GifStructure("missing GIF signature".into()));
    }
    let screen = cur.take(7, "logical screen descriptor")?;
    let mut layout = GifLayout {
        screen_width: le16(&screen[0..2]),
        screen_height: le16(&screen[2..4]),
        ..GifLayout::default()
    };
    cur.take(color_table_len(screen[4]), "global color table")?;

    loop {
        let offset = cur.pos;
        match cur.byte("block introducer")? {
            EXTENSION_INTRODUCER => {
                let label = cur.byte("extension label")?;
                cur.sub_blocks("extension data")?;
                layout.extensions += 1;
                if label == COMMENT_LABEL {
                    layout.comments += 1;
                }
            }
            IMAGE_SEPARATOR => {
                let desc = cur.take(IMAGE_DESCRIPTOR_LEN - 1, "image descriptor")?;
                cur.take(color_table_len(desc[8]), "local color table")?;
                let data_start = cur.pos;
                cur.byte("LZW minimum code size")?;
                cur.sub_blocks("image data")?;
                layout.images.push(ImageRecord {
                    offset,
                    left: le16(&desc[0..2]),
                    top: le16(&desc[2..4]),
                    width: le16(&desc[4..6]),
                    height: le16(&desc[6..8]),
                    data: bytes[data_start..cur.pos].to_vec(),
                });
            }
            TRAILER => {
                if cur.pos != bytes.len() {
                    return Err(HashquineError::GifStructure(format!(
                        "{} bytes after trailer",
                        bytes.len() - cur.pos
                    )));
                }
                return Ok(layout);
            }
            other => {
                return Err(HashquineError::GifStructure(format!(
                    "unexpected block 0x{other:02x} at offset {offset}"
                )))
            }
        }
    }
}
