//! Reader for the background and glyph images.
//!
//! Template images must be single-frame GIFs with a 16-colour global
//! palette, no extensions, no local colour table, and nothing after the
//! trailer. The blocks are kept raw so they can be copied verbatim into the
//! generated file.

use std::fs;
use std::path::Path;

use crate::gif::{IMAGE_DESCRIPTOR_LEN, IMAGE_SEPARATOR, TRAILER};
use crate::HashquineError;

/// Number of palette entries every template must declare.
pub const PALETTE_ENTRIES: usize = 16;
pub const PALETTE_LEN: usize = PALETTE_ENTRIES * 3;

pub const BACKGROUND_FILE: &str = "bg.gif";

/// File holding the glyph for `digit` (0..16).
pub fn glyph_file(digit: u8) -> String {
    format!("char_{digit:x}.gif")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifBlocks {
    pub header: [u8; 6],
    /// Logical screen descriptor.
    pub screen: [u8; 7],
    /// Global colour table.
    pub palette: [u8; PALETTE_LEN],
    pub descriptor: [u8; IMAGE_DESCRIPTOR_LEN],
    /// LZW minimum code size, data sub-blocks and the zero terminator.
    pub data: Vec<u8>,
}

fn format_error(file: &str, reason: impl Into<String>) -> HashquineError {
    HashquineError::TemplateFormat {
        file: file.to_string(),
        reason: reason.into(),
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    file: &'a str,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], HashquineError> {
        let slice = self
            .bytes
            .get(self.pos..self.pos + n)
            .ok_or_else(|| format_error(self.file, format!("truncated {what}")))?;
        self.pos += n;
        Ok(slice)
    }
}

impl GifBlocks {
    pub fn parse(bytes: &[u8], file: &str) -> Result<Self, HashquineError> {
        let mut reader = Reader {
            bytes,
            pos: 0,
            file,
        };
        let mut header = [0u8; 6];
        header.copy_from_slice(reader.take(6, "header")?);
        if &header != b"GIF87a" && &header != b"GIF89a" {
            return Err(format_error(file, "not a GIF87a/GIF89a file"));
        }

        let mut screen = [0u8; 7];
        screen.copy_from_slice(reader.take(7, "logical screen descriptor")?);
        let packed = screen[4];
        if packed & 0x80 == 0 || packed & 0x07 != 3 {
            return Err(format_error(
                file,
                format!("global colour table must have {PALETTE_ENTRIES} entries"),
            ));
        }

        let mut palette = [0u8; PALETTE_LEN];
        palette.copy_from_slice(reader.take(PALETTE_LEN, "global colour table")?);

        let mut descriptor = [0u8; IMAGE_DESCRIPTOR_LEN];
        descriptor.copy_from_slice(reader.take(IMAGE_DESCRIPTOR_LEN, "image descriptor")?);
        if descriptor[0] != IMAGE_SEPARATOR {
            return Err(format_error(file, "expected a single image descriptor"));
        }
        if descriptor[9] != 0 {
            return Err(format_error(
                file,
                "local colour tables and interlacing are not supported",
            ));
        }

        let mut data = reader.take(1, "LZW minimum code size")?.to_vec();
        loop {
            let len = reader.take(1, "image data")?[0];
            data.push(len);
            if len == 0 {
                break;
            }
            data.extend_from_slice(reader.take(len as usize, "image data")?);
        }

        if reader.take(1, "trailer")?[0] != TRAILER {
            return Err(format_error(file, "expected trailer after the image"));
        }
        if reader.pos != bytes.len() {
            return Err(format_error(file, "unexpected data after trailer"));
        }

        Ok(Self {
            header,
            screen,
            palette,
            descriptor,
            data,
        })
    }

    pub fn read(path: &Path) -> Result<Self, HashquineError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = fs::read(path)?;
        Self::parse(&bytes, &name)
    }

    pub fn screen_size(&self) -> (u16, u16) {
        (
            u16::from_le_bytes([self.screen[0], self.screen[1]]),
            u16::from_le_bytes([self.screen[2], self.screen[3]]),
        )
    }

    /// Width and height from the image descriptor.
    pub fn image_size(&self) -> (u16, u16) {
        (
            u16::from_le_bytes([self.descriptor[5], self.descriptor[6]]),
            u16::from_le_bytes([self.descriptor[7], self.descriptor[8]]),
        )
    }
}

/// Image data for the sixteen hex digits, all of one size.
#[derive(Debug, Clone)]
pub struct GlyphSet {
    data: Vec<Vec<u8>>,
    width: u16,
    height: u16,
}

impl GlyphSet {
    /// Build a glyph set from the parsed image of each digit, in order.
    pub fn new(glyphs: Vec<GifBlocks>) -> Result<Self, HashquineError> {
        if glyphs.len() != 16 {
            return Err(HashquineError::Config(format!(
                "expected 16 glyphs, got {}",
                glyphs.len()
            )));
        }
        let (width, height) = glyphs[0].image_size();
        let mut data = Vec::with_capacity(16);
        for (digit, glyph) in glyphs.into_iter().enumerate() {
            if glyph.image_size() != (width, height) {
                return Err(format_error(
                    &glyph_file(digit as u8),
                    format!(
                        "glyph is {:?}, expected {:?} like {}",
                        glyph.image_size(),
                        (width, height),
                        glyph_file(0)
                    ),
                ));
            }
            data.push(glyph.data);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn data(&self, digit: u8) -> &[u8] {
        &self.data[digit as usize]
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Digit whose image data is exactly `data`.
    pub fn digit_for(&self, data: &[u8]) -> Option<u8> {
        self.data
            .iter()
            .position(|glyph| glyph.as_slice() == data)
            .map(|d| d as u8)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub background: GifBlocks,
    pub glyphs: GlyphSet,
}

impl TemplateSet {
    /// Load `bg.gif` and `char_0.gif` .. `char_f.gif` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, HashquineError> {
        let background = GifBlocks::read(&dir.join(BACKGROUND_FILE))?;
        let glyphs = (0..16u8)
            .map(|digit| GifBlocks::read(&dir.join(glyph_file(digit))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            background,
            glyphs: GlyphSet::new(glyphs)?,
        })
    }
}
