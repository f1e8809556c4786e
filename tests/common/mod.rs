#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use hashquine::gif::{image_descriptor, TRAILER};
use hashquine::{
    CollisionOracle, Config, GifBlocks, GlyphSet, HashquineError, Mask, Origin, TemplateSet,
    COLLISION_LEN, DIFF_OFFSET,
};
use md5::digest::{consts::U16, FixedOutput, HashMarker, Output, OutputSizeUser, Update};
use md5::{Digest, Md5};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SCREEN_WIDTH: u16 = 480;
pub const SCREEN_HEIGHT: u16 = 240;
pub const GLYPH_WIDTH: u16 = 8;
pub const GLYPH_HEIGHT: u16 = 12;

/// Digest over sixteen lanes, lane `i` being the wrapping sum of every
/// input byte at an index congruent to `i` modulo 16. The output is the MD5
/// of the lanes, so trailer searches behave as with MD5 while collisions
/// stay easy to build: change two bytes 16 apart by opposite amounts.
#[derive(Clone, Default)]
pub struct ByteSum {
    lanes: [u8; 16],
    len: u64,
}

impl HashMarker for ByteSum {}

impl OutputSizeUser for ByteSum {
    type OutputSize = U16;
}

impl Update for ByteSum {
    fn update(&mut self, data: &[u8]) {
        for &b in data {
            let lane = (self.len % 16) as usize;
            self.lanes[lane] = self.lanes[lane].wrapping_add(b);
            self.len += 1;
        }
    }
}

impl FixedOutput for ByteSum {
    fn finalize_into(self, out: &mut Output<Self>) {
        let mut md5 = Md5::new();
        Digest::update(&mut md5, self.lanes);
        Digest::update(&mut md5, self.len.to_le_bytes());
        out.copy_from_slice(&md5.finalize());
    }
}

/// Deterministic collision source for [`ByteSum`]: the same prefix always
/// yields the same pair.
pub fn bytesum_collision(prefix: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let digest = Md5::digest(prefix);
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed));
    let mut visible = vec![0u8; COLLISION_LEN];
    rng.fill(&mut visible[..]);
    visible[DIFF_OFFSET] = rng.gen_range(4..=100);
    let mut hidden = visible.clone();
    hidden[DIFF_OFFSET] += 128;
    hidden[DIFF_OFFSET - 16] = hidden[DIFF_OFFSET - 16].wrapping_sub(128);
    if rng.gen::<bool>() {
        (hidden, visible)
    } else {
        (visible, hidden)
    }
}

/// Broken responses a [`StubOracle`] can be told to return first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Both blocks carry the same byte at the differing offset.
    SameDiffByte,
    /// The blocks do not collide.
    NoCollision,
    /// Blocks one byte too short.
    Short,
    /// Collides, but the visible byte is too small to reach the glyph.
    Infeasible,
    /// Collides, but the two lengths are too close to fit the glyph.
    Cramped,
}

#[derive(Default)]
pub struct StubOracle {
    /// Length of every prefix requested.
    pub prefix_lens: Vec<usize>,
    pub faults: VecDeque<Fault>,
    /// Keep returning this fault once `faults` runs dry.
    pub always: Option<Fault>,
}

impl StubOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: impl IntoIterator<Item = Fault>) -> Self {
        Self {
            faults: faults.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn always(fault: Fault) -> Self {
        Self {
            always: Some(fault),
            ..Self::default()
        }
    }
}

impl CollisionOracle for StubOracle {
    fn request(&mut self, prefix: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HashquineError> {
        self.prefix_lens.push(prefix.len());
        let (mut a, mut b) = bytesum_collision(prefix);
        if a[DIFF_OFFSET] > b[DIFF_OFFSET] {
            std::mem::swap(&mut a, &mut b);
        }
        match self.faults.pop_front().or(self.always) {
            None => {}
            Some(Fault::SameDiffByte) => b[DIFF_OFFSET] = a[DIFF_OFFSET],
            Some(Fault::NoCollision) => b[0] = b[0].wrapping_add(1),
            Some(Fault::Short) => {
                a.pop();
                b.pop();
            }
            Some(Fault::Infeasible) => {
                a[DIFF_OFFSET] = 2;
                b[DIFF_OFFSET] = 130;
            }
            Some(Fault::Cramped) => {
                b[DIFF_OFFSET] = a[DIFF_OFFSET] + 10;
                b[DIFF_OFFSET - 16] = a[DIFF_OFFSET - 16].wrapping_sub(10);
            }
        }
        Ok((a, b))
    }
}

/// Single-image GIF in the template subset.
pub fn template_gif(width: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let mut gif = b"GIF89a".to_vec();
    gif.extend_from_slice(&width.to_le_bytes());
    gif.extend_from_slice(&height.to_le_bytes());
    gif.extend_from_slice(&[0xe3, 0x10, 0x00]);
    for i in 0..16u8 {
        gif.extend_from_slice(&[i * 16, i * 16, i * 16]);
    }
    gif.extend_from_slice(&image_descriptor(0, 0, width, height));
    gif.extend_from_slice(data);
    gif.push(TRAILER);
    gif
}

/// LZW data that differs for every digit.
pub fn glyph_data(digit: u8) -> Vec<u8> {
    vec![2, 3, 0x80 | digit, digit, 0x40, 0]
}

pub fn background_data() -> Vec<u8> {
    vec![2, 4, 0x84, 0x8f, 0xa9, 0x01, 0]
}

/// Write a full template directory.
pub fn write_templates(dir: &Path) {
    fs::write(
        dir.join("bg.gif"),
        template_gif(SCREEN_WIDTH, SCREEN_HEIGHT, &background_data()),
    )
    .unwrap();
    for digit in 0..16u8 {
        fs::write(
            dir.join(format!("char_{digit:x}.gif")),
            template_gif(GLYPH_WIDTH, GLYPH_HEIGHT, &glyph_data(digit)),
        )
        .unwrap();
    }
}

pub fn templates() -> TemplateSet {
    let background = GifBlocks::parse(
        &template_gif(SCREEN_WIDTH, SCREEN_HEIGHT, &background_data()),
        "bg.gif",
    )
    .unwrap();
    let glyphs = (0..16u8)
        .map(|d| {
            let gif = template_gif(GLYPH_WIDTH, GLYPH_HEIGHT, &glyph_data(d));
            GifBlocks::parse(&gif, "g.gif").unwrap()
        })
        .collect();
    TemplateSet {
        background,
        glyphs: GlyphSet::new(glyphs).unwrap(),
    }
}

/// Templates whose glyphs carry `payload` bytes of LZW data in one
/// sub-block, so a glyph frame is `payload + 21` bytes long.
pub fn templates_with(payload: usize, width: u16, height: u16) -> TemplateSet {
    let background = GifBlocks::parse(
        &template_gif(SCREEN_WIDTH, SCREEN_HEIGHT, &background_data()),
        "bg.gif",
    )
    .unwrap();
    let glyphs = (0..16u8)
        .map(|digit| {
            let mut data = vec![2, payload as u8];
            data.extend(std::iter::repeat(digit).take(payload));
            data.push(0);
            GifBlocks::parse(&template_gif(width, height, &data), "g.gif").unwrap()
        })
        .collect();
    TemplateSet {
        background,
        glyphs: GlyphSet::new(glyphs).unwrap(),
    }
}

pub fn config(mask: Mask) -> Config {
    Config {
        origin: Origin { top: 100, left: 40 },
        mask,
        max_collision_attempts: 4,
        ..Config::default()
    }
}

/// Mask with `text` placed at `start`, blank elsewhere.
pub fn mask_with(start: usize, text: &str) -> Mask {
    let mut s = " ".repeat(32);
    s.replace_range(start..start + text.len(), text);
    Mask::parse(&s).unwrap()
}
