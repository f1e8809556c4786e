//! Builds the GIF whose rendered digits spell its own MD5 digest.
//!
//! The stream is written left to right in a single pass. After the
//! background image the decoder is kept inside one comment extension; for
//! every blank mask position and every hex digit a collision is inserted
//! whose hidden variant skips over a glyph frame and whose visible variant
//! ends the comment just before it (see [`crate::bridge`]). A short trailer
//! comment is then brute forced until the digest agrees with the fixed
//! characters of the mask, and finally the visible variant is swapped in
//! for the digit that actually occurs at each blank position. Swapping
//! colliding blocks leaves the digest unchanged.

use std::marker::PhantomData;

use indicatif::ProgressBar;
use md5::{Digest, Md5};

use crate::alternatives::{Alternative, AlternativesTable};
use crate::bridge::{CommentBridge, GlyphSpacing, MAX_RECORD_LEN};
use crate::collision::{CollisionOracle, CollisionPair};
use crate::config::{Config, MAX_TRAILER_SEARCH};
use crate::gif::{
    self, COMMENT_HEADER, GRAPHIC_CONTROL_EXTENSION, IMAGE_DESCRIPTOR_LEN, SUB_BLOCK_TERMINATOR,
    TRAILER,
};
use crate::layout::Layout;
use crate::mask::{Mask, DIGEST_HEX_LEN};
use crate::render::displayed_digest;
use crate::stats::Stats;
use crate::template::TemplateSet;
use crate::HashquineError;

/// Length of the trailing comment sub-block plus GIF trailer.
pub const TRAILER_LEN: usize = 7;

/// Final sub-block carrying the brute-forced counter, the comment
/// terminator and the GIF trailer.
pub fn trailer_bytes(counter: u32) -> [u8; TRAILER_LEN] {
    let c = counter.to_le_bytes();
    [4, c[0], c[1], c[2], c[3], SUB_BLOCK_TERMINATOR, TRAILER]
}

/// Append-only output buffer that keeps the running digest state.
#[derive(Debug, Clone)]
pub struct Stream<D = Md5> {
    bytes: Vec<u8>,
    state: D,
}

impl<D: Digest + Clone> Default for Stream<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + Clone> Stream<D> {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            state: D::new(),
        }
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
        self.state.update(data);
    }

    pub fn push(&mut self, byte: u8) {
        self.extend(&[byte]);
    }

    /// Append `n` bytes that no decoder interprets.
    pub fn fill(&mut self, n: usize) {
        self.extend(&vec![0u8; n]);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Digest state after every byte appended so far.
    pub fn state(&self) -> &D {
        &self.state
    }

    pub fn hex_digest(&self) -> String {
        hex::encode(self.state.clone().finalize())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Find the smallest counter below `limit` whose trailer makes the digest
/// of `state` agree with every fixed character of `mask`.
pub fn search_trailer<D: Digest + Clone>(
    state: &D,
    mask: &Mask,
    limit: u64,
) -> Result<u32, HashquineError> {
    let limit = limit.min(MAX_TRAILER_SEARCH);
    for counter in 0..limit {
        let counter = counter as u32;
        let mut candidate = state.clone();
        candidate.update(trailer_bytes(counter));
        if mask.matches(&candidate.finalize()) {
            return Ok(counter);
        }
    }
    Err(HashquineError::TrailerSearchExhausted {
        limit,
        mask: mask.to_string(),
    })
}

/// Swap in the visible collision for the digit `digest_hex` carries at each
/// blank position of `mask`. Consumes the used entries of `table`.
pub fn substitute(
    bytes: &mut [u8],
    mask: &Mask,
    digest_hex: &str,
    table: &mut AlternativesTable,
) -> Result<(), HashquineError> {
    if digest_hex.len() != DIGEST_HEX_LEN {
        return Err(HashquineError::Internal(format!(
            "digest '{digest_hex}' is not {DIGEST_HEX_LEN} hex characters"
        )));
    }
    for (position, c) in digest_hex.chars().enumerate() {
        if !mask.is_blank(position) {
            continue;
        }
        let digit = c
            .to_digit(16)
            .ok_or_else(|| HashquineError::Internal(format!("'{c}' is not a hex digit")))?
            as u8;
        let alternative = table.take(position, digit).ok_or_else(|| {
            HashquineError::Internal(format!(
                "no collision recorded for position {position} digit {digit:x}"
            ))
        })?;
        alternative.show(bytes)?;
    }
    Ok(())
}

/// Stream after the trailer search, before substitution.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// File contents with every digit hidden.
    pub bytes: Vec<u8>,
    pub alternatives: AlternativesTable,
    /// Counter written in the trailer.
    pub counter: u32,
    /// Lowercase hex MD5 of `bytes`; unchanged by substitution.
    pub digest: String,
    pub stats: Stats,
}

impl Assembly {
    /// Reveal the digits of [`Assembly::digest`].
    pub fn finish(mut self, mask: &Mask) -> Result<Vec<u8>, HashquineError> {
        substitute(&mut self.bytes, mask, &self.digest, &mut self.alternatives)?;
        Ok(self.bytes)
    }
}

/// Finished file.
#[derive(Debug, Clone)]
pub struct Generated {
    pub bytes: Vec<u8>,
    pub digest: String,
    pub counter: u32,
    pub stats: Stats,
}

pub struct Hashquine<O, D = Md5> {
    templates: TemplateSet,
    layout: Layout,
    comment: Vec<u8>,
    oracle: O,
    max_attempts: u32,
    trailer_limit: u64,
    progress: ProgressBar,
    _digest: PhantomData<D>,
}

impl<O: CollisionOracle, D: Digest + Clone> Hashquine<O, D> {
    pub fn new(templates: TemplateSet, config: &Config, oracle: O) -> Result<Self, HashquineError> {
        config.validate()?;
        let layout = Layout::new(config.origin, config.mask.clone(), &templates)?;
        for digit in 0..16u8 {
            let record_len = GRAPHIC_CONTROL_EXTENSION.len()
                + IMAGE_DESCRIPTOR_LEN
                + templates.glyphs.data(digit).len();
            if record_len > MAX_RECORD_LEN {
                return Err(HashquineError::Config(format!(
                    "glyph frame for digit {digit:x} is {record_len} bytes, at most {MAX_RECORD_LEN} fit inside a collision"
                )));
            }
        }
        Ok(Self {
            templates,
            layout,
            comment: config.comment.as_bytes().to_vec(),
            oracle,
            max_attempts: config.max_collision_attempts,
            trailer_limit: config.trailer_search_limit,
            progress: ProgressBar::hidden(),
            _digest: PhantomData,
        })
    }

    /// Report collision placement on `progress` instead of staying silent.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }

    /// Status line on stderr, only when progress is being shown.
    fn note(&self, msg: impl AsRef<str>) {
        if !self.progress.is_hidden() {
            self.progress.suspend(|| eprintln!("{}", msg.as_ref()));
        }
    }

    /// Header, palette, comment and background image, then the opening of
    /// the comment that hides the glyph frames.
    pub fn prologue(&self, stream: &mut Stream<D>) {
        let background = &self.templates.background;
        stream.extend(&background.header);
        stream.extend(&background.screen);
        stream.extend(&background.palette);
        stream.extend(&gif::comment_extension(&self.comment));
        stream.extend(&GRAPHIC_CONTROL_EXTENSION);
        stream.extend(&background.descriptor);
        stream.extend(&background.data);
        stream.extend(&COMMENT_HEADER);
    }

    /// Request collisions until one validates against the current stream
    /// and leaves room for a glyph frame of `record_len` bytes.
    fn obtain_collision(
        &mut self,
        stream: &Stream<D>,
        stats: &mut Stats,
        position: usize,
        digit: u8,
        record_len: usize,
    ) -> Result<(CollisionPair, GlyphSpacing), HashquineError> {
        for attempt in 1..=self.max_attempts {
            stats.tick_request();
            let (a, b) = self.oracle.request(stream.as_bytes())?;
            let checked = CollisionPair::from_oracle(a, b).and_then(|pair| {
                pair.validate(stream.state())?;
                let spacing = GlyphSpacing::compute(&pair, record_len)?;
                Ok((pair, spacing))
            });
            match checked {
                Ok(found) => return Ok(found),
                Err(rejection) => {
                    stats.log_rejection(rejection);
                    self.note(format!(
                        "position {position} digit {digit:x}: {rejection} (attempt {attempt}/{}), trying again",
                        self.max_attempts
                    ));
                }
            }
        }
        Err(HashquineError::CollisionRetriesExhausted {
            position,
            digit,
            attempts: self.max_attempts,
        })
    }

    /// Emit the collision and the glyph frame for one (position, digit).
    ///
    /// The stream must be positioned where a comment sub-block length is
    /// expected; it is left in the same state.
    pub fn place_digit(
        &mut self,
        stream: &mut Stream<D>,
        table: &mut AlternativesTable,
        stats: &mut Stats,
        position: usize,
        digit: u8,
    ) -> Result<(), HashquineError> {
        let (width, height) = self.layout.glyph_size();
        let record = gif::image_record(
            self.layout.glyph_left(position),
            self.layout.top(),
            width,
            height,
            self.templates.glyphs.data(digit),
        );

        let length_byte_at = stream.len();
        let bridge = CommentBridge::at(length_byte_at);
        stream.extend(&bridge.encode());
        let collision_at = stream.len();
        if !bridge.lands_on_diff_byte(length_byte_at, collision_at) {
            return Err(HashquineError::Internal(format!(
                "comment bridge at offset {length_byte_at} misses the collision at {collision_at}"
            )));
        }

        let (pair, spacing) = self.obtain_collision(stream, stats, position, digit, record.len())?;

        stream.extend(&pair.hidden);
        stream.fill(spacing.visible_skip);
        stream.push(SUB_BLOCK_TERMINATOR);
        stream.extend(&record);
        stream.extend(&COMMENT_HEADER);
        stream.push(spacing.hidden_pad);
        stream.fill(spacing.hidden_pad as usize);

        table.record(
            position,
            digit,
            Alternative {
                offset: collision_at,
                pair,
            },
        )?;
        stats.tick_used();
        self.progress.inc(1);
        Ok(())
    }

    /// Place all sixteen digits for every blank position, left to right.
    pub fn place_positions(
        &mut self,
        stream: &mut Stream<D>,
        table: &mut AlternativesTable,
        stats: &mut Stats,
    ) -> Result<(), HashquineError> {
        let positions: Vec<usize> = self.layout.mask().blank_positions().collect();
        for position in positions {
            self.progress
                .set_message(format!("digit position {}/{}", position + 1, DIGEST_HEX_LEN));
            for digit in 0..16u8 {
                self.place_digit(stream, table, stats, position, digit)?;
            }
        }
        Ok(())
    }

    /// Build the stream with every digit hidden and the trailer chosen.
    pub fn assemble(&mut self) -> Result<Assembly, HashquineError> {
        let mut stream = Stream::<D>::new();
        let mut table = AlternativesTable::new();
        let mut stats = Stats::new();

        self.progress
            .set_length(self.layout.mask().blank_positions().count() as u64 * 16);
        self.prologue(&mut stream);
        self.place_positions(&mut stream, &mut table, &mut stats)?;
        self.progress.finish_and_clear();

        self.note("Bruteforcing final md5...");
        let counter = search_trailer(stream.state(), self.layout.mask(), self.trailer_limit)?;
        stats.trailer_candidates = counter as u64 + 1;
        stream.extend(&trailer_bytes(counter));
        let digest = stream.hex_digest();
        self.note(format!("Target md5: {digest}"));

        Ok(Assembly {
            bytes: stream.into_bytes(),
            alternatives: table,
            counter,
            digest,
            stats,
        })
    }

    /// Assemble, reveal the digest's digits and check the result.
    pub fn generate(&mut self) -> Result<Generated, HashquineError> {
        let assembly = self.assemble()?;
        let digest = assembly.digest.clone();
        let counter = assembly.counter;
        let stats = assembly.stats.clone();
        let bytes = assembly.finish(self.layout.mask())?;

        let final_digest = hex::encode(D::digest(&bytes));
        if final_digest != digest {
            return Err(HashquineError::Internal(format!(
                "digest changed from {digest} to {final_digest} during substitution"
            )));
        }
        let shown = displayed_digest(&bytes, &self.templates.glyphs, &self.layout)?;
        if shown != digest {
            return Err(HashquineError::Internal(format!(
                "image shows '{shown}' but its digest is {digest}"
            )));
        }

        Ok(Generated {
            bytes,
            digest,
            counter,
            stats,
        })
    }
}
