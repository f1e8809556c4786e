//! Where the GIF comment layout and the collision byte layout meet.
//!
//! The assembler keeps the decoder inside one long comment extension. Right
//! before each collision it writes a sub-block length that makes the
//! sub-block end exactly at [`DIFF_OFFSET`] inside the collision, so the
//! differing byte becomes the next sub-block length. The visible variant
//! skips a short distance and lands on a comment terminator followed by a
//! glyph frame; the hidden variant skips over the frame.

use crate::collision::{CollisionPair, COLLISION_LEN, DIFF_OFFSET, MD5_BLOCK_LEN};
use crate::PairRejection;

/// Collision bytes after [`DIFF_OFFSET`] that are part of the sub-block
/// the differing byte opens.
pub const COLLISION_TAIL: usize = COLLISION_LEN - DIFF_OFFSET - 1;

/// Bytes written between the visible skip and the hidden pad besides the
/// glyph frame: comment terminator, comment header, pad length.
pub const REOPEN_OVERHEAD: usize = 4;

/// Difference between the hidden and visible length bytes of the collisions
/// `fastcoll` produces.
pub const DIFF_BYTE_GAP: usize = 0x80;

/// Largest glyph frame that fits between the two skip lengths of a
/// collision with a [`DIFF_BYTE_GAP`] gap.
pub const MAX_RECORD_LEN: usize = DIFF_BYTE_GAP - REOPEN_OVERHEAD - 1;

/// Sub-block that pads the stream to an MD5 block boundary and extends into
/// the collision up to its differing byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentBridge {
    filler: usize,
}

impl CommentBridge {
    /// Bridge for a stream that is currently `stream_len` bytes long and
    /// positioned where a sub-block length is expected.
    pub fn at(stream_len: usize) -> Self {
        Self {
            filler: MD5_BLOCK_LEN - stream_len % MD5_BLOCK_LEN - 1,
        }
    }

    /// Filler bytes following the length byte.
    pub fn filler(&self) -> usize {
        self.filler
    }

    /// Declared sub-block length. Always at most `63 + DIFF_OFFSET`.
    pub fn declared_len(&self) -> u8 {
        (self.filler + DIFF_OFFSET) as u8
    }

    /// Length byte plus filler.
    pub fn encoded_len(&self) -> usize {
        1 + self.filler
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.encoded_len()];
        out[0] = self.declared_len();
        out
    }

    /// The sub-block whose length byte sits at `length_byte_at` must end
    /// right before the differing byte of a collision starting at
    /// `collision_at`, and that collision must start on a block boundary.
    pub fn lands_on_diff_byte(&self, length_byte_at: usize, collision_at: usize) -> bool {
        collision_at % MD5_BLOCK_LEN == 0
            && length_byte_at + 1 + self.declared_len() as usize == collision_at + DIFF_OFFSET
    }
}

/// Distances that let both collision variants continue as a valid comment
/// around a glyph frame of `record_len` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSpacing {
    /// Filler after the collision before the comment terminator.
    pub visible_skip: usize,
    /// Length of the sub-block reopened after the glyph frame. Never zero:
    /// a zero length would end the comment on the visible path.
    pub hidden_pad: u8,
}

impl GlyphSpacing {
    pub fn compute(pair: &CollisionPair, record_len: usize) -> Result<Self, PairRejection> {
        let (visible, hidden) = pair.diff_bytes();
        let visible_skip = (visible as isize) - COLLISION_TAIL as isize;
        let hidden_skip = (hidden as isize) - COLLISION_TAIL as isize;
        let hidden_pad =
            hidden_skip - visible_skip - record_len as isize - REOPEN_OVERHEAD as isize;
        if visible_skip < 0 || hidden_pad < 1 {
            return Err(PairRejection::Infeasible);
        }
        Ok(Self {
            visible_skip: visible_skip as usize,
            hidden_pad: hidden_pad as u8,
        })
    }

    /// Bytes from the end of the collision up to the next sub-block length.
    pub fn span(&self, record_len: usize) -> usize {
        self.visible_skip + REOPEN_OVERHEAD + record_len + self.hidden_pad as usize
    }
}
