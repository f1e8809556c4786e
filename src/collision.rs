//! Collision blocks and the oracle that produces them.

use md5::Digest;

use crate::{HashquineError, PairRejection};

/// MD5 compression function input size.
pub const MD5_BLOCK_LEN: usize = 64;
/// Length of each block returned by the oracle (two MD5 blocks).
pub const COLLISION_LEN: usize = 128;
/// Last offset at which the two blocks of a collision differ. The byte here
/// is read by GIF decoders as a sub-block length.
pub const DIFF_OFFSET: usize = 123;

/// Source of identical-prefix MD5 collisions.
pub trait CollisionOracle {
    /// Return two blocks that give the same MD5 state when appended to
    /// `prefix`, whose length must be a multiple of [`MD5_BLOCK_LEN`].
    fn request(&mut self, prefix: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HashquineError>;
}

impl<O: CollisionOracle + ?Sized> CollisionOracle for &mut O {
    fn request(&mut self, prefix: &[u8]) -> Result<(Vec<u8>, Vec<u8>), HashquineError> {
        (**self).request(prefix)
    }
}

/// Two interchangeable blocks. `visible` has the smaller byte at
/// [`DIFF_OFFSET`], which makes the GIF decoder stop skipping earlier and
/// draw the glyph that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionPair {
    pub visible: Vec<u8>,
    pub hidden: Vec<u8>,
}

impl CollisionPair {
    pub fn new(visible: Vec<u8>, hidden: Vec<u8>) -> Self {
        Self { visible, hidden }
    }

    /// Label oracle output by the byte at [`DIFF_OFFSET`].
    pub fn from_oracle(a: Vec<u8>, b: Vec<u8>) -> Result<Self, PairRejection> {
        match (a.get(DIFF_OFFSET), b.get(DIFF_OFFSET)) {
            (Some(x), Some(y)) if x > y => Ok(Self::new(b, a)),
            (Some(_), Some(_)) => Ok(Self::new(a, b)),
            _ => Err(PairRejection::LengthMismatch),
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Byte at [`DIFF_OFFSET`] of the visible and hidden blocks.
    pub fn diff_bytes(&self) -> (u8, u8) {
        (self.visible[DIFF_OFFSET], self.hidden[DIFF_OFFSET])
    }

    /// Check the pair against `state`, the digest state after the prefix.
    pub fn validate<D: Digest + Clone>(&self, state: &D) -> Result<(), PairRejection> {
        if self.visible.len() != COLLISION_LEN || self.hidden.len() != COLLISION_LEN {
            return Err(PairRejection::LengthMismatch);
        }
        if self.visible == self.hidden {
            return Err(PairRejection::Identical);
        }
        let (visible, hidden) = self.diff_bytes();
        if visible == hidden {
            return Err(PairRejection::SameDiffByte);
        }
        if visible > hidden {
            return Err(PairRejection::Misordered);
        }
        let mut with_visible = state.clone();
        with_visible.update(&self.visible);
        let mut with_hidden = state.clone();
        with_hidden.update(&self.hidden);
        if with_visible.finalize() != with_hidden.finalize() {
            return Err(PairRejection::DigestMismatch);
        }
        Ok(())
    }
}
