//! Generator for GIF hashquines: images that display their own MD5 digest.
//!
//! The heavy lifting is delegated to an identical-prefix MD5 collision
//! generator (see [`CollisionOracle`]); this crate lays the GIF out so that
//! swapping colliding blocks toggles glyph frames without changing the
//! file's digest.

pub mod alternatives;
pub mod assembler;
pub mod bridge;
pub mod collision;
pub mod config;
pub mod error;
pub mod fastcoll;
pub mod gif;
pub mod io_utils;
pub mod layout;
pub mod mask;
pub mod render;
pub mod stats;
pub mod template;

pub use alternatives::{Alternative, AlternativesTable};
pub use assembler::{
    search_trailer, substitute, trailer_bytes, Assembly, Generated, Hashquine, Stream,
};
pub use bridge::{CommentBridge, GlyphSpacing, MAX_RECORD_LEN};
pub use collision::{CollisionOracle, CollisionPair, COLLISION_LEN, DIFF_OFFSET, MD5_BLOCK_LEN};
pub use config::{Config, Origin};
pub use error::{HashquineError, PairRejection};
pub use fastcoll::FastcollOracle;
pub use layout::Layout;
pub use mask::{Mask, Slot};
pub use render::displayed_digest;
pub use stats::Stats;
pub use template::{GifBlocks, GlyphSet, TemplateSet};
