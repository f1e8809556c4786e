use hashquine::{Alternative, CollisionPair, GlyphSpacing, DIFF_OFFSET};
use md5::{Digest, Md5};

// Wang, Feng, Lai and Yu (2004): two 128-byte messages with one MD5 digest.
const WANG_A: &str = "d131dd02c5e6eec4693d9a0698aff95c2fcab58712467eab4004583eb8fb7f8955ad340609f4b30283e488832571415a085125e8f7cdc99fd91dbdf280373c5b960b1dd1dc417b9ce4d897f45a6555d535739ac7f0ebfd0c3029f166d109b18f75277f7930d55ceb22e8adba79cc155ced74cbdd5fc5d36db19b0ad835cca7e3";
const WANG_B: &str = "d131dd02c5e6eec4693d9a0698aff95c2fcab50712467eab4004583eb8fb7f8955ad340609f4b30283e4888325f1415a085125e8f7cdc99fd91dbd7280373c5b960b1dd1dc417b9ce4d897f45a6555d535739a47f0ebfd0c3029f166d109b18f75277f7930d55ceb22e8adba794c155ced74cbdd5fc5d36db19b0a5835cca7e3";

fn wang_pair() -> CollisionPair {
    CollisionPair::from_oracle(hex::decode(WANG_A).unwrap(), hex::decode(WANG_B).unwrap()).unwrap()
}

#[test]
fn published_collision_validates() {
    let pair = wang_pair();
    assert_eq!(pair.diff_bytes(), (0x58, 0xd8));
    assert_eq!(pair.visible, hex::decode(WANG_B).unwrap());
    assert_eq!(pair.validate(&Md5::new()), Ok(()));
}

#[test]
fn published_collision_leaves_room_for_glyphs() {
    let pair = wang_pair();
    let spacing = GlyphSpacing::compute(&pair, 60).unwrap();
    assert_eq!(spacing.visible_skip, 0x58 - 4);
    assert_eq!(spacing.hidden_pad as usize, 0xd8 - 0x58 - 60 - 4);
}

#[test]
fn swapping_keeps_md5_with_any_suffix() {
    let pair = wang_pair();
    let mut file = pair.hidden.clone();
    file.extend_from_slice(b"\x00\x21\xfeany suffix at all\x00\x3b");
    let before = Md5::digest(&file);
    let alt = Alternative { offset: 0, pair };
    alt.show(&mut file).unwrap();
    assert_eq!(file[DIFF_OFFSET], 0x58);
    assert_eq!(Md5::digest(&file), before);
}

#[test]
fn prefix_breaks_published_collision() {
    // The pair only collides from the initial MD5 state.
    let pair = wang_pair();
    let mut state = Md5::new();
    state.update([0u8; 64]);
    assert!(pair.validate(&state).is_err());
}
