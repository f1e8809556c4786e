mod common;

use common::{ByteSum, StubOracle};
use hashquine::gif::walk;
use hashquine::{displayed_digest, Hashquine, HashquineError, Mask, MAX_RECORD_LEN};

#[test]
fn largest_glyph_frame_still_decodes() {
    // 102 bytes of LZW data make a frame of exactly MAX_RECORD_LEN bytes
    let templates = common::templates_with(102, 8, 12);
    assert_eq!(8 + 10 + templates.glyphs.data(0).len(), MAX_RECORD_LEN);

    let mut hq: Hashquine<StubOracle, ByteSum> =
        Hashquine::new(templates, &common::config(Mask::all_blank()), StubOracle::new())
            .unwrap();
    let generated = hq.generate().unwrap();
    let layout = walk(&generated.bytes).unwrap();
    assert_eq!(layout.images.len(), 1 + 32);
    let shown = displayed_digest(&generated.bytes, &hq.templates().glyphs, hq.layout()).unwrap();
    assert_eq!(shown, generated.digest);
}

#[test]
fn every_variant_of_largest_frame_decodes() {
    let templates = common::templates_with(102, 8, 12);
    let mut hq: Hashquine<StubOracle, ByteSum> = Hashquine::new(
        templates,
        &common::config(common::mask_with(0, "0123456789abcdef0123456789abcde")),
        StubOracle::new(),
    )
    .unwrap();
    let mut stream = hashquine::Stream::<ByteSum>::new();
    let mut table = hashquine::AlternativesTable::new();
    let mut stats = hashquine::Stats::new();
    hq.prologue(&mut stream);
    hq.place_positions(&mut stream, &mut table, &mut stats).unwrap();
    stream.extend(&hashquine::trailer_bytes(0));
    let bytes = stream.into_bytes();

    for (_, _, alt) in table.iter() {
        let mut shown = bytes.clone();
        alt.show(&mut shown).unwrap();
        assert_eq!(walk(&shown).unwrap().images.len(), 2, "offset {}", alt.offset);
    }
}

#[test]
fn oversized_glyph_frame_is_refused_up_front() {
    // one byte more leaves no room for the reopened comment's length
    let templates = common::templates_with(103, 8, 12);
    let mut oracle = StubOracle::new();
    let result = Hashquine::<_, ByteSum>::new(
        templates,
        &common::config(Mask::all_blank()),
        &mut oracle,
    );
    match result {
        Err(HashquineError::Config(msg)) => assert!(msg.contains("124 bytes"), "{msg}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("oversized glyphs should be refused"),
    }
    assert!(oracle.prefix_lens.is_empty());
}
