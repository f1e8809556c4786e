use hashquine::GifBlocks;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(blocks) = GifBlocks::parse(data, "fuzz.gif") {
                // an accepted template is exactly its blocks plus the trailer
                let mut rebuilt = blocks.header.to_vec();
                rebuilt.extend_from_slice(&blocks.screen);
                rebuilt.extend_from_slice(&blocks.palette);
                rebuilt.extend_from_slice(&blocks.descriptor);
                rebuilt.extend_from_slice(&blocks.data);
                rebuilt.push(0x3b);
                assert_eq!(rebuilt, data);
            }
        });
    }
}
