use hashquine::gif::walk;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(layout) = walk(data) {
                for img in &layout.images {
                    assert!(img.offset < data.len());
                }
            }
        });
    }
}
