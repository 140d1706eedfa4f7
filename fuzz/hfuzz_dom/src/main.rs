use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let _ = dom_builder::parse_bytes(data);
        });
    }
}
