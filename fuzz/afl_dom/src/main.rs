use afl::fuzz;

fn main() {
    fuzz! {|data: &[u8]|{
        // anything that parses must also survive being written out again
        if let Ok(document) = dom_builder::parse_bytes(data) {
            let _ = document.to_xml_string();
        }
    }
    }
}
