#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Whatever the bytes look like, the reader must come back with a tag,
    // an absence, or an error; never a panic.
    let mut cursor = Cursor::new(data.to_vec());
    let _ = riptag::read_tag_from(&mut cursor);
});
