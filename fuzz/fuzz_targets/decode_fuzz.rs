#![no_main]
use libfuzzer_sys::fuzz_target;
use oxidfu::chunk::{self, ChunkIter};

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, only return errors.
    let mut iter = ChunkIter::new(data);
    let count = iter.by_ref().count();
    assert!(iter.position() <= data.len());
    if iter.error().is_none() {
        assert_eq!(iter.position(), data.len(), "{count} chunks");
    }

    // Decoding from every start position stays in bounds.
    for pos in 0..data.len().min(64) {
        match chunk::decode(data, pos) {
            Ok((_, next)) => assert!(next > pos && next <= data.len()),
            Err(e) => assert!(e.position().is_some_and(|at| at <= data.len())),
        }
    }
});
