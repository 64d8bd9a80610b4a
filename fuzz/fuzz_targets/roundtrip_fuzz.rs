#![no_main]
use libfuzzer_sys::fuzz_target;
use oxidfu::buffer::{ChunkBuffer, InlineBuffer};
use oxidfu::chunk::Chunk;

fuzz_target!(|data: &[u8]| {
    let mut buf = InlineBuffer::<4096>::new();
    let mut expected = Vec::new();
    let mut rest = data;

    // Each op: control byte, then one or more argument bytes.
    while let [ctrl, tail @ ..] = rest {
        let arg = (*ctrl >> 2) as usize + 1;
        let (head, tail) = tail.split_at(arg.min(tail.len()));
        rest = tail;
        if head.is_empty() {
            break;
        }
        let before = buf.as_bytes().to_vec();
        let result = match ctrl & 0b11 {
            0 => buf.encode_raw(head).map(|()| Chunk::Raw(head)),
            1 => buf
                .encode_rep(head[0], arg * 977)
                .map(|()| Chunk::RepeatedByte {
                    byte: head[0],
                    count: arg * 977,
                }),
            2 => buf
                .encode_arr(head, head[0] as usize + 1)
                .map(|()| Chunk::RepeatedArray {
                    pattern: head,
                    reps: head[0] as u16 + 1,
                }),
            _ => {
                let offset = i32::from_le_bytes([
                    head[0],
                    *head.get(1).unwrap_or(&0),
                    *head.get(2).unwrap_or(&0),
                    *head.get(3).unwrap_or(&0),
                ]) >> 2;
                buf.encode_off(offset, arg)
                    .map(|()| Chunk::OldOffset { offset, len: arg })
            }
        };
        match result {
            Ok(chunk) => expected.push(chunk),
            Err(_) => assert_eq!(buf.as_bytes(), &before[..]),
        }
    }

    let decoded: Vec<_> = buf.chunks().collect();
    assert_eq!(decoded, expected);
});
