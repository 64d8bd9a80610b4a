use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxidfu::buffer::{ChunkBuffer, View};
use oxidfu::chunk::{self, ChunkIter};

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

/// Encode `data` as a mix of all four chunk kinds, cycling per slice.
fn encode_mixed(buf: &mut dyn ChunkBuffer, data: &[u8], slice: usize) -> chunk::Result<()> {
    for (i, part) in data.chunks(slice).enumerate() {
        match i % 4 {
            0 => buf.encode_raw(part)?,
            1 => buf.encode_rep(part[0], part.len())?,
            2 => buf.encode_arr(&part[..part.len().min(8)], 1 + i % 256)?,
            _ => buf.encode_off(-((i as i32) * 13), part.len())?,
        }
    }
    Ok(())
}

fn bench_encode(c: &mut Criterion) {
    let mut g = c.benchmark_group("encode_mixed");
    let data = gen_data(1 << 20, 42);
    for slice in [4usize, 64, 1024] {
        g.throughput(Throughput::Bytes(data.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(slice), &slice, |b, &slice| {
            let mut storage = vec![0u8; data.len() * 2];
            b.iter(|| {
                let mut view = View::new(&mut storage);
                encode_mixed(&mut view, black_box(&data), slice).unwrap();
                black_box(view.size())
            });
        });
    }
    g.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut g = c.benchmark_group("decode_iter");
    let data = gen_data(1 << 20, 7);
    for slice in [4usize, 64, 1024] {
        let mut storage = vec![0u8; data.len() * 2];
        let mut view = View::new(&mut storage);
        encode_mixed(&mut view, &data, slice).unwrap();
        let encoded = view.as_bytes().to_vec();

        g.throughput(Throughput::Bytes(encoded.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(slice), &encoded, |b, enc| {
            b.iter(|| {
                let total: usize = ChunkIter::new(black_box(enc))
                    .map(|c| c.expanded_len())
                    .sum();
                black_box(total)
            });
        });
    }
    g.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
