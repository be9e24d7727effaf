//! Benchmark suite for sprite stream decoding
//!
//! Measures the decompressor over synthetic streams covering both encoding
//! paths: all-zero sprites (pure run-length) and dense literal sprites
//! (literal chunks plus the delta and XOR transforms).
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rby_benches::{dense_sprite, zero_sprite};
use rby_types::rom::decompress;

fn bench_zero_sprites(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_decompress_zero");

	for tiles in [4u8, 5, 6, 7] {
		let stream = zero_sprite(tiles, tiles);
		let pixels = u64::from(tiles) * 8 * u64::from(tiles) * 8;

		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(
			BenchmarkId::new("decompress", format!("{tiles}x{tiles}")),
			&stream,
			|b, data| {
				b.iter(|| {
					let result = decompress(black_box(data), 0, false);
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

fn bench_dense_sprites(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_decompress_dense");

	for tiles in [5u8, 7] {
		let stream = dense_sprite(tiles, tiles);
		let pixels = u64::from(tiles) * 8 * u64::from(tiles) * 8;

		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(
			BenchmarkId::new("decompress", format!("{tiles}x{tiles}")),
			&stream,
			|b, data| {
				b.iter(|| {
					let result = decompress(black_box(data), 0, false);
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

criterion_group!(benches, bench_zero_sprites, bench_dense_sprites);
criterion_main!(benches);
