//! Benchmark helper utilities for rby-sprites
//!
//! The sprite decompressor takes no framing from the outside world, so the
//! benchmarks run on synthetic streams composed bit by bit here: all-zero
//! sprites exercising the run-length path and dense literal sprites
//! exercising the literal, delta and XOR paths.

/// MSB-first bit accumulator used to compose synthetic sprite streams.
pub struct BitSink {
	bytes: Vec<u8>,
	used: u8,
}

impl BitSink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self {
			bytes: Vec::new(),
			used: 0,
		}
	}

	/// Appends a single bit.
	pub fn push_bit(&mut self, bit: u8) {
		if self.used == 0 {
			self.bytes.push(0);
		}
		if bit != 0 {
			let last = self.bytes.len() - 1;
			self.bytes[last] |= 1 << (7 - self.used);
		}
		self.used = (self.used + 1) % 8;
	}

	/// Appends `count` bits of `value`, most significant first.
	pub fn push_bits(&mut self, value: u16, count: u32) {
		for shift in (0..count).rev() {
			self.push_bit(((value >> shift) & 1) as u8);
		}
	}

	/// Appends one run-length chunk encoding `run` zero values.
	///
	/// Picks the unique unary prefix length whose range covers `run`:
	/// prefix `k` encodes runs of `(2 << k) - 1` up to `(2 << (k + 1)) - 2`.
	pub fn push_zero_run(&mut self, run: usize) {
		assert!(run >= 1, "a run chunk cannot encode zero values");

		for k in 0..16u32 {
			let base = (2usize << k) - 1;
			let span = 1usize << (k + 1);
			if run >= base && run - base < span {
				for _ in 0..k {
					self.push_bit(1);
				}
				self.push_bit(0);
				self.push_bits((run - base) as u16, k + 1);
				return;
			}
		}
		panic!("run of {run} does not fit the run-length encoding");
	}

	/// Pads the final byte with zero bits and returns the stream.
	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}

impl Default for BitSink {
	fn default() -> Self {
		Self::new()
	}
}

/// Builds an all-zero sprite stream: both planes are a single zero run.
pub fn zero_sprite(tile_w: u8, tile_h: u8) -> Vec<u8> {
	let groups = usize::from(tile_w) * 8 * usize::from(tile_h) * 4;

	let mut bits = BitSink::new();
	bits.push_bits(u16::from(tile_w), 4);
	bits.push_bits(u16::from(tile_h), 4);
	bits.push_bit(0); // plane order

	bits.push_bit(0); // first plane starts in run mode
	bits.push_zero_run(groups);
	bits.push_bit(0); // mode 0
	bits.push_bit(0); // second plane starts in run mode
	bits.push_zero_run(groups);

	bits.finish()
}

/// Builds a dense sprite stream: both planes are one full literal chunk
/// (no `00` pair ever appears, so each literal ends exactly at the plane
/// boundary), decoded with mode 2.
pub fn dense_sprite(tile_w: u8, tile_h: u8) -> Vec<u8> {
	let groups = usize::from(tile_w) * 8 * usize::from(tile_h) * 4;

	let mut bits = BitSink::new();
	bits.push_bits(u16::from(tile_w), 4);
	bits.push_bits(u16::from(tile_h), 4);
	bits.push_bit(0);

	bits.push_bit(1); // literal
	for i in 0..groups {
		bits.push_bits(if i % 2 == 0 { 1 } else { 2 }, 2);
	}
	bits.push_bits(0b11, 2); // mode 2
	bits.push_bit(1); // literal
	for _ in 0..groups {
		bits.push_bits(3, 2);
	}

	bits.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rby_types::rom::decompress;

	#[test]
	fn test_zero_sprite_decodes_blank() {
		let stream = zero_sprite(7, 7);
		let image = decompress(&stream, 0, false).unwrap();

		assert_eq!((image.width(), image.height()), (56, 56));
		assert!(image.pixels().iter().all(|&p| p == 0));
	}

	#[test]
	fn test_dense_sprite_decodes() {
		let stream = dense_sprite(5, 5);
		let image = decompress(&stream, 0, false).unwrap();

		assert_eq!((image.width(), image.height()), (40, 40));
		assert_eq!(image.pixels().len(), 1600);
	}

	#[test]
	fn test_zero_run_chunk_boundaries() {
		// one value: empty prefix, suffix 0
		let mut bits = BitSink::new();
		bits.push_zero_run(1);
		assert_eq!(bits.finish(), vec![0b0000_0000]);

		// nine values: prefix 110, suffix 010
		let mut bits = BitSink::new();
		bits.push_zero_run(9);
		assert_eq!(bits.finish(), vec![0b1100_1000]);
	}
}
