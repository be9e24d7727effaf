//! Bit-level cursor over a byte slice.

use crate::rom::error::SpriteError;

/// Most-significant-bit-first reader over a byte slice.
///
/// Reads are strictly sequential; bits within a byte are never skipped and
/// input bytes are emitted as stored, without any per-byte flipping.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
	data: &'a [u8],
	pos: usize,
	bit: u8,
}

impl<'a> BitReader<'a> {
	/// Creates a reader positioned at the first bit of `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
			bit: 0,
		}
	}

	/// Reads a single bit.
	pub fn read_bit(&mut self) -> Result<u8, SpriteError> {
		let Some(&byte) = self.data.get(self.pos) else {
			return Err(SpriteError::UnexpectedEnd);
		};

		let bit = (byte >> (7 - self.bit)) & 1;
		self.bit += 1;
		if self.bit == 8 {
			self.bit = 0;
			self.pos += 1;
		}
		Ok(bit)
	}

	/// Reads `count` bits (at most 16) assembled MSB-first.
	pub fn read_bits(&mut self, count: u32) -> Result<u16, SpriteError> {
		debug_assert!(count <= 16);

		let mut value = 0u16;
		for _ in 0..count {
			value = (value << 1) | u16::from(self.read_bit()?);
		}
		Ok(value)
	}

	/// Total number of bits consumed so far.
	pub fn bits_read(&self) -> usize {
		self.pos * 8 + usize::from(self.bit)
	}
}
