//! Sprite stream decompression passes.
//!
//! The decoder runs in fixed stages: fill both bit planes from the stream,
//! pack them to bytes, apply the mode-selected delta/XOR transforms, combine
//! the planes into 2-bit pixels and rewrite the tiled layout as a raster.

use super::bits::BitReader;
use super::constants::{DELTA_TABLES, NIBBLE_REVERSE, RUN_BASE, TILE_SIZE};
use super::image::Image;
use crate::rom::error::SpriteError;

/// Decompression state for a single sprite stream.
///
/// Owns the bit cursor and the dimensions read from the stream header.
/// Dimensions are held as `width` in pixels and `rows` in 8-pixel row
/// groups, the units the plane transforms operate in.
#[derive(Debug)]
pub(crate) struct Decompressor<'a> {
	bits: BitReader<'a>,
	width: usize,
	rows: usize,
	order: usize,
	mirror: bool,
}

impl<'a> Decompressor<'a> {
	/// Reads the 9-bit stream header and prepares the decoder.
	pub(crate) fn new(data: &'a [u8], mirror: bool) -> Result<Self, SpriteError> {
		let mut bits = BitReader::new(data);

		let tile_w = bits.read_bits(4)? as u8;
		let tile_h = bits.read_bits(4)? as u8;
		if tile_w == 0 || tile_h == 0 {
			return Err(SpriteError::InvalidHeader { tile_w, tile_h });
		}
		let order = usize::from(bits.read_bit()?);

		Ok(Self {
			bits,
			width: usize::from(tile_w) * TILE_SIZE,
			rows: usize::from(tile_h),
			order,
			mirror,
		})
	}

	/// Image width in pixels.
	pub(crate) fn width(&self) -> usize {
		self.width
	}

	/// Image height in pixels.
	pub(crate) fn height(&self) -> usize {
		self.rows * TILE_SIZE
	}

	/// Which plane the stream encodes first.
	#[cfg(test)]
	pub(crate) fn plane_order(&self) -> usize {
		self.order
	}

	/// Runs every decoding stage and surrenders the finished image.
	pub(crate) fn decompress(mut self) -> Result<Image, SpriteError> {
		let first = self.order;
		let second = self.order ^ 1;

		let mut planes = [Vec::new(), Vec::new()];
		self.fill_plane(&mut planes[first])?;
		let mode = self.read_mode()?;
		self.fill_plane(&mut planes[second])?;

		let mut rams = [pack_groups(&planes[0]), pack_groups(&planes[1])];

		match mode {
			0 => {
				delta_decode(&mut rams[0], self.width, self.rows, self.mirror);
				delta_decode(&mut rams[1], self.width, self.rows, self.mirror);
			}
			1 => {
				delta_decode(&mut rams[first], self.width, self.rows, self.mirror);
				Self::combine(&mut rams, first, self.mirror);
			}
			2 => {
				// the pre-combine pass on the second plane never mirrors
				delta_decode(&mut rams[second], self.width, self.rows, false);
				delta_decode(&mut rams[first], self.width, self.rows, self.mirror);
				Self::combine(&mut rams, first, self.mirror);
			}
			mode => return Err(SpriteError::InvalidMode(mode)),
		}

		let tiled = pack_groups(&interleave_planes(&rams[0], &rams[1]));
		let raster = untile(&tiled, self.width, self.rows, self.mirror);

		Ok(Image::new(self.width, self.rows * TILE_SIZE, unpack_samples(&raster)))
	}

	/// Fills one plane with exactly `width * rows * 4` 2-bit values and
	/// deinterleaves it.
	fn fill_plane(&mut self, plane: &mut Vec<u8>) -> Result<(), SpriteError> {
		let target = self.width * self.rows * 4;
		plane.reserve(target);

		let mut literal = self.bits.read_bit()? == 1;
		while plane.len() < target {
			if literal {
				read_literal_chunk(&mut self.bits, plane, target)?;
			} else {
				read_zero_run(&mut self.bits, plane, target)?;
			}
			literal = !literal;
		}

		if plane.len() > target {
			return Err(SpriteError::PlaneOverflow {
				expected: target,
				actual: plane.len(),
			});
		}

		*plane = deinterleave_groups(plane, self.width, self.rows);
		Ok(())
	}

	/// Reads the 1-2 bit transform mode between the two plane fills.
	fn read_mode(&mut self) -> Result<u8, SpriteError> {
		match self.bits.read_bit()? {
			0 => Ok(0),
			_ => Ok(1 + self.bits.read_bit()?),
		}
	}

	/// XORs the first-filled plane into the other one.
	fn combine(rams: &mut [Vec<u8>; 2], src: usize, mirror: bool) {
		let (head, tail) = rams.split_at_mut(1);
		let (src_ram, dst_ram) = if src == 0 {
			(&head[0], &mut tail[0])
		} else {
			(&tail[0], &mut head[0])
		};
		xor_planes(src_ram, dst_ram, mirror);
	}
}

/// Reads one run-length chunk of zero values.
///
/// The unary prefix selects both the run base length and the width of the
/// suffix that extends it.
pub(crate) fn read_zero_run(
	bits: &mut BitReader<'_>,
	plane: &mut Vec<u8>,
	target: usize,
) -> Result<(), SpriteError> {
	let mut prefix = 0usize;
	while bits.read_bit()? == 1 {
		prefix += 1;
	}

	// a prefix past the table encodes a run no plane can hold
	let Some(&base) = RUN_BASE.get(prefix) else {
		return Err(SpriteError::PlaneOverflow {
			expected: target,
			actual: plane.len().saturating_add(usize::from(RUN_BASE[RUN_BASE.len() - 1])),
		});
	};

	let extra = bits.read_bits(prefix as u32 + 1)?;
	let run = usize::from(base) + usize::from(extra);
	plane.resize(plane.len() + run, 0);
	Ok(())
}

/// Reads one literal chunk of 2-bit values, ended by a `00` pair.
///
/// A handful of streams end their last literal exactly at the plane
/// boundary with no terminator, so the fill level is checked after every
/// value.
pub(crate) fn read_literal_chunk(
	bits: &mut BitReader<'_>,
	plane: &mut Vec<u8>,
	target: usize,
) -> Result<(), SpriteError> {
	loop {
		let group = bits.read_bits(2)? as u8;
		if group == 0 {
			break;
		}
		plane.push(group);
		if plane.len() >= target {
			break;
		}
	}
	Ok(())
}

/// Rewrites column-major 2-bit groups so that four consecutive groups come
/// from four vertically adjacent positions at the same x.
///
/// After packing, each byte then holds one 8-pixel column slice of a tile
/// row.
pub(crate) fn deinterleave_groups(groups: &[u8], width: usize, rows: usize) -> Vec<u8> {
	let mut out = Vec::with_capacity(groups.len());
	for y in 0..rows {
		for x in 0..width {
			let mut i = 4 * y * width + x;
			for _ in 0..4 {
				out.push(groups[i]);
				i += width;
			}
		}
	}
	out
}

/// Packs groups of four 2-bit values into bytes, MSB-first.
pub(crate) fn pack_groups(groups: &[u8]) -> Vec<u8> {
	groups
		.chunks_exact(4)
		.map(|c| (c[0] << 6) | (c[1] << 4) | (c[2] << 2) | c[3])
		.collect()
}

/// Delta-decodes one packed plane in place.
///
/// Nibbles are decoded high-then-low through the substitution tables,
/// selected by the low bit of the previous output nibble. The walk is
/// column-major over the `width` x `rows` byte grid and the carry resets at
/// the top of every column. With `mirror`, each output nibble is
/// additionally bit-reversed (the carry still comes from the unreversed
/// value).
pub(crate) fn delta_decode(ram: &mut [u8], width: usize, rows: usize, mirror: bool) {
	for x in 0..width {
		let mut carry = 0usize;
		for y in 0..rows {
			let i = y * width + x;

			let mut hi = DELTA_TABLES[carry][usize::from(ram[i] >> 4)];
			carry = usize::from(hi & 1);
			if mirror {
				hi = NIBBLE_REVERSE[usize::from(hi)];
			}

			let mut lo = DELTA_TABLES[carry][usize::from(ram[i] & 0xf)];
			carry = usize::from(lo & 1);
			if mirror {
				lo = NIBBLE_REVERSE[usize::from(lo)];
			}

			ram[i] = (hi << 4) | lo;
		}
	}
}

/// XORs `src` into `dst` byte-wise.
///
/// With `mirror`, each destination byte has both nibbles bit-reversed
/// before the XOR.
pub(crate) fn xor_planes(src: &[u8], dst: &mut [u8], mirror: bool) {
	for (d, s) in dst.iter_mut().zip(src) {
		if mirror {
			*d = (NIBBLE_REVERSE[usize::from(*d >> 4)] << 4) | NIBBLE_REVERSE[usize::from(*d & 0xf)];
		}
		*d ^= s;
	}
}

/// Interleaves two packed planes bit by bit into 2-bit pixel groups.
///
/// `low` supplies the low bit of each pixel and `high` the high bit.
pub(crate) fn interleave_planes(low: &[u8], high: &[u8]) -> Vec<u8> {
	let mut groups = Vec::with_capacity(low.len() * 8);
	for (&a, &b) in low.iter().zip(high) {
		for shift in (0..8).rev() {
			let p0 = (a >> shift) & 1;
			let p1 = (b >> shift) & 1;
			groups.push(p0 | (p1 << 1));
		}
	}
	groups
}

/// Rewrites the column-major tile layout as a linear raster.
///
/// Each tile is 16 bytes, two bytes per 8-pixel row. With `mirror`, tile
/// columns are emitted right to left and each byte pair is swapped.
pub(crate) fn untile(ram: &[u8], width: usize, rows: usize, mirror: bool) -> Vec<u8> {
	let cols = width / TILE_SIZE;
	let height = rows * TILE_SIZE;

	let mut out = Vec::with_capacity(ram.len());
	for y in 0..height {
		if mirror {
			for x in (0..cols).rev() {
				let k = (y + height * x) * 2;
				out.push(ram[k + 1]);
				out.push(ram[k]);
			}
		} else {
			for x in 0..cols {
				let k = (y + height * x) * 2;
				out.push(ram[k]);
				out.push(ram[k + 1]);
			}
		}
	}
	out
}

/// Unpacks 2-bit samples, one output byte per pixel.
pub(crate) fn unpack_samples(bytes: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(bytes.len() * 4);
	for &b in bytes {
		out.push((b >> 6) & 3);
		out.push((b >> 4) & 3);
		out.push((b >> 2) & 3);
		out.push(b & 3);
	}
	out
}
