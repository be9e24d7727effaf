//! ROM table discovery.
//!
//! None of the sprite tables sit at the same place on every cartridge, so
//! they are located by searching for the known content of their first
//! entries, one 16 KiB bank at a time.

use log::debug;

use crate::rom::BANK_SIZE;
use crate::rom::error::CartridgeError;

mod signatures {
	/// First base-stats entry: pokedex no. 1, base stats 45/49/49/45/65
	pub const BASE_STATS: [u8; 6] = [0x01, 0x2d, 0x31, 0x31, 0x2d, 0x41];

	/// Separate Mew base-stats entry: pokedex no. 151, all stats 100
	pub const MEW_STATS: [u8; 6] = [0x97, 0x64, 0x64, 0x64, 0x64, 0x64];

	/// First bytes of the internal-id to pokedex-number permutation
	pub const POKEDEX_ORDER: [u8; 8] = [0x70, 0x73, 0x20, 0x23, 0x15, 0x64, 0x22, 0x50];

	/// First bytes of the monster to palette-index map
	pub const PALETTE_MAP: [u8; 10] = [0x10, 0x16, 0x16, 0x16, 0x12, 0x12, 0x12, 0x13, 0x13, 0x13];
}

/// Locations of the sprite-related tables within a cartridge image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
	/// Base-stats table: 28-byte entries in pokedex order
	pub base_stats: usize,

	/// Separate Mew base-stats entry in bank 1, absent on yellow
	pub base_stats_mew: Option<usize>,

	/// Internal-id permutation table (0xbe bytes)
	pub pokedex_order: usize,

	/// Monster to palette-index map (152 bytes)
	pub palette_map: usize,

	/// Packed palettes, directly after the palette map
	pub palettes: usize,
}

impl Offsets {
	/// Locates every table by content search.
	///
	/// # Errors
	///
	/// Returns [`CartridgeError::SignatureNotFound`] naming the first table
	/// whose signature is missing. The Mew entry is optional: a hit beyond
	/// the first two banks is the copy inside the main base-stats table and
	/// is discarded.
	pub(crate) fn discover(rom: &[u8]) -> Result<Self, CartridgeError> {
		let base_stats = find(rom, &signatures::BASE_STATS)
			.ok_or(CartridgeError::SignatureNotFound("base stats"))?;
		let base_stats_mew = find(rom, &signatures::MEW_STATS).filter(|&o| o <= 2 * BANK_SIZE);
		let pokedex_order = find(rom, &signatures::POKEDEX_ORDER)
			.ok_or(CartridgeError::SignatureNotFound("pokedex order"))?;
		let palette_map = find(rom, &signatures::PALETTE_MAP)
			.ok_or(CartridgeError::SignatureNotFound("palette map"))?;

		debug!(
			"tables: base stats {base_stats:#x} (mew {base_stats_mew:x?}), pokedex order {pokedex_order:#x}, palette map {palette_map:#x}"
		);

		Ok(Self {
			base_stats,
			base_stats_mew,
			pokedex_order,
			palette_map,
			palettes: palette_map + super::constants::PALETTE_MAP_LEN,
		})
	}
}

/// Searches for `pattern` one bank at a time, returning its absolute offset.
fn find(rom: &[u8], pattern: &[u8]) -> Option<usize> {
	for (bank, chunk) in rom.chunks(BANK_SIZE).enumerate() {
		if let Some(i) = chunk.windows(pattern.len()).position(|window| window == pattern) {
			return Some(bank * BANK_SIZE + i);
		}
	}
	None
}
