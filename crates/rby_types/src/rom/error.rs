//! Error types for cartridge parsing and sprite decompression.

use thiserror::Error;

use crate::rom::palette::ColorSystem;

/// Errors that can occur while decompressing a sprite stream
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
	/// The bit source ran out of input mid-read
	#[error("unexpected end of sprite stream")]
	UnexpectedEnd,

	/// A chunk pushed the plane past its declared size
	#[error("plane overflow: expected {expected} bit pairs, got {actual}")]
	PlaneOverflow {
		/// Number of 2-bit values the header declared
		expected: usize,
		/// Number of 2-bit values actually produced
		actual: usize,
	},

	/// The stream header declared a zero tile dimension
	#[error("invalid sprite header: {tile_w}x{tile_h} tiles")]
	InvalidHeader {
		/// Declared width in tiles
		tile_w: u8,
		/// Declared height in tiles
		tile_h: u8,
	},

	/// Decoded transform mode outside {0, 1, 2}
	#[error("invalid transform mode: {0}")]
	InvalidMode(u8),
}

/// Errors that can occur when parsing a cartridge image or resolving sprites
#[derive(Debug, Error)]
pub enum CartridgeError {
	/// The title bytes at 0x134 do not match a known cartridge
	#[error("unknown cartridge title: {0:02X?}")]
	UnknownVersion(Vec<u8>),

	/// A content search for a ROM table found nothing
	#[error("signature for the {0} table not found")]
	SignatureNotFound(&'static str),

	/// Fewer than 8 bytes were available when reading a palette
	#[error("palette truncated: expected {expected} bytes, got {actual}")]
	PaletteShort {
		/// Number of bytes required
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// A table read reached past the end of the ROM image
	#[error("insufficient data: expected {expected} bytes, got {actual}")]
	InsufficientData {
		/// Number of bytes required
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// Monster index outside 1..=151
	#[error("monster index {0} out of range (1-151)")]
	MonsterOutOfRange(u8),

	/// A monster number is missing from the pokedex order table
	#[error("monster {0} missing from the pokedex order table")]
	PokedexOrderIncomplete(u8),

	/// The cartridge carries no palettes for the requested color system
	#[error("cartridge has no {0} palettes")]
	ColorSystemUnavailable(ColorSystem),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),

	/// Sprite decompression failed
	#[error(transparent)]
	Sprite(#[from] SpriteError),
}
