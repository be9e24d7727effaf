//! Cartridge image support.
//!
//! This module resolves a monster index into its compressed sprite data and
//! palettes inside a Generation I cartridge image, and decodes both.
//!
//! # Resolution pipeline
//!
//! 1. The pokedex-order table maps the user-visible monster number to the
//!    cartridge-internal id.
//! 2. The base-stats table (28-byte entries in pokedex order) holds the
//!    sprite dimension byte and two bank-relative pointers (front and back)
//!    per monster. Monster 151 has a separate entry in bank 1 on most
//!    cartridges.
//! 3. The internal id selects the 16 KiB bank the pointer is relative to;
//!    the absolute offset is `((bank - 1) << 14) + pointer`.
//! 4. The palette map assigns each monster one of 40 four-color palettes,
//!    stored once per color system directly after the map.
//!
//! # Usage
//!
//! ```no_run
//! use rby_types::rom::{Facing, RomFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rom = RomFile::open("red.gb")?;
//! println!("version: {}", rom.version());
//!
//! let image = rom.sprite(1, Facing::Front)?;
//! println!("front sprite: {image}");
//! # Ok(())
//! # }
//! ```

mod offsets;
mod version;


use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::rom::error::CartridgeError;
use crate::rom::palette::{Color, ColorSystem, Palette};
use crate::rom::sprite::{self, Image};

pub use offsets::Offsets;
pub use version::Version;

/// Cartridge layout constants.
pub mod constants {
	/// Number of monsters with sprites on a Generation I cartridge
	pub const MONSTER_COUNT: u8 = 151;

	/// Size of one base-stats entry in bytes
	pub const BASE_STATS_ENTRY_SIZE: usize = 28;

	/// Offset of the sprite dimension byte inside a base-stats entry; the
	/// two sprite pointers follow it
	pub const SPRITE_FIELDS_OFFSET: usize = 10;

	/// Length of the internal-id permutation table in bytes
	pub const POKEDEX_ORDER_LEN: usize = 0xbe;

	/// Length of the palette map: one byte per monster plus slot 0
	pub const PALETTE_MAP_LEN: usize = 152;

	/// Number of palettes stored per color system
	pub const PALETTE_COUNT: usize = 40;

	/// Offset of the title string in the cartridge header
	pub const TITLE_OFFSET: usize = 0x134;

	/// Length of the title string
	pub const TITLE_LEN: usize = 15;

	/// Offset of the country byte
	pub const COUNTRY_OFFSET: usize = TITLE_OFFSET + 22;

	/// Offset and expected value of the super-console support flag
	pub const SGB_FLAG_OFFSET: usize = 0x146;
	/// Value of the support flag on super-console aware cartridges
	pub const SGB_FLAG_VALUE: u8 = 0x03;

	/// Offset and expected value of the color-handheld support flag
	pub const GBC_FLAG_OFFSET: usize = 0x143;
	/// Value of the support flag on color-aware cartridges
	pub const GBC_FLAG_VALUE: u8 = 0x80;
}

/// Which of the two sprites a base-stats entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
	/// The sprite shown for the opposing monster
	Front,
	/// The sprite shown for the player's monster
	Back,
}

impl fmt::Display for Facing {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Facing::Front => write!(f, "front"),
			Facing::Back => write!(f, "back"),
		}
	}
}

/// A loaded cartridge image.
///
/// Construction detects the version, locates every sprite table and decodes
/// the palette sets; sprite pixel data is decoded lazily per request.
#[derive(Debug, Clone)]
pub struct File {
	rom: Vec<u8>,
	version: Version,
	has_sgb: bool,
	has_gbc: bool,
	offsets: Offsets,
	internal_ids: [u8; 152],
	palette_map: [u8; constants::PALETTE_MAP_LEN],
	sgb_palettes: Vec<Palette>,
	gbc_palettes: Vec<Palette>,
}

impl File {
	/// Opens a cartridge image from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read, the version is unknown
	/// or any required table is missing.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, CartridgeError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(data)
	}

	/// Parses a cartridge image from memory.
	///
	/// Color 0 of every super-console palette is rewritten to white, the
	/// background color the console actually shows; use
	/// [`File::from_bytes_with_munge`] to keep the stored colors.
	pub fn from_bytes(rom: Vec<u8>) -> Result<Self, CartridgeError> {
		Self::from_bytes_with_munge(rom, true)
	}

	/// Parses a cartridge image, controlling the SGB background rewrite.
	pub fn from_bytes_with_munge(rom: Vec<u8>, munge_sgb: bool) -> Result<Self, CartridgeError> {
		let title = slice(&rom, constants::TITLE_OFFSET, constants::TITLE_LEN)?;
		let country = slice(&rom, constants::COUNTRY_OFFSET, 1)?[0];
		let version = Version::detect(title, country)?;

		let has_sgb = rom.get(constants::SGB_FLAG_OFFSET) == Some(&constants::SGB_FLAG_VALUE);
		let has_gbc = rom.get(constants::GBC_FLAG_OFFSET) == Some(&constants::GBC_FLAG_VALUE);

		let offsets = Offsets::discover(&rom)?;
		debug!("cartridge {version}: sgb={has_sgb} gbc={has_gbc}");

		let internal_ids = read_internal_ids(&rom, &offsets)?;

		let mut palette_map = [0u8; constants::PALETTE_MAP_LEN];
		palette_map
			.copy_from_slice(slice(&rom, offsets.palette_map, constants::PALETTE_MAP_LEN)?);

		// palette sets are stored back to back, SGB first
		let mut pos = offsets.palettes;
		let mut sgb_palettes = Vec::new();
		let mut gbc_palettes = Vec::new();
		if has_sgb {
			sgb_palettes = read_palette_set(&rom, &mut pos)?;
			if munge_sgb {
				for palette in &mut sgb_palettes {
					palette.set(0, Color::WHITE);
				}
			}
		}
		if has_gbc {
			gbc_palettes = read_palette_set(&rom, &mut pos)?;
		}

		Ok(Self {
			rom,
			version,
			has_sgb,
			has_gbc,
			offsets,
			internal_ids,
			palette_map,
			sgb_palettes,
			gbc_palettes,
		})
	}

	/// Returns the detected cartridge version.
	pub fn version(&self) -> Version {
		self.version
	}

	/// Returns the discovered table offsets.
	pub fn offsets(&self) -> &Offsets {
		&self.offsets
	}

	/// Whether the cartridge carries super-console palettes.
	pub fn has_sgb(&self) -> bool {
		self.has_sgb
	}

	/// Whether the cartridge carries handheld-color palettes.
	pub fn has_gbc(&self) -> bool {
		self.has_gbc
	}

	/// Lists the color systems this cartridge carries palettes for.
	pub fn color_systems(&self) -> Vec<ColorSystem> {
		let mut systems = Vec::new();
		if self.has_sgb {
			systems.push(ColorSystem::Sgb);
		}
		if self.has_gbc {
			systems.push(ColorSystem::Gbc);
		}
		systems
	}

	/// Returns the raw ROM bytes.
	pub fn rom(&self) -> &[u8] {
		&self.rom
	}

	/// Returns the cartridge-internal id of a monster.
	pub fn internal_id(&self, monster: u8) -> Result<u8, CartridgeError> {
		self.check_monster(monster)?;
		Ok(self.internal_ids[usize::from(monster)])
	}

	/// Returns the sprite dimension byte of a monster's base-stats entry,
	/// split into (width, height) in tiles.
	pub fn sprite_dimensions(&self, monster: u8) -> Result<(u8, u8), CartridgeError> {
		let entry = self.base_stats_entry(monster)?;
		let dim = slice(&self.rom, entry + constants::SPRITE_FIELDS_OFFSET, 1)?[0];
		Ok((dim >> 4, dim & 0xf))
	}

	/// Resolves the absolute ROM offset of a monster's compressed sprite.
	pub fn sprite_offset(&self, monster: u8, facing: Facing) -> Result<usize, CartridgeError> {
		let entry = self.base_stats_entry(monster)?;
		let fields = slice(&self.rom, entry + constants::SPRITE_FIELDS_OFFSET, 5)?;

		let pointer = match facing {
			Facing::Front => u16::from_le_bytes([fields[1], fields[2]]),
			Facing::Back => u16::from_le_bytes([fields[3], fields[4]]),
		};

		let bank = self.bank(monster)?;
		Ok(((bank - 1) << 14) + usize::from(pointer))
	}

	/// Decodes a monster's sprite, without a palette.
	pub fn sprite(&self, monster: u8, facing: Facing) -> Result<Image, CartridgeError> {
		let offset = self.sprite_offset(monster, facing)?;
		Ok(sprite::decompress(&self.rom, offset, false)?)
	}

	/// Decodes a monster's sprite with the palette for `system` attached.
	pub fn sprite_in_color(
		&self,
		monster: u8,
		facing: Facing,
		system: ColorSystem,
	) -> Result<Image, CartridgeError> {
		let palette = self.palette(monster, system)?;
		let mut image = self.sprite(monster, facing)?;
		image.set_palette(palette);
		Ok(image)
	}

	/// Returns the palette assigned to a monster under `system`.
	pub fn palette(&self, monster: u8, system: ColorSystem) -> Result<Palette, CartridgeError> {
		self.check_monster(monster)?;

		let set = match system {
			ColorSystem::Sgb if self.has_sgb => &self.sgb_palettes,
			ColorSystem::Gbc if self.has_gbc => &self.gbc_palettes,
			_ => return Err(CartridgeError::ColorSystemUnavailable(system)),
		};

		let index = usize::from(self.palette_map[usize::from(monster)]);
		set.get(index).copied().ok_or(CartridgeError::InsufficientData {
			expected: index + 1,
			actual: set.len(),
		})
	}

	/// Resolves the base-stats entry offset for a monster, honoring the
	/// separate Mew entry when the cartridge has one.
	fn base_stats_entry(&self, monster: u8) -> Result<usize, CartridgeError> {
		self.check_monster(monster)?;

		match (monster, self.offsets.base_stats_mew) {
			(constants::MONSTER_COUNT, Some(mew)) => Ok(mew),
			_ => Ok(self.offsets.base_stats
				+ (usize::from(monster) - 1) * constants::BASE_STATS_ENTRY_SIZE),
		}
	}

	/// Selects the bank a monster's sprite pointer is relative to.
	fn bank(&self, monster: u8) -> Result<usize, CartridgeError> {
		let id = self.internal_id(monster)?;
		let jp = self.version.is_japanese();

		let bank = if self.offsets.base_stats_mew.is_some() && id == 0x15 {
			0x1
		} else if id == 0xb6 {
			0xb
		} else if id < 0x1f {
			0x9
		} else if id < 0x4a {
			0xa
		} else if id < if jp { 0x75 } else { 0x74 } {
			0xb
		} else if id < if jp { 0x9a } else { 0x99 } {
			0xc
		} else {
			0xd
		};
		Ok(bank)
	}

	fn check_monster(&self, monster: u8) -> Result<(), CartridgeError> {
		if monster == 0 || monster > constants::MONSTER_COUNT {
			return Err(CartridgeError::MonsterOutOfRange(monster));
		}
		Ok(())
	}
}

impl fmt::Display for File {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} cartridge, {} bytes", self.version, self.rom.len())
	}
}

/// Builds the monster-number to internal-id map from the pokedex-order
/// table.
fn read_internal_ids(rom: &[u8], offsets: &Offsets) -> Result<[u8; 152], CartridgeError> {
	let order = slice(rom, offsets.pokedex_order, constants::POKEDEX_ORDER_LEN)?;

	let mut ids = [0u8; 152];
	for monster in 1..=constants::MONSTER_COUNT {
		let position = order
			.iter()
			.position(|&number| number == monster)
			.ok_or(CartridgeError::PokedexOrderIncomplete(monster))?;
		ids[usize::from(monster)] = position as u8 + 1;
	}
	Ok(ids)
}

/// Reads one set of 40 packed palettes, advancing `pos` past it.
fn read_palette_set(rom: &[u8], pos: &mut usize) -> Result<Vec<Palette>, CartridgeError> {
	let mut palettes = Vec::with_capacity(constants::PALETTE_COUNT);
	for _ in 0..constants::PALETTE_COUNT {
		let bytes = rom.get(*pos..*pos + Palette::BYTE_SIZE).ok_or_else(|| {
			CartridgeError::PaletteShort {
				expected: Palette::BYTE_SIZE,
				actual: rom.len().saturating_sub(*pos),
			}
		})?;
		palettes.push(Palette::from_bytes(bytes)?);
		*pos += Palette::BYTE_SIZE;
	}
	Ok(palettes)
}

fn slice(rom: &[u8], offset: usize, len: usize) -> Result<&[u8], CartridgeError> {
	rom.get(offset..offset + len).ok_or(CartridgeError::InsufficientData {
		expected: offset + len,
		actual: rom.len(),
	})
}
