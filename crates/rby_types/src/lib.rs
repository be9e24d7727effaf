//! This crate provides the core data types and decoders for the
//! `rby-sprites` project.
//!
//! # Components
//!
//! - **cartridge**: version detection, table discovery and sprite/palette
//!   lookup inside a Generation I cartridge image
//! - **sprite**: the bit-oriented sprite stream decompressor
//! - **palette**: packed 15-bit RGB palettes
//!
//! # Examples
//!
//! ```no_run
//! use rby_types::rom::{ColorSystem, Facing, RomFile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rom = RomFile::open("red.gb")?;
//!
//! let image = rom.sprite(1, Facing::Front)?;
//! assert_eq!((image.width(), image.height()), (40, 40));
//!
//! if rom.has_sgb() {
//!     let colored = rom.sprite_in_color(1, Facing::Front, ColorSystem::Sgb)?;
//!     println!("{colored}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod rom;

// Re-export commonly used types at crate root for convenience
pub use rom::{
	BANK_SIZE, CartridgeError, Color, ColorSystem, Facing, Image, Offsets, Palette, RomFile,
	SpriteError, Version,
};
