//! Cartridge formats for the `rby-sprites` project.

mod error;

pub mod cartridge;
pub mod palette;
pub mod sprite;

/// Size of one switchable ROM bank (16 KiB / 0x4000)
pub const BANK_SIZE: usize = 0x4000;

// Re-export unified error types
pub use error::{CartridgeError, SpriteError};

// Re-export main types
pub use cartridge::{Facing, File as RomFile, Offsets, Version};
pub use palette::{Color, ColorSystem, Palette};
pub use sprite::{Image, decompress};
