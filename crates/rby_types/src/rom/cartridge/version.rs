//! Cartridge version detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rom::error::CartridgeError;

/// Known Generation I cartridges.
///
/// Detected from the title string in the cartridge header together with the
/// country byte, which separates the Japanese and international red
/// releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
	/// International red
	Red,
	/// Japanese red
	RedJp,
	/// Japanese green
	GreenJp,
	/// International blue
	Blue,
	/// Yellow
	Yellow,
}

impl Version {
	/// Detects the version from the 15 title bytes and the country byte.
	pub(crate) fn detect(title: &[u8], country: u8) -> Result<Self, CartridgeError> {
		let end = title.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
		let title = &title[..end];

		match title {
			b"POKEMON RED" if country == 0 => Ok(Version::RedJp),
			b"POKEMON RED" => Ok(Version::Red),
			b"POKEMON GREEN" => Ok(Version::GreenJp),
			b"POKEMON BLUE" => Ok(Version::Blue),
			b"POKEMON YELLOW" => Ok(Version::Yellow),
			_ => Err(CartridgeError::UnknownVersion(title.to_vec())),
		}
	}

	/// Whether this is a Japanese release.
	///
	/// The Japanese red and green cartridges shift two of the sprite bank
	/// thresholds by one internal id.
	pub fn is_japanese(self) -> bool {
		matches!(self, Version::RedJp | Version::GreenJp)
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Version::Red => write!(f, "red"),
			Version::RedJp => write!(f, "red.jp"),
			Version::GreenJp => write!(f, "green.jp"),
			Version::Blue => write!(f, "blue"),
			Version::Yellow => write!(f, "yellow"),
		}
	}
}
