#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `rby-sprites` extracts and decodes monster sprite graphics and palettes
//! from Generation I handheld cartridge images (red, green.jp, blue, yellow
//! and red.jp).
//!
//! The heavy lifting lives in [`rby_types`]; this crate re-exports its
//! public surface.

pub use rby_types::*;
