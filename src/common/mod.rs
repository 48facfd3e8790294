//! Common types and utilities shared by the package layer and the tools.

pub mod unit;
pub mod xml;

pub use unit::{Rect, emu_to_inches, inches_to_emu, pt_to_centipoints};
