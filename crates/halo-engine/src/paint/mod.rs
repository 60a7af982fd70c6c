//! Colour model shared by render lists, texture tints and the backends.

mod color;

pub use color::Color;
