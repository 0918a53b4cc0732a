//! Ticket image rendering: fonts, layout, drawing surface, QR styling,
//! and the composition pipeline that ties them together.

pub mod canvas;
pub mod compositor;
pub mod font;
pub mod layout;
pub mod qr;
