//! Text helpers (ANSI recognition, display width, truncation and wrapping).
//!
//! Pure string in/string out helpers shared by widgets and adapters.

pub mod ansi;
pub mod width;

pub use width::{
    grapheme_segments, pad_to_width, truncate_to_width, visible_width, wrap_words,
};
