//! Wrapped widgets. Each owns its state and exposes a plain
//! `update(&Message) -> Command` plus getters; none of them know about
//! focus, bindings or notifications.

pub mod markdown;
pub mod progress_bar;
pub mod select_list;
pub mod spinner;
pub mod table;
pub mod text_area;
pub mod text_input;
pub mod viewport;

pub use progress_bar::ProgressBar;
pub use select_list::{SelectItem, SelectList};
pub use spinner::Spinner;
pub use table::{Column, Table};
pub use text_area::TextArea;
pub use text_input::TextInput;
pub use viewport::Viewport;
