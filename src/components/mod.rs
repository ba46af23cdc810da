//! Widget adapters.
//!
//! Every adapter pairs a [`ComponentBase`](crate::core::component::ComponentBase)
//! with one wrapped widget and routes messages through
//! [`dispatch`](crate::core::dispatch::dispatch).

pub mod chat;
pub mod input;
pub mod list;
pub mod menu;
pub mod progress;
pub mod spinner;
pub mod table;
pub mod textarea;
pub mod viewport;

pub use chat::{ChatComponent, ChatMessage, ChatRole};
pub use input::InputComponent;
pub use list::ListComponent;
pub use menu::{MenuComponent, MenuItem};
pub use progress::ProgressComponent;
pub use spinner::SpinnerComponent;
pub use table::TableComponent;
pub use textarea::TextAreaComponent;
pub use viewport::ViewportComponent;
