pub mod chat_window;
pub mod constants;
pub mod font_settings;
pub mod message_view;
pub mod result_table;
pub mod syntax_highlight;
pub mod theme;

pub use chat_window::*;
pub use font_settings::*;
pub use message_view::*;
pub use result_table::*;
pub use syntax_highlight::*;
