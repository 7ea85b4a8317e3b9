pub mod card;
pub mod layout;
pub mod text;
pub mod theme;

pub use card::{render_card, render_error_card};
pub use layout::{CardLayout, IconPosition};
pub use text::{escape_text, group_thousands};
pub use theme::{Palette, Theme};
