/// Widgets for the preview window
pub mod card;
