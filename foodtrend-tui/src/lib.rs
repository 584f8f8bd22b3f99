//! FoodTrend TUI: terminal dashboard over the food price tables.
//!
//! Layout:
//! - Left sidebar with the eight views
//! - Pickers for the current view's selections
//! - The rendered report: headings, text, tables, and charts
//! - A one-line status bar and a `?` help overlay

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;

#[cfg(test)]
mod test_helpers;
