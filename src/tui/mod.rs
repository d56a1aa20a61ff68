//! Terminal shell for the search controller.

pub mod app;
pub mod events;
pub mod theme;
pub mod views;
