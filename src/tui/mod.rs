pub mod app;
pub mod menu;
pub mod stats;
pub mod ui;
