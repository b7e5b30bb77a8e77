mod app;
mod image_panel;
mod tree_view;

pub use app::run_gui;
