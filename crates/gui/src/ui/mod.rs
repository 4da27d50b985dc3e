pub mod file_panel;
pub mod status_bar;
