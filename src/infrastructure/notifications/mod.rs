pub mod desktop;
pub mod fallback;
pub mod status_line;
pub mod terminal;
