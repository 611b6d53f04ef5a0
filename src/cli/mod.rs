pub mod commands;
pub mod input;
pub mod ui;

pub use input::read_input;
