pub mod button;
pub mod input;
pub mod style;
