// src/ui/mod.rs

pub mod button;
pub mod combobox;
pub mod message;
pub mod switch;
