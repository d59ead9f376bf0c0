// src/lib.rs

pub mod capture;
pub mod constants;
pub mod easing;
pub mod effect;
pub mod errors;
pub mod machine;
pub mod reveal;
pub mod sample;
pub mod state;
pub mod theme;
pub mod ticker;
pub mod ui;
