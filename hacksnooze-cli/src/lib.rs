#![warn(rust_2018_idioms)]

pub mod app;
pub mod error;
pub mod panel;
pub mod render;
pub mod service;
pub mod text;
pub mod theme;
pub mod util;
