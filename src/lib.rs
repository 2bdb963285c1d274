pub mod api;
pub mod audio;
pub mod bus;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod printer;
pub mod render;
pub mod views;
