//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, parsing arguments, handling user interaction
//! (prompts, menus), and rendering results as tables or JSON.

mod commands;
mod prompts;
mod render;

pub use commands::*;
pub use prompts::*;
