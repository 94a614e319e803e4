//! Ratatui front-end: the record list, its modals, and the terminal loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, AppSettings};
pub use forms::FormMode;
pub use terminal::run_app;
