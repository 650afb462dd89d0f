// Terminal front end for the emotion classification service: the controller
// task, the ratatui view, and one-shot command-line subcommands.

pub mod app;
pub mod cli;
pub mod protocol;
pub mod tui;
