pub mod command;
pub mod options;
pub mod race_backend;
pub mod race_console;
pub mod results;
pub mod signal_panel;
pub mod start_console;

#[cfg(test)]
mod tests;
