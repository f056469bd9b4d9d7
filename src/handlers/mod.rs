// Handler modules
pub mod config;
pub mod prune;

// Re-export all handler functions
pub use config::handle_config;
pub use prune::{handle_details, handle_prune, handle_status, print_command_output};
