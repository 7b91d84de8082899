// Output and status formatting

pub mod output;
pub mod status;

// Re-export commonly used items for cleaner imports
pub use output::{print_json, to_json};
pub use status::{error, info, success, warn};
