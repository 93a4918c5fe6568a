//! Command implementations

mod create_index;
mod files;
mod index;
mod search;

pub use create_index::cmd_create_index;
pub use files::cmd_files;
pub use index::cmd_index;
pub use search::cmd_search;
