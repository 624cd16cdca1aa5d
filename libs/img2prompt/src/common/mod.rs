mod types;
mod utils;

pub use types::DetailLevel;
pub use utils::{init_logger, init_logger_exe};
