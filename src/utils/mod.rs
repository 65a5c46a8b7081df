pub mod environment;
pub mod logging;
pub mod paths;
pub mod terminal;

pub use environment::{get_config_path, get_data_dir};
pub use logging::init_logging;
pub use paths::{expand_tilde, format_path_with_tilde, parse_dropped_path};
pub use terminal::strip_ansi_codes;
