pub mod config;
pub mod logger;
pub mod pagesplit_toml;

pub use config::*;
pub use logger::{Colors, LineTag, line_tag, setup_logging};
pub use pagesplit_toml::{
    PagesplitToml, apply_file_to_opts, default_config_path, load_pagesplit_toml,
    parse_pagesplit_toml,
};
