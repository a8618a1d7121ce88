pub mod load;
pub mod types;

pub use load::SETTINGS_FILE;
pub use types::{
    Config, DEFAULT_SOURCE_DIR, DEFAULT_STAGING_DIR, JoinerSettings, Language, UserSettings,
};
