mod disk_space;
mod file_tools;
mod format;
mod path_validator;
mod video_scanner;

pub use disk_space::available_space;
pub use file_tools::{ClearResult, clear_directory, copy_files, delete_files};
pub use format::{format_duration, format_file_size, format_signed_size};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use video_scanner::{VIDEO_EXTENSION, file_size, is_video_file_name, list_video_files};
