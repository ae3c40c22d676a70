mod exif_info;
mod ffprobe_info;
mod file_hasher;
mod file_scanner;
mod path_tools;
mod worker_pool;

pub use exif_info::read_exif_capture_time;
pub use ffprobe_info::get_video_creation_date;
pub use file_hasher::{calculate_file_hash, hash_files};
pub use file_scanner::scan_media_files;
pub use path_tools::{ensure_directory_exists, path_components, validate_directory_exists};
pub use worker_pool::{build_worker_pool, detected_core_count};
