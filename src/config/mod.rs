mod filesystem;
mod job;
mod settings;

pub use filesystem::{FileSystem, RealFileSystem};
pub use job::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_FILE_SIZE, ExclusionRules, JobRequest, OutputMode, ScanJob,
    normalize_extension, parse_list, project_name,
};
pub use settings::{LOCAL_SETTINGS_NAME, SETTINGS_KEYS, Settings, SettingsStore};
