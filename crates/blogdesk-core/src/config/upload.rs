//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Local upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory that receives uploaded files.
    #[serde(default = "default_directory")]
    pub directory: String,
    /// URL prefix under which stored files are served.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Accepted file extensions, lowercase without the dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            public_prefix: default_public_prefix(),
            max_file_size_bytes: default_max_file_size(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl UploadConfig {
    /// Whether the given extension (with or without a leading dot) is accepted.
    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

fn default_directory() -> String {
    "data/uploads".to_string()
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp", "svg"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
