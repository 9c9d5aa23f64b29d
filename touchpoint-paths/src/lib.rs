//! XDG Base Directory paths for touchpoint.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths. This matches tools like gh, docker, kubectl.

use std::path::PathBuf;

/// Get the touchpoint config directory.
///
/// Returns `$XDG_CONFIG_HOME/touchpoint` if set, otherwise
/// `~/.config/touchpoint`. This is where the tracker config file lives.
///
/// # Examples
///
/// ```
/// use touchpoint_paths::config_dir;
///
/// let config = config_dir();
/// let config_file = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("touchpoint")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/touchpoint")
    } else {
        PathBuf::from(".config/touchpoint")
    }
}

/// Get the touchpoint data directory.
///
/// Returns `$XDG_DATA_HOME/touchpoint` if set, otherwise
/// `~/.local/share/touchpoint`. This is where the persisted attribution
/// record is stored.
///
/// # Examples
///
/// ```
/// use touchpoint_paths::data_dir;
///
/// let data = data_dir();
/// let record_file = data.join("utm_params.json");
/// ```
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("touchpoint")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/touchpoint")
    } else {
        PathBuf::from(".local/share/touchpoint")
    }
}
