//! Path resolution for the data directory and user-supplied paths.
//!
//! The data directory holds the catalog file, preference files and the log.
//! Resolution follows the XDG base directory convention, with an override for
//! tests and portable installs.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "SHELFKEEPER_DATA_DIR";

const APP_DIR_NAME: &str = "shelfkeeper";

/// Returns the data directory for shelfkeeper storage.
///
/// Checked in order: `$SHELFKEEPER_DATA_DIR`, `$XDG_DATA_HOME/shelfkeeper`,
/// `$HOME/.local/share/shelfkeeper`, and finally `./.shelfkeeper`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(|key| std::env::var(key).ok())
}

/// Resolves the data directory against an arbitrary environment lookup.
///
/// Empty variables count as unset.
///
/// # Examples
///
/// ```
/// use shelfkeeper::infrastructure::resolve_data_dir;
/// use std::path::PathBuf;
///
/// let dir = resolve_data_dir(|key| (key == "HOME").then(|| "/home/ada".to_string()));
/// assert_eq!(dir, PathBuf::from("/home/ada/.local/share/shelfkeeper"));
/// ```
#[must_use]
pub fn resolve_data_dir<F>(env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|value| !value.is_empty());

    if let Some(dir) = var(DATA_DIR_ENV) {
        return PathBuf::from(expand_tilde(&dir, var("HOME").as_deref()));
    }
    if let Some(xdg) = var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    if let Some(home) = var("HOME") {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}

/// Expands a leading `~` to `home`. Paths are returned unchanged when `home` is unknown.
///
/// # Examples
///
/// ```
/// use shelfkeeper::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/books", Some("/home/ada")), "/home/ada/books");
/// assert_eq!(expand_tilde("~", Some("/home/ada")), "/home/ada");
/// assert_eq!(expand_tilde("/absolute/path", Some("/home/ada")), "/absolute/path");
/// assert_eq!(expand_tilde("~/books", None), "~/books");
/// ```
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&str>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };

    if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else if path == "~" {
        home.to_string()
    } else {
        path.to_string()
    }
}
