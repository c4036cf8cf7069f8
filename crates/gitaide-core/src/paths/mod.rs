//! Path utilities for gitaide configuration files.
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately

mod config;
mod error;
mod platform;

#[cfg(test)]
mod test_utils;

pub use config::{env_file_path, settings_path};
pub use error::PathError;
pub use platform::{CONFIG_DIR_ENV, config_root, resolve_working_dir};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_working_dir_prefers_request() {
        let temp = tempdir().unwrap();
        let resolved = resolve_working_dir(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(resolved, temp.path());
    }

    #[test]
    fn test_resolve_working_dir_rejects_missing_dir() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            resolve_working_dir(Some(missing)),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_resolve_working_dir_defaults_to_cwd() {
        assert_eq!(
            resolve_working_dir(None).unwrap(),
            std::env::current_dir().unwrap()
        );
    }
}
