//! JSON regression fixtures shared by the integration tests.
//!
//! A fixture is written when it does not exist yet, or when `TURINGTOY_FORCE_REGEN` is set.
//! Otherwise the freshly produced document must equal the stored one; on a mismatch the stored
//! file is kept as `<name>.old.json`, the new document is written next to it for manual
//! comparison, and the test fails.

use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use turingtoy::{Machine, Run};

pub const FORCE_REGEN_VAR: &str = "TURINGTOY_FORCE_REGEN";

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

pub fn force_regen() -> bool {
    std::env::var_os(FORCE_REGEN_VAR).is_some_and(|value| !value.is_empty() && value != "0")
}

/// The document stored for one machine run.
pub fn fixture_document(machine: &Machine, input: &str, run: &Run) -> Value {
    json!({
        "machine": machine,
        "input": input,
        "output": run.output,
        "execution_history": run.history,
    })
}

fn write_fixture(path: &Path, document: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut text = serde_json::to_string_pretty(document).unwrap();
    text.push('\n');
    fs::write(path, text).unwrap();
}

fn old_fixture_path(path: &Path) -> PathBuf {
    path.with_extension("old.json")
}

/// Compares `data` against the fixture at `path`, creating or refreshing it as needed.
pub fn regression_test<T: Serialize>(data: &T, path: &Path, force_regen: bool) {
    let document = serde_json::to_value(data).unwrap();

    if force_regen || !path.is_file() {
        write_fixture(path, &document);
        return;
    }

    let stored: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    if stored != document {
        fs::copy(path, old_fixture_path(path)).unwrap();
        write_fixture(path, &document);
        panic!(
            "regression fixture {} changed; previous version kept at {}",
            path.display(),
            old_fixture_path(path).display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_fixture_is_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario").join("1.json");

        regression_test(&json!({"output": "101"}), &path, false);

        let stored: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored, json!({"output": "101"}));
    }

    #[test]
    fn test_matching_fixture_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1.json");

        regression_test(&json!({"output": "101", "steps": [1, 2]}), &path, false);
        regression_test(&json!({"steps": [1, 2], "output": "101"}), &path, false);

        assert!(!old_fixture_path(&path).exists());
    }

    #[test]
    fn test_mismatch_keeps_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1.json");
        regression_test(&json!({"output": "101"}), &path, false);

        let result = std::panic::catch_unwind(|| {
            regression_test(&json!({"output": "111"}), &path, false);
        });
        assert!(result.is_err());

        let backup: Value =
            serde_json::from_str(&fs::read_to_string(old_fixture_path(&path)).unwrap()).unwrap();
        let current: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(backup, json!({"output": "101"}));
        assert_eq!(current, json!({"output": "111"}));
    }

    #[test]
    fn test_force_regen_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1.json");
        regression_test(&json!({"output": "101"}), &path, false);
        regression_test(&json!({"output": "111"}), &path, true);

        let current: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(current, json!({"output": "111"}));
        assert!(!old_fixture_path(&path).exists());
    }
}
