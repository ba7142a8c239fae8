//! This module provides the `MachineLoader` struct, responsible for loading machine
//! definitions from JSON files, strings and directories.

use crate::types::{Machine, TuringMachineError, MAX_MACHINE_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `MachineLoader` is a utility struct for loading machine definitions.
/// It provides methods to load a definition from a file or from string content,
/// and to discover and load all `.json` files within a directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if the file is not valid JSON.
    /// * `Err(TuringMachineError::InvalidMachine)` if the JSON does not describe a machine.
    pub fn load_machine(path: &Path) -> Result<Machine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_machine_from_string(&content)
    }

    /// Loads a single machine definition from the provided JSON content.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, TuringMachineError> {
        if content.len() > MAX_MACHINE_SIZE {
            return Err(TuringMachineError::InvalidMachine(format!(
                "definition is {} bytes, larger than the {} byte limit",
                content.len(),
                MAX_MACHINE_SIZE
            )));
        }

        let machine: Machine = serde_json::from_str(content).map_err(|e| {
            if e.is_data() {
                TuringMachineError::InvalidMachine(e.to_string())
            } else {
                TuringMachineError::ParseError(e.to_string())
            }
        })?;

        machine.validate()?;

        Ok(machine)
    }

    /// Loads every `.json` machine definition in `directory`.
    ///
    /// Directories and files with other extensions are skipped. Each loaded file yields its
    /// own `Result`, so one broken definition does not hide the others.
    pub fn load_machines(directory: &Path) -> Vec<Result<(PathBuf, Machine), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                match Self::load_machine(&path) {
                    Ok(machine) => Some(Ok((path, machine))),
                    Err(e) => Some(Err(with_path(&path, e))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

/// Prefixes the message of a definition error with the file it came from, keeping its kind.
fn with_path(path: &Path, error: TuringMachineError) -> TuringMachineError {
    let located = |msg: String| format!("{}: {}", path.display(), msg);

    match error {
        TuringMachineError::ParseError(msg) => TuringMachineError::ParseError(located(msg)),
        TuringMachineError::InvalidMachine(msg) => {
            TuringMachineError::InvalidMachine(located(msg))
        }
        other => other,
    }
}
