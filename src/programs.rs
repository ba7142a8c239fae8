use crate::loader::MachineLoader;
use crate::types::{Machine, TuringMachineError};

use std::sync::RwLock;

// Default embedded machines
const MACHINE_TEXTS: [&str; 3] = [
    include_str!("../machines/double.json"),
    include_str!("../machines/binary-addition.json"),
    include_str!("../machines/binary-multiplication.json"),
];

lazy_static::lazy_static! {
    pub static ref MACHINES: RwLock<Vec<Machine>> = RwLock::new(Vec::new());
}

pub struct MachineManager;

impl MachineManager {
    /// Parse the embedded machines into the shared catalogue
    pub fn load() -> Result<(), TuringMachineError> {
        if MACHINES.read().is_ok_and(|machines| !machines.is_empty()) {
            return Ok(());
        }

        let machines = MACHINE_TEXTS
            .iter()
            .map(|text| MachineLoader::load_machine_from_string(text))
            .collect::<Result<Vec<_>, _>>()?;

        let mut write_guard = MACHINES.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;
        *write_guard = machines;

        Ok(())
    }

    /// Get the number of available machines
    pub fn get_machine_count() -> usize {
        let _ = Self::load();

        MACHINES.read().map(|machines| machines.len()).unwrap_or(0)
    }

    /// Get a machine by its index
    pub fn get_machine_by_index(index: usize) -> Result<Machine, TuringMachineError> {
        Self::load()?;

        MACHINES
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::InvalidMachine(format!("Machine index {} out of range", index))
            })
    }

    /// Get a machine by its name, ignoring case
    pub fn get_machine_by_name(name: &str) -> Result<Machine, TuringMachineError> {
        Self::load()?;

        MACHINES
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|machine| machine.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::InvalidMachine(format!("Machine '{}' not found", name))
            })
    }

    /// List all machine names
    pub fn list_machine_names() -> Vec<String> {
        let _ = Self::load();

        MACHINES
            .read()
            .map(|machines| machines.iter().map(|machine| machine.name.clone()).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a machine by its index
    pub fn get_machine_info(index: usize) -> Result<MachineInfo, TuringMachineError> {
        let machine = Self::get_machine_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: machine.name.clone(),
            start_state: machine.start_state.clone(),
            state_count: machine.state_count(),
            transition_count: machine.transition_count(),
        })
    }

    /// Search for machines by name
    pub fn search_machines(query: &str) -> Vec<usize> {
        let _ = Self::load();
        let query = query.to_lowercase();

        MACHINES
            .read()
            .map(|machines| {
                machines
                    .iter()
                    .enumerate()
                    .filter(|(_, machine)| machine.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get the original JSON text of a machine by its index
    pub fn get_machine_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        MACHINE_TEXTS.get(index).copied().ok_or_else(|| {
            TuringMachineError::InvalidMachine(format!(
                "Machine text index {} out of range",
                index
            ))
        })
    }
}

#[derive(Debug, Clone)]
pub struct MachineInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub state_count: usize,
    pub transition_count: usize,
}
