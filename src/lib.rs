//! This crate provides a single-tape Turing machine interpreter for formal-automata exercises.
//! It includes modules for describing machines as JSON transition tables, executing them while
//! recording a step-by-step history, loading definitions from disk, and a small catalogue of
//! reference machines.

pub mod loader;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the interpreter from the machine module.
pub use machine::{run_turing_machine, TuringMachine};
/// Re-exports `MachineInfo`, `MachineManager`, and `MACHINES` from the programs module.
pub use programs::{MachineInfo, MachineManager, MACHINES};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the machine definition and execution types from the types module.
pub use types::{
    Direction, ExecutionStep, Instruction, Machine, Run, RunConfig, State, Step, Symbol, TapeMode,
    TuringMachineError, DEFAULT_MAX_STEPS, DEFAULT_TAPE_MARGIN, MAX_MACHINE_SIZE,
};

/// Returns the crate version from the package metadata.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
