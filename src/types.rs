//! This module defines the core data structures and types used throughout the interpreter,
//! including the machine definition, instructions, execution records, run configuration and
//! error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// A single tape cell value.
pub type Symbol = char;
/// A state identifier as written in the transition table.
pub type State = String;

/// The number of blank cells placed on each side of the input when the tape is created.
pub const DEFAULT_TAPE_MARGIN: usize = 10;
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_MACHINE_SIZE: usize = 65536; // 64KB
/// The step cap used by front ends when the caller does not pick one.
pub const DEFAULT_MAX_STEPS: usize = 10000;

/// A deterministic single-tape Turing machine definition.
///
/// The JSON form mirrors the classic exercise format:
///
/// ```json
/// {
///   "blank": "0",
///   "start state": "e1",
///   "final states": ["done"],
///   "table": { "e1": { "1": { "write": "0", "R": "e2" }, "0": "L" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Optional display name, used by the catalogue and the CLI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// The symbol used to pad unused tape cells.
    pub blank: Symbol,
    /// The state the machine starts in.
    #[serde(rename = "start state")]
    pub start_state: State,
    /// Reaching any of these states halts the machine and accepts the input.
    #[serde(rename = "final states")]
    pub final_states: BTreeSet<State>,
    /// Transition table: state, then symbol read, to the instruction to apply.
    pub table: BTreeMap<State, BTreeMap<Symbol, Instruction>>,
}

impl Machine {
    /// Returns `true` if `state` is one of the accepting final states.
    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    /// Looks up the instruction for `state` reading `symbol`.
    pub fn instruction(&self, state: &str, symbol: Symbol) -> Option<&Instruction> {
        self.table.get(state).and_then(|row| row.get(&symbol))
    }

    /// Number of states with a row in the transition table.
    pub fn state_count(&self) -> usize {
        self.table.len()
    }

    /// Number of (state, symbol) entries in the transition table.
    pub fn transition_count(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    /// Checks the minimum needed to start executing the machine.
    ///
    /// The start state must be named, and must either be final or have a row in the table.
    /// Nothing else is analysed: missing entries surface as
    /// [`TuringMachineError::UndefinedTransition`] when they are actually reached.
    pub fn validate(&self) -> Result<(), TuringMachineError> {
        if self.start_state.is_empty() {
            return Err(TuringMachineError::InvalidMachine(
                "start state must not be empty".to_string(),
            ));
        }

        if !self.is_final(&self.start_state) && !self.table.contains_key(&self.start_state) {
            return Err(TuringMachineError::InvalidMachine(format!(
                "start state '{}' has no row in the transition table",
                self.start_state
            )));
        }

        Ok(())
    }
}

/// The direction the head moves after an instruction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    #[serde(rename = "L")]
    Left,
    /// Move the head one cell to the right.
    #[serde(rename = "R")]
    Right,
}

impl Direction {
    /// The change in head position caused by this move.
    pub fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// A single entry of the transition table.
///
/// In JSON an instruction is either a bare `"L"` / `"R"` string ([`Instruction::Move`]) or an
/// object with an optional `"write"` and exactly one of `"L"` / `"R"` whose value is the next
/// state ([`Instruction::WriteAndMove`]). Malformed objects are rejected while deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInstruction", into = "RawInstruction")]
pub enum Instruction {
    /// Move the head; nothing is written and the state is unchanged.
    Move(Direction),
    /// Optionally write a symbol, then move the head and enter `next_state`.
    WriteAndMove {
        write: Option<Symbol>,
        direction: Direction,
        next_state: State,
    },
}

impl Instruction {
    /// The direction the head moves when this instruction is applied.
    pub fn direction(&self) -> Direction {
        match self {
            Instruction::Move(direction) => *direction,
            Instruction::WriteAndMove { direction, .. } => *direction,
        }
    }

    /// The symbol written under the head, if any.
    pub fn write(&self) -> Option<Symbol> {
        match self {
            Instruction::Move(_) => None,
            Instruction::WriteAndMove { write, .. } => *write,
        }
    }

    /// The state entered after this instruction, if it changes state.
    pub fn next_state(&self) -> Option<&str> {
        match self {
            Instruction::Move(_) => None,
            Instruction::WriteAndMove { next_state, .. } => Some(next_state),
        }
    }
}

/// Wire shape of an instruction before validation.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawInstruction {
    Move(Direction),
    Compound(RawCompound),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    write: Option<String>,
    #[serde(rename = "L", default, skip_serializing_if = "Option::is_none")]
    left: Option<State>,
    #[serde(rename = "R", default, skip_serializing_if = "Option::is_none")]
    right: Option<State>,
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = TuringMachineError;

    fn try_from(raw: RawInstruction) -> Result<Self, Self::Error> {
        let compound = match raw {
            RawInstruction::Move(direction) => return Ok(Instruction::Move(direction)),
            RawInstruction::Compound(compound) => compound,
        };

        let write = match compound.write {
            None => None,
            Some(symbol) => {
                let mut chars = symbol.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(TuringMachineError::InvalidMachine(format!(
                            "write symbol {:?} must be exactly one character",
                            symbol
                        )))
                    }
                }
            }
        };

        let (direction, next_state) = match (compound.left, compound.right) {
            (Some(state), None) => (Direction::Left, state),
            (None, Some(state)) => (Direction::Right, state),
            (Some(_), Some(_)) => {
                return Err(TuringMachineError::InvalidMachine(
                    "instruction names both L and R".to_string(),
                ))
            }
            (None, None) => {
                return Err(TuringMachineError::InvalidMachine(
                    "instruction must name exactly one of L or R".to_string(),
                ))
            }
        };

        Ok(Instruction::WriteAndMove {
            write,
            direction,
            next_state,
        })
    }
}

impl From<Instruction> for RawInstruction {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Move(direction) => RawInstruction::Move(direction),
            Instruction::WriteAndMove {
                write,
                direction,
                next_state,
            } => {
                let (left, right) = match direction {
                    Direction::Left => (Some(next_state), None),
                    Direction::Right => (None, Some(next_state)),
                };
                RawInstruction::Compound(RawCompound {
                    write: write.map(String::from),
                    left,
                    right,
                })
            }
        }
    }
}

/// Snapshot of the machine taken before the instruction of a step is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub state: State,
    pub reading: Symbol,
    /// Head offset relative to the first input character.
    pub position: i64,
    /// Tape contents with the blank padding trimmed from both ends.
    pub memory: String,
    /// The instruction applied at this step.
    pub transition: Instruction,
}

/// The outcome of running a machine to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Final tape contents with the blank padding trimmed.
    pub output: String,
    /// One record per executed step, in order.
    pub history: Vec<ExecutionStep>,
    /// Whether the machine halted in a final state.
    pub accepted: bool,
}

impl From<Run> for (String, Vec<ExecutionStep>, bool) {
    fn from(run: Run) -> Self {
        (run.output, run.history, run.accepted)
    }
}

/// Represents the outcome of a single call to [`crate::TuringMachine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and may continue.
    Continue,
    /// The machine is in a final state.
    Halt,
}

/// How the tape behaves when the head walks past the cells allocated so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapeMode {
    /// The tape grows with blanks on demand at either end.
    #[default]
    Unbounded,
    /// The tape keeps its initial margin as a hard capacity limit.
    Bounded,
}

/// Execution settings for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of steps before giving up with [`TuringMachineError::StepLimitExceeded`].
    /// `None` runs until a final state is reached, however long that takes.
    pub max_steps: Option<usize>,
    /// Blank cells allocated on each side of the input.
    pub margin: usize,
    pub tape: TapeMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            margin: DEFAULT_TAPE_MARGIN,
            tape: TapeMode::default(),
        }
    }
}

/// Represents the errors that can occur while loading or executing a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// No table entry exists for the current state and the symbol under the head.
    #[error("No transition defined for state {0} reading {1:?}")]
    UndefinedTransition(State, Symbol),
    /// The head left a bounded tape.
    #[error("Tape boundary exceeded at position {0}")]
    TapeOverrun(i64),
    /// The step cap was reached before a final state.
    #[error("Step limit of {0} reached before a final state")]
    StepLimitExceeded(usize),
    /// The machine definition is well-formed JSON but not a valid machine.
    #[error("Invalid machine definition: {0}")]
    InvalidMachine(String),
    /// The machine definition is not valid JSON.
    #[error("Machine parsing error: {0}")]
    ParseError(String),
    /// Reading a definition from the file system failed.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"L\"");
        assert_eq!(serde_json::to_string(&Direction::Right).unwrap(), "\"R\"");

        let right: Direction = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(right, Direction::Right);
        assert_eq!(right.delta(), 1);
        assert_eq!(Direction::Left.delta(), -1);
    }

    #[test]
    fn test_bare_move_instruction() {
        let instruction: Instruction = serde_json::from_value(json!("L")).unwrap();
        assert_eq!(instruction, Instruction::Move(Direction::Left));
        assert_eq!(instruction.next_state(), None);
        assert_eq!(instruction.write(), None);
    }

    #[test]
    fn test_compound_instruction() {
        let instruction: Instruction =
            serde_json::from_value(json!({"write": "0", "R": "e2"})).unwrap();
        assert_eq!(
            instruction,
            Instruction::WriteAndMove {
                write: Some('0'),
                direction: Direction::Right,
                next_state: "e2".to_string(),
            }
        );

        let without_write: Instruction = serde_json::from_value(json!({"L": "done"})).unwrap();
        assert_eq!(without_write.write(), None);
        assert_eq!(without_write.direction(), Direction::Left);
        assert_eq!(without_write.next_state(), Some("done"));
    }

    #[test]
    fn test_instruction_keeps_json_shape() {
        let compound = Instruction::WriteAndMove {
            write: Some(' '),
            direction: Direction::Left,
            next_state: "rewrite".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&compound).unwrap(),
            json!({"write": " ", "L": "rewrite"})
        );
        assert_eq!(
            serde_json::to_value(Instruction::Move(Direction::Right)).unwrap(),
            json!("R")
        );
    }

    #[test]
    fn test_malformed_instructions_are_rejected() {
        for bad in [
            json!({"write": "1"}),
            json!({"write": "1", "L": "a", "R": "b"}),
            json!({"write": "10", "R": "a"}),
            json!({"R": "a", "move": "L"}),
            json!("S"),
        ] {
            assert!(
                serde_json::from_value::<Instruction>(bad.clone()).is_err(),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_machine_deserialization() {
        let machine: Machine = serde_json::from_value(json!({
            "blank": " ",
            "start state": "right",
            "final states": ["done"],
            "table": {
                "right": {"1": "R", " ": {"L": "done"}},
                "done": {}
            }
        }))
        .unwrap();

        assert_eq!(machine.blank, ' ');
        assert_eq!(machine.start_state, "right");
        assert!(machine.is_final("done"));
        assert!(!machine.is_final("right"));
        assert_eq!(
            machine.instruction("right", '1'),
            Some(&Instruction::Move(Direction::Right))
        );
        assert_eq!(machine.instruction("right", '0'), None);
        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.transition_count(), 2);
        assert!(machine.validate().is_ok());
    }

    #[test]
    fn test_blank_must_be_one_character() {
        let result = serde_json::from_value::<Machine>(json!({
            "blank": "__",
            "start state": "a",
            "final states": ["a"],
            "table": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_start_state() {
        let mut machine: Machine = serde_json::from_value(json!({
            "blank": "0",
            "start state": "missing",
            "final states": ["done"],
            "table": {"done": {}}
        }))
        .unwrap();
        assert!(matches!(
            machine.validate(),
            Err(TuringMachineError::InvalidMachine(_))
        ));

        machine.start_state = "done".to_string();
        assert!(machine.validate().is_ok());

        machine.start_state.clear();
        assert!(machine.validate().is_err());
    }

    #[test]
    fn test_run_into_tuple() {
        let run = Run {
            output: "101".to_string(),
            history: Vec::new(),
            accepted: true,
        };
        let (output, history, accepted): (String, Vec<ExecutionStep>, bool) = run.into();
        assert_eq!(output, "101");
        assert!(history.is_empty());
        assert!(accepted);
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::UndefinedTransition("e1".to_string(), 'x');

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("No transition defined"));
        assert!(error_msg.contains("e1"));
        assert!(error_msg.contains("'x'"));
    }
}
