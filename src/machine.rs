//! This module defines the `TuringMachine` struct, which executes a single-tape machine
//! definition over an input string, recording a snapshot of every step, and the
//! `run_turing_machine` entry point built on top of it.

use crate::tape::Tape;
use crate::types::{
    ExecutionStep, Instruction, Machine, Run, RunConfig, Step, Symbol, TuringMachineError,
};
use tracing::{debug, info};

/// Runs `machine` on `input` until it reaches a final state.
///
/// `steps` caps the number of executed steps; when it is reached before a final state the
/// run fails with [`TuringMachineError::StepLimitExceeded`]. With `None` the run only ends
/// in a final state or on an error, so a machine with no path to a final state never returns.
///
/// # Returns
///
/// * `Ok(Run)` with the trimmed final tape, the execution history and `accepted == true`.
/// * `Err(TuringMachineError::UndefinedTransition)` if the table has no entry for a
///   reached (state, symbol) pair.
/// * `Err(TuringMachineError::StepLimitExceeded)` if the step cap is hit.
pub fn run_turing_machine(
    machine: &Machine,
    input: &str,
    steps: Option<usize>,
) -> Result<Run, TuringMachineError> {
    let config = RunConfig {
        max_steps: steps,
        ..RunConfig::default()
    };

    TuringMachine::with_config(machine, input, config)?.run()
}

/// An executing single-tape Turing machine.
///
/// The machine borrows its definition and owns everything mutable about the run: the tape,
/// the head position, the current state and the history recorded so far.
#[derive(Debug, Clone)]
pub struct TuringMachine<'a> {
    machine: &'a Machine,
    config: RunConfig,
    input: String,
    tape: Tape,
    state: String,
    position: i64,
    reading: Symbol,
    history: Vec<ExecutionStep>,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a machine positioned on the first input character, using the default
    /// [`RunConfig`].
    pub fn new(machine: &'a Machine, input: &str) -> Result<Self, TuringMachineError> {
        Self::with_config(machine, input, RunConfig::default())
    }

    /// Creates a machine with an explicit run configuration.
    ///
    /// Fails only if the tape is bounded and has no cell under the initial head position.
    pub fn with_config(
        machine: &'a Machine,
        input: &str,
        config: RunConfig,
    ) -> Result<Self, TuringMachineError> {
        let tape = Tape::new(input, machine.blank, config.margin, config.tape);
        let reading = tape.read(0)?;

        Ok(Self {
            machine,
            config,
            input: input.to_string(),
            tape,
            state: machine.start_state.clone(),
            position: 0,
            reading,
            history: Vec::new(),
            step_count: 0,
        })
    }

    /// Executes a single step.
    ///
    /// The snapshot for the step is recorded before its instruction is applied. Once the
    /// machine is in a final state nothing is recorded and `Step::Halt` is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if an instruction was applied.
    /// * `Ok(Step::Halt)` if the machine is in a final state.
    /// * `Err(_)` on a missing transition, a tape overrun or the step cap.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        if self.is_halted() {
            return Ok(Step::Halt);
        }

        let instruction = self
            .machine
            .instruction(&self.state, self.reading)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::UndefinedTransition(self.state.clone(), self.reading)
            })?;

        if let Some(limit) = self.config.max_steps {
            if self.step_count >= limit {
                return Err(TuringMachineError::StepLimitExceeded(limit));
            }
        }

        // Nothing is committed until the cell under the new head position is readable.
        let next_position = self.position + instruction.direction().delta();
        let next_reading = self.tape.read(next_position)?;

        debug!(
            step = self.step_count,
            state = %self.state,
            reading = ?self.reading,
            position = self.position,
            "applying transition"
        );

        self.history.push(ExecutionStep {
            state: self.state.clone(),
            reading: self.reading,
            position: self.position,
            memory: self.tape.contents(),
            transition: instruction.clone(),
        });

        if let Instruction::WriteAndMove {
            write, next_state, ..
        } = instruction
        {
            if let Some(symbol) = write {
                self.tape.write(self.position, symbol)?;
            }
            self.state = next_state;
        }

        self.position = next_position;
        self.reading = next_reading;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Steps until the machine reaches a final state.
    pub fn run(&mut self) -> Result<Run, TuringMachineError> {
        while self.step()? == Step::Continue {}

        info!(
            state = %self.state,
            steps = self.step_count,
            "machine reached a final state"
        );

        Ok(Run {
            output: self.output(),
            history: self.history.clone(),
            accepted: self.is_halted(),
        })
    }

    /// Restores the initial tape, state and head position and clears the history.
    pub fn reset(&mut self) {
        self.tape = Tape::new(
            &self.input,
            self.machine.blank,
            self.config.margin,
            self.config.tape,
        );
        self.state = self.machine.start_state.clone();
        self.position = 0;
        // Position 0 was readable when the machine was created.
        self.reading = self.tape.read(0).unwrap_or(self.machine.blank);
        self.history.clear();
        self.step_count = 0;
    }

    /// Returns `true` once the machine is in one of its final states.
    pub fn is_halted(&self) -> bool {
        self.machine.is_final(&self.state)
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the head position relative to the first input character.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Returns the symbol under the head.
    pub fn reading(&self) -> Symbol {
        self.reading
    }

    /// Returns the number of steps executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the steps recorded so far.
    pub fn history(&self) -> &[ExecutionStep] {
        &self.history
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the current tape contents with the blank padding trimmed.
    pub fn output(&self) -> String {
        self.tape.contents()
    }
}
