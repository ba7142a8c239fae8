use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use turingtoy::{
    ExecutionStep, Machine, MachineLoader, MachineManager, RunConfig, Step, TapeMode,
    TuringMachine, DEFAULT_MAX_STEPS,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  turingtoy-cli --builtin double --input 111
  turingtoy-cli --machine adder.json --input 11+1 --input 1011+11001 --json")]
struct Cli {
    /// Path to a JSON machine definition
    #[clap(short, long, conflicts_with = "builtin")]
    machine: Option<PathBuf>,

    /// Name of a built-in machine (see --list)
    #[clap(short, long)]
    builtin: Option<String>,

    /// Input string; repeat to run the machine on several inputs
    #[clap(short, long, required_unless_present = "list")]
    input: Vec<String>,

    /// Give up after this many steps
    #[clap(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Keep the tape at its initial margin instead of growing it
    #[clap(long)]
    bounded: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the machine, input, output and history as JSON
    #[clap(long)]
    json: bool,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for (index, name) in MachineManager::list_machine_names().iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    let machine = load_machine(&cli)?;
    info!(
        machine = %machine.name,
        start_state = %machine.start_state,
        inputs = cli.input.len(),
        "loaded machine"
    );
    let config = RunConfig {
        max_steps: Some(cli.max_steps),
        tape: if cli.bounded {
            TapeMode::Bounded
        } else {
            TapeMode::Unbounded
        },
        ..RunConfig::default()
    };

    for input in &cli.input {
        run_input(&cli, &machine, input, config)
            .with_context(|| format!("failed to run machine on input {input:?}"))?;
    }

    Ok(())
}

fn load_machine(cli: &Cli) -> Result<Machine> {
    match (&cli.machine, &cli.builtin) {
        (Some(path), _) => MachineLoader::load_machine(path)
            .with_context(|| format!("failed to load machine from {}", path.display())),
        (None, Some(name)) => MachineManager::get_machine_by_name(name)
            .with_context(|| format!("unknown built-in machine {name:?}")),
        (None, None) => bail!("either --machine or --builtin is required"),
    }
}

fn run_input(cli: &Cli, machine: &Machine, input: &str, config: RunConfig) -> Result<()> {
    let mut tm = TuringMachine::with_config(machine, input, config)?;

    if cli.debug && !cli.json {
        let mut printed = 0;
        while tm.step()? == Step::Continue {
            print_step(&tm.history()[printed]);
            printed += 1;
        }
        println!("\nMachine halted in state {}.", tm.state());
    }

    let run = tm.run()?;

    if cli.json {
        let document = json!({
            "machine": machine,
            "input": input,
            "output": run.output,
            "execution_history": run.history,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", run.output);
    }

    Ok(())
}

fn print_step(step: &ExecutionStep) {
    let transition = serde_json::to_string(&step.transition).unwrap_or_default();
    println!(
        "State: {}, Reading: {:?}, Position: {}, Memory: {:?}, Transition: {}",
        step.state, step.reading, step.position, step.memory, transition
    );
}
