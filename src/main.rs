use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use automata::config::LayoutConfig;
use automata::layout::GridPlacement;
use automata::{dfa, nfa, Automaton, AutomatonError};

#[derive(Parser)]
#[command(name = "automata")]
#[command(about = "Inspect and transform finite automata stored as JSON snapshots")]
#[command(version)]
struct Cli {
    /// Grid for the states created by `determinize` and `minimize`
    #[arg(short, long, global = true)]
    layout: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print state, transition and alphabet counts
    Info {
        file: PathBuf,
    },

    /// Tell whether the automaton is deterministic
    Check {
        file: PathBuf,
    },

    /// Run input strings through the automaton
    Accepts {
        file: PathBuf,

        #[arg(required = true)]
        inputs: Vec<String>,

        /// Simulate nondeterministically instead of requiring a DFA
        #[arg(short, long)]
        nondeterministic: bool,
    },

    /// Convert an NFA into an equivalent DFA
    Determinize {
        file: PathBuf,
    },

    /// Minimize a DFA
    Minimize {
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut placement = GridPlacement::new(load_layout(cli.layout.as_deref())?);

    match cli.command {
        Commands::Info { file } => {
            println!("{}", load(&file)?.summary());
        }
        Commands::Check { file } => {
            let aut = load(&file)?;
            if dfa::is_dfa(&aut) {
                println!("The automaton is deterministic (DFA)");
            } else if dfa::is_deterministic(&aut) {
                println!("The automaton has epsilon moves (NFA)");
            } else {
                println!("The automaton is non-deterministic (NFA)");
            }
        }
        Commands::Accepts {
            file,
            inputs,
            nondeterministic,
        } => {
            let aut = load(&file)?;
            for input in inputs {
                let verdict = if nondeterministic {
                    nfa::accepts(&aut, &input)
                } else {
                    dfa::accepts(&aut, &input)
                };
                match verdict {
                    Ok(true) => println!("{:?}: accepted", input),
                    Ok(false) => println!("{:?}: rejected", input),
                    Err(AutomatonError::UnknownSymbol(symbol)) => {
                        println!("{:?}: rejected, `{}` is not in the alphabet", input, symbol)
                    }
                    Err(e) => {
                        return Err(e).with_context(|| format!("cannot test {:?}", input));
                    }
                }
            }
        }
        Commands::Determinize { file } => {
            let aut = load(&file)?;
            let det = nfa::to_dfa_with(&aut, &mut placement)?;
            emit(&det, cli.pretty)?;
        }
        Commands::Minimize { file } => {
            let aut = load(&file)?;
            let min = dfa::minimize_with(&aut, &mut placement)?;
            emit(&min, cli.pretty)?;
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Automaton> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Automaton::from_json(&contents).with_context(|| format!("Failed to load {}", path.display()))
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let path = match path {
        Some(path) => path,
        None => return Ok(LayoutConfig::default()),
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    LayoutConfig::from_json(&contents)
        .with_context(|| format!("Failed to parse layout {}", path.display()))
}

fn emit(aut: &Automaton, pretty: bool) -> Result<()> {
    let json = if pretty {
        aut.to_json_pretty()?
    } else {
        aut.to_json()?
    };
    println!("{}", json);
    Ok(())
}
