//! DAG editor command-line driver.
//!
//! Provides the `dagedit` binary. `replay` loads a graph state from JSON,
//! pushes a JSON array of operations through the engine, optionally undoes
//! some of them, and prints the resulting state. `add` appends a node with a
//! freshly minted id. `check` validates a state file and `seed` prints the
//! demo graph.
//!
//! Rejected operations are reported on stderr as JSON lines of the form
//! `{"kind", "message", "context"}`; they never stop the replay.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use dagedit_core::seed::demo_state;
use dagedit_core::{
    AddOp, ContainerId, CoreError, DagError, DagState, Engine, EngineConfig, ErrorReport, NodeId,
    NodeIdGenerator, Operation,
};

/// Multi-parent DAG editing tools.
#[derive(Parser)]
#[command(name = "dagedit", about = "Multi-parent DAG editing tools")]
struct Cli {
    /// Log engine activity at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Apply an operation script to a state and print the result.
    Replay {
        /// Path to the initial state JSON. Defaults to the demo graph.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Path to a JSON array of operations.
        #[arg(short, long)]
        ops: PathBuf,

        /// Number of operations to undo after the script has run.
        #[arg(short, long, default_value_t = 0)]
        undo: usize,

        /// Maximum undo depth kept by the engine.
        #[arg(long)]
        history_limit: Option<usize>,

        /// Print the committed history instead of the final state.
        #[arg(long)]
        history: bool,
    },

    /// Add a node with a generated id and print the resulting state.
    Add {
        /// Path to the initial state JSON. Defaults to the demo graph.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Container to place the node in (`root` or `<id>-children`).
        #[arg(short, long, default_value = "root")]
        parent: ContainerId,

        /// Label of the new node.
        label: String,

        /// Position in the container. Defaults to the end.
        #[arg(short, long)]
        index: Option<usize>,

        /// Seed for the id generator, for reproducible ids.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate a state file.
    Check {
        /// Path to the state JSON.
        state: PathBuf,
    },

    /// Print the demo graph.
    Seed,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid state: {0}")]
    State(#[from] CoreError),

    #[error("invalid operation script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("edit rejected: {0}")]
    Rejected(#[from] DagError),
}

impl CliError {
    /// 1 = invalid input, 2 = edit rejected, 3 = I/O error.
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Read { .. } => 3,
            CliError::Rejected(_) => 2,
            CliError::State(_) | CliError::Script(_) => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Replay {
            state,
            ops,
            undo,
            history_limit,
            history,
        } => run_replay(state.as_deref(), &ops, undo, EngineConfig { history_limit }, history),
        Commands::Add {
            state,
            parent,
            label,
            index,
            seed,
        } => run_add(state.as_deref(), &parent, label, index, seed),
        Commands::Check { state } => run_check(&state),
        Commands::Seed => print_json(&demo_state()),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_state(path: Option<&Path>) -> Result<DagState, CliError> {
    match path {
        Some(path) => Ok(DagState::from_json(&read(path)?)?),
        None => Ok(demo_state()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the replay subcommand.
fn run_replay(
    state_path: Option<&Path>,
    ops_path: &Path,
    undo: usize,
    config: EngineConfig,
    show_history: bool,
) -> Result<(), CliError> {
    let state = load_state(state_path)?;
    let script: Vec<Operation> = serde_json::from_str(&read(ops_path)?)?;
    let mut engine = Engine::with_config(state, config)?;

    for report in replay(&mut engine, script, undo) {
        eprintln!("{}", serde_json::to_string(&report)?);
    }

    if show_history {
        print_json(&engine.history())
    } else {
        print_json(engine.state())
    }
}

/// Dispatches every operation in order, then undoes `undo` of them.
/// Returns the reports of the rejected operations.
fn replay(engine: &mut Engine, script: Vec<Operation>, undo: usize) -> Vec<ErrorReport> {
    let mut rejected = Vec::new();
    for op in script {
        if let Err(err) = engine.dispatch(op) {
            rejected.push(err.report());
        }
    }
    for _ in 0..undo {
        if engine.undo().is_none() {
            break;
        }
    }
    rejected
}

/// Execute the add subcommand.
fn run_add(
    state_path: Option<&Path>,
    parent: &ContainerId,
    label: String,
    index: Option<usize>,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let mut engine = Engine::new(load_state(state_path)?)?;
    let mut ids = match seed {
        Some(seed) => NodeIdGenerator::from_seed(seed),
        None => NodeIdGenerator::from_entropy(),
    };
    let id = add_node(&mut engine, &mut ids, parent, label, index)?;
    tracing::info!(node = %id, container = %parent, "added node");
    print_json(engine.state())
}

/// Mints an unused id and adds it to `parent` at `index` (or the end).
fn add_node(
    engine: &mut Engine,
    ids: &mut NodeIdGenerator,
    parent: &ContainerId,
    label: String,
    index: Option<usize>,
) -> Result<NodeId, DagError> {
    let id = ids.next_unused(engine.state());
    let index = index.unwrap_or_else(|| engine.state().layout.container(parent).len());
    engine.dispatch(Operation::Add(AddOp {
        id: id.clone(),
        parent_id: parent.clone(),
        label,
        index,
    }))?;
    Ok(id)
}

/// Execute the check subcommand.
fn run_check(path: &Path) -> Result<(), CliError> {
    let state = DagState::from_json(&read(path)?)?;
    println!(
        "ok: {} node(s), {} live",
        state.nodes.len(),
        state.layout.live_node_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagedit_core::ErrorKind;

    #[test]
    fn replay_collects_rejections_and_undoes() {
        let mut engine = Engine::new(demo_state()).unwrap();
        let script: Vec<Operation> = serde_json::from_str(
            r#"[
                {"change_label": {"id": "A", "old_label": "Alpha", "new_label": "Alpha!"}},
                {"move": {"id": "A1", "from_parent_id": "A-children", "to_parent_id": "root",
                          "from_index": 0, "to_index": 2}},
                {"move": {"id": "A", "from_parent_id": "root", "to_parent_id": "A2-children",
                          "from_index": 0, "to_index": 0}},
                {"delete": {"id": "A2", "parent_id": "A-children", "label": "Alpha-child-2",
                            "index": 0, "children_ids": []}}
            ]"#,
        )
        .unwrap();

        let rejected = replay(&mut engine, script, 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].kind, ErrorKind::CycleDetected);
        assert_eq!(engine.history().len(), 2);

        // The delete was undone; the move of A1 and the rename stay.
        let state = engine.state();
        assert!(state.contains_node(&NodeId::from("A2")));
        assert_eq!(state.label(&NodeId::from("A")), Some("Alpha!"));
        assert_eq!(
            state.layout.container(&ContainerId::Root),
            &[NodeId::from("A"), NodeId::from("B"), NodeId::from("A1")]
        );
        assert_eq!(
            state.layout.container(&NodeId::from("A").children()),
            &[NodeId::from("A2")]
        );
    }

    #[test]
    fn add_node_mints_distinct_ids() {
        let mut engine = Engine::new(demo_state()).unwrap();
        let mut ids = NodeIdGenerator::from_seed(9);
        let b_children = NodeId::from("B").children();

        let first = add_node(&mut engine, &mut ids, &b_children, "One".into(), None).unwrap();
        let second = add_node(&mut engine, &mut ids, &b_children, "Two".into(), Some(0)).unwrap();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with('N'));
        assert_eq!(
            engine.state().layout.container(&b_children),
            &[second.clone(), NodeId::from("A"), first.clone()]
        );
        assert_eq!(engine.state().label(&second), Some("Two"));
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn cli_parses_add_parent() {
        let cli = Cli::try_parse_from(["dagedit", "add", "--parent", "A-children", "New"]).unwrap();
        match cli.command {
            Commands::Add {
                parent, label, seed, ..
            } => {
                assert_eq!(parent, NodeId::from("A").children());
                assert_eq!(label, "New");
                assert!(seed.is_none());
            }
            _ => panic!("expected add"),
        }
        assert!(Cli::try_parse_from(["dagedit", "add", "--parent=-children", "New"]).is_err());
    }

    #[test]
    fn cli_parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "dagedit", "-v", "replay", "--ops", "ops.json", "--undo", "2", "--history-limit", "5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Replay {
                state,
                undo,
                history_limit,
                ..
            } => {
                assert!(state.is_none());
                assert_eq!(undo, 2);
                assert_eq!(history_limit, Some(5));
            }
            _ => panic!("expected replay"),
        }
    }
}
