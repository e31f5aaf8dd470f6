use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tournament_sort::input::{read_numbers, write_input_line, WriteEmitter};
use tournament_sort::{
    InputFormat, IntegerFrames, NodeId, RuntimeKind, SentinelPolicy, SortConfig, Sorter, Topology,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tournament-sort",
    about = "Minimum extraction sort on a tree of rendezvous-connected workers"
)]
struct Cli {
    /// Log protocol transitions (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort the numbers in a file and print them one per line.
    Sort {
        /// Input file (raw bytes by default, one number per byte).
        input: PathBuf,
        /// Input encoding: bytes or text.
        #[arg(long, default_value_t = InputFormat::Bytes)]
        format: InputFormat,
        /// Total worker count p (odd, at least 3). Defaults to the smallest perfect tree.
        #[arg(long)]
        nodes: Option<usize>,
        /// Runtime: lockstep or threaded.
        #[arg(long, default_value_t = RuntimeKind::Lockstep)]
        runtime: RuntimeKind,
        /// Reserve integer sentinel frames (-1 = empty, -2 = stop) and reject inputs using them.
        #[arg(long)]
        frames: bool,
        /// Print the protocol transcript fingerprint to stderr.
        #[arg(long)]
        fingerprint: bool,
        /// Dump the full protocol transcript to stderr.
        #[arg(long)]
        dump_trace: bool,
    },
    /// Print the role, parent and children of every node.
    Topology {
        /// Total worker count p.
        #[arg(long)]
        nodes: Option<usize>,
        /// Number of input elements n.
        #[arg(long, default_value_t = 0)]
        elements: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sort {
            input,
            format,
            nodes,
            runtime,
            frames,
            fingerprint,
            dump_trace,
        } => run_sort(SortArgs {
            input,
            format,
            nodes,
            runtime,
            frames,
            fingerprint,
            dump_trace,
        })?,
        Commands::Topology { nodes, elements } => run_topology(nodes, elements)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

struct SortArgs {
    input: PathBuf,
    format: InputFormat,
    nodes: Option<usize>,
    runtime: RuntimeKind,
    frames: bool,
    fingerprint: bool,
    dump_trace: bool,
}

fn run_sort(args: SortArgs) -> Result<()> {
    let numbers = read_numbers(&args.input, args.format)?;

    let sentinels = if args.frames {
        SentinelPolicy::Frames(IntegerFrames::default())
    } else {
        SentinelPolicy::Disjoint
    };
    let config = match args.nodes {
        Some(nodes) => SortConfig::with_nodes(nodes, numbers.len()),
        None => SortConfig::balanced_for(numbers.len()),
    }
    .with_runtime(args.runtime)
    .with_sentinels(sentinels)
    .with_trace(args.fingerprint || args.dump_trace);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_input_line(&mut out, &numbers)?;

    let mut emitter = WriteEmitter::new(out);
    let report = Sorter::new(config)
        .run_with(&numbers, &mut emitter)
        .with_context(|| format!("sorting {} failed", args.input.display()))?;
    emitter.finish()?;

    if let Some(transcript) = report.transcript {
        if args.dump_trace {
            eprint!("{}", transcript.render(sentinels.frames()));
        }
        if args.fingerprint {
            eprintln!(
                "fingerprint={} messages={} root_rounds={}",
                transcript.fingerprint().to_hex(),
                transcript.message_count(),
                report.root_rounds
            );
        }
    }

    Ok(())
}

fn run_topology(nodes: Option<usize>, elements: usize) -> Result<()> {
    let topology = match nodes {
        Some(nodes) => Topology::new(nodes, elements).context("invalid topology")?,
        None => Topology::balanced_for(elements),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "nodes={} leaves={} first_leaf={} height={}",
        topology.node_count(),
        topology.leaf_count(),
        topology.first_leaf(),
        topology.height()
    )?;

    for id in topology.nodes() {
        let parent = id
            .parent()
            .map_or_else(|| "-".to_string(), |parent: NodeId| parent.index().to_string());
        let children = topology
            .children(id)
            .map_or_else(|| "-".to_string(), |(l, r)| format!("{},{}", l.index(), r.index()));
        writeln!(
            out,
            "{}\t{:?}\tparent={}\tchildren={}",
            id.index(),
            topology.role(id),
            parent,
            children
        )?;
    }

    Ok(())
}
