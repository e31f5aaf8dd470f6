//! # Distributed Tournament-Tree Minimum Extraction Sort
//!
//! Sorts a finite integer sequence by spreading it over the leaves of a
//! complete binary tree of worker nodes. The nodes repeatedly extract the
//! global minimum through synchronous, round-based rendezvous messages.
//!
//! ## Core Algorithm
//!
//! 1. **Topology**: node `i` has children `2i+1`, `2i+2`; ids at or above
//!    `first_leaf = (p+1)/2 − 1` are leaves
//! 2. **Refill**: an internal node with no candidate takes the smaller of
//!    its children's offers (`Empty` ranks last, ties go left)
//! 3. **Offer**: every non-root node offers its candidate upward and adopts
//!    the reply (`Empty` = consumed, same value = retry, `Stop` = halt)
//! 4. **Emission**: the root hands each candidate to the emitter
//! 5. **Termination cascade**: a node whose children are both drained
//!    closes their edges with `Stop`; the root doing so ends the run
//!
//! ## Usage Example
//!
//! ```
//! use tournament_sort::{SortConfig, Sorter};
//!
//! let input = [3, 1, 4, 1, 5];
//! let config = SortConfig::balanced_for(input.len());
//! let report = Sorter::new(config).run(&input)?;
//! assert_eq!(report.sorted, vec![1, 1, 3, 4, 5]);
//! # Ok::<(), tournament_sort::SortError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - each implements a key component of the algorithm
pub mod tree;    // Topology arithmetic
pub mod slot;    // Tagged candidate values and sentinel discipline
pub mod machine; // Per-node extraction state machine
pub mod ledger;  // Termination cascade record
pub mod trace;   // Per-node transcripts
pub mod runtime; // Lock-step and threaded drivers
pub mod input;   // Input boundary and I/O wrappers

// Re-exports for convenience
pub use input::{Assignment, InputDistributor, InputFormat};
pub use ledger::StopLedger;
pub use machine::{Action, NodeMachine, NodeStatus};
pub use runtime::{EmitFn, Emitter, RuntimeKind};
pub use slot::{IntegerFrames, SentinelPolicy, Side, Value};
pub use trace::{TraceEntry, TraceEvent, Transcript};
pub use tree::{NodeId, Role, Topology};

use thiserror::Error;
use tracing::info;

/// Configuration parameters for a sort run
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Total node count p
    pub nodes: usize,

    /// Number of input elements n
    pub elements: usize,

    /// Driver executing the node machines
    pub runtime: RuntimeKind,

    /// Which integers the input may not contain
    pub sentinels: SentinelPolicy,

    /// Record per-node transcripts
    pub record_trace: bool,
}

impl SortConfig {
    /// Smallest perfect tree with at least `elements` leaves
    pub fn balanced_for(elements: usize) -> Self {
        Self {
            nodes: Topology::balanced_for(elements).node_count(),
            elements,
            runtime: RuntimeKind::default(),
            sentinels: SentinelPolicy::default(),
            record_trace: false,
        }
    }

    /// Explicit node count p
    pub fn with_nodes(nodes: usize, elements: usize) -> Self {
        Self {
            nodes,
            ..Self::balanced_for(elements)
        }
    }

    /// Select the runtime
    pub fn with_runtime(mut self, runtime: RuntimeKind) -> Self {
        self.runtime = runtime;
        self
    }

    /// Select the sentinel policy
    pub fn with_sentinels(mut self, sentinels: SentinelPolicy) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Enable transcript recording
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// Validate and resolve the tree shape
    pub fn topology(&self) -> Result<Topology, SortError> {
        Topology::new(self.nodes, self.elements)
    }
}

/// Result of a sort run
#[derive(Debug, Clone)]
pub struct SortReport {
    /// Values in emission order
    pub sorted: Vec<i64>,

    /// Which nodes stopped, and when
    pub ledger: StopLedger,

    /// Rounds executed by the root
    pub root_rounds: u64,

    /// Per-node transcripts (if enabled)
    pub transcript: Option<Transcript>,
}

/// Errors that can occur during a sort run
#[derive(Error, Debug)]
pub enum SortError {
    /// Invalid tree shape or option
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Fewer leaves than input elements
    #[error("Tree has {leaves} leaves but input has {elements} elements")]
    InsufficientLeaves {
        /// Leaves available
        leaves: usize,
        /// Elements to place
        elements: usize,
    },

    /// Input value equals a reserved sentinel frame
    #[error("Input value {value} at position {index} collides with a reserved sentinel")]
    SentinelCollision {
        /// Offending value
        value: i64,
        /// Position within the input
        index: usize,
    },

    /// Expected message from a peer can never arrive
    #[error("Channel between node {node} and node {peer} is broken")]
    Channel {
        /// Node that observed the failure
        node: NodeId,
        /// Peer it was talking to
        peer: NodeId,
    },

    /// Simulator found no deliverable message while nodes were active
    #[error("No rendezvous can complete; active nodes: {pending:?}")]
    Stalled {
        /// Nodes still active
        pending: Vec<NodeId>,
    },

    /// Run ended with nodes that never stopped
    #[error("Termination cascade incomplete; active nodes: {pending:?}")]
    IncompleteCascade {
        /// Nodes still active
        pending: Vec<NodeId>,
    },

    /// Worker thread panicked
    #[error("Worker for node {0} panicked")]
    WorkerPanicked(NodeId),

    /// Worker thread could not be started
    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Main sort orchestrator
///
/// Validates configuration, distributes the input, then hands the node
/// machines to the configured runtime.
#[derive(Debug, Clone)]
pub struct Sorter {
    config: SortConfig,
}

impl Sorter {
    /// Create new sorter
    pub fn new(config: SortConfig) -> Self {
        Self { config }
    }

    /// Access configuration
    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Sort `input`, collecting the output
    pub fn run(&self, input: &[i64]) -> Result<SortReport, SortError> {
        let mut sorted = Vec::with_capacity(input.len());
        let mut report = self.run_with(input, &mut sorted)?;
        report.sorted = sorted;
        Ok(report)
    }

    /// Sort `input`, streaming values to `emitter` as the root emits them
    ///
    /// The returned report's `sorted` field is left empty.
    pub fn run_with(
        &self,
        input: &[i64],
        emitter: &mut dyn Emitter,
    ) -> Result<SortReport, SortError> {
        if input.len() != self.config.elements {
            return Err(SortError::InvalidConfiguration(format!(
                "configured for {} elements but input has {}",
                self.config.elements,
                input.len()
            )));
        }

        // Configuration and input are checked before any round runs
        let topology = self.config.topology()?;
        let assignment = InputDistributor::new(&topology, self.config.sentinels).distribute(input)?;

        let machines: Vec<NodeMachine> = topology
            .nodes()
            .map(|id| {
                NodeMachine::new(id, &topology, assignment.initial(id))
                    .with_trace(self.config.record_trace)
            })
            .collect();

        info!(
            nodes = topology.node_count(),
            leaves = topology.leaf_count(),
            elements = input.len(),
            runtime = %self.config.runtime,
            "starting sort"
        );

        let mut finished = self.config.runtime.execute(machines, emitter)?;

        let mut ledger = StopLedger::new(topology.node_count());
        for machine in &finished {
            if machine.status() == NodeStatus::Stopped {
                ledger.mark_stopped(machine.id(), machine.round());
            }
        }
        if !ledger.all_stopped() {
            return Err(SortError::IncompleteCascade {
                pending: ledger.pending(),
            });
        }

        let root_rounds = ledger.halt_round(NodeId::ROOT).unwrap_or(0);
        let transcript = self.config.record_trace.then(|| {
            Transcript::from_logs(finished.iter_mut().map(NodeMachine::take_log).collect())
        });

        info!(root_rounds, "sort finished");

        Ok(SortReport {
            sorted: Vec::new(),
            ledger,
            root_rounds,
            transcript,
        })
    }
}
