//! Drivers that execute node machines
//!
//! The algorithm does not care how many physical workers carry the
//! logical tree:
//! - [`lockstep`] drives every node cooperatively on the calling thread
//! - [`threaded`] runs one OS thread per node over rendezvous channels

pub mod lockstep;
pub mod threaded;

use std::fmt;
use std::str::FromStr;

use crate::machine::NodeMachine;
use crate::SortError;

/// Consumer of the root's emitted values, in emission order
pub trait Emitter {
    /// Accept the next value of the sorted sequence
    fn emit(&mut self, value: i64);
}

impl Emitter for Vec<i64> {
    fn emit(&mut self, value: i64) {
        self.push(value);
    }
}

/// Adapter turning a closure into an [`Emitter`]
#[derive(Debug)]
pub struct EmitFn<F>(pub F);

impl<F: FnMut(i64)> Emitter for EmitFn<F> {
    fn emit(&mut self, value: i64) {
        (self.0)(value);
    }
}

/// Which driver executes the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeKind {
    /// Single-threaded cooperative simulation
    #[default]
    Lockstep,
    /// One thread per node, rendezvous channels per edge
    Threaded,
}

impl RuntimeKind {
    /// Run `machines` (index = node id) to completion
    pub fn execute(
        self,
        machines: Vec<NodeMachine>,
        emitter: &mut dyn Emitter,
    ) -> Result<Vec<NodeMachine>, SortError> {
        match self {
            RuntimeKind::Lockstep => {
                let mut machines = machines;
                lockstep::run(&mut machines, emitter)?;
                Ok(machines)
            }
            RuntimeKind::Threaded => threaded::run(machines, emitter),
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeKind::Lockstep => f.write_str("lockstep"),
            RuntimeKind::Threaded => f.write_str("threaded"),
        }
    }
}

impl FromStr for RuntimeKind {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lockstep" => Ok(RuntimeKind::Lockstep),
            "threaded" => Ok(RuntimeKind::Threaded),
            other => Err(SortError::InvalidConfiguration(format!(
                "unknown runtime '{}', expected 'lockstep' or 'threaded'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_kind_parse() {
        assert_eq!("lockstep".parse::<RuntimeKind>().unwrap(), RuntimeKind::Lockstep);
        assert_eq!("threaded".parse::<RuntimeKind>().unwrap(), RuntimeKind::Threaded);
        assert!("mpi".parse::<RuntimeKind>().is_err());
    }

    #[test]
    fn test_closure_emitter() {
        let mut total = 0i64;
        {
            let mut emitter = EmitFn(|value: i64| total += value);
            emitter.emit(3);
            emitter.emit(4);
        }
        assert_eq!(total, 7);
    }
}
