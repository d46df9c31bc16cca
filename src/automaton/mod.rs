//! Keyed one-dimensional cellular automaton
//!
//! - **MetaRule**: 4 seed bytes decoded into the automaton's configuration
//! - **RuleTable**: neighborhood pattern → output bit, rebuilt from a MetaRule
//! - **Universe**: the line of bit cells, one `bool` per cell
//! - **evolve**: one generation under toroidal or zero-padded edges
//! - **EntropyMonitor**: Shannon entropy and the stagnation test that drives
//!   MetaRule mutation

pub mod meta_rule;
pub mod rule_table;
pub mod universe;
pub mod evolve;
pub mod entropy;

pub use meta_rule::{Boundary, MetaRule};
pub use rule_table::RuleTable;
pub use universe::{Universe, UniverseDigest};
pub use evolve::evolve;
pub use entropy::{entropy, total_entropy, EntropyMonitor};
