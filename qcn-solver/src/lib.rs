//! A solver for qualitative constraint networks over binary relation
//! algebras, such as the point algebra, Allen's interval algebra or the
//! region connection calculi.
//!
//! A [`Calculus`] describes a finite set of base relations together with
//! their converse, composition and weight tables; a general relation is a
//! set of base relations, stored as a bitset implementing [`Relation`]. A
//! [`ConstraintNetwork`] assigns one relation to every ordered pair of
//! variables, and the engine answers whether the network has a scenario, an
//! atomic refinement that is algebraically closed.
//!
//! The two entry points are [`enforce_algebraic_closure`], which tightens a
//! network to path consistency, and [`search`] (or [`search_with_restarts`]),
//! which runs a complete two-way depth-first search on top of incremental
//! closure.
//!
//! # Example
//!
//! Deciding a chain of strict orderings in the point algebra:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use qcn_solver::Calculus;
//! use qcn_solver::CalculusOperations;
//! use qcn_solver::ConstraintNetwork;
//! use qcn_solver::DynamicRelation;
//! use qcn_solver::Relation;
//! use qcn_solver::Relation8;
//!
//! let names = vec!["<".to_owned(), "=".to_owned(), ">".to_owned()];
//! let composition = [
//!     0b001, 0b001, 0b111, // < composed with <, =, >
//!     0b001, 0b010, 0b100, // = composed with <, =, >
//!     0b111, 0b100, 0b100, // > composed with <, =, >
//! ]
//! .iter()
//! .map(|&bits| DynamicRelation::from_bits(bits))
//! .collect();
//! let calculus = Arc::new(Calculus::new(
//!     "point algebra",
//!     names,
//!     1,
//!     vec![2, 1, 0],
//!     composition,
//!     vec![1, 1, 1],
//! )?);
//! let operations = Arc::new(CalculusOperations::<Relation8>::new(calculus)?);
//!
//! let mut network = ConstraintNetwork::new(3, Arc::clone(&operations), "chain");
//! let before = operations.calculus().encode_relation("<")?;
//! network.set_constraint(0, 1, Relation8::from_dynamic(&before));
//! network.set_constraint(1, 2, Relation8::from_dynamic(&before));
//!
//! let scenario = qcn_solver::search(network).expect("the chain is satisfiable");
//! let derived = scenario.get_constraint(0, 2).to_dynamic();
//! assert_eq!(operations.calculus().relation_to_string(&derived), "<");
//! # Ok(())
//! # }
//! ```

pub mod asserts;
mod basic_types;
mod branching;
pub mod calculus;
mod containers;
pub mod engine;
pub mod network;
pub mod relations;
pub mod statistics;

pub use basic_types::VariablePair;
pub use calculus::Calculus;
pub use calculus::CalculusError;
pub use calculus::CalculusOperations;
pub use calculus::RelationWidthError;
pub use calculus::Splitter;
pub use engine::AlgebraicClosure;
pub use engine::DepthFirstSearch;
pub use engine::RestartStrategy;
pub use engine::SearchStatistics;
pub use network::ConstraintNetwork;
pub use network::SparseNetwork;
pub use network::TrailedNetwork;
pub use relations::DynamicRelation;
pub use relations::Relation;
pub use relations::Relation128;
pub use relations::Relation16;
pub use relations::Relation256;
pub use relations::Relation32;
pub use relations::Relation64;
pub use relations::Relation8;

/// Tightens the network to algebraic closure in place. Returns an empty
/// vector on success, or the edges of a contradicting triangle once an empty
/// relation is derived.
pub fn enforce_algebraic_closure<R: Relation>(
    network: &mut ConstraintNetwork<R>,
) -> Vec<VariablePair> {
    AlgebraicClosure::default().enforce(network)
}

/// Searches for a scenario of the network. `None` means the network is
/// unsatisfiable.
pub fn search<R: Relation>(network: ConstraintNetwork<R>) -> Option<ConstraintNetwork<R>> {
    DepthFirstSearch::new(network).run()
}

/// Like [`search`], but restarting at the strategy's cutoffs and learning
/// nogoods from conflicts. The verdict does not depend on the strategy.
pub fn search_with_restarts<R: Relation>(
    network: ConstraintNetwork<R>,
    strategy: RestartStrategy,
) -> Option<ConstraintNetwork<R>> {
    DepthFirstSearch::with_restarts(network, strategy).run()
}
