//! The reasoning engine: closure propagation, depth-first search, restarts
//! and nogood learning.

mod algebraic_closure;
mod nogoods;
mod restart_strategy;
mod search;
mod search_statistics;

pub use algebraic_closure::AlgebraicClosure;
pub use restart_strategy::RestartStrategy;
pub use search::DepthFirstSearch;
pub use search_statistics::SearchStatistics;
