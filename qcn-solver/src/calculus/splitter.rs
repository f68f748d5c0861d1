use crate::relations::DynamicRelation;

/// A tractable-subclass cover for a calculus.
///
/// A splitter partitions search around a set of "split" relations for which
/// algebraic closure decides satisfiability. Implementations must uphold:
///
/// - `first_split(r)` returns a non-empty subset of `r` for non-empty `r`;
/// - `first_split(r) == r` exactly when `is_split(r)` holds;
/// - every non-empty relation can be covered by finitely many split subsets,
///   so repeatedly branching on `first_split(r)` and the remainder terminates.
///
/// Without an installed splitter the engines fall back to singleton splits,
/// which is correct for any calculus.
pub trait Splitter: std::fmt::Debug + Send + Sync {
    fn is_split(&self, relation: &DynamicRelation) -> bool;

    fn first_split(&self, relation: &DynamicRelation) -> DynamicRelation;
}
