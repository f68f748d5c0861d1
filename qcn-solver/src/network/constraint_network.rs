use std::sync::Arc;

use super::SparseNetwork;
use crate::calculus::CalculusOperations;
use crate::qcn_assert_moderate;
use crate::qcn_assert_simple;
use crate::relations::Relation;

/// A dense qualitative constraint network: an `N x N` matrix of relations
/// with an identity diagonal.
///
/// The matrix always satisfies the converse invariant
/// `get(j, i) == converse(get(i, j))`; [`ConstraintNetwork::set_constraint`]
/// is the sole mutation primitive and maintains it by writing both cells.
#[derive(Debug, Clone)]
pub struct ConstraintNetwork<R> {
    operations: Arc<CalculusOperations<R>>,
    num_variables: usize,
    matrix: Vec<R>,
    name: String,
}

impl<R: Relation> ConstraintNetwork<R> {
    /// The unconstrained network: universal everywhere, identity on the
    /// diagonal.
    pub fn new(
        num_variables: usize,
        operations: Arc<CalculusOperations<R>>,
        name: impl Into<String>,
    ) -> ConstraintNetwork<R> {
        let mut matrix = vec![operations.universal().clone(); num_variables * num_variables];
        for variable in 0..num_variables {
            matrix[variable * num_variables + variable] = operations.identity().clone();
        }
        ConstraintNetwork {
            operations,
            num_variables,
            matrix,
            name: name.into(),
        }
    }

    /// Densifies a sparse network, intersecting repeated edges.
    pub fn from_sparse(
        sparse: &SparseNetwork,
        operations: Arc<CalculusOperations<R>>,
    ) -> ConstraintNetwork<R> {
        let mut network =
            ConstraintNetwork::new(sparse.num_variables(), operations, sparse.name());
        for (pair, relation) in sparse.constraints() {
            let tightened =
                network.get_constraint(pair.first, pair.second).clone() & R::from_dynamic(relation);
            network.set_constraint(pair.first, pair.second, tightened);
        }
        network
    }

    /// Reprojects this network into another relation width over the same
    /// calculus.
    pub fn convert<R2: Relation>(
        &self,
        operations: Arc<CalculusOperations<R2>>,
    ) -> ConstraintNetwork<R2> {
        qcn_assert_simple!(
            self.operations.calculus().name() == operations.calculus().name()
        );
        ConstraintNetwork {
            num_variables: self.num_variables,
            matrix: self
                .matrix
                .iter()
                .map(|relation| R2::from_dynamic(&relation.to_dynamic()))
                .collect(),
            name: self.name.clone(),
            operations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn operations(&self) -> &Arc<CalculusOperations<R>> {
        &self.operations
    }

    pub fn get_constraint(&self, first: usize, second: usize) -> &R {
        qcn_assert_moderate!(
            self.matrix[second * self.num_variables + first]
                == self
                    .operations
                    .converse(&self.matrix[first * self.num_variables + second])
        );
        &self.matrix[first * self.num_variables + second]
    }

    /// Writes `relation` at `(first, second)` and its converse at
    /// `(second, first)`.
    pub fn set_constraint(&mut self, first: usize, second: usize, relation: R) {
        let converse = self.operations.converse(&relation);
        self.matrix[first * self.num_variables + second] = relation;
        self.matrix[second * self.num_variables + first] = converse;
    }

    /// Whether every relation of `self` is a subset of the corresponding
    /// relation of `other`.
    pub fn is_refinement_of(&self, other: &ConstraintNetwork<R>) -> bool {
        self.num_variables == other.num_variables
            && self
                .matrix
                .iter()
                .zip(other.matrix.iter())
                .all(|(ours, theirs)| ours.is_subset_of(theirs))
    }

    /// Whether some relation of the network is empty.
    pub fn has_empty_relation(&self) -> bool {
        self.matrix.iter().any(|relation| relation.is_none())
    }
}

impl<R: Relation> PartialEq for ConstraintNetwork<R> {
    fn eq(&self, other: &ConstraintNetwork<R>) -> bool {
        self.num_variables == other.num_variables
            && self.operations.calculus().name() == other.operations.calculus().name()
            && self.matrix == other.matrix
    }
}

impl<R: Relation> Eq for ConstraintNetwork<R> {}
