use crate::basic_types::VariablePair;
use crate::qcn_assert_simple;
use crate::relations::DynamicRelation;

/// A named edge list over [`DynamicRelation`], the width-independent hand-off
/// format produced by problem readers. Unlisted pairs are universal and the
/// diagonal is the identity; listing the same pair twice (in either
/// orientation) intersects when the network is densified.
#[derive(Debug, Clone, Default)]
pub struct SparseNetwork {
    name: String,
    num_variables: usize,
    constraints: Vec<(VariablePair, DynamicRelation)>,
}

impl SparseNetwork {
    pub fn new(name: impl Into<String>, num_variables: usize) -> SparseNetwork {
        SparseNetwork {
            name: name.into(),
            num_variables,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, first: usize, second: usize, relation: DynamicRelation) {
        qcn_assert_simple!(first < self.num_variables && second < self.num_variables);
        self.constraints
            .push((VariablePair::new(first, second), relation));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn constraints(&self) -> &[(VariablePair, DynamicRelation)] {
        &self.constraints
    }
}
