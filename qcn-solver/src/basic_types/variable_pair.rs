use std::fmt::Display;
use std::fmt::Formatter;

/// A pair of variable indices, identifying one edge (constraint) of a
/// qualitative constraint network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VariablePair {
    pub first: usize,
    pub second: usize,
}

impl VariablePair {
    pub fn new(first: usize, second: usize) -> VariablePair {
        VariablePair { first, second }
    }

    /// The same edge with `first <= second`.
    pub(crate) fn normalized(self) -> VariablePair {
        if self.first <= self.second {
            self
        } else {
            VariablePair::new(self.second, self.first)
        }
    }

    /// Position of a normalized pair in an upper-triangular (including the
    /// diagonal) enumeration of all pairs over `num_variables` variables.
    pub(crate) fn triangular_index(self, num_variables: usize) -> usize {
        let VariablePair { first, second } = self.normalized();
        second + first * num_variables - (first * (first + 1)) / 2
    }
}

impl Display for VariablePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::VariablePair;

    #[test]
    fn normalization_orders_the_indices() {
        assert_eq!(
            VariablePair::new(3, 1).normalized(),
            VariablePair::new(1, 3)
        );
        assert_eq!(
            VariablePair::new(1, 3).normalized(),
            VariablePair::new(1, 3)
        );
    }

    #[test]
    fn triangular_indices_are_unique_and_dense() {
        let num_variables = 7;
        let mut seen = vec![false; num_variables * (num_variables + 1) / 2];
        for i in 0..num_variables {
            for j in i..num_variables {
                let index = VariablePair::new(i, j).triangular_index(num_variables);
                assert!(!seen[index]);
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|position| *position));
    }

    #[test]
    fn triangular_index_ignores_orientation() {
        assert_eq!(
            VariablePair::new(4, 2).triangular_index(6),
            VariablePair::new(2, 4).triangular_index(6)
        );
    }
}
