use fnv::FnvHashMap;

use crate::basic_types::VariablePair;
use crate::network::ConstraintNetwork;
use crate::relations::Relation;

/// Weighted-degree variable ordering: among the non-split pairs, pick the one
/// minimizing `relation weight / learned weight`. Failures raise the learned
/// weight of the conflicting edges, with shallow failures counting for more
/// than deep ones.
#[derive(Debug, Default)]
pub(crate) struct WeightDegreeSelector {
    /// Learned weights by triangular pair index; absent means 1.
    learned: FnvHashMap<usize, u64>,
    /// The deepest failure depth reported so far.
    max_depth: usize,
    num_variables: usize,
}

impl WeightDegreeSelector {
    pub(crate) fn new(num_variables: usize) -> WeightDegreeSelector {
        WeightDegreeSelector {
            learned: FnvHashMap::default(),
            max_depth: 0,
            num_variables,
        }
    }

    /// The next pair to branch on, or `None` when every pair is split.
    pub(crate) fn select<R: Relation>(
        &self,
        variables: &[VariablePair],
        network: &ConstraintNetwork<R>,
    ) -> Option<VariablePair> {
        let operations = network.operations();
        let mut best: Option<(f64, VariablePair)> = None;
        for &pair in variables {
            let relation = network.get_constraint(pair.first, pair.second);
            if operations.is_split(relation) {
                continue;
            }
            let learned = self
                .learned
                .get(&pair.triangular_index(self.num_variables))
                .copied()
                .unwrap_or(1);
            let score = operations.weight(relation) as f64 / learned as f64;
            match best {
                Some((best_score, _)) if best_score <= score => {}
                _ => best = Some((score, pair)),
            }
        }
        best.map(|(_, pair)| pair)
    }

    /// Reports a failure of the given conflict edges at decision depth
    /// `importance`; the increment shrinks as the failure gets deeper.
    pub(crate) fn report_failure(&mut self, conflict: &[VariablePair], importance: usize) {
        if importance > self.max_depth {
            self.max_depth = importance;
        }
        let increment = (self.max_depth - importance + 1) as u64;
        for pair in conflict {
            let key = pair.normalized().triangular_index(self.num_variables);
            let weight = self.learned.entry(key).or_insert(1);
            *weight = weight.saturating_add(increment);
        }
    }
}
