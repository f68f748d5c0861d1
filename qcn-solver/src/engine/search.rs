use fnv::FnvHashMap;
use itertools::Itertools;

use super::algebraic_closure::AlgebraicClosure;
use super::nogoods::NogoodDb;
use super::nogoods::NogoodFact;
use super::restart_strategy::RestartStrategy;
use super::search_statistics::SearchStatistics;
use crate::basic_types::VariablePair;
use crate::branching::WeightDegreeSelector;
use crate::network::ConstraintNetwork;
use crate::network::TrailedNetwork;
use crate::qcn_assert_simple;
use crate::relations::Relation;
use crate::statistics::should_log_statistics;

/// Two-way depth-first search for an atomic, algebraically closed refinement
/// (a scenario) of a constraint network.
///
/// Each decision tightens one pair to its first split (positive) or to the
/// remainder after a failed split (negative; implied when the remainder needs
/// no further branching), followed by incremental closure. With a
/// [`RestartStrategy`] the search additionally learns nogoods from conflicts
/// and restarts at growing decision cutoffs; learned nogoods persist, so
/// completeness is kept and the verdict never depends on the strategy.
#[derive(Debug)]
pub struct DepthFirstSearch<R: Relation> {
    state: TrailedNetwork<R>,
    propagator: AlgebraicClosure,
    /// All pairs `(i, j)` with `i < j`, the branching candidates.
    variables: Vec<VariablePair>,
    decisions: Vec<Decision<R>>,
    selector: WeightDegreeSelector,
    last_conflict: Option<VariablePair>,
    statistics: SearchStatistics,
    restarts: Option<RestartState<R>>,
    finished: bool,
}

#[derive(Debug)]
struct RestartState<R> {
    strategy: RestartStrategy,
    nogoods: NogoodDb<R>,
    /// Nogoods extracted since the last restart, installed at the next one.
    pending: Vec<Vec<NogoodFact<R>>>,
}

#[derive(Debug, Clone)]
struct Decision<R> {
    variable: VariablePair,
    value: R,
    kind: DecisionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecisionKind {
    Positive,
    Negative,
    Implied,
}

enum SearchOutcome {
    Satisfiable,
    Unsatisfiable,
    CutoffReached,
}

impl<R: Relation> DepthFirstSearch<R> {
    pub fn new(network: ConstraintNetwork<R>) -> DepthFirstSearch<R> {
        DepthFirstSearch::with_optional_restarts(network, None)
    }

    pub fn with_restarts(
        network: ConstraintNetwork<R>,
        strategy: RestartStrategy,
    ) -> DepthFirstSearch<R> {
        DepthFirstSearch::with_optional_restarts(network, Some(strategy))
    }

    fn with_optional_restarts(
        network: ConstraintNetwork<R>,
        strategy: Option<RestartStrategy>,
    ) -> DepthFirstSearch<R> {
        let num_variables = network.num_variables();
        let num_base_relations = network.operations().num_base_relations();
        DepthFirstSearch {
            variables: (0..num_variables)
                .tuple_combinations()
                .map(|(first, second)| VariablePair::new(first, second))
                .collect(),
            state: TrailedNetwork::new(network),
            propagator: AlgebraicClosure::default(),
            decisions: Vec::new(),
            selector: WeightDegreeSelector::new(num_variables),
            last_conflict: None,
            statistics: SearchStatistics::default(),
            restarts: strategy.map(|mut strategy| {
                strategy.initialize();
                RestartState {
                    strategy,
                    nogoods: NogoodDb::new(num_variables, num_base_relations),
                    pending: Vec::new(),
                }
            }),
            finished: false,
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Runs the search to completion. `Some` carries a fully split,
    /// algebraically closed refinement of the input network; `None` means the
    /// network is unsatisfiable. Must be called at most once.
    pub fn run(&mut self) -> Option<ConstraintNetwork<R>> {
        qcn_assert_simple!(!self.finished);
        self.finished = true;

        let satisfiable = self.run_to_verdict();

        log::debug!(
            "search finished: {} after {} decisions, {} restarts",
            if satisfiable { "satisfiable" } else { "unsatisfiable" },
            self.statistics.num_decisions(),
            self.statistics.num_restarts,
        );
        if should_log_statistics() {
            self.statistics.log();
            if let Some(restarts) = &self.restarts {
                restarts.nogoods.log_statistics();
            }
        }

        satisfiable.then(|| self.state.network().clone())
    }

    fn run_to_verdict(&mut self) -> bool {
        if !self.propagate(None, None) {
            return false;
        }
        loop {
            let cutoff = self
                .restarts
                .as_mut()
                .map(|restarts| restarts.strategy.next_cutoff());
            match self.dfs(cutoff) {
                SearchOutcome::Satisfiable => return true,
                SearchOutcome::Unsatisfiable => return false,
                SearchOutcome::CutoffReached => {
                    self.statistics.num_restarts += 1;
                    if !self.restart() {
                        return false;
                    }
                }
            }
        }
    }

    fn dfs(&mut self, cutoff: Option<u64>) -> SearchOutcome {
        loop {
            let Some(variable) = self.select_variable() else {
                return SearchOutcome::Satisfiable;
            };
            if let Some(cutoff) = cutoff {
                if self.statistics.num_decisions() >= cutoff {
                    return SearchOutcome::CutoffReached;
                }
            }

            let value = {
                let operations = self.state.operations();
                operations
                    .first_split(self.state.get_constraint(variable.first, variable.second))
            };
            self.push_decision(variable, value.clone(), DecisionKind::Positive);
            if !self.assign(variable, value) && !self.resolve_conflicts() {
                return SearchOutcome::Unsatisfiable;
            }
        }
    }

    /// The next pair to branch on: the latest conflicting pair while it
    /// remains unsplit, otherwise the heuristically best pair.
    fn select_variable(&self) -> Option<VariablePair> {
        if let Some(pair) = self.last_conflict {
            let operations = self.state.operations();
            if !operations.is_split(self.state.get_constraint(pair.first, pair.second)) {
                return Some(pair);
            }
        }
        self.selector.select(&self.variables, self.state.network())
    }

    fn push_decision(&mut self, variable: VariablePair, value: R, kind: DecisionKind) {
        match kind {
            DecisionKind::Positive => self.statistics.num_positive_decisions += 1,
            DecisionKind::Negative => self.statistics.num_negative_decisions += 1,
            DecisionKind::Implied => self.statistics.num_implied_decisions += 1,
        }
        self.decisions.push(Decision {
            variable,
            value,
            kind,
        });
        self.statistics.peak_depth = self.statistics.peak_depth.max(self.decisions.len() as u64);
    }

    /// Opens a trail level, applies the decision value, and re-closes
    /// incrementally. An empty decision value is an immediate conflict; it
    /// arises when the selected pair already carries the empty relation,
    /// which closure alone cannot detect on networks too small to form a
    /// triangle. `false` on conflict.
    fn assign(&mut self, variable: VariablePair, value: R) -> bool {
        self.state.backup_state();
        if value.is_none() {
            return false;
        }
        let removed = self
            .state
            .get_constraint(variable.first, variable.second)
            .without(&value);
        self.state.set_value(variable.first, variable.second, value);
        self.propagate(Some(variable), Some(removed))
    }

    /// Unwinds decisions until some pair still has an untried remainder,
    /// which is then assigned. `false` when the decision stack underflows,
    /// proving unsatisfiability.
    fn resolve_conflicts(&mut self) -> bool {
        loop {
            let Some(decision) = self.decisions.pop() else {
                return false;
            };
            self.state.reset_to_last_state();
            if decision.kind != DecisionKind::Positive {
                continue;
            }

            self.last_conflict = Some(decision.variable);
            let remaining = self
                .state
                .get_constraint(decision.variable.first, decision.variable.second)
                .without(&decision.value);
            if remaining.is_none() {
                continue;
            }
            let kind = if self.state.operations().is_split(&remaining) {
                DecisionKind::Implied
            } else {
                DecisionKind::Negative
            };
            self.push_decision(decision.variable, remaining.clone(), kind);
            if self.assign(decision.variable, remaining) {
                return true;
            }
        }
    }

    /// Runs closure, fully or from one touched pair; `removed` reports the
    /// seeding write's removed bits to the learned nogoods. On conflict,
    /// reports the failure to the variable heuristic and extracts a nogood
    /// candidate from the decision path.
    fn propagate(&mut self, seed: Option<VariablePair>, removed: Option<R>) -> bool {
        self.statistics.num_propagation_calls += 1;
        let nogoods = self
            .restarts
            .as_mut()
            .map(|restarts| &mut restarts.nogoods);
        let conflict = self.propagator.run(&mut self.state, seed, removed, nogoods);
        if conflict.is_empty() {
            return true;
        }
        self.selector.report_failure(&conflict, self.decisions.len());
        if self.restarts.is_some() && !self.decisions.is_empty() {
            self.record_nogood();
        }
        false
    }

    /// The decision path as one nogood: decisions on the same pair collapse
    /// into the intersection of their values.
    fn record_nogood(&mut self) {
        let num_variables = self.state.num_variables();
        let mut by_pair: FnvHashMap<usize, NogoodFact<R>> = FnvHashMap::default();
        for decision in &self.decisions {
            let _ = by_pair
                .entry(decision.variable.triangular_index(num_variables))
                .and_modify(|fact| fact.value &= decision.value.clone())
                .or_insert_with(|| NogoodFact {
                    pair: decision.variable,
                    value: decision.value.clone(),
                });
        }
        if let Some(restarts) = &mut self.restarts {
            restarts.pending.push(by_pair.into_values().collect());
        }
    }

    /// Rewinds to the root and installs the pending nogoods, then re-closes.
    /// `false` when the root state is now unsatisfiable.
    fn restart(&mut self) -> bool {
        self.state.reset_to_initial_state();
        self.decisions.clear();
        self.last_conflict = None;

        let Some(restarts) = &mut self.restarts else {
            return true;
        };
        log::debug!(
            "restart {}: installing {} pending nogoods",
            self.statistics.num_restarts,
            restarts.pending.len(),
        );

        let minimize = restarts.strategy.minimize_nogoods();
        let root = self.state.network().clone();
        restarts.nogoods.start_propagation();
        let pending = std::mem::take(&mut restarts.pending);
        for mut facts in pending {
            if minimize {
                Self::minimize_nogood(&root, &mut facts);
            }
            if restarts
                .nogoods
                .install(facts, &mut self.state, self.propagator.worklist_mut())
                .is_err()
            {
                return false;
            }
        }

        self.propagate(None, None)
    }

    /// Greedily drops conjuncts whose removal keeps the nogood conflicting
    /// under closure from the root state.
    fn minimize_nogood(root: &ConstraintNetwork<R>, facts: &mut Vec<NogoodFact<R>>) {
        let mut index = 0;
        while facts.len() > 1 && index < facts.len() {
            let mut trial = root.clone();
            for (position, fact) in facts.iter().enumerate() {
                if position == index {
                    continue;
                }
                let tightened =
                    trial.get_constraint(fact.pair.first, fact.pair.second).clone()
                        & fact.value.clone();
                trial.set_constraint(fact.pair.first, fact.pair.second, tightened);
            }
            let mut closure = AlgebraicClosure::default();
            if closure.enforce(&mut trial).is_empty() {
                index += 1;
            } else {
                let _ = facts.remove(index);
            }
        }
    }
}
