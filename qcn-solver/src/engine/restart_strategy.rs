use crate::basic_types::sequence_generators::GeometricSequence;
use crate::basic_types::sequence_generators::LubySequence;
use crate::basic_types::sequence_generators::SequenceGenerator;

/// Produces the sequence of decision-count cutoffs at which a restarting
/// search abandons its current attempt.
///
/// Cutoffs are compared against the total number of decisions made so far
/// across all attempts, so each value is an absolute threshold, not a
/// per-attempt budget.
#[derive(Debug, Clone)]
pub struct RestartStrategy {
    kind: StrategyKind,
    initial_cutoff: u64,
    minimize_nogoods: bool,
    generator: Generator,
    next_cutoff: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrategyKind {
    Geometric,
    Luby,
}

#[derive(Debug, Clone, Copy)]
enum Generator {
    Geometric(GeometricSequence),
    Luby(LubySequence),
}

impl RestartStrategy {
    pub const DEFAULT_INITIAL_CUTOFF: u64 = 10;

    /// Cutoffs growing by half each time: `c, c + c/2, ...` in integer
    /// arithmetic.
    pub fn geometric(initial_cutoff: u64) -> RestartStrategy {
        RestartStrategy::new(StrategyKind::Geometric, initial_cutoff)
    }

    /// Cutoffs accumulating the Luby sequence scaled by `initial_cutoff`.
    pub fn luby(initial_cutoff: u64) -> RestartStrategy {
        RestartStrategy::new(StrategyKind::Luby, initial_cutoff)
    }

    fn new(kind: StrategyKind, initial_cutoff: u64) -> RestartStrategy {
        let mut strategy = RestartStrategy {
            kind,
            initial_cutoff,
            minimize_nogoods: false,
            generator: Generator::Geometric(GeometricSequence::new(0)),
            next_cutoff: 0,
        };
        strategy.initialize();
        strategy
    }

    /// Enables greedy shrinking of extracted nogoods before installation.
    pub fn with_nogood_minimization(mut self) -> RestartStrategy {
        self.minimize_nogoods = true;
        self
    }

    pub(crate) fn minimize_nogoods(&self) -> bool {
        self.minimize_nogoods
    }

    /// Resets to the state before the first cutoff was requested.
    pub fn initialize(&mut self) {
        self.next_cutoff = 0;
        self.generator = match self.kind {
            StrategyKind::Geometric => {
                Generator::Geometric(GeometricSequence::new(self.initial_cutoff as i64))
            }
            StrategyKind::Luby => Generator::Luby(LubySequence::new(self.initial_cutoff as i64)),
        };
    }

    pub(crate) fn next_cutoff(&mut self) -> u64 {
        match &mut self.generator {
            Generator::Geometric(sequence) => {
                self.next_cutoff = sequence.next() as u64;
            }
            Generator::Luby(sequence) => {
                self.next_cutoff += sequence.next() as u64;
            }
        }
        self.next_cutoff
    }
}

impl Default for RestartStrategy {
    fn default() -> RestartStrategy {
        RestartStrategy::geometric(RestartStrategy::DEFAULT_INITIAL_CUTOFF)
    }
}

#[cfg(test)]
mod tests {
    use super::RestartStrategy;

    #[test]
    fn geometric_cutoffs_grow_by_half() {
        let mut strategy = RestartStrategy::geometric(10);
        let cutoffs: Vec<u64> = (0..5).map(|_| strategy.next_cutoff()).collect();
        assert_eq!(cutoffs, vec![10, 15, 22, 33, 49]);
    }

    #[test]
    fn luby_cutoffs_accumulate_the_scaled_sequence() {
        let mut strategy = RestartStrategy::luby(5);
        let cutoffs: Vec<u64> = (0..7).map(|_| strategy.next_cutoff()).collect();
        // Luby terms 1 1 2 1 1 2 4 scaled by 5, accumulated.
        assert_eq!(cutoffs, vec![5, 10, 20, 25, 30, 40, 60]);
    }

    #[test]
    fn initialize_restarts_the_sequence() {
        let mut strategy = RestartStrategy::geometric(10);
        let _ = strategy.next_cutoff();
        let _ = strategy.next_cutoff();
        strategy.initialize();
        assert_eq!(strategy.next_cutoff(), 10);
    }

    #[test]
    fn cutoffs_never_decrease() {
        for mut strategy in [RestartStrategy::geometric(3), RestartStrategy::luby(3)] {
            let mut previous = 0;
            for _ in 0..50 {
                let cutoff = strategy.next_cutoff();
                assert!(cutoff >= previous);
                previous = cutoff;
            }
        }
    }
}
