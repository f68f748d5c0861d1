use super::sequence_generator::SequenceGenerator;

/// Generates a geometric sequence with ratio 3/2 in integer arithmetic:
/// each reported value is the previous one plus half of it, rounded down.
/// For a starting value of 10 this yields 10, 15, 22, 33, 49, 73, ...
#[derive(Debug, Clone, Copy)]
pub(crate) struct GeometricSequence {
    current_value: i64,
}

impl GeometricSequence {
    pub(crate) fn new(starting_value: i64) -> GeometricSequence {
        GeometricSequence {
            current_value: starting_value,
        }
    }
}

impl SequenceGenerator for GeometricSequence {
    fn next(&mut self) -> i64 {
        let return_value = self.current_value;
        self.current_value += self.current_value / 2;
        return_value
    }
}
