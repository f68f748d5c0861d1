use super::sequence_generator::SequenceGenerator;

/// Generates the Luby sequence multiplied by a given constant, i.e.,
/// L * base_value, where L is the next element of the Luby sequence.
/// The Luby sequence is: 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8,...
/// see: Luby, Sinclair, and Zuckerman. "Optimal speedup of Las Vegas
/// algorithms." Information Processing Letters 47.4 (1993): 173-180.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LubySequence {
    u: i64,
    v: i64,
    base_value: i64,
}

impl LubySequence {
    pub(crate) fn new(base_value: i64) -> LubySequence {
        LubySequence {
            u: 1,
            v: 1,
            base_value,
        }
    }
}

impl SequenceGenerator for LubySequence {
    fn next(&mut self) -> i64 {
        // The implementation follows Donald Knuth's 'reluctant doubling' formula.
        let previous_v = self.v;
        if (self.u & (-self.u)) == self.v {
            self.u += 1;
            self.v = 1;
        } else {
            self.v *= 2;
        }
        previous_v * self.base_value
    }
}

#[cfg(test)]
mod tests {
    use super::LubySequence;
    use crate::basic_types::sequence_generators::sequence_generator::SequenceGenerator;

    #[test]
    fn test_luby_sequence_value_one() {
        let mut luby_sequence = LubySequence::new(1);
        let expected_sequence = [1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8];
        for expected_value in expected_sequence {
            assert_eq!(luby_sequence.next(), expected_value);
        }
    }

    #[test]
    fn test_luby_sequence_value_other() {
        let base_value = 50;
        let mut luby_sequence = LubySequence::new(base_value);
        let expected_sequence = [1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8];
        for expected_value in expected_sequence {
            assert_eq!(luby_sequence.next(), expected_value * base_value);
        }
    }
}
