mod geometric_sequence;
mod luby_sequence;
mod sequence_generator;

pub(crate) use geometric_sequence::GeometricSequence;
pub(crate) use luby_sequence::LubySequence;
pub(crate) use sequence_generator::SequenceGenerator;
