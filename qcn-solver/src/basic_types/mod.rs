pub(crate) mod sequence_generators;
mod trail;
mod variable_pair;

pub(crate) use trail::Trail;
pub use variable_pair::VariablePair;
