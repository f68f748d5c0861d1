//! Variable and value ordering heuristics for the search engine.

mod value_heuristic;
mod weight_degree;

pub(crate) use value_heuristic::preferred_base_relation;
pub(crate) use weight_degree::WeightDegreeSelector;
