use thiserror::Error;

/// Errors detected while validating a calculus at construction time.
///
/// A calculus with any of these defects would make the reasoning engines
/// silently unsound, so construction refuses it up front. Algebraic
/// inconsistency of a *network* is never an error; it is an ordinary result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculusError {
    #[error("the calculus has no base relations")]
    NoBaseRelations,

    #[error("base relation name '{name}' occurs more than once")]
    DuplicateBaseRelation { name: String },

    #[error("identity index {index} is out of range for {num_base_relations} base relations")]
    IdentityOutOfRange {
        index: usize,
        num_base_relations: usize,
    },

    #[error("converse table has {actual} entries, expected {expected}")]
    ConverseTableSize { actual: usize, expected: usize },

    #[error("converse of base relation {index} is out of range")]
    ConverseOutOfRange { index: usize },

    #[error("converse table is not an involution at base relation {index}")]
    ConverseNotInvolutive { index: usize },

    #[error("the converse of the identity relation is not the identity")]
    ConverseOfIdentity,

    #[error("weight table has {actual} entries, expected {expected}")]
    WeightTableSize { actual: usize, expected: usize },

    #[error("composition table has {actual} entries, expected {expected}")]
    CompositionTableSize { actual: usize, expected: usize },

    #[error("composition entry ({a}, {b}) contains base relations outside the calculus")]
    CompositionOutOfRange { a: usize, b: usize },

    #[error("composition with the identity relation does not reproduce base relation {index}")]
    CompositionIdentityLaw { index: usize },

    #[error("converse and composition tables are incompatible at ({a}, {b})")]
    CompositionConverseCompatibility { a: usize, b: usize },

    #[error("unknown base relation name '{name}'")]
    UnknownBaseRelation { name: String },
}

/// Returned when grounding a calculus to a fixed relation width that cannot
/// hold all of its base relations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("a relation type holding {capacity} base relations cannot represent a calculus with {num_base_relations}")]
pub struct RelationWidthError {
    pub capacity: usize,
    pub num_base_relations: usize,
}
