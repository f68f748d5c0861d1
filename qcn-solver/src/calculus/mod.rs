//! Relation algebras: base relations, converse, composition, weights.
//!
//! A [`Calculus`] is the width-independent algebra, validated once at
//! construction. [`CalculusOperations`] grounds a shared calculus to a
//! concrete [`Relation`](crate::relations::Relation) width and owns the
//! precomputed operation tables the engines run against.

mod error;
mod operations;
mod splitter;

pub use error::CalculusError;
pub use error::RelationWidthError;
pub use operations::CalculusOperations;
pub use splitter::Splitter;

use crate::relations::DynamicRelation;
use crate::relations::Relation;

/// A qualitative calculus: a finite set of named base relations together with
/// an identity element, a converse table, a composition table, and a
/// restrictiveness weight per base relation.
///
/// Construction validates the algebraic laws the reasoning engines rely on;
/// a value of this type is always a well-formed algebra.
#[derive(Debug)]
pub struct Calculus {
    name: String,
    base_relation_names: Vec<String>,
    identity: usize,
    converse: Vec<usize>,
    /// Row-major `n * n` table; entry `(a, b)` is the composition of base
    /// relations `a` and `b`.
    composition: Vec<DynamicRelation>,
    weights: Vec<u64>,
    splitter: Option<Box<dyn Splitter>>,
}

impl Calculus {
    pub fn new(
        name: impl Into<String>,
        base_relation_names: Vec<String>,
        identity: usize,
        converse: Vec<usize>,
        composition: Vec<DynamicRelation>,
        weights: Vec<u64>,
    ) -> Result<Calculus, CalculusError> {
        let calculus = Calculus {
            name: name.into(),
            base_relation_names,
            identity,
            converse,
            composition,
            weights,
            splitter: None,
        };
        calculus.validate()?;
        Ok(calculus)
    }

    fn validate(&self) -> Result<(), CalculusError> {
        let n = self.base_relation_names.len();
        if n == 0 {
            return Err(CalculusError::NoBaseRelations);
        }
        for (index, relation_name) in self.base_relation_names.iter().enumerate() {
            if self.base_relation_names[..index].contains(relation_name) {
                return Err(CalculusError::DuplicateBaseRelation {
                    name: relation_name.clone(),
                });
            }
        }
        if self.identity >= n {
            return Err(CalculusError::IdentityOutOfRange {
                index: self.identity,
                num_base_relations: n,
            });
        }

        self.check_converse_table()?;
        self.check_composition_table()
    }

    fn check_converse_table(&self) -> Result<(), CalculusError> {
        let n = self.base_relation_names.len();
        if self.converse.len() != n {
            return Err(CalculusError::ConverseTableSize {
                actual: self.converse.len(),
                expected: n,
            });
        }
        for (index, &converse) in self.converse.iter().enumerate() {
            if converse >= n {
                return Err(CalculusError::ConverseOutOfRange { index });
            }
            if self.converse[converse] != index {
                return Err(CalculusError::ConverseNotInvolutive { index });
            }
        }
        if self.converse[self.identity] != self.identity {
            return Err(CalculusError::ConverseOfIdentity);
        }
        Ok(())
    }

    fn check_composition_table(&self) -> Result<(), CalculusError> {
        let n = self.base_relation_names.len();
        if self.weights.len() != n {
            return Err(CalculusError::WeightTableSize {
                actual: self.weights.len(),
                expected: n,
            });
        }
        if self.composition.len() != n * n {
            return Err(CalculusError::CompositionTableSize {
                actual: self.composition.len(),
                expected: n * n,
            });
        }
        for a in 0..n {
            for b in 0..n {
                if self.composition_of_bases(a, b).significant_bits() > n {
                    return Err(CalculusError::CompositionOutOfRange { a, b });
                }
            }
        }

        let mut singleton = DynamicRelation::none();
        for index in 0..n {
            singleton.set(index);
            if self.composition_of_bases(self.identity, index) != &singleton
                || self.composition_of_bases(index, self.identity) != &singleton
            {
                return Err(CalculusError::CompositionIdentityLaw { index });
            }
            singleton.unset(index);
        }

        // conv(a . b) == conv(b) . conv(a) ties the two tables together.
        for a in 0..n {
            for b in 0..n {
                let left = self.converse_relation(self.composition_of_bases(a, b));
                let right = self.composition_of_bases(self.converse[b], self.converse[a]);
                if &left != right {
                    return Err(CalculusError::CompositionConverseCompatibility { a, b });
                }
            }
        }
        Ok(())
    }

    /// Installs a tractable-subclass splitter. Must happen before the calculus
    /// is shared with any [`CalculusOperations`].
    pub fn set_splitter(&mut self, splitter: Box<dyn Splitter>) {
        self.splitter = Some(splitter);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_base_relations(&self) -> usize {
        self.base_relation_names.len()
    }

    pub fn identity_base_relation(&self) -> usize {
        self.identity
    }

    /// The relation `{identity}`.
    pub fn identity_relation(&self) -> DynamicRelation {
        let mut relation = DynamicRelation::none();
        relation.set(self.identity);
        relation
    }

    pub fn universal_relation(&self) -> DynamicRelation {
        DynamicRelation::universal(self.num_base_relations())
    }

    pub fn base_relation_name(&self, base_relation: usize) -> &str {
        &self.base_relation_names[base_relation]
    }

    pub fn converse_of_base(&self, base_relation: usize) -> usize {
        self.converse[base_relation]
    }

    pub fn composition_of_bases(&self, a: usize, b: usize) -> &DynamicRelation {
        &self.composition[a * self.base_relation_names.len() + b]
    }

    pub fn weight_of_base(&self, base_relation: usize) -> u64 {
        self.weights[base_relation]
    }

    pub fn splitter(&self) -> Option<&dyn Splitter> {
        self.splitter.as_deref()
    }

    /// The converse of an arbitrary relation, via the base converse table.
    pub fn converse_relation(&self, relation: &DynamicRelation) -> DynamicRelation {
        let mut result = DynamicRelation::none();
        for base_relation in relation.iter() {
            result.set(self.converse[base_relation]);
        }
        result
    }

    /// Parses a whitespace-separated list of base relation names, e.g.
    /// `"d di"`. The empty string is the empty relation.
    pub fn encode_relation(&self, text: &str) -> Result<DynamicRelation, CalculusError> {
        let mut relation = DynamicRelation::none();
        for token in text.split_whitespace() {
            let index = self
                .base_relation_names
                .iter()
                .position(|relation_name| relation_name == token)
                .ok_or_else(|| CalculusError::UnknownBaseRelation {
                    name: token.to_owned(),
                })?;
            relation.set(index);
        }
        Ok(relation)
    }

    /// The inverse of [`Calculus::encode_relation`]: base relation names in
    /// index order, space separated.
    pub fn relation_to_string(&self, relation: &DynamicRelation) -> String {
        let mut text = String::new();
        for base_relation in relation.iter() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&self.base_relation_names[base_relation]);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The point algebra over {<, =, >}.
    fn point_algebra_tables() -> (Vec<String>, usize, Vec<usize>, Vec<DynamicRelation>, Vec<u64>) {
        let names = vec!["<".to_owned(), "=".to_owned(), ">".to_owned()];
        let relation = |bits: &[usize]| {
            let mut result = DynamicRelation::none();
            for &bit in bits {
                result.set(bit);
            }
            result
        };
        let composition = vec![
            // < . {<, =, >}
            relation(&[0]),
            relation(&[0]),
            relation(&[0, 1, 2]),
            // = . {<, =, >}
            relation(&[0]),
            relation(&[1]),
            relation(&[2]),
            // > . {<, =, >}
            relation(&[0, 1, 2]),
            relation(&[2]),
            relation(&[2]),
        ];
        (names, 1, vec![2, 1, 0], composition, vec![1, 1, 1])
    }

    fn point_algebra() -> Calculus {
        let (names, identity, converse, composition, weights) = point_algebra_tables();
        Calculus::new("point", names, identity, converse, composition, weights)
            .expect("the point algebra is well formed")
    }

    #[test]
    fn a_well_formed_calculus_is_accepted() {
        let calculus = point_algebra();
        assert_eq!(calculus.num_base_relations(), 3);
        assert_eq!(calculus.identity_base_relation(), 1);
        assert_eq!(calculus.universal_relation().count(), 3);
    }

    #[test]
    fn a_broken_converse_table_is_rejected() {
        let (names, identity, _, composition, weights) = point_algebra_tables();
        let result = Calculus::new("broken", names, identity, vec![2, 1, 1], composition, weights);
        assert_eq!(
            result.err(),
            Some(CalculusError::ConverseNotInvolutive { index: 0 })
        );
    }

    #[test]
    fn a_converse_moving_the_identity_is_rejected() {
        let (names, _, _, composition, weights) = point_algebra_tables();
        // Identity at < with converse swapping < and > moves the identity.
        let result = Calculus::new("broken", names, 0, vec![2, 1, 0], composition, weights);
        assert_eq!(result.err(), Some(CalculusError::ConverseOfIdentity));
    }

    #[test]
    fn a_composition_table_violating_the_identity_law_is_rejected() {
        let (names, identity, converse, mut composition, weights) = point_algebra_tables();
        composition[4] = DynamicRelation::universal(3);
        let result = Calculus::new("broken", names, identity, converse, composition, weights);
        assert_eq!(
            result.err(),
            Some(CalculusError::CompositionIdentityLaw { index: 1 })
        );
    }

    #[test]
    fn an_incompatible_composition_table_is_rejected() {
        let (names, identity, converse, mut composition, weights) = point_algebra_tables();
        // conv(< . <) must equal > . >; break the latter.
        composition[8] = DynamicRelation::universal(3);
        let result = Calculus::new("broken", names, identity, converse, composition, weights);
        assert!(matches!(
            result.err(),
            Some(CalculusError::CompositionConverseCompatibility { .. })
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (mut names, identity, converse, composition, weights) = point_algebra_tables();
        names[2] = "<".to_owned();
        let result = Calculus::new("broken", names, identity, converse, composition, weights);
        assert_eq!(
            result.err(),
            Some(CalculusError::DuplicateBaseRelation {
                name: "<".to_owned()
            })
        );
    }

    #[test]
    fn encode_and_print_round_trip() {
        let calculus = point_algebra();
        let relation = calculus.encode_relation("< >").expect("known names");
        assert_eq!(relation.iter().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(calculus.relation_to_string(&relation), "< >");
        assert_eq!(calculus.relation_to_string(&DynamicRelation::none()), "");
    }

    #[test]
    fn unknown_names_are_reported() {
        let calculus = point_algebra();
        assert_eq!(
            calculus.encode_relation("< ?").err(),
            Some(CalculusError::UnknownBaseRelation {
                name: "?".to_owned()
            })
        );
    }

    #[test]
    fn converse_of_a_relation_maps_every_base_relation() {
        let calculus = point_algebra();
        let relation = calculus.encode_relation("< =").expect("known names");
        let converse = calculus.converse_relation(&relation);
        assert_eq!(calculus.relation_to_string(&converse), "= >");
    }
}
