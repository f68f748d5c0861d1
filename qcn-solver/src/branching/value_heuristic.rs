use crate::calculus::Calculus;

/// Picks the branching-preferred of two base relations: the one with the
/// higher restrictiveness weight, ties broken towards the smaller index.
pub(crate) fn preferred_base_relation(calculus: &Calculus, a: usize, b: usize) -> usize {
    let weight_a = calculus.weight_of_base(a);
    let weight_b = calculus.weight_of_base(b);
    if weight_b > weight_a || (weight_b == weight_a && b < a) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::preferred_base_relation;
    use crate::calculus::Calculus;
    use crate::relations::DynamicRelation;
    use crate::relations::Relation;

    fn weighted_point_algebra() -> Calculus {
        let names = vec!["<".to_owned(), "=".to_owned(), ">".to_owned()];
        let relation = |bits: &[usize]| {
            let mut result = DynamicRelation::none();
            for &bit in bits {
                result.set(bit);
            }
            result
        };
        let composition = vec![
            relation(&[0]),
            relation(&[0]),
            relation(&[0, 1, 2]),
            relation(&[0]),
            relation(&[1]),
            relation(&[2]),
            relation(&[0, 1, 2]),
            relation(&[2]),
            relation(&[2]),
        ];
        Calculus::new("point", names, 1, vec![2, 1, 0], composition, vec![2, 5, 2])
            .expect("well formed")
    }

    #[test]
    fn the_heavier_base_relation_wins() {
        let calculus = weighted_point_algebra();
        assert_eq!(preferred_base_relation(&calculus, 0, 1), 1);
        assert_eq!(preferred_base_relation(&calculus, 1, 2), 1);
    }

    #[test]
    fn equal_weights_prefer_the_smaller_index() {
        let calculus = weighted_point_algebra();
        assert_eq!(preferred_base_relation(&calculus, 2, 0), 0);
        assert_eq!(preferred_base_relation(&calculus, 0, 2), 0);
    }
}
