//! Shared calculi for the integration tests: Allen's interval algebra built
//! from a finite interval model, and the region connection calculi RCC5 and
//! RCC8 from their published tables.

#![allow(dead_code)]

use std::sync::Arc;

use qcn_solver::Calculus;
use qcn_solver::CalculusOperations;
use qcn_solver::ConstraintNetwork;
use qcn_solver::DynamicRelation;
use qcn_solver::Relation;
use qcn_solver::Relation16;
use qcn_solver::Relation8;

/// Routes `log` output to the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const ALLEN_NAMES: [&str; 13] = [
    "=", "<", ">", "d", "di", "o", "oi", "m", "mi", "s", "si", "f", "fi",
];

const ALLEN_CONVERSE: [usize; 13] = [0, 2, 1, 4, 3, 6, 5, 8, 7, 10, 9, 12, 11];

/// Intervals with endpoints in `0..8`. Eight endpoint values are enough to
/// realize every ordering of the six endpoints of an interval triple, so the
/// composition table enumerated over this model is exact.
pub fn intervals() -> Vec<(i32, i32)> {
    let mut result = Vec::new();
    for start in 0..8 {
        for end in start + 1..8 {
            result.push((start, end));
        }
    }
    result
}

/// The index into [`ALLEN_NAMES`] of the base relation holding between two
/// intervals of the model.
pub fn interval_relation(a: (i32, i32), b: (i32, i32)) -> usize {
    let (s1, e1) = a;
    let (s2, e2) = b;
    let name = if e1 < s2 {
        "<"
    } else if e2 < s1 {
        ">"
    } else if e1 == s2 {
        "m"
    } else if e2 == s1 {
        "mi"
    } else if s1 == s2 && e1 == e2 {
        "="
    } else if s1 == s2 {
        if e1 < e2 { "s" } else { "si" }
    } else if e1 == e2 {
        if s1 > s2 { "f" } else { "fi" }
    } else if s1 > s2 && e1 < e2 {
        "d"
    } else if s1 < s2 && e1 > e2 {
        "di"
    } else if s1 < s2 {
        "o"
    } else {
        "oi"
    };
    base_index(&ALLEN_NAMES, name)
}

fn base_index(names: &[&str], name: &str) -> usize {
    names
        .iter()
        .position(|&candidate| candidate == name)
        .expect("known base relation name")
}

fn relation_from_names(names: &[&str], members: &str) -> DynamicRelation {
    let mut relation = DynamicRelation::none();
    for member in members.split_whitespace() {
        relation.set(base_index(names, member));
    }
    relation
}

/// Allen's interval algebra with its composition table enumerated from the
/// interval model; `Calculus::new` cross-checks the result against the
/// converse and identity laws.
pub fn allen_operations() -> Arc<CalculusOperations<Relation16>> {
    let points = intervals();
    let mut composition = vec![DynamicRelation::none(); 13 * 13];
    for &x in &points {
        for &y in &points {
            let left = interval_relation(x, y);
            for &z in &points {
                let right = interval_relation(y, z);
                composition[left * 13 + right].set(interval_relation(x, z));
            }
        }
    }
    let calculus = Calculus::new(
        "allen",
        ALLEN_NAMES.iter().map(|&name| name.to_owned()).collect(),
        0,
        ALLEN_CONVERSE.to_vec(),
        composition,
        vec![1; 13],
    )
    .expect("the enumerated tables satisfy the algebra laws");
    Arc::new(CalculusOperations::new(Arc::new(calculus)).expect("13 base relations fit in 16 bits"))
}

pub const RCC8_NAMES: [&str; 8] = ["DC", "EC", "PO", "TPP", "NTPP", "TPPI", "NTPPI", "EQ"];

/// RCC8 from the published composition table.
pub fn rcc8_operations() -> Arc<CalculusOperations<Relation8>> {
    #[rustfmt::skip]
    let table: [&str; 64] = [
        // DC
        "DC EC PO TPP NTPP TPPI NTPPI EQ",
        "DC EC PO TPP NTPP",
        "DC EC PO TPP NTPP",
        "DC EC PO TPP NTPP",
        "DC EC PO TPP NTPP",
        "DC",
        "DC",
        "DC",
        // EC
        "DC EC PO TPPI NTPPI",
        "DC EC PO TPP TPPI EQ",
        "DC EC PO TPP NTPP",
        "EC PO TPP NTPP",
        "PO TPP NTPP",
        "DC EC",
        "DC",
        "EC",
        // PO
        "DC EC PO TPPI NTPPI",
        "DC EC PO TPPI NTPPI",
        "DC EC PO TPP NTPP TPPI NTPPI EQ",
        "PO TPP NTPP",
        "PO TPP NTPP",
        "DC EC PO TPPI NTPPI",
        "DC EC PO TPPI NTPPI",
        "PO",
        // TPP
        "DC",
        "DC EC",
        "DC EC PO TPP NTPP",
        "TPP NTPP",
        "NTPP",
        "DC EC PO TPP TPPI EQ",
        "DC EC PO TPPI NTPPI",
        "TPP",
        // NTPP
        "DC",
        "DC",
        "DC EC PO TPP NTPP",
        "NTPP",
        "NTPP",
        "DC EC PO TPP NTPP",
        "DC EC PO TPP NTPP TPPI NTPPI EQ",
        "NTPP",
        // TPPI
        "DC EC PO TPPI NTPPI",
        "EC PO TPPI NTPPI",
        "PO TPPI NTPPI",
        "PO TPP TPPI EQ",
        "PO TPP NTPP",
        "TPPI NTPPI",
        "NTPPI",
        "TPPI",
        // NTPPI
        "DC EC PO TPPI NTPPI",
        "PO TPPI NTPPI",
        "PO TPPI NTPPI",
        "PO TPPI NTPPI",
        "PO TPP NTPP TPPI NTPPI EQ",
        "NTPPI",
        "NTPPI",
        "NTPPI",
        // EQ
        "DC",
        "EC",
        "PO",
        "TPP",
        "NTPP",
        "TPPI",
        "NTPPI",
        "EQ",
    ];
    let composition = table
        .iter()
        .map(|&members| relation_from_names(&RCC8_NAMES, members))
        .collect();
    let calculus = Calculus::new(
        "rcc8",
        RCC8_NAMES.iter().map(|&name| name.to_owned()).collect(),
        7,
        vec![0, 1, 2, 5, 6, 3, 4, 7],
        composition,
        vec![1; 8],
    )
    .expect("the published table satisfies the algebra laws");
    Arc::new(CalculusOperations::new(Arc::new(calculus)).expect("8 base relations fit in 8 bits"))
}

pub const RCC5_NAMES: [&str; 5] = ["EQ", "PP", "PPC", "PO", "DC"];

/// RCC5, the coarsening of RCC8 without boundary distinctions.
pub fn rcc5_operations() -> Arc<CalculusOperations<Relation8>> {
    #[rustfmt::skip]
    let table: [&str; 25] = [
        // EQ
        "EQ", "PP", "PPC", "PO", "DC",
        // PP
        "PP", "PP", "EQ PP PPC PO DC", "PP PO DC", "DC",
        // PPC
        "PPC", "EQ PP PPC PO", "PPC", "PPC PO", "PPC PO DC",
        // PO
        "PO", "PP PO", "PPC PO DC", "EQ PP PPC PO DC", "PPC PO DC",
        // DC
        "DC", "PP PO DC", "DC", "PP PO DC", "EQ PP PPC PO DC",
    ];
    let composition = table
        .iter()
        .map(|&members| relation_from_names(&RCC5_NAMES, members))
        .collect();
    let calculus = Calculus::new(
        "rcc5",
        RCC5_NAMES.iter().map(|&name| name.to_owned()).collect(),
        0,
        vec![0, 2, 1, 3, 4],
        composition,
        vec![1; 5],
    )
    .expect("the published table satisfies the algebra laws");
    Arc::new(CalculusOperations::new(Arc::new(calculus)).expect("5 base relations fit in 8 bits"))
}

/// Encodes a whitespace-separated list of base relation names.
pub fn encode<R: Relation>(operations: &CalculusOperations<R>, text: &str) -> R {
    R::from_dynamic(
        &operations
            .calculus()
            .encode_relation(text)
            .expect("known base relation names"),
    )
}

/// Checks that `scenario` really is a scenario of `original`: a refinement
/// whose off-diagonal relations are all split and which is a fixed point of
/// algebraic closure.
pub fn assert_valid_scenario<R: Relation>(
    scenario: &ConstraintNetwork<R>,
    original: &ConstraintNetwork<R>,
) {
    assert!(scenario.is_refinement_of(original));
    let operations = Arc::clone(scenario.operations());
    for first in 0..scenario.num_variables() {
        for second in first + 1..scenario.num_variables() {
            assert!(
                operations.is_split(scenario.get_constraint(first, second)),
                "pair ({first}, {second}) is not split"
            );
        }
    }
    let mut closed = scenario.clone();
    assert!(qcn_solver::enforce_algebraic_closure(&mut closed).is_empty());
    assert_eq!(&closed, scenario);
}

/// The RCC5 base relation holding between two regions modeled as non-empty
/// point sets (bitmasks over a small universe).
pub fn region_relation(a: u32, b: u32) -> usize {
    let name = if a == b {
        "EQ"
    } else if a & b == 0 {
        "DC"
    } else if a & !b == 0 {
        "PP"
    } else if b & !a == 0 {
        "PPC"
    } else {
        "PO"
    };
    base_index(&RCC5_NAMES, name)
}

/// Searches for a model of the network over non-empty subsets of a four-point
/// universe. A found model proves satisfiability; the converse does not hold,
/// since a satisfiable network may need a larger universe.
pub fn rcc5_has_small_model(network: &ConstraintNetwork<Relation8>) -> bool {
    fn extend(
        network: &ConstraintNetwork<Relation8>,
        assignment: &mut Vec<u32>,
    ) -> bool {
        if assignment.len() == network.num_variables() {
            return true;
        }
        let next = assignment.len();
        for candidate in 1u32..16 {
            let consistent = assignment.iter().enumerate().all(|(earlier, &region)| {
                network
                    .get_constraint(earlier, next)
                    .contains(region_relation(region, candidate))
            });
            if consistent {
                assignment.push(candidate);
                if extend(network, assignment) {
                    return true;
                }
                assignment.pop();
            }
        }
        false
    }

    extend(network, &mut Vec::new())
}

/// Exhaustively checks satisfiability over the interval model. Only suitable
/// for small networks.
pub fn allen_brute_force_satisfiable(network: &ConstraintNetwork<Relation16>) -> bool {
    fn extend(
        network: &ConstraintNetwork<Relation16>,
        points: &[(i32, i32)],
        assignment: &mut Vec<(i32, i32)>,
    ) -> bool {
        if assignment.len() == network.num_variables() {
            return true;
        }
        let next = assignment.len();
        for &candidate in points {
            let consistent = assignment.iter().enumerate().all(|(earlier, &interval)| {
                network
                    .get_constraint(earlier, next)
                    .contains(interval_relation(interval, candidate))
            });
            if consistent {
                assignment.push(candidate);
                if extend(network, points, assignment) {
                    return true;
                }
                assignment.pop();
            }
        }
        false
    }

    extend(network, &intervals(), &mut Vec::new())
}
