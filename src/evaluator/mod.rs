//! The recursive evaluator that judges a candidate formula.
//!
//! Evaluation is a bottom-up walk: both children of a node are fully
//! resolved before its operator runs, and the two subtrees share no mutable
//! state. Only the root's `violates` flag leaves this module as a verdict;
//! intermediate dimensions and wildcard states are discarded.
use crate::config::CheckOptions;
use crate::error::Error;
use crate::operators::OperatorSet;
use crate::quantity::WildcardQuantity;
use crate::tree::Node;
use crate::units::Dimensions;
use rayon::prelude::*;
use tracing::trace;

/// Judges candidate trees against one dataset's feature dimensions.
///
/// Holds only shared references, so a single checker can be used from many
/// threads at once.
#[derive(Debug, Clone)]
pub struct DimensionalChecker<'a> {
    operators: &'a OperatorSet,
    dims: &'a [Dimensions],
    allow_wildcards: bool,
    target: Option<Dimensions>,
}

impl<'a> DimensionalChecker<'a> {
    pub fn new(operators: &'a OperatorSet, dims: &'a [Dimensions]) -> Self {
        Self::with_options(operators, dims, &CheckOptions::default())
    }

    pub fn with_options(operators: &'a OperatorSet, dims: &'a [Dimensions], options: &CheckOptions) -> Self {
        Self {
            operators,
            dims,
            allow_wildcards: !options.dimensionless_constants_only,
            target: options.target_dimensions(),
        }
    }

    /// Evaluates `tree` on one row and returns the root value.
    pub fn evaluate(&self, tree: &Node, row: &[f64]) -> Result<WildcardQuantity, Error> {
        if row.len() != self.dims.len() {
            return Err(Error::RowLengthMismatch { expected: self.dims.len(), actual: row.len() });
        }
        self.eval_node(tree, row)
    }

    fn eval_node(&self, node: &Node, row: &[f64]) -> Result<WildcardQuantity, Error> {
        match node {
            Node::Constant(value) => Ok(WildcardQuantity::constant(*value, self.allow_wildcards)),
            Node::Feature(feature) => {
                let dims = self.dims.get(*feature).ok_or(Error::FeatureOutOfRange {
                    feature: *feature,
                    n_features: self.dims.len(),
                })?;
                Ok(WildcardQuantity::feature(row[*feature], *dims))
            }
            Node::Unary { op, child } => {
                let operator = self.operators.unary(*op).ok_or(Error::UnknownOperator {
                    arity: 1,
                    index: *op,
                    available: self.operators.unary_count(),
                })?;
                let child = self.eval_node(child, row)?;
                Ok(child.apply_unary(*op, operator, self.operators.capabilities())?)
            }
            Node::Binary { op, left, right } => {
                let operator = self.operators.binary(*op).ok_or(Error::UnknownOperator {
                    arity: 2,
                    index: *op,
                    available: self.operators.binary_count(),
                })?;
                let l = self.eval_node(left, row)?;
                let r = self.eval_node(right, row)?;
                Ok(l.apply_binary(r, *op, operator, self.operators.capabilities())?)
            }
        }
    }

    /// The verdict for one row.
    ///
    /// With a target unit configured, a fixed-dimension root that does not
    /// match it also counts as a violation. Wildcard roots always match.
    pub fn violates(&self, tree: &Node, row: &[f64]) -> Result<bool, Error> {
        let root = self.evaluate(tree, row)?;
        let mut violates = root.violates;
        if let Some(target) = &self.target {
            violates |= !root.wildcard && root.dims() != target;
        }
        trace!(violates, nodes = tree.node_count(), wildcard = root.wildcard, dims = %root.dims(), "dimensional verdict");
        Ok(violates)
    }

    /// Verdicts for many rows, evaluated in parallel. How the per-row
    /// results are aggregated is left to the caller.
    pub fn violations_per_row<R>(&self, tree: &Node, rows: &[R]) -> Result<Vec<bool>, Error>
    where
        R: AsRef<[f64]> + Sync,
    {
        rows.par_iter().map(|row| self.violates(tree, row.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{BinaryOperator, Operand, OperatorError, ScalarUnary, UnaryOperator};
    use crate::quantity::Quantity;
    use crate::units::{resolve, BaseDimension, UnitAnnotation};
    use rstest::rstest;
    use std::sync::Arc;

    const ADD: usize = 0;
    const SUB: usize = 1;
    const MUL: usize = 2;
    const DIV: usize = 3;
    const POW: usize = 4;
    const MAX: usize = 5;

    const SQRT: usize = 0;
    const SIN: usize = 1;
    const EXP: usize = 2;

    // Features: f0 = 3 m, f1 = 2 s, f2 = 5 m, f3 = 0.5 (dimensionless)
    const ROW: [f64; 4] = [3.0, 2.0, 5.0, 0.5];

    fn ops() -> OperatorSet {
        OperatorSet::from_names(&["sqrt", "sin", "exp"], &["+", "-", "*", "/", "^", "max"]).unwrap()
    }

    fn dims() -> Vec<Dimensions> {
        resolve(&["m".into(), "s".into(), "m".into(), UnitAnnotation::Number(1.0)])
    }

    fn x(i: usize) -> Node {
        Node::feature(i)
    }

    fn c(v: f64) -> Node {
        Node::constant(v)
    }

    fn bin(op: usize, l: Node, r: Node) -> Node {
        Node::binary(op, l, r)
    }

    fn un(op: usize, child: Node) -> Node {
        Node::unary(op, child)
    }

    fn check(tree: &Node) -> bool {
        let ops = ops();
        let dims = dims();
        DimensionalChecker::new(&ops, &dims).violates(tree, &ROW).unwrap()
    }

    #[rstest]
    #[case::length_plus_time(bin(ADD, x(0), x(1)), true)]
    #[case::length_plus_length(bin(ADD, x(0), x(0)), false)]
    #[case::two_lengths(bin(SUB, x(0), x(2)), false)]
    #[case::length_times_time(bin(MUL, x(0), x(1)), false)]
    #[case::length_over_time(bin(DIV, x(0), x(1)), false)]
    #[case::constant_plus_length(bin(ADD, c(2.5), x(0)), false)]
    #[case::length_pow_time(bin(POW, x(0), x(1)), true)]
    #[case::length_squared(bin(POW, x(0), c(2.0)), false)]
    #[case::length_pow_dimensionless_feature(bin(POW, x(0), x(3)), false)]
    #[case::velocity_plus_length(bin(ADD, bin(DIV, x(0), x(1)), x(2)), true)]
    #[case::scaled_time_plus_length(bin(ADD, bin(MUL, c(2.0), x(1)), x(0)), false)]
    #[case::sin_of_length(un(SIN, x(0)), true)]
    #[case::sin_of_ratio(un(SIN, bin(DIV, x(0), x(2))), false)]
    #[case::sin_of_dimensionless(un(SIN, x(3)), false)]
    #[case::sin_of_constant(un(SIN, c(1.0)), false)]
    #[case::exp_of_scaled_length(un(EXP, bin(MUL, c(0.1), x(0))), false)]
    #[case::sqrt_of_dimensionless(un(SQRT, x(3)), false)]
    #[case::sqrt_of_length(un(SQRT, x(0)), false)]
    #[case::sqrt_area_plus_length(bin(ADD, un(SQRT, bin(MUL, x(0), x(2))), x(0)), false)]
    #[case::sqrt_length_plus_length(bin(ADD, un(SQRT, x(0)), x(2)), true)]
    #[case::max_of_lengths(bin(MAX, x(0), x(2)), false)]
    #[case::max_length_time(bin(MAX, x(0), x(1)), true)]
    #[case::max_constant_time(bin(MAX, c(1.0), x(1)), false)]
    #[case::violation_is_sticky(bin(MUL, bin(ADD, x(0), x(1)), c(0.0)), true)]
    fn test_verdicts(#[case] tree: Node, #[case] expected: bool) {
        assert_eq!(check(&tree), expected);
    }

    #[test]
    fn test_root_dimension() {
        let ops = ops();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);

        let sq = checker.evaluate(&bin(POW, x(0), c(2.0)), &ROW).unwrap();
        assert_eq!(*sq.dims(), Dimensions::base(BaseDimension::Length).with(BaseDimension::Length, 2));
        assert_eq!(sq.value(), 9.0);

        let sum = checker.evaluate(&bin(ADD, c(2.5), x(0)), &ROW).unwrap();
        assert!(!sum.wildcard);
        assert_eq!(*sum.dims(), Dimensions::base(BaseDimension::Length));
        assert_eq!(sum.value(), 5.5);
    }

    #[test]
    fn test_non_finite_forces_violation_upward() {
        // 1 / (f0 - f0) is infinite but not yet a violation; the next
        // operator that consumes it is.
        let inf = bin(DIV, c(1.0), bin(SUB, x(0), x(0)));
        assert!(!check(&inf));
        assert!(check(&bin(MUL, inf.clone(), c(1.0))));
        assert!(check(&un(SQRT, inf)));
    }

    #[test]
    fn test_reevaluation_is_idempotent() {
        let tree = bin(ADD, un(SIN, bin(DIV, x(0), c(2.0))), bin(MUL, x(1), c(3.0)));
        let first = check(&tree);
        for _ in 0..5 {
            assert_eq!(check(&tree), first);
        }
    }

    #[test]
    fn test_fresh_capability_table_never_changes_a_verdict() {
        let dims = dims();
        let trees = vec![
            bin(ADD, x(0), x(1)),
            un(SQRT, x(0)),
            un(SIN, bin(MUL, c(2.0), x(0))),
            bin(MAX, c(1.0), x(1)),
            bin(ADD, un(SQRT, bin(MUL, x(0), x(2))), x(0)),
        ];
        let shared = ops();
        let shared_checker = DimensionalChecker::new(&shared, &dims);
        for tree in &trees {
            let fresh = ops();
            let expected = DimensionalChecker::new(&fresh, &dims).violates(tree, &ROW).unwrap();
            assert_eq!(shared_checker.violates(tree, &ROW).unwrap(), expected);
        }
    }

    #[test]
    fn test_unclassified_sqrt_violates_on_dimensioned_input() {
        let unary: Vec<Arc<dyn UnaryOperator>> = vec![Arc::new(ScalarUnary { name: "sqrt", f: f64::sqrt })];
        let ops = OperatorSet::new(unary, vec![]).unwrap();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);

        assert!(checker.violates(&un(0, x(0)), &ROW).unwrap());
        assert!(!checker.violates(&un(0, c(4.0)), &ROW).unwrap());
    }

    #[test]
    fn test_dimensionless_constants_only() {
        let ops = ops();
        let dims = dims();
        let opts = CheckOptions { dimensionless_constants_only: true, ..Default::default() };
        let checker = DimensionalChecker::with_options(&ops, &dims, &opts);

        assert!(checker.violates(&bin(ADD, c(2.5), x(0)), &ROW).unwrap());
        assert!(!checker.violates(&bin(ADD, c(2.5), x(3)), &ROW).unwrap());
    }

    #[test]
    fn test_target_unit() {
        let ops = ops();
        let dims = dims();
        let opts = CheckOptions::from_json(r#"{"target_unit": "m/s"}"#).unwrap();
        let checker = DimensionalChecker::with_options(&ops, &dims, &opts);

        assert!(!checker.violates(&bin(DIV, x(0), x(1)), &ROW).unwrap());
        assert!(checker.violates(&bin(MUL, x(0), x(1)), &ROW).unwrap());
        // A wildcard root can still become anything.
        assert!(!checker.violates(&bin(MUL, c(2.0), x(0)), &ROW).unwrap());
    }

    #[test]
    fn test_violations_per_row() {
        let ops = ops();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);
        let rows = vec![vec![3.0, 2.0, 5.0, 0.5], vec![f64::NAN, 1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0, 1.0]];

        let tree = bin(MUL, x(2), x(1));
        assert_eq!(checker.violations_per_row(&tree, &rows).unwrap(), vec![false, false, false]);

        let tree = bin(ADD, bin(MUL, x(0), x(1)), bin(MUL, x(2), x(1)));
        // Row 1 carries a NaN into a further operator.
        assert_eq!(checker.violations_per_row(&tree, &rows).unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let ops = ops();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);

        assert!(matches!(
            checker.violates(&x(0), &[1.0]),
            Err(Error::RowLengthMismatch { expected: 4, actual: 1 })
        ));
        assert!(matches!(
            checker.violates(&x(7), &ROW),
            Err(Error::FeatureOutOfRange { feature: 7, n_features: 4 })
        ));
        assert!(matches!(
            checker.violates(&un(9, x(0)), &ROW),
            Err(Error::UnknownOperator { arity: 1, index: 9, available: 3 })
        ));
        assert!(matches!(
            checker.violates(&bin(9, x(0), x(1)), &ROW),
            Err(Error::UnknownOperator { arity: 2, index: 9, available: 6 })
        ));
    }

    #[test]
    fn test_exponent_overflow_is_a_violation() {
        let ops = ops();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);
        let row = [1.0, 2.0, 5.0, 0.5];

        let huge = |p: f64| bin(MUL, bin(POW, x(0), c(p)), bin(POW, x(0), c(p)));
        assert!(checker.violates(&huge(50_000.0), &row).unwrap());
        assert!(checker.violates(&bin(ADD, huge(50_000.0), huge(60_000.0)), &row).unwrap());
        // Large but representable exponents still compose.
        assert!(!checker.violates(&huge(1_000.0), &row).unwrap());
    }

    /// Defined on dimensionless input only; anything else is an internal
    /// failure rather than a dimension error.
    #[derive(Debug)]
    struct Fragile;

    fn fragile_failure() -> OperatorError {
        OperatorError::Internal { op: "fragile".into(), message: "unexpected dimension".into() }
    }

    impl UnaryOperator for Fragile {
        fn name(&self) -> &str {
            "fragile"
        }
        fn eval(&self, x: f64) -> f64 {
            x
        }
        fn eval_quantity(&self, x: &Quantity) -> Result<Quantity, OperatorError> {
            if x.dims.is_dimensionless() {
                Ok(*x)
            } else {
                Err(fragile_failure())
            }
        }
    }

    impl BinaryOperator for Fragile {
        fn name(&self) -> &str {
            "fragile"
        }
        fn eval(&self, l: f64, _r: f64) -> f64 {
            l
        }
        fn eval_quantity(&self, l: Operand, r: Operand) -> Result<Quantity, OperatorError> {
            match (l, r) {
                (Operand::Quantity(q), _) if !q.dims.is_dimensionless() => Err(fragile_failure()),
                (_, Operand::Quantity(q)) if !q.dims.is_dimensionless() => Err(fragile_failure()),
                _ => Ok(Quantity::dimensionless(l.value())),
            }
        }
    }

    #[test]
    fn test_internal_operator_failure_propagates_from_evaluation() {
        let unary: Vec<Arc<dyn UnaryOperator>> = vec![Arc::new(Fragile)];
        let binary: Vec<Arc<dyn BinaryOperator>> = vec![Arc::new(Fragile)];
        let ops = OperatorSet::new(unary, binary).unwrap();
        let dims = dims();
        let checker = DimensionalChecker::new(&ops, &dims);

        // Dimensionless inputs succeed, so both forms were classified usable.
        assert!(!checker.violates(&un(0, x(3)), &ROW).unwrap());
        assert!(!checker.violates(&bin(0, x(3), c(1.0)), &ROW).unwrap());

        let err = checker.violates(&un(0, x(0)), &ROW).unwrap_err();
        assert!(matches!(err, Error::Operator(OperatorError::Internal { ref op, .. }) if op == "fragile"));

        let err = checker.violates(&bin(0, x(0), x(2)), &ROW).unwrap_err();
        assert!(matches!(err, Error::Operator(OperatorError::Internal { .. })));

        // A failure deep in the tree is not masked by the operators above it.
        let nested = bin(ADD, un(0, x(1)), c(1.0));
        let err = DimensionalChecker::new(&ops, &dims).violates(&nested, &ROW);
        assert!(err.is_err());
    }
}
