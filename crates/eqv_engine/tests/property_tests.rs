//! Randomized invariants of the cascade and the normal form.

use eqv_ast::Expr;
use eqv_engine::{compare_exprs, simplify};
use proptest::prelude::*;
use proptest::sample::select;

const INPUTS: &[&str] = &[
    "x",
    "x+1",
    "2x+3x",
    "\\frac{1}{2}",
    "\\frac{x+1}{2}",
    "\\sqrt{x}",
    "x^2+2x+1",
    "(x+1)^2",
    "\\sin(x)",
    "\\sin^2(x)+\\cos^2(x)",
    "e^{i\\pi}",
    "\\ln(2)+\\ln(3)",
    "\\frac{d}{dx}(x^2+3x)",
    "\\int_0^1 x^2 dx",
    "\\lim_{x \\to 2} (x^2+1)",
    "x y z",
    "\\pi",
];

proptest! {
    #[test]
    fn every_expression_equals_itself(latex in select(INPUTS.to_vec())) {
        let e = eqv_parser::parse_latex(latex).unwrap();
        let c = compare_exprs(&e, &e);
        prop_assert!(c.equal);
        prop_assert_eq!(c.canonical_a, c.canonical_b);
    }

    #[test]
    fn verdict_is_symmetric(
        a in select(INPUTS.to_vec()),
        b in select(INPUTS.to_vec()),
    ) {
        let ea = eqv_parser::parse_latex(a).unwrap();
        let eb = eqv_parser::parse_latex(b).unwrap();
        prop_assert_eq!(compare_exprs(&ea, &eb).equal, compare_exprs(&eb, &ea).equal);
    }

    #[test]
    fn integer_addition_commutes(a in -50i64..50, b in -50i64..50) {
        let lhs = Expr::add(
            Expr::mul(Expr::int(a), Expr::var("x")),
            Expr::mul(Expr::int(b), Expr::var("y")),
        );
        let rhs = Expr::add(
            Expr::mul(Expr::int(b), Expr::var("y")),
            Expr::mul(Expr::int(a), Expr::var("x")),
        );
        prop_assert!(compare_exprs(&lhs, &rhs).equal);
    }

    #[test]
    fn simplify_is_idempotent(latex in select(INPUTS.to_vec())) {
        let once = simplify(&eqv_parser::parse_latex(latex).unwrap());
        let twice = simplify(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn rational_arithmetic_folds_exactly(
        n1 in -20i64..20, d1 in 1i64..20,
        n2 in -20i64..20, d2 in 1i64..20,
    ) {
        let sum = Expr::add(Expr::rational(n1, d1), Expr::rational(n2, d2));
        let s = simplify(&sum);
        prop_assert!(matches!(s.as_ref(), Expr::Number(_)));
    }
}
