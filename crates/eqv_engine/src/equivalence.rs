//! The equivalence cascade.
//!
//! Two expressions are compared by simplifying their difference
//! through progressively more expensive strategies. Each stage either
//! establishes equality or passes the baton; a stage that cannot apply
//! (numeric evaluation of a symbolic difference, say) is skipped, not
//! treated as a failure. Exhausting the cascade means not-equal, and
//! the stage-one simplified difference is what gets reported.

use crate::calculus::doit;
use crate::expand::expand;
use crate::numeric::eval_complex;
use crate::rewrite::rewrite_exp_as_trig;
use crate::simplify::simplify;
use crate::trig::trig_simplify;
use eqv_ast::Expr;
use std::sync::Arc;

/// Absolute tolerance on each component of the numeric fallback.
const NUMERIC_TOLERANCE: f64 = 1e-10;

/// Outcome of one comparison. The canonical strings are the two
/// inputs after forced operator evaluation, before the difference
/// cascade touches anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub equal: bool,
    pub canonical_a: String,
    pub canonical_b: String,
    pub simplified_diff: String,
}

pub fn compare_exprs(a: &Arc<Expr>, b: &Arc<Expr>) -> Comparison {
    let ea = simplify(&doit(a));
    let eb = simplify(&doit(b));
    let canonical_a = ea.to_string();
    let canonical_b = eb.to_string();

    let diff = Expr::sub(ea, eb);
    let simplified = simplify(&diff);
    let simplified_diff = simplified.to_string();

    let equal = cascade(&diff, &simplified);
    Comparison {
        equal,
        canonical_a,
        canonical_b,
        simplified_diff: if equal {
            "0".to_string()
        } else {
            simplified_diff
        },
    }
}

fn cascade(diff: &Arc<Expr>, simplified: &Arc<Expr>) -> bool {
    if simplified.is_int(0) {
        tracing::debug!(target: "equivalence", "equal at stage 1 (simplify)");
        return true;
    }

    let contracted = simplify(&trig_simplify(simplified));
    if contracted.is_int(0) {
        tracing::debug!(target: "equivalence", "equal at stage 2 (trig contraction)");
        return true;
    }

    let expanded = simplify(&expand(diff));
    if expanded.is_int(0) {
        tracing::debug!(target: "equivalence", "equal at stage 3 (expansion)");
        return true;
    }
    // Expansion can surface a fresh Pythagorean pair.
    if simplify(&trig_simplify(&expanded)).is_int(0) {
        tracing::debug!(target: "equivalence", "equal at stage 3 (expansion + trig)");
        return true;
    }

    let euler = simplify(&rewrite_exp_as_trig(simplified));
    if simplify(&trig_simplify(&euler)).is_int(0) {
        tracing::debug!(target: "equivalence", "equal at stage 4 (exponential rewrite)");
        return true;
    }

    match eval_complex(simplified) {
        Ok(value) => {
            let equal =
                value.re.abs() < NUMERIC_TOLERANCE && value.im.abs() < NUMERIC_TOLERANCE;
            if equal {
                tracing::debug!(target: "equivalence", "equal at stage 5 (numeric)");
            } else {
                tracing::debug!(
                    target: "equivalence",
                    re = value.re,
                    im = value.im,
                    "numeric stage found a non-zero difference"
                );
            }
            equal
        }
        Err(err) => {
            tracing::debug!(target: "equivalence", %err, "numeric stage skipped");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(a: &str, b: &str) -> Comparison {
        compare_exprs(
            &eqv_parser::parse_latex(a).unwrap(),
            &eqv_parser::parse_latex(b).unwrap(),
        )
    }

    #[test]
    fn commutativity() {
        let c = compare("x+1", "1+x");
        assert!(c.equal);
        assert_eq!(c.simplified_diff, "0");
    }

    #[test]
    fn pythagorean_identity() {
        assert!(compare("\\sin^2(x)+\\cos^2(x)", "1").equal);
    }

    #[test]
    fn eulers_formula() {
        assert!(compare("e^{i\\pi}", "-1").equal);
    }

    #[test]
    fn transcendental_log_identity() {
        assert!(compare("\\ln(2)+\\ln(3)", "\\ln(6)").equal);
    }

    #[test]
    fn different_powers_are_not_equal() {
        let c = compare("x^2", "x^3");
        assert!(!c.equal);
        assert_ne!(c.simplified_diff, "0");
    }

    #[test]
    fn binomial_expansion() {
        assert!(compare("(x+1)^2", "x^2+2x+1").equal);
    }

    #[test]
    fn derivative_against_closed_form() {
        assert!(compare("\\frac{d}{dx}(x^2+3x)", "2x+3").equal);
    }

    #[test]
    fn definite_integral_against_value() {
        assert!(compare("\\int_0^1 x^2 dx", "\\frac{1}{3}").equal);
    }

    #[test]
    fn verdict_is_symmetric() {
        for (a, b) in [("x+1", "1+x"), ("x^2", "x^3"), ("e^{i\\pi}", "-1")] {
            assert_eq!(compare(a, b).equal, compare(b, a).equal);
        }
    }

    #[test]
    fn canonical_strings_are_deterministic() {
        let first = compare("c+a+b", "b+c+a");
        let second = compare("c+a+b", "b+c+a");
        assert_eq!(first, second);
        assert_eq!(first.canonical_a, first.canonical_b);
    }
}
