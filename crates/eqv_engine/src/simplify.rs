//! Algebraic normalization.
//!
//! `simplify` rewrites a tree into a canonical form: exact rational
//! folding, flattened sums with like terms collected, flattened
//! products with matching bases merged, and a small evaluation table
//! for the known functions. The output is deterministic for a given
//! input, which is what the equivalence cascade and the canonical
//! display strings rely on.
//!
//! Normal form invariants:
//! - sums are left-nested `Add` chains, terms sorted by display key,
//!   with the numeric constant last;
//! - products are left-nested `Mul` chains, factors sorted by display
//!   key, with the numeric coefficient (if any) as the leftmost node;
//! - `Neg`, `Sub` and `Div` never survive normalization (they become
//!   negative coefficients and negative exponents);
//! - `sqrt(u)` becomes `u^(1/2)`.
//!
//! Division by an exact zero is deliberately left as a `0^-1` factor
//! rather than collapsed, so undefined forms stay visible to the
//! limit evaluator and the numeric stage.

use eqv_ast::{Constant, Expr};
use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::Arc;

/// Normalize an expression. Total: never fails, never panics.
pub fn simplify(expr: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(_, _) | Expr::Sub(_, _) | Expr::Neg(_) => simplify_sum(expr),
        Expr::Mul(_, _) | Expr::Div(_, _) => simplify_product(expr),
        Expr::Pow(base, exp) => simplify_pow(&simplify(base), &simplify(exp)),
        Expr::Function(name, args) => {
            let args: Vec<Arc<Expr>> = args.iter().map(simplify).collect();
            simplify_function(name, args)
        }
        Expr::Derivative { inner, var } => Arc::new(Expr::Derivative {
            inner: simplify(inner),
            var: var.clone(),
        }),
        Expr::Integral { inner, var, bounds } => Arc::new(Expr::Integral {
            inner: simplify(inner),
            var: var.clone(),
            bounds: bounds
                .as_ref()
                .map(|(lo, hi)| (simplify(lo), simplify(hi))),
        }),
        Expr::Limit { inner, var, to } => Arc::new(Expr::Limit {
            inner: simplify(inner),
            var: var.clone(),
            to: simplify(to),
        }),
    }
}

/// True when the expression normalizes to the literal zero.
pub fn is_zero(expr: &Arc<Expr>) -> bool {
    simplify(expr).is_int(0)
}

// ============================================================================
// Sums
// ============================================================================

/// Split a normalized expression into (numeric constant, terms), where
/// each term is a (coefficient, non-numeric part) pair.
pub(crate) fn sum_parts(expr: &Arc<Expr>) -> (BigRational, Vec<(BigRational, Arc<Expr>)>) {
    let mut constant = BigRational::zero();
    let mut terms: Vec<(BigRational, Arc<Expr>)> = Vec::new();
    collect_terms(expr, &BigRational::one(), &mut constant, &mut terms);
    (constant, terms)
}

fn collect_terms(
    expr: &Arc<Expr>,
    scale: &BigRational,
    constant: &mut BigRational,
    terms: &mut Vec<(BigRational, Arc<Expr>)>,
) {
    match expr.as_ref() {
        Expr::Add(l, r) => {
            collect_terms(l, scale, constant, terms);
            collect_terms(r, scale, constant, terms);
        }
        Expr::Sub(l, r) => {
            collect_terms(l, scale, constant, terms);
            let neg = -scale.clone();
            collect_terms(r, &neg, constant, terms);
        }
        Expr::Neg(inner) => {
            let neg = -scale.clone();
            collect_terms(inner, &neg, constant, terms);
        }
        _ => {
            let s = simplify(expr);
            match s.as_ref() {
                // A simplified subtree can itself be a sum, e.g. after
                // a function evaluated to cos(t) + I*sin(t).
                Expr::Add(_, _) => collect_terms(&s, scale, constant, terms),
                _ => {
                    let (coeff, part) = split_coeff(&s);
                    let scaled = scale * &coeff;
                    match part {
                        None => *constant += scaled,
                        Some(p) => add_term(terms, scaled, p),
                    }
                }
            }
        }
    }
}

fn add_term(terms: &mut Vec<(BigRational, Arc<Expr>)>, coeff: BigRational, part: Arc<Expr>) {
    for (c, p) in terms.iter_mut() {
        if *p == part {
            *c += coeff;
            return;
        }
    }
    terms.push((coeff, part));
}

/// Split a normalized term into its numeric coefficient and the rest.
/// `None` means the term is a pure number.
pub(crate) fn split_coeff(expr: &Arc<Expr>) -> (BigRational, Option<Arc<Expr>>) {
    match expr.as_ref() {
        Expr::Number(n) => (n.clone(), None),
        Expr::Mul(l, r) => match l.as_ref() {
            Expr::Number(n) => (n.clone(), Some(r.clone())),
            _ => (BigRational::one(), Some(expr.clone())),
        },
        _ => (BigRational::one(), Some(expr.clone())),
    }
}

/// Reattach a coefficient to a term part, preserving the product
/// normal form (number leftmost).
pub(crate) fn apply_coeff(coeff: BigRational, part: Arc<Expr>) -> Arc<Expr> {
    if coeff.is_one() {
        part
    } else if coeff.is_zero() {
        Expr::int(0)
    } else {
        Expr::mul(Expr::num(coeff), part)
    }
}

/// Rebuild a sum from collected parts in canonical order.
pub(crate) fn build_sum(
    constant: BigRational,
    mut terms: Vec<(BigRational, Arc<Expr>)>,
) -> Arc<Expr> {
    terms.retain(|(c, _)| !c.is_zero());
    terms.sort_by_key(|(_, p)| p.to_string());

    let mut parts: Vec<Arc<Expr>> = terms
        .into_iter()
        .map(|(c, p)| apply_coeff(c, p))
        .collect();
    if !constant.is_zero() || parts.is_empty() {
        parts.push(Expr::num(constant));
    }

    let mut iter = parts.into_iter();
    let first = iter.next().unwrap_or_else(|| Expr::int(0));
    iter.fold(first, Expr::add)
}

fn simplify_sum(expr: &Arc<Expr>) -> Arc<Expr> {
    let (constant, terms) = sum_parts(expr);
    build_sum(constant, terms)
}

// ============================================================================
// Products
// ============================================================================

/// One multiplicative factor: a base and the exponents accumulated
/// for it so far.
struct Factor {
    base: Arc<Expr>,
    exps: Vec<Arc<Expr>>,
}

fn simplify_product(expr: &Arc<Expr>) -> Arc<Expr> {
    let mut coeff = BigRational::one();
    let mut factors: Vec<Factor> = Vec::new();
    collect_factors(expr, false, &mut coeff, &mut factors);

    // Merge exponents per base and drop trivial factors.
    let mut built: Vec<Arc<Expr>> = Vec::new();
    let mut undefined = false;
    for factor in factors {
        let exp = if factor.exps.len() == 1 {
            factor.exps.into_iter().next().unwrap_or_else(|| Expr::int(1))
        } else {
            let sum = factor
                .exps
                .into_iter()
                .reduce(Expr::add)
                .unwrap_or_else(|| Expr::int(0));
            simplify(&sum)
        };
        if exp.is_int(0) {
            continue;
        }
        // 0 to a negative power marks an undefined form; keep it.
        if factor.base.is_int(0) {
            if let Expr::Number(n) = exp.as_ref() {
                if n.is_negative() {
                    undefined = true;
                    built.push(Expr::pow(factor.base, exp));
                    continue;
                }
            }
        }
        let powered = simplify_pow(&factor.base, &exp);
        match powered.as_ref() {
            Expr::Number(n) => coeff *= n,
            _ => built.push(powered),
        }
    }

    if coeff.is_zero() && !undefined {
        return Expr::int(0);
    }
    if built.is_empty() {
        return Expr::num(coeff);
    }

    built.sort_by_key(|f| f.to_string());
    let mut iter = built.into_iter();
    let first = iter.next().unwrap_or_else(|| Expr::int(1));
    let chain = iter.fold(first, Expr::mul);

    if coeff.is_one() {
        chain
    } else {
        Expr::mul(Expr::num(coeff), chain)
    }
}

fn collect_factors(
    expr: &Arc<Expr>,
    invert: bool,
    coeff: &mut BigRational,
    factors: &mut Vec<Factor>,
) {
    match expr.as_ref() {
        Expr::Mul(l, r) => {
            collect_factors(l, invert, coeff, factors);
            collect_factors(r, invert, coeff, factors);
        }
        Expr::Div(l, r) => {
            collect_factors(l, invert, coeff, factors);
            collect_factors(r, !invert, coeff, factors);
        }
        Expr::Neg(inner) => {
            *coeff = -coeff.clone();
            collect_factors(inner, invert, coeff, factors);
        }
        _ => {
            let s = simplify(expr);
            absorb_simplified(&s, invert, coeff, factors);
        }
    }
}

/// Fold an already-normalized node into the factor list.
fn absorb_simplified(
    expr: &Arc<Expr>,
    invert: bool,
    coeff: &mut BigRational,
    factors: &mut Vec<Factor>,
) {
    match expr.as_ref() {
        Expr::Number(n) => {
            if invert {
                if n.is_zero() {
                    // 1/0: record as 0^-1 instead of collapsing.
                    add_factor(factors, Expr::int(0), Expr::int(-1));
                } else {
                    *coeff /= n;
                }
            } else {
                *coeff *= n;
            }
        }
        Expr::Mul(l, r) => {
            absorb_simplified(l, invert, coeff, factors);
            absorb_simplified(r, invert, coeff, factors);
        }
        Expr::Pow(base, exp) => {
            let exp = if invert {
                simplify(&Expr::neg(exp.clone()))
            } else {
                exp.clone()
            };
            add_factor(factors, base.clone(), exp);
        }
        _ => {
            let exp = if invert { Expr::int(-1) } else { Expr::int(1) };
            add_factor(factors, expr.clone(), exp);
        }
    }
}

fn add_factor(factors: &mut Vec<Factor>, base: Arc<Expr>, exp: Arc<Expr>) {
    for factor in factors.iter_mut() {
        if factor.base == base {
            factor.exps.push(exp);
            return;
        }
    }
    factors.push(Factor {
        base,
        exps: vec![exp],
    });
}

/// Multiplicative factors of a normalized term, as (base, exponent)
/// pairs. Used by the integrator to separate variable-free factors.
pub(crate) fn product_factors(expr: &Arc<Expr>) -> Vec<(Arc<Expr>, Arc<Expr>)> {
    let mut out = Vec::new();
    fn walk(e: &Arc<Expr>, out: &mut Vec<(Arc<Expr>, Arc<Expr>)>) {
        match e.as_ref() {
            Expr::Mul(l, r) => {
                walk(l, out);
                walk(r, out);
            }
            Expr::Pow(b, x) => out.push((b.clone(), x.clone())),
            _ => out.push((e.clone(), Expr::int(1))),
        }
    }
    walk(expr, &mut out);
    out
}

// ============================================================================
// Powers
// ============================================================================

fn simplify_pow(base: &Arc<Expr>, exp: &Arc<Expr>) -> Arc<Expr> {
    if exp.is_int(0) {
        // 0^0 folds to 1 here; an accepted convention for this engine.
        return Expr::int(1);
    }
    if exp.is_int(1) {
        return base.clone();
    }
    if base.is_int(1) {
        return Expr::int(1);
    }

    if let (Expr::Number(b), Expr::Number(e)) = (base.as_ref(), exp.as_ref()) {
        if let Some(folded) = fold_numeric_pow(b, e) {
            return Expr::num(folded);
        }
    }

    // Zero base with a known-positive exponent.
    if base.is_int(0) {
        if let Expr::Number(n) = exp.as_ref() {
            if n.is_positive() {
                return Expr::int(0);
            }
        }
    }

    // (b^m)^k with integer k folds into b^(m*k).
    if let Expr::Pow(inner_base, inner_exp) = base.as_ref() {
        if let Expr::Number(n) = exp.as_ref() {
            if n.is_integer() {
                let merged = simplify(&Expr::mul(inner_exp.clone(), exp.clone()));
                return simplify_pow(inner_base, &merged);
            }
        }
    }

    Expr::pow(base.clone(), exp.clone())
}

/// Exact rational exponentiation where it stays rational: integer
/// exponents (within a size guard) and square roots of perfect squares.
fn fold_numeric_pow(base: &BigRational, exp: &BigRational) -> Option<BigRational> {
    if exp.is_integer() {
        let k = exp.to_integer().to_i32()?;
        if k.unsigned_abs() > 4096 {
            return None;
        }
        if base.is_zero() && k < 0 {
            return None;
        }
        return Some(base.pow(k));
    }

    // n^(1/2) for a perfect square of a non-negative rational.
    if *exp == BigRational::new(BigInt::from(1), BigInt::from(2)) && !base.is_negative() {
        let num_root = base.numer().sqrt();
        let den_root = base.denom().sqrt();
        if &(&num_root * &num_root) == base.numer() && &(&den_root * &den_root) == base.denom() {
            return Some(BigRational::new(num_root, den_root));
        }
    }

    None
}

// ============================================================================
// Functions
// ============================================================================

fn simplify_function(name: &str, mut args: Vec<Arc<Expr>>) -> Arc<Expr> {
    if args.len() != 1 {
        return Arc::new(Expr::Function(name.to_string(), args));
    }
    let arg = args.pop().unwrap_or_else(|| Expr::int(0));

    match name {
        // sqrt canonicalizes to a rational power.
        "sqrt" => simplify_pow(&arg, &Expr::rational(1, 2)),
        "exp" => {
            if arg.is_int(0) {
                return Expr::int(1);
            }
            if let Expr::Function(inner, inner_args) = arg.as_ref() {
                if inner == "log" && inner_args.len() == 1 {
                    return inner_args[0].clone();
                }
            }
            Expr::func("exp", vec![arg])
        }
        "log" => {
            if arg.is_int(1) {
                return Expr::int(0);
            }
            if matches!(arg.as_ref(), Expr::Constant(Constant::E)) {
                return Expr::int(1);
            }
            if let Expr::Function(inner, inner_args) = arg.as_ref() {
                if inner == "exp" && inner_args.len() == 1 {
                    return inner_args[0].clone();
                }
            }
            Expr::func("log", vec![arg])
        }
        "sin" | "cos" | "tan" => simplify_trig_call(name, arg),
        _ => Expr::func(name, vec![arg]),
    }
}

fn simplify_trig_call(name: &str, arg: Arc<Expr>) -> Arc<Expr> {
    // Parity: sin and tan are odd, cos is even.
    let (coeff, part) = split_coeff(&arg);
    if coeff.is_negative() {
        let mirrored = match &part {
            Some(p) => apply_coeff(-coeff.clone(), p.clone()),
            None => Expr::num(-coeff.clone()),
        };
        let call = simplify_trig_call(name, mirrored);
        return match name {
            "cos" => call,
            _ => simplify(&Expr::neg(call)),
        };
    }

    if let Some(value) = trig_at_pi_multiple(name, &coeff, part.as_deref()) {
        return value;
    }

    Expr::func(name, vec![arg])
}

/// Exact values at integer and half-integer multiples of pi
/// (including zero).
fn trig_at_pi_multiple(name: &str, coeff: &BigRational, part: Option<&Expr>) -> Option<Arc<Expr>> {
    let multiple = match part {
        None => {
            if coeff.is_zero() {
                BigRational::zero()
            } else {
                return None;
            }
        }
        Some(Expr::Constant(Constant::Pi)) => coeff.clone(),
        _ => return None,
    };

    let twice = &multiple * BigRational::from_integer(BigInt::from(2));
    if !twice.is_integer() {
        return None;
    }
    let quadrant = twice
        .to_integer()
        .mod_floor(&BigInt::from(4))
        .to_i64()? as usize;

    // Values of sin/cos at 0, pi/2, pi, 3pi/2.
    const SIN: [i64; 4] = [0, 1, 0, -1];
    const COS: [i64; 4] = [1, 0, -1, 0];
    match name {
        "sin" => Some(Expr::int(SIN[quadrant])),
        "cos" => Some(Expr::int(COS[quadrant])),
        // tan is only defined where cos is non-zero.
        "tan" if quadrant % 2 == 0 => Some(Expr::int(0)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
