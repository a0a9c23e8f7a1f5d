//! Tree-walking helpers shared by the parser, engine and checker.

use crate::{Constant, Expr};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Substitute every occurrence of the variable `var` with `value`.
///
/// Returns the original `Arc` untouched when nothing matched, so
/// unchanged subtrees keep their sharing.
pub fn substitute(expr: &Arc<Expr>, var: &str, value: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Variable(name) if name == var => value.clone(),
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(l, r) => rebuild2(expr, l, r, var, value, Expr::Add),
        Expr::Sub(l, r) => rebuild2(expr, l, r, var, value, Expr::Sub),
        Expr::Mul(l, r) => rebuild2(expr, l, r, var, value, Expr::Mul),
        Expr::Div(l, r) => rebuild2(expr, l, r, var, value, Expr::Div),
        Expr::Pow(l, r) => rebuild2(expr, l, r, var, value, Expr::Pow),
        Expr::Neg(inner) => {
            let new = substitute(inner, var, value);
            if Arc::ptr_eq(&new, inner) {
                expr.clone()
            } else {
                Arc::new(Expr::Neg(new))
            }
        }
        Expr::Function(name, args) => {
            let new_args: Vec<Arc<Expr>> =
                args.iter().map(|a| substitute(a, var, value)).collect();
            let changed = args
                .iter()
                .zip(new_args.iter())
                .any(|(a, b)| !Arc::ptr_eq(a, b));
            if changed {
                Arc::new(Expr::Function(name.clone(), new_args))
            } else {
                expr.clone()
            }
        }
        // The bound variable shadows the outer one inside calculus nodes.
        Expr::Derivative { inner, var: bound } => {
            if bound == var {
                expr.clone()
            } else {
                Arc::new(Expr::Derivative {
                    inner: substitute(inner, var, value),
                    var: bound.clone(),
                })
            }
        }
        Expr::Integral {
            inner,
            var: bound,
            bounds,
        } => {
            let new_bounds = bounds
                .as_ref()
                .map(|(lo, hi)| (substitute(lo, var, value), substitute(hi, var, value)));
            let new_inner = if bound == var {
                inner.clone()
            } else {
                substitute(inner, var, value)
            };
            Arc::new(Expr::Integral {
                inner: new_inner,
                var: bound.clone(),
                bounds: new_bounds,
            })
        }
        Expr::Limit {
            inner,
            var: bound,
            to,
        } => {
            let new_inner = if bound == var {
                inner.clone()
            } else {
                substitute(inner, var, value)
            };
            Arc::new(Expr::Limit {
                inner: new_inner,
                var: bound.clone(),
                to: substitute(to, var, value),
            })
        }
    }
}

fn rebuild2(
    orig: &Arc<Expr>,
    l: &Arc<Expr>,
    r: &Arc<Expr>,
    var: &str,
    value: &Arc<Expr>,
    build: fn(Arc<Expr>, Arc<Expr>) -> Expr,
) -> Arc<Expr> {
    let new_l = substitute(l, var, value);
    let new_r = substitute(r, var, value);
    if Arc::ptr_eq(&new_l, l) && Arc::ptr_eq(&new_r, r) {
        orig.clone()
    } else {
        Arc::new(build(new_l, new_r))
    }
}

/// True if the variable `var` occurs free anywhere in the tree.
pub fn contains_var(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Variable(name) => name == var,
        Expr::Number(_) | Expr::Constant(_) => false,
        Expr::Add(l, r)
        | Expr::Sub(l, r)
        | Expr::Mul(l, r)
        | Expr::Div(l, r)
        | Expr::Pow(l, r) => contains_var(l, var) || contains_var(r, var),
        Expr::Neg(inner) => contains_var(inner, var),
        Expr::Function(_, args) => args.iter().any(|a| contains_var(a, var)),
        Expr::Derivative { inner, var: bound } => bound != var && contains_var(inner, var),
        Expr::Integral {
            inner,
            var: bound,
            bounds,
        } => {
            let in_bounds = bounds
                .as_ref()
                .map(|(lo, hi)| contains_var(lo, var) || contains_var(hi, var))
                .unwrap_or(false);
            in_bounds || (bound != var && contains_var(inner, var))
        }
        Expr::Limit {
            inner,
            var: bound,
            to,
        } => contains_var(to, var) || (bound != var && contains_var(inner, var)),
    }
}

/// True if the named constant occurs anywhere in the tree.
pub fn contains_constant(expr: &Expr, c: Constant) -> bool {
    match expr {
        Expr::Constant(found) => *found == c,
        Expr::Number(_) | Expr::Variable(_) => false,
        Expr::Add(l, r)
        | Expr::Sub(l, r)
        | Expr::Mul(l, r)
        | Expr::Div(l, r)
        | Expr::Pow(l, r) => contains_constant(l, c) || contains_constant(r, c),
        Expr::Neg(inner) => contains_constant(inner, c),
        Expr::Function(_, args) => args.iter().any(|a| contains_constant(a, c)),
        Expr::Derivative { inner, .. } => contains_constant(inner, c),
        Expr::Integral { inner, bounds, .. } => {
            contains_constant(inner, c)
                || bounds
                    .as_ref()
                    .map(|(lo, hi)| contains_constant(lo, c) || contains_constant(hi, c))
                    .unwrap_or(false)
        }
        Expr::Limit { inner, to, .. } => contains_constant(inner, c) || contains_constant(to, c),
    }
}

/// Collect all free variable names, sorted and deduplicated.
pub fn variables(expr: &Expr) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_vars(expr, &mut out);
    out
}

fn collect_vars(expr: &Expr, out: &mut BTreeSet<String>) {
    match expr {
        Expr::Variable(name) => {
            out.insert(name.clone());
        }
        Expr::Number(_) | Expr::Constant(_) => {}
        Expr::Add(l, r)
        | Expr::Sub(l, r)
        | Expr::Mul(l, r)
        | Expr::Div(l, r)
        | Expr::Pow(l, r) => {
            collect_vars(l, out);
            collect_vars(r, out);
        }
        Expr::Neg(inner) => collect_vars(inner, out),
        Expr::Function(_, args) => {
            for a in args {
                collect_vars(a, out);
            }
        }
        Expr::Derivative { inner, .. } => collect_vars(inner, out),
        Expr::Integral { inner, bounds, .. } => {
            collect_vars(inner, out);
            if let Some((lo, hi)) = bounds {
                collect_vars(lo, out);
                collect_vars(hi, out);
            }
        }
        Expr::Limit { inner, to, .. } => {
            collect_vars(inner, out);
            collect_vars(to, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_replaces_all_occurrences() {
        // x + x*y -> 2 + 2*y
        let e = Expr::add(
            Expr::var("x"),
            Expr::mul(Expr::var("x"), Expr::var("y")),
        );
        let s = substitute(&e, "x", &Expr::int(2));
        assert_eq!(format!("{}", s), "2 + 2*y");
    }

    #[test]
    fn substitute_respects_bound_variable() {
        let integral = Arc::new(Expr::Integral {
            inner: Expr::var("x"),
            var: "x".to_string(),
            bounds: None,
        });
        let s = substitute(&integral, "x", &Expr::int(5));
        assert_eq!(s, integral);
    }

    #[test]
    fn variables_are_sorted_and_unique() {
        let e = Expr::add(
            Expr::mul(Expr::var("y"), Expr::var("x")),
            Expr::var("x"),
        );
        let vars: Vec<String> = variables(&e).into_iter().collect();
        assert_eq!(vars, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn contains_var_sees_limit_point() {
        let l = Arc::new(Expr::Limit {
            inner: Expr::int(1),
            var: "x".to_string(),
            to: Expr::var("a"),
        });
        assert!(contains_var(&l, "a"));
        assert!(!contains_var(&l, "x"));
    }
}
