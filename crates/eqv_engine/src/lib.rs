//! Symbolic engine: the narrow computer-algebra capability layer the
//! equivalence checker is built on.
//!
//! Capabilities: algebraic normalization ([`simplify`]), distribution
//! ([`expand`]), trigonometric contraction ([`trig_simplify`]), the
//! Euler rewrite ([`rewrite_exp_as_trig`]), numeric evaluation
//! ([`eval_complex`]), forced evaluation of calculus operators
//! ([`doit`]) and the equivalence cascade ([`compare_exprs`]).

pub mod calculus;
pub mod equivalence;
pub mod expand;
pub mod numeric;
pub mod rewrite;
pub mod simplify;
pub mod trig;

pub use calculus::{differentiate, doit, integrate};
pub use equivalence::{compare_exprs, Comparison};
pub use expand::expand;
pub use numeric::{eval_complex, NumericError};
pub use rewrite::rewrite_exp_as_trig;
pub use simplify::{is_zero, simplify};
pub use trig::trig_simplify;
