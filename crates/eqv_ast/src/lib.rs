pub mod expression;
pub mod helpers;

pub use expression::{Constant, Expr};
pub use helpers::{contains_constant, contains_var, substitute, variables};
