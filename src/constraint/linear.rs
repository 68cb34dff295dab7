//! Linear binary constraints: `a*x + b*y {op} c` (spec.md §4.1).
//!
//! Not present in the retrieved `original_source` snapshot (its commented-out
//! `LinEq` sketch notes "Value must be Num"); built directly from spec.md's
//! description, following the same closure-wrapping shape as
//! [`super::predicate::PredicateBinary`] so the two read as one family.

use super::{Transform, Var};
use std::ops::{Add, Mul};
use std::sync::Arc;

/// Comparator applied to `a*x + b*y` vs. `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl LinearOp {
    fn symbol(self) -> &'static str {
        match self {
            LinearOp::Eq => "=",
            LinearOp::Ne => "!=",
            LinearOp::Lt => "<",
            LinearOp::Le => "<=",
            LinearOp::Gt => ">",
            LinearOp::Ge => ">=",
        }
    }

    fn apply<V: PartialOrd + PartialEq>(self, lhs: &V, rhs: &V) -> bool {
        match self {
            LinearOp::Eq => lhs == rhs,
            LinearOp::Ne => lhs != rhs,
            LinearOp::Lt => lhs < rhs,
            LinearOp::Le => lhs <= rhs,
            LinearOp::Gt => lhs > rhs,
            LinearOp::Ge => lhs >= rhs,
        }
    }
}

/// `a*x + b*y {op} c`, with optional per-argument transforms applied before
/// the linear combination is computed.
pub struct LinearBinary<V> {
    x: Var,
    y: Var,
    op: LinearOp,
    check: Arc<dyn Fn(&V, &V) -> bool + Send + Sync>,
    x_transform: Option<Transform<V>>,
    y_transform: Option<Transform<V>>,
    display: String,
}

impl<V> Clone for LinearBinary<V> {
    fn clone(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            op: self.op,
            check: Arc::clone(&self.check),
            x_transform: self.x_transform.clone(),
            y_transform: self.y_transform.clone(),
            display: self.display.clone(),
        }
    }
}

impl<V> LinearBinary<V>
where
    V: Clone + Add<Output = V> + Mul<Output = V> + PartialOrd + PartialEq + Send + Sync + 'static,
{
    /// Build `a*x + b*y {op} c`.
    pub fn new(x: Var, y: Var, a: V, b: V, c: V, op: LinearOp) -> Self {
        assert_ne!(x, y, "x must be different from y");
        let display = format!("{}*x[{}] + {}*x[{}] {} c", "a", x, "b", y, op.symbol());
        let check = {
            let a = a.clone();
            let b = b.clone();
            let c = c.clone();
            Arc::new(move |xv: &V, yv: &V| {
                let lhs = a.clone() * xv.clone() + b.clone() * yv.clone();
                op.apply(&lhs, &c)
            })
        };
        Self {
            x,
            y,
            op,
            check,
            x_transform: None,
            y_transform: None,
            display,
        }
    }

    pub fn with_x_transform(mut self, t: Transform<V>) -> Self {
        self.x_transform = Some(t);
        self
    }

    pub fn with_y_transform(mut self, t: Transform<V>) -> Self {
        self.y_transform = Some(t);
        self
    }
}

// Pure accessors/dispatchers that don't need `new`'s arithmetic bounds, kept
// in their own unconstrained block (mirrors `PredicateBinary`) so
// `BinaryConstraint<V>`'s own unconstrained impl can call them.
impl<V> LinearBinary<V> {
    pub fn vars(&self) -> (Var, Var) {
        (self.x, self.y)
    }

    /// Same constraint, rebased onto a different pair of endpoints — used
    /// by [`crate::decompose`] to carry a constraint into a rebuilt
    /// sub-problem whose variables have new dense indices.
    pub(crate) fn remapped(&self, x: Var, y: Var) -> Self {
        Self {
            x,
            y,
            op: self.op,
            check: Arc::clone(&self.check),
            x_transform: self.x_transform.clone(),
            y_transform: self.y_transform.clone(),
            display: self.display.clone(),
        }
    }

    pub fn sat_ordered(&self, x_val: &V, y_val: &V) -> bool {
        match (&self.x_transform, &self.y_transform) {
            (Some(fx), Some(fy)) => (self.check)(&fx(x_val), &fy(y_val)),
            (Some(fx), None) => (self.check)(&fx(x_val), y_val),
            (None, Some(fy)) => (self.check)(x_val, &fy(y_val)),
            (None, None) => (self.check)(x_val, y_val),
        }
    }

    pub fn display(&self) -> String {
        self.display.clone()
    }
}
