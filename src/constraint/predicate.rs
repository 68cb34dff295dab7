//! Predicate binary constraints: `Same` / `Different` / `LessEq` /
//! `LessThan` / `GreaterEq` / `GreaterThan`, plus a `custom` escape hatch.
//!
//! Grounded on `original_source/csp/constraints.py::PredicateConst` and its
//! concrete subclasses — each wraps a 2-argument boolean function with an
//! operator tag used only for display (spec.md §4.1).

use super::{Transform, Var};
use std::sync::Arc;

/// Operator tag, used for [`PredicateBinary::display`] only — dispatch
/// goes through the stored closure, not this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateOp {
    Same,
    Different,
    LessEq,
    LessThan,
    GreaterEq,
    GreaterThan,
    Custom,
}

impl PredicateOp {
    fn symbol(self) -> &'static str {
        match self {
            PredicateOp::Same => "=",
            PredicateOp::Different => "!=",
            PredicateOp::LessEq => "<=",
            PredicateOp::LessThan => "<",
            PredicateOp::GreaterEq => ">=",
            PredicateOp::GreaterThan => ">",
            PredicateOp::Custom => "~",
        }
    }
}

/// A binary predicate constraint over a canonical `(x, y)` pair, with
/// optional per-argument transforms applied before the predicate is
/// evaluated (spec.md §4.1: "Each argument may be a bare variable or a
/// `VarTransform(var, f)`").
pub struct PredicateBinary<V> {
    x: Var,
    y: Var,
    op: PredicateOp,
    pred: Arc<dyn Fn(&V, &V) -> bool + Send + Sync>,
    x_transform: Option<Transform<V>>,
    y_transform: Option<Transform<V>>,
}

impl<V> Clone for PredicateBinary<V> {
    fn clone(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            op: self.op,
            pred: Arc::clone(&self.pred),
            x_transform: self.x_transform.clone(),
            y_transform: self.y_transform.clone(),
        }
    }
}

impl<V> PredicateBinary<V> {
    pub fn custom(
        x: Var,
        y: Var,
        pred: impl Fn(&V, &V) -> bool + Send + Sync + 'static,
        _label: &str,
    ) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::Custom,
            pred: Arc::new(pred),
            x_transform: None,
            y_transform: None,
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
            pred: Arc::clone(&self.pred),
            x_transform: self.x_transform.clone(),
            y_transform: self.y_transform.clone(),
        }
    }

    /// Evaluate with values already in this constraint's canonical order.
    pub fn sat_ordered(&self, x_val: &V, y_val: &V) -> bool {
        let xv = match &self.x_transform {
            Some(f) => f(x_val),
            None => return self.sat_no_x_transform(x_val, y_val),
        };
        match &self.y_transform {
            Some(f) => (self.pred)(&xv, &f(y_val)),
            None => (self.pred)(&xv, y_val),
        }
    }

    fn sat_no_x_transform(&self, x_val: &V, y_val: &V) -> bool {
        match &self.y_transform {
            Some(f) => (self.pred)(x_val, &f(y_val)),
            None => (self.pred)(x_val, y_val),
        }
    }

    pub fn display(&self) -> String {
        format!("x[{}] {} x[{}]", self.x, self.op.symbol(), self.y)
    }
}

impl<V: PartialEq + 'static> PredicateBinary<V> {
    pub fn same(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::Same,
            pred: Arc::new(|a: &V, b: &V| a == b),
            x_transform: None,
            y_transform: None,
        }
    }

    pub fn different(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::Different,
            pred: Arc::new(|a: &V, b: &V| a != b),
            x_transform: None,
            y_transform: None,
        }
    }
}

impl<V: PartialOrd + 'static> PredicateBinary<V> {
    pub fn less_eq(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::LessEq,
            pred: Arc::new(|a: &V, b: &V| a <= b),
            x_transform: None,
            y_transform: None,
        }
    }

    pub fn less_than(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::LessThan,
            pred: Arc::new(|a: &V, b: &V| a < b),
            x_transform: None,
            y_transform: None,
        }
    }

    pub fn greater_eq(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::GreaterEq,
            pred: Arc::new(|a: &V, b: &V| a >= b),
            x_transform: None,
            y_transform: None,
        }
    }

    pub fn greater_than(x: Var, y: Var) -> Self {
        assert_ne!(x, y, "x must be different from y");
        Self {
            x,
            y,
            op: PredicateOp::GreaterThan,
            pred: Arc::new(|a: &V, b: &V| a > b),
            x_transform: None,
            y_transform: None,
        }
    }
}
