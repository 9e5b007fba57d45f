//! The expression tree: pure data, backend-agnostic, immutable once built.
//! Composing operators produces new nodes wrapping their operands; no node
//! ever mutates a sibling. Validation happens at resolution time only.

use std::fmt;

use crate::core::scalar::Scalar;
use crate::expr::ops::{AggKind, BinOp, HorizontalKind, UnaryOp};

/// One node of the backend-agnostic expression algebra
#[derive(Debug, Clone)]
pub enum Expr {
    /// Reference to a named column of the target frame
    ColumnRef(String),
    /// A scalar literal, broadcast against column operands
    Literal(Scalar),
    /// Expands to one `ColumnRef` per frame column at resolution time
    AllColumns,
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Aggregate {
        kind: AggKind,
        operand: Box<Expr>,
    },
    HorizontalReduce {
        kind: HorizontalKind,
        operands: Vec<Expr>,
    },
    Alias {
        inner: Box<Expr>,
        name: String,
    },
}

impl Expr {
    pub(crate) fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub(crate) fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    fn aggregate(self, kind: AggKind) -> Expr {
        Expr::Aggregate {
            kind,
            operand: Box::new(self),
        }
    }

    /// Name the output column of this expression
    pub fn alias(self, name: impl Into<String>) -> Expr {
        Expr::Alias {
            inner: Box::new(self),
            name: name.into(),
        }
    }

    // Aggregations

    pub fn sum(self) -> Expr {
        self.aggregate(AggKind::Sum)
    }

    pub fn mean(self) -> Expr {
        self.aggregate(AggKind::Mean)
    }

    pub fn min(self) -> Expr {
        self.aggregate(AggKind::Min)
    }

    pub fn max(self) -> Expr {
        self.aggregate(AggKind::Max)
    }

    pub fn count(self) -> Expr {
        self.aggregate(AggKind::Count)
    }

    // Operators without a Rust token

    pub fn floor_div(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::FloorDiv, self, other.into())
    }

    pub fn pow(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Pow, self, other.into())
    }

    // Comparisons (Rust comparison operators cannot yield Expr)

    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Eq, self, other.into())
    }

    pub fn neq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::NotEq, self, other.into())
    }

    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Lt, self, other.into())
    }

    pub fn lt_eq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::LtEq, self, other.into())
    }

    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Gt, self, other.into())
    }

    pub fn gt_eq(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::GtEq, self, other.into())
    }

    pub fn and(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::And, self, other.into())
    }

    pub fn or(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Or, self, other.into())
    }

    // Right-hand operator family: operand order is swapped, so for any pair
    // `(a, b)` the result of `a.rsub(b)` equals that of `b - a`.

    pub fn radd(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Add, other.into(), self)
    }

    pub fn rsub(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Sub, other.into(), self)
    }

    pub fn rmul(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Mul, other.into(), self)
    }

    pub fn rtruediv(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Div, other.into(), self)
    }

    pub fn rfloordiv(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::FloorDiv, other.into(), self)
    }

    pub fn rmod(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Mod, other.into(), self)
    }

    pub fn rpow(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinOp::Pow, other.into(), self)
    }

    /// The name this expression's output column takes when not aliased:
    /// the leftmost column leaf, or `"literal"` for a bare literal
    pub fn output_name(&self) -> Option<String> {
        match self {
            Expr::ColumnRef(name) => Some(name.clone()),
            Expr::Literal(_) => Some("literal".to_string()),
            Expr::AllColumns => None,
            Expr::BinaryOp { left, .. } => left.output_name(),
            Expr::UnaryOp { operand, .. } => operand.output_name(),
            Expr::Aggregate { operand, .. } => operand.output_name(),
            Expr::HorizontalReduce { operands, .. } => {
                operands.first().and_then(|e| e.output_name())
            }
            Expr::Alias { name, .. } => Some(name.clone()),
        }
    }

    /// Whether the tree contains an `AllColumns` node
    pub fn contains_all(&self) -> bool {
        match self {
            Expr::AllColumns => true,
            Expr::ColumnRef(_) | Expr::Literal(_) => false,
            Expr::BinaryOp { left, right, .. } => left.contains_all() || right.contains_all(),
            Expr::UnaryOp { operand, .. } => operand.contains_all(),
            Expr::Aggregate { operand, .. } => operand.contains_all(),
            Expr::HorizontalReduce { operands, .. } => operands.iter().any(|e| e.contains_all()),
            Expr::Alias { inner, .. } => inner.contains_all(),
        }
    }

    fn substitute_all(&self, name: &str) -> Expr {
        match self {
            Expr::AllColumns => Expr::ColumnRef(name.to_string()),
            Expr::ColumnRef(_) | Expr::Literal(_) => self.clone(),
            Expr::BinaryOp { op, left, right } => Expr::BinaryOp {
                op: *op,
                left: Box::new(left.substitute_all(name)),
                right: Box::new(right.substitute_all(name)),
            },
            Expr::UnaryOp { op, operand } => Expr::UnaryOp {
                op: *op,
                operand: Box::new(operand.substitute_all(name)),
            },
            Expr::Aggregate { kind, operand } => Expr::Aggregate {
                kind: *kind,
                operand: Box::new(operand.substitute_all(name)),
            },
            Expr::HorizontalReduce { kind, operands } => Expr::HorizontalReduce {
                kind: *kind,
                operands: operands.iter().map(|e| e.substitute_all(name)).collect(),
            },
            Expr::Alias { inner, name: alias } => Expr::Alias {
                inner: Box::new(inner.substitute_all(name)),
                name: alias.clone(),
            },
        }
    }

    /// Expand `AllColumns` against a concrete column list. An expression
    /// without `all()` passes through unchanged; one with it becomes one
    /// expression per column, aliased to the source column name unless an
    /// explicit alias overrides it.
    pub fn expand(&self, column_names: &[String]) -> Vec<Expr> {
        if !self.contains_all() {
            return vec![self.clone()];
        }
        column_names
            .iter()
            .map(|name| {
                let substituted = self.substitute_all(name);
                match substituted {
                    aliased @ Expr::Alias { .. } => aliased,
                    other => other.alias(name.clone()),
                }
            })
            .collect()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::ColumnRef(name) => write!(f, "col(\"{}\")", name),
            Expr::Literal(value) => write!(f, "lit({})", value),
            Expr::AllColumns => write!(f, "all()"),
            Expr::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::UnaryOp { op, operand } => write!(f, "({}{})", op, operand),
            Expr::Aggregate { kind, operand } => write!(f, "{}.{}()", operand, kind),
            Expr::HorizontalReduce { kind, operands } => {
                write!(f, "{}(", kind)?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Expr::Alias { inner, name } => write!(f, "{}.alias(\"{}\")", inner, name),
        }
    }
}
