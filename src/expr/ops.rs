//! Closed operator vocabularies carried on expression nodes. Backends match
//! on these tags in one place instead of scattering per-operator methods.

use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    /// True division, always promotes to float
    Div,
    /// Floor division, floor-toward-negative-infinity semantics
    FloorDiv,
    /// Modulo paired with floor division: `a % b == a - (a // b) * b`
    Mod,
    Pow,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
    // Elementwise extrema, used by horizontal reductions
    Minimum,
    Maximum,
}

impl BinOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Minimum => "min",
            BinOp::Maximum => "max",
        };
        write!(f, "{}", token)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// Aggregation kinds, producing a length-1 result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

impl fmt::Display for AggKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggKind::Sum => "sum",
            AggKind::Mean => "mean",
            AggKind::Min => "min",
            AggKind::Max => "max",
            AggKind::Count => "count",
        };
        write!(f, "{}", name)
    }
}

/// Horizontal reduction kinds, folding a list of same-length columns into one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalKind {
    Sum,
    Min,
    Max,
}

impl HorizontalKind {
    /// The binary operator one fold step applies
    pub fn fold_op(&self) -> BinOp {
        match self {
            HorizontalKind::Sum => BinOp::Add,
            HorizontalKind::Min => BinOp::Minimum,
            HorizontalKind::Max => BinOp::Maximum,
        }
    }
}

impl fmt::Display for HorizontalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HorizontalKind::Sum => "sum_horizontal",
            HorizontalKind::Min => "min_horizontal",
            HorizontalKind::Max => "max_horizontal",
        };
        write!(f, "{}", name)
    }
}
