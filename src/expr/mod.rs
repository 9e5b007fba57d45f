//! Expression construction surface: `col`, `lit`, `all`, the horizontal
//! reducers, and operator composition on [`Expr`].

mod arith;
pub mod node;
pub mod ops;

pub use node::Expr;

use crate::core::scalar::Scalar;
use ops::HorizontalKind;

/// Reference a column by name
pub fn col(name: impl Into<String>) -> Expr {
    Expr::ColumnRef(name.into())
}

/// Inject a literal value
pub fn lit(value: impl Into<Scalar>) -> Expr {
    Expr::Literal(value.into())
}

/// Select every column of the target frame, expanded at resolution time
/// against the frame the expression is applied to
pub fn all() -> Expr {
    Expr::AllColumns
}

fn horizontal(kind: HorizontalKind, exprs: Vec<Expr>) -> Expr {
    Expr::HorizontalReduce {
        kind,
        operands: exprs,
    }
}

/// Row-wise sum across a list of same-length column expressions
pub fn sum_horizontal(exprs: Vec<Expr>) -> Expr {
    horizontal(HorizontalKind::Sum, exprs)
}

/// Row-wise minimum across a list of same-length column expressions
pub fn min_horizontal(exprs: Vec<Expr>) -> Expr {
    horizontal(HorizontalKind::Min, exprs)
}

/// Row-wise maximum across a list of same-length column expressions
pub fn max_horizontal(exprs: Vec<Expr>) -> Expr {
    horizontal(HorizontalKind::Max, exprs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_replaces_all_with_each_column() {
        let expr = all() * 2i64;
        let names = vec!["a".to_string(), "b".to_string()];
        let expanded = expr.expand(&names);
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].output_name().as_deref(), Some("a"));
        assert_eq!(expanded[1].output_name().as_deref(), Some("b"));
    }

    #[test]
    fn expand_is_identity_without_all() {
        let expr = col("a") + col("b");
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(expr.expand(&names).len(), 1);
    }

    #[test]
    fn output_name_follows_leftmost_leaf() {
        assert_eq!((col("a") + 1i64).output_name().as_deref(), Some("a"));
        assert_eq!((1i64 + col("a")).output_name().as_deref(), Some("literal"));
        assert_eq!(
            (col("a") + 1i64).alias("b").output_name().as_deref(),
            Some("b")
        );
    }

    #[test]
    fn right_hand_ops_swap_operands() {
        let shown = format!("{}", col("a").rsub(1i64));
        assert_eq!(shown, "(lit(1) - col(\"a\"))");
    }
}
