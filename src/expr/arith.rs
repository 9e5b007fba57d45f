//! Rust operator overloads for expressions. `+ - * / %` and unary `- !` work
//! between expressions and between an expression and a bare scalar on either
//! side; `//` and `**` have no Rust token and live on `Expr` as `floor_div`
//! and `pow`.

use std::ops::{Add, Div, Mul, Neg, Not, Rem, Sub};

use chrono::NaiveDateTime;

use crate::core::scalar::Scalar;
use crate::expr::node::Expr;
use crate::expr::ops::{BinOp, UnaryOp};

impl From<Scalar> for Expr {
    fn from(value: Scalar) -> Self {
        Expr::Literal(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(Scalar::Int64(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(Scalar::Int64(value as i64))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Scalar::Float64(value))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(Scalar::Boolean(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(Scalar::Utf8(value.to_string()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Literal(Scalar::Utf8(value))
    }
}

impl From<NaiveDateTime> for Expr {
    fn from(value: NaiveDateTime) -> Self {
        Expr::Literal(Scalar::Datetime(value))
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::binary(BinOp::Add, self, rhs.into())
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        Expr::binary(BinOp::Sub, self, rhs.into())
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::binary(BinOp::Mul, self, rhs.into())
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        Expr::binary(BinOp::Div, self, rhs.into())
    }
}

impl<R: Into<Expr>> Rem<R> for Expr {
    type Output = Expr;

    fn rem(self, rhs: R) -> Expr {
        Expr::binary(BinOp::Mod, self, rhs.into())
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::unary(UnaryOp::Neg, self)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary(UnaryOp::Not, self)
    }
}

// Scalar-on-the-left forms: `1 + col("a")` and friends

macro_rules! impl_left_scalar_ops {
    ($($t:ty),*) => {
        $(
            impl Add<Expr> for $t {
                type Output = Expr;

                fn add(self, rhs: Expr) -> Expr {
                    Expr::binary(BinOp::Add, Expr::from(self), rhs)
                }
            }

            impl Sub<Expr> for $t {
                type Output = Expr;

                fn sub(self, rhs: Expr) -> Expr {
                    Expr::binary(BinOp::Sub, Expr::from(self), rhs)
                }
            }

            impl Mul<Expr> for $t {
                type Output = Expr;

                fn mul(self, rhs: Expr) -> Expr {
                    Expr::binary(BinOp::Mul, Expr::from(self), rhs)
                }
            }

            impl Div<Expr> for $t {
                type Output = Expr;

                fn div(self, rhs: Expr) -> Expr {
                    Expr::binary(BinOp::Div, Expr::from(self), rhs)
                }
            }

            impl Rem<Expr> for $t {
                type Output = Expr;

                fn rem(self, rhs: Expr) -> Expr {
                    Expr::binary(BinOp::Mod, Expr::from(self), rhs)
                }
            }
        )*
    };
}

impl_left_scalar_ops!(i64, i32, f64);
