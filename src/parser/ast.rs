//! Syntax trees for constraint and color expressions

use crate::layout::{RoundingMode, Rgba};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A value with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Two-operand combinators written as calls: `min(a, b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFn {
    Min,
    Max,
    AtLeast,
    AtMost,
}

/// A scalar constraint expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `10px`, `10px opposite`, `10px opposite outside`
    Pixels {
        value: f64,
        opposite: bool,
        outside: bool,
    },
    /// `50%`, stored as a fraction
    Relative(f64),
    Center,
    /// `sibling`, `sibling(4)`, `sibling(4, opposite)`
    Sibling { padding: f64, opposite: bool },
    /// `cram(4)`
    Cram(f64),
    /// `children(4)`
    Children(f64),
    ChildrenMax,
    ChildrenRange,
    /// `fill` or `fill(cursor)`
    Fill { cursor: bool },
    /// `aspect(1.5)`
    Aspect(f64),
    ImageAspect,
    TextAspect,
    /// `text(2)`, sized from the component's string at a scale
    Text(f64),
    Copy,
    Call(BinaryFn, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Clamp {
        value: Box<Spanned<Expr>>,
        min: Box<Spanned<Expr>>,
        max: Box<Spanned<Expr>>,
    },
    Round(RoundingMode, Box<Spanned<Expr>>),
    /// `e * 2` and `e / 2`, the latter stored as a factor of 0.5
    Scale(Box<Spanned<Expr>>, f64),
    Add(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Subtract(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// `e to name`
    Target {
        expr: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
}

impl Expr {
    /// Every component name the expression refers to, in source order
    pub fn names(&self) -> Vec<&Spanned<String>> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a Spanned<String>>) {
        match self {
            Expr::Target { expr, name } => {
                expr.node.collect_names(names);
                names.push(name);
            }
            Expr::Call(_, a, b) | Expr::Add(a, b) | Expr::Subtract(a, b) => {
                a.node.collect_names(names);
                b.node.collect_names(names);
            }
            Expr::Clamp { value, min, max } => {
                value.node.collect_names(names);
                min.node.collect_names(names);
                max.node.collect_names(names);
            }
            Expr::Round(_, inner) | Expr::Scale(inner, _) => inner.node.collect_names(names),
            _ => {}
        }
    }
}

/// A color expression
#[derive(Debug, Clone, PartialEq)]
pub enum ColorExpr {
    /// `#rrggbb` or `#rrggbbaa`
    Hex(Rgba),
    /// Palette token resolved through the stylesheet: `accent-1`
    Token(String),
    Inherit,
    /// `rainbow`, `rainbow(speed)`, `rainbow(speed, alpha)`
    Rainbow { speed: f64, alpha: f64 },
    /// `parent_alpha(color, 0.5)`
    ParentAlpha { color: Box<Spanned<ColorExpr>>, alpha: f64 },
    Copy,
    /// `copy to name`
    Target {
        expr: Box<Spanned<ColorExpr>>,
        name: Spanned<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanned(expr: Expr) -> Box<Spanned<Expr>> {
        Box::new(Spanned::new(expr, 0..0))
    }

    #[test]
    fn test_names_in_source_order() {
        let expr = Expr::Add(
            spanned(Expr::Target {
                expr: spanned(Expr::Copy),
                name: Spanned::new("header".to_string(), 8..14),
            }),
            spanned(Expr::Target {
                expr: spanned(Expr::Relative(0.5)),
                name: Spanned::new("body".to_string(), 25..29),
            }),
        );
        let names: Vec<_> = expr.names().iter().map(|n| n.node.as_str()).collect();
        assert_eq!(names, vec!["header", "body"]);
    }
}
