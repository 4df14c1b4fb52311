//! Constraint and color expression language
//!
//! Scene files describe each axis with a short expression such as `sibling(4)`,
//! `50% - 10px` or `copy to header`. Parsing yields a spanned syntax tree; names are bound to
//! components later, when the whole scene is known.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{parse_color, parse_constraint};
