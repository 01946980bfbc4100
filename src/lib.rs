//! This crate parses untyped lambda calculus expressions and rewrites them
//! with alpha-conversion, beta-reduction and Church-numeral encoding.

pub mod character_stream;
pub mod church_numerals;
pub mod end_to_end;
pub mod lexical_analysis;
pub mod recursive_descent_parsing;
pub mod term_ast;
pub mod term_rewriting;
