//! Lexer for constraint and color expressions using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

fn number_prefix(slice: &str, suffix: usize) -> Option<f64> {
    slice[..slice.len() - suffix].parse::<f64>().ok()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Constraint kinds
    #[token("center")]
    Center,
    #[token("sibling")]
    Sibling,
    #[token("cram")]
    Cram,
    #[token("children")]
    Children,
    #[token("children_max")]
    ChildrenMax,
    #[token("children_range")]
    ChildrenRange,
    #[token("fill")]
    Fill,
    #[token("cursor")]
    Cursor,
    #[token("aspect")]
    Aspect,
    #[token("image_aspect")]
    ImageAspect,
    #[token("text_aspect")]
    TextAspect,
    #[token("text")]
    Text,
    #[token("copy")]
    Copy,

    // Combinators
    #[token("min")]
    Min,
    #[token("max")]
    Max,
    #[token("at_least")]
    AtLeast,
    #[token("at_most")]
    AtMost,
    #[token("clamp")]
    Clamp,
    #[token("round")]
    Round,
    #[token("floor")]
    Floor,
    #[token("ceil")]
    Ceil,

    // Modifiers
    #[token("to")]
    To,
    #[token("opposite")]
    Opposite,
    #[token("outside")]
    Outside,

    // Color kinds
    #[token("inherit")]
    Inherit,
    #[token("rainbow")]
    Rainbow,
    #[token("parent_alpha")]
    ParentAlpha,

    // Operators and delimiters
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,

    // Literals - units are part of the number so `10px-5px` lexes as a subtraction
    #[regex(r"[0-9]+(\.[0-9]+)?px", |lex| number_prefix(lex.slice(), 2))]
    Pixels(f64),

    #[regex(r"[0-9]+(\.[0-9]+)?%", |lex| number_prefix(lex.slice(), 1))]
    Percent(f64),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"#[0-9a-zA-Z]+", |lex| lex.slice().to_string())]
    HexColor(String),

    // Component names and palette tokens; hyphens allowed inside (`accent-1`)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(-[a-zA-Z0-9_]+)*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

/// Spans of input the lexer could not turn into tokens
pub fn invalid_spans(input: &str) -> Vec<Span> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.is_err().then_some(span))
        .collect()
}
