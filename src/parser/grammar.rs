//! Parser implementation using chumsky
//!
//! Precedence, loosest first: `+`/`-`, then `*`/`/` by a number, then `to name`, then atoms.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::layout::{RoundingMode, Rgba};
use crate::parser::ast::*;
use crate::parser::lexer::{invalid_spans, lex, Token};

type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Parse a scalar constraint expression such as `sibling(4) + 10% to header`
pub fn parse_constraint(input: &str) -> Result<Spanned<Expr>, Vec<ParseError>> {
    reject_invalid(input)?;
    let len = input.len();
    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    constraint_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Parse a color expression such as `parent_alpha(#336699, 0.5)`
pub fn parse_color(input: &str) -> Result<Spanned<ColorExpr>, Vec<ParseError>> {
    reject_invalid(input)?;
    let len = input.len();
    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    color_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Characters the lexer drops would otherwise vanish silently
fn reject_invalid(input: &str) -> Result<(), Vec<ParseError>> {
    let invalid = invalid_spans(input);
    if invalid.is_empty() {
        return Ok(());
    }
    Err(invalid
        .into_iter()
        .map(|span| ParseError::Syntax {
            message: format!("Unexpected character '{}'", &input[span.clone()]),
            span,
            expected: vec![],
        })
        .collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn negate(sign: Option<Token>, value: f64) -> f64 {
    if sign.is_some() {
        -value
    } else {
        value
    }
}

fn name_parser<'a, I>() -> impl Parser<'a, I, Spanned<String>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Ident(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
    .labelled("component name")
}

/// A bare number, optionally negated
fn number_parser<'a, I>() -> impl Parser<'a, I, f64, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    just(Token::Minus)
        .or_not()
        .then(select! { Token::Number(n) => n })
        .map(|(sign, n)| negate(sign, n))
        .labelled("number")
}

fn constraint_parser<'a, I>() -> impl Parser<'a, I, Spanned<Expr>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = name_parser();
    let number = number_parser();

    // Paddings accept `4` and `4px` alike
    let amount = just(Token::Minus)
        .or_not()
        .then(select! {
            Token::Number(n) => n,
            Token::Pixels(n) => n,
        })
        .map(|(sign, n)| negate(sign, n))
        .labelled("amount");
    let paren_amount = amount
        .clone()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    recursive(move |expr| {
        let pixels = just(Token::Minus)
            .or_not()
            .then(select! { Token::Pixels(n) => n })
            .then(just(Token::Opposite).or_not())
            .then(just(Token::Outside).or_not())
            .map(|(((sign, value), opposite), outside)| Expr::Pixels {
                value: negate(sign, value),
                opposite: opposite.is_some(),
                outside: outside.is_some(),
            });

        let percent = just(Token::Minus)
            .or_not()
            .then(select! { Token::Percent(n) => n })
            .map(|(sign, n)| Expr::Relative(negate(sign, n) / 100.0));

        let sibling = just(Token::Sibling)
            .ignore_then(
                amount
                    .clone()
                    .then(just(Token::Comma).ignore_then(just(Token::Opposite)).or_not())
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
                    .or_not(),
            )
            .map(|args| match args {
                Some((padding, opposite)) => Expr::Sibling {
                    padding,
                    opposite: opposite.is_some(),
                },
                None => Expr::Sibling {
                    padding: 0.0,
                    opposite: false,
                },
            });

        let cram = just(Token::Cram)
            .ignore_then(paren_amount.clone().or_not())
            .map(|padding| Expr::Cram(padding.unwrap_or(0.0)));

        let children = just(Token::Children)
            .ignore_then(paren_amount.clone().or_not())
            .map(|padding| Expr::Children(padding.unwrap_or(0.0)));

        let fill = just(Token::Fill)
            .ignore_then(
                just(Token::Cursor)
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
                    .or_not(),
            )
            .map(|cursor| Expr::Fill {
                cursor: cursor.is_some(),
            });

        let aspect = just(Token::Aspect)
            .ignore_then(paren_amount.clone())
            .map(Expr::Aspect);

        let text = just(Token::Text)
            .ignore_then(paren_amount.clone().or_not())
            .map(|scale| Expr::Text(scale.unwrap_or(1.0)));

        let keyword = select! {
            Token::Center => Expr::Center,
            Token::ChildrenMax => Expr::ChildrenMax,
            Token::ChildrenRange => Expr::ChildrenRange,
            Token::ImageAspect => Expr::ImageAspect,
            Token::TextAspect => Expr::TextAspect,
            Token::Copy => Expr::Copy,
        };

        let call = select! {
            Token::Min => BinaryFn::Min,
            Token::Max => BinaryFn::Max,
            Token::AtLeast => BinaryFn::AtLeast,
            Token::AtMost => BinaryFn::AtMost,
        }
        .then(
            expr.clone()
                .then_ignore(just(Token::Comma))
                .then(expr.clone())
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .map(|(function, (a, b))| Expr::Call(function, Box::new(a), Box::new(b)));

        let clamp = just(Token::Clamp)
            .ignore_then(
                expr.clone()
                    .then_ignore(just(Token::Comma))
                    .then(expr.clone())
                    .then_ignore(just(Token::Comma))
                    .then(expr.clone())
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map(|((value, min), max)| Expr::Clamp {
                value: Box::new(value),
                min: Box::new(min),
                max: Box::new(max),
            });

        let round = select! {
            Token::Round => RoundingMode::Round,
            Token::Floor => RoundingMode::Floor,
            Token::Ceil => RoundingMode::Ceil,
        }
        .then(
            expr.clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .map(|(mode, inner)| Expr::Round(mode, Box::new(inner)));

        let atom = choice((
            pixels, percent, sibling, cram, children, fill, aspect, text, keyword, call, clamp,
            round,
        ))
        .map_with(|node, e| Spanned::new(node, span_range(&e.span())))
        .or(expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)))
        .labelled("constraint")
        .boxed();

        // `e to a to b` rebinds; the last target wins
        let targeted = atom.foldl(
            just(Token::To).ignore_then(name.clone()).repeated(),
            |lhs: Spanned<Expr>, name: Spanned<String>| {
                let span = lhs.span.start..name.span.end;
                Spanned::new(
                    Expr::Target {
                        expr: Box::new(lhs),
                        name,
                    },
                    span,
                )
            },
        );

        let factor = choice((
            just(Token::Star).ignore_then(number.clone()),
            just(Token::Slash).ignore_then(number.clone().try_map(|n, span| {
                if n == 0.0 {
                    Err(Rich::custom(span, "division by zero"))
                } else {
                    Ok(1.0 / n)
                }
            })),
        ))
        .map_with(|factor, e| (factor, span_range(&e.span())));

        let term = targeted.foldl(
            factor.repeated(),
            |lhs: Spanned<Expr>, (factor, span): (f64, Span)| {
                let span = lhs.span.start..span.end;
                Spanned::new(Expr::Scale(Box::new(lhs), factor), span)
            },
        );

        let operator = choice((just(Token::Plus).to(true), just(Token::Minus).to(false)));

        term.clone().foldl(
            operator.then(term).repeated(),
            |lhs: Spanned<Expr>, (add, rhs): (bool, Spanned<Expr>)| {
                let span = lhs.span.start..rhs.span.end;
                let node = if add {
                    Expr::Add(Box::new(lhs), Box::new(rhs))
                } else {
                    Expr::Subtract(Box::new(lhs), Box::new(rhs))
                };
                Spanned::new(node, span)
            },
        )
    })
}

fn color_parser<'a, I>() -> impl Parser<'a, I, Spanned<ColorExpr>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let name = name_parser();
    let number = number_parser();

    recursive(move |color| {
        let hex = select! { Token::HexColor(s) => s }.try_map(|s, span| {
            Rgba::from_hex(&s)
                .map(ColorExpr::Hex)
                .ok_or_else(|| Rich::custom(span, format!("invalid hex color '{}'", s)))
        });

        let keyword = select! {
            Token::Inherit => ColorExpr::Inherit,
            Token::Copy => ColorExpr::Copy,
        };

        let rainbow = just(Token::Rainbow)
            .ignore_then(
                number
                    .clone()
                    .then(just(Token::Comma).ignore_then(number.clone()).or_not())
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
                    .or_not(),
            )
            .map(|args| {
                let (speed, alpha) = args.unwrap_or((50.0, None));
                ColorExpr::Rainbow {
                    speed,
                    alpha: alpha.unwrap_or(255.0),
                }
            });

        let parent_alpha = just(Token::ParentAlpha)
            .ignore_then(
                color
                    .clone()
                    .then_ignore(just(Token::Comma))
                    .then(number.clone())
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            )
            .map(|(color, alpha)| ColorExpr::ParentAlpha {
                color: Box::new(color),
                alpha,
            });

        let token = name.clone().map(|token| ColorExpr::Token(token.node));

        choice((hex, keyword, rainbow, parent_alpha, token))
            .map_with(|node, e| Spanned::new(node, span_range(&e.span())))
            .labelled("color")
            .foldl(
                just(Token::To).ignore_then(name).repeated(),
                |lhs: Spanned<ColorExpr>, name: Spanned<String>| {
                    let span = lhs.span.start..name.span.end;
                    Spanned::new(
                        ColorExpr::Target {
                            expr: Box::new(lhs),
                            name,
                        },
                        span,
                    )
                },
            )
    })
}
