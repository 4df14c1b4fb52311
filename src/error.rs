//! Error types for parsing expressions

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return format!("{}: {}", filename, self);
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::Custom(msg) => msg.to_string(),
            _ => match err.found() {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
        };

        let mut expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();
        expected.sort();
        expected.dedup();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("name '{}'", s),
        Token::Number(n) => format!("number {}", n),
        Token::Pixels(n) => format!("'{}px'", n),
        Token::Percent(n) => format!("'{}%'", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::To => "keyword 'to'".to_string(),
        other => format!("keyword '{}'", keyword_text(other)),
    }
}

fn keyword_text(tok: &Token) -> &'static str {
    match tok {
        Token::Center => "center",
        Token::Sibling => "sibling",
        Token::Cram => "cram",
        Token::Children => "children",
        Token::ChildrenMax => "children_max",
        Token::ChildrenRange => "children_range",
        Token::Fill => "fill",
        Token::Cursor => "cursor",
        Token::Aspect => "aspect",
        Token::ImageAspect => "image_aspect",
        Token::TextAspect => "text_aspect",
        Token::Text => "text",
        Token::Copy => "copy",
        Token::Min => "min",
        Token::Max => "max",
        Token::AtLeast => "at_least",
        Token::AtMost => "at_most",
        Token::Clamp => "clamp",
        Token::Round => "round",
        Token::Floor => "floor",
        Token::Ceil => "ceil",
        Token::Opposite => "opposite",
        Token::Outside => "outside",
        Token::Inherit => "inherit",
        Token::Rainbow => "rainbow",
        Token::ParentAlpha => "parent_alpha",
        _ => "?",
    }
}
