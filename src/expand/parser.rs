//! Expand-path parser using Pest

use super::clause::ExpandClause;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "expand/expand.pest"]
struct ExpandParser;

/// Parser errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Pest parsing error
    #[error("Parse error: {0}")]
    PestError(#[from] pest::error::Error<Rule>),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse an expand string into its property paths.
///
/// Accepts one or more comma-separated paths, each a dot-separated
/// chain of navigation property names. Whitespace around separators
/// is ignored, so `"Orders . OrderDetails"` normalizes to
/// `"Orders.OrderDetails"`.
pub fn parse_expand(input: &str) -> ParseResult<ExpandClause> {
    let pairs = ExpandParser::parse(Rule::expand, input)?;

    let mut property_paths = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::expand => {
                for inner in pair.into_inner() {
                    match inner.as_rule() {
                        Rule::path => {
                            let segments: Vec<&str> =
                                inner.into_inner().map(|ident| ident.as_str()).collect();
                            property_paths.push(segments.join("."));
                        }
                        Rule::EOI => break,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    Ok(ExpandClause::new(property_paths))
}
