//! Type-text parser using chumsky
//!
//! Turns declared type text such as `ArrayList<Book>`, `Map<String, List<Order>>`
//! or `String[]` into a [`TypeRef`]. Anything it cannot read yields `None`, and
//! callers treat that facet as malformed.

use std::fmt;

use chumsky::prelude::*;
use serde::Serialize;

/// A parsed type reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// Possibly qualified name (`java.util.List`)
    pub name: String,
    /// Type arguments in declaration order
    pub args: Vec<TypeRef>,
    /// Number of trailing `[]` pairs
    pub array_dims: usize,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_dims: 0,
        }
    }

    /// Unbounded wildcard `?`
    pub fn wildcard() -> Self {
        Self::new("?")
    }

    /// Last segment of a qualified name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_array(&self) -> bool {
        self.array_dims > 0
    }

    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "?"
    }

    /// First type argument, the element type of a list-like container
    pub fn element(&self) -> Option<&TypeRef> {
        self.args.first()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Parse type text, `None` when it is not a well-formed type
pub fn parse_type(text: &str) -> Option<TypeRef> {
    type_parser()
        .padded_by(optional_whitespace())
        .then_ignore(end())
        .parse(text)
        .into_result()
        .ok()
}

fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t\n\r").repeated().ignored()
}

fn type_parser<'src>() -> impl Parser<'src, &'src str, TypeRef> + Clone {
    recursive(|ty| {
        let name = any()
            .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '$' || *c == '.')
            .repeated()
            .at_least(1)
            .to_slice()
            .map(|s: &str| s.to_string());

        // `?`, `? extends Bound`, `? super Bound`; bounded wildcards keep the bound
        let wildcard = just('?')
            .ignore_then(
                optional_whitespace()
                    .ignore_then(text::keyword("extends").or(text::keyword("super")))
                    .ignore_then(optional_whitespace())
                    .ignore_then(ty.clone())
                    .or_not(),
            )
            .map(|bound: Option<TypeRef>| bound.unwrap_or_else(TypeRef::wildcard));

        let args = wildcard
            .or(ty.clone())
            .padded_by(optional_whitespace())
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .delimited_by(just('<'), just('>'));

        let dims = optional_whitespace()
            .ignore_then(just("[]"))
            .repeated()
            .collect::<Vec<_>>();

        name.then(optional_whitespace().ignore_then(args).or_not())
            .then(dims)
            .map(|((name, args), dims)| TypeRef {
                name,
                args: args.unwrap_or_default(),
                array_dims: dims.len(),
            })
    })
}
