//! Lightweight declaration matchers
//!
//! Each matcher looks for one facet of a source unit and returns a typed
//! result, or nothing. None of them can fail: text that does not match simply
//! yields an empty facet. The matchers know nothing about relations.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{ClassKind, Parameter, Visibility};

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());

static PACKAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+[^\s;]+\s*;").unwrap());

static CLASS_OR_ENUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(class|enum)\s+([A-Za-z_$][\w$]*)").unwrap());

static INTERFACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(interface)\s+([A-Za-z_$][\w$]*)").unwrap());

static EXTENDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bextends\s+([\w$.]+)").unwrap());

static IMPLEMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bimplements\s+([^{]+)").unwrap());

static LEADING_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*").unwrap());

/// `[annotations] [modifiers] [ReturnType] name(params) [throws ...] {|;`
///
/// The leading `[{};]` lets several members share one line.
static METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)(?:^|[{};])\s*",
        r"(?:@[\w$.]+(?:\([^)]*\))?\s+)*",
        r"(?P<mods>(?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)\s+)*)",
        r"(?:(?P<ret>[\w$.]+(?:\s*<[\w$.,?<> \t\[\]]*>)?(?:\s*\[\])*)\s+)?",
        r"(?P<name>[A-Za-z_$][\w$]*)\s*\((?P<params>[^()]*)\)",
        r"\s*(?:throws\s+[\w$.,\s]+?)?\s*(?P<end>[{;])",
    ))
    .unwrap()
});

/// `[annotations] [modifiers] Type name [= init];`
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)(?:^|[{};])\s*",
        r"(?:@[\w$.]+(?:\([^)]*\))?\s+)*",
        r"(?P<mods>(?:(?:public|protected|private|static|final|transient|volatile)\s+)*)",
        r"(?P<type>[\w$.]+(?:\s*<[\w$.,?<> \t\[\]]*>)?(?:\s*\[\])*)\s+",
        r"(?P<name>[A-Za-z_$][\w$]*)\s*(?:=[^;]*)?;",
    ))
    .unwrap()
});

/// `var = new Type(` with optional type arguments before the paren
static INSTANTIATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\w$.\]]+\s*=\s*new\s+(?P<type>[A-Za-z_$][\w$]*)\s*(?:<[^;()]*>)?\s*\(").unwrap()
});

/// Words that can never be a member name or a declared type
const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "catch", "try", "finally", "return",
    "new", "throw", "super", "this", "synchronized", "import", "package", "break", "continue",
    "assert", "goto", "class", "enum", "interface", "default", "instanceof",
];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Remove block comments, line comments and the package declaration
pub fn strip_noise(input: &str) -> String {
    let text = BLOCK_COMMENT.replace_all(input, " ");
    let text = LINE_COMMENT.replace_all(&text, "");
    PACKAGE_DECL.replace_all(&text, "").into_owned()
}

/// The declaration a unit is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationMatch {
    pub kind: ClassKind,
    pub name: String,
    /// Byte offset of the declaring keyword
    pub start: usize,
    /// Byte offset just past the declared name
    pub name_end: usize,
}

/// Earliest `class <Name>` or `enum <Name>`; `interface <Name>` only when
/// neither exists
pub fn find_declaration(text: &str) -> Option<DeclarationMatch> {
    let caps = CLASS_OR_ENUM
        .captures(text)
        .or_else(|| INTERFACE.captures(text))?;
    let keyword = caps.get(1)?;
    let name = caps.get(2)?;
    let kind = match keyword.as_str() {
        "class" => ClassKind::Class,
        "enum" => ClassKind::Enum,
        _ => ClassKind::Interface,
    };
    Some(DeclarationMatch {
        kind,
        name: name.as_str().to_string(),
        start: keyword.start(),
        name_end: name.end(),
    })
}

/// Split a leading `<...>` list off `rest`, returning its contents and the
/// text after it
fn leading_angle_list(rest: &str) -> Option<(&str, &str)> {
    if !rest.starts_with('<') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some((&rest[1..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Text between the declared name (and its type parameters) and the opening
/// brace
pub fn declaration_header<'a>(text: &'a str, decl: &DeclarationMatch) -> &'a str {
    let mut rest = text[decl.name_end..].trim_start();
    // `class Box<T extends Comparable<T>>`: the bound is not a parent
    if let Some((_, after)) = leading_angle_list(rest) {
        rest = after;
    }
    match rest.find('{') {
        Some(brace) => &rest[..brace],
        None => rest,
    }
}

/// Names of the type parameters declared right after the type name
///
/// `class Pair<K extends Comparable<K>, V>` yields `K` and `V`.
pub fn find_type_parameters(text: &str, decl: &DeclarationMatch) -> Vec<String> {
    let rest = text[decl.name_end..].trim_start();
    let Some((list, _)) = leading_angle_list(rest) else {
        return Vec::new();
    };
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|param| param.split_whitespace().next())
        .filter(|name| name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$'))
        .map(str::to_string)
        .collect()
}

/// Supertypes named in a declaration header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Supertypes {
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

/// Read the `extends` parent and the `implements` list of a header
pub fn find_supertypes(header: &str) -> Supertypes {
    let extends = EXTENDS
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let implements = IMPLEMENTS
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            split_top_level(m.as_str(), ',')
                .into_iter()
                .filter_map(|name| {
                    let name = name.split('<').next().unwrap_or(name).trim();
                    (!name.is_empty()).then(|| name.to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    Supertypes {
        extends,
        implements,
    }
}

/// Constants of an enum: identifiers between `{` and the first top-level
/// `;` or `}`
pub fn find_enum_constants(text: &str, decl: &DeclarationMatch) -> Vec<String> {
    let rest = &text[decl.name_end..];
    let Some(open) = rest.find('{') else {
        return Vec::new();
    };
    let body = &rest[open + 1..];

    let mut depth = 0usize;
    let mut end = body.len();
    for (i, c) in body.char_indices() {
        match c {
            '(' | '{' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '}' if depth == 0 => {
                end = i;
                break;
            }
            '}' => depth -= 1,
            ';' if depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    split_top_level(&body[..end], ',')
        .into_iter()
        .filter_map(|piece| LEADING_IDENT.find(piece.trim()))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A method-like signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMatch {
    pub name: String,
    pub modifiers: String,
    pub return_type: Option<String>,
    pub params: String,
    /// Byte offset where the signature starts (modifiers included)
    pub start: usize,
    /// Byte offset of the opening `{`, `None` for bodiless declarations
    pub body_open: Option<usize>,
}

impl MethodMatch {
    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.modifiers)
    }
}

/// Every method-like signature from `from` onwards
///
/// A signature without a return type is only accepted when it is named after
/// `class_name` (a constructor).
pub fn find_methods(text: &str, from: usize, class_name: &str) -> Vec<MethodMatch> {
    let mut methods = Vec::new();
    let mut pos = from;

    while pos < text.len() {
        let Some(caps) = METHOD.captures_at(text, pos) else {
            break;
        };
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        let Some((start, end)) = whole else {
            break;
        };
        // Resume on the terminating `{`/`;` so it can open the next member.
        pos = (end - 1).max(start + 1);

        let name = &caps["name"];
        let ret = caps.name("ret").map(|m| m.as_str().trim().to_string());
        if is_keyword(name) {
            continue;
        }
        match &ret {
            Some(ret) if is_keyword(ret) => continue,
            None if name != class_name => continue,
            _ => {}
        }

        let mods = caps.name("mods");
        let body_open = caps
            .name("end")
            .filter(|m| m.as_str() == "{")
            .map(|m| m.start());

        methods.push(MethodMatch {
            name: name.to_string(),
            modifiers: mods.map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            return_type: ret,
            params: caps["params"].to_string(),
            start: mods.map(|m| m.start()).unwrap_or(start),
            body_open,
        });
    }

    methods
}

/// A field declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub type_text: String,
    pub visibility: Visibility,
}

/// Field declarations in `section`
pub fn find_attributes(section: &str) -> Vec<AttributeMatch> {
    let mut attributes = Vec::new();
    let mut pos = 0;

    while pos < section.len() {
        let Some(caps) = ATTRIBUTE.captures_at(section, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        pos = (whole.end() - 1).max(whole.start() + 1);

        let type_text = caps["type"].trim();
        let name = &caps["name"];
        if is_keyword(type_text) || is_keyword(name) {
            continue;
        }

        attributes.push(AttributeMatch {
            name: name.to_string(),
            type_text: normalize_type_text(type_text),
            visibility: caps
                .name("mods")
                .map(|m| Visibility::from_modifiers(m.as_str()))
                .unwrap_or_default(),
        });
    }

    attributes
}

/// Split on `sep` outside of `<>`, `()`, `[]` and `{}`
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;

    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                pieces.push(&text[last..i]);
                last = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&text[last..]);
    pieces
}

/// Parameters of a signature: trailing token is the name, the rest the type
pub fn parse_parameters(params: &str) -> Vec<Parameter> {
    split_top_level(params, ',')
        .into_iter()
        .filter_map(|raw| {
            let tokens: Vec<&str> = raw
                .split_whitespace()
                .filter(|t| !t.starts_with('@') && *t != "final")
                .collect();
            match tokens.as_slice() {
                [] => None,
                [only] => Some(Parameter::new(normalize_type_text(only), "")),
                [ty @ .., name] => {
                    let mut param_type = normalize_type_text(&ty.join(" "));
                    let mut name = name.to_string();
                    // C-style `String args[]`
                    while let Some(stripped) = name.strip_suffix("[]") {
                        name = stripped.to_string();
                        param_type.push_str("[]");
                    }
                    Some(Parameter::new(param_type, name))
                }
            }
        })
        .collect()
}

/// Collapse whitespace in type text and turn varargs into an array
fn normalize_type_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        out.push(c);
        if c == ',' {
            out.push(' ');
        }
    }
    match out.strip_suffix("...") {
        Some(base) => format!("{}[]", base),
        None => out,
    }
}

/// Contents of the balanced `{...}` block opening at `open`
///
/// String and char literals are skipped so braces inside them do not count.
/// An unterminated block runs to the end of the text.
pub fn block_body(text: &str, open: usize) -> Option<&str> {
    if !text[open..].starts_with('{') {
        return None;
    }
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..i]);
                }
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    Some(&text[open + 1..])
}

/// Types instantiated with `var = new Type(` in `body`, in order
pub fn find_instantiations(body: &str) -> Vec<String> {
    INSTANTIATION
        .captures_iter(body)
        .filter_map(|caps| caps.name("type").map(|m| m.as_str().to_string()))
        .collect()
}
