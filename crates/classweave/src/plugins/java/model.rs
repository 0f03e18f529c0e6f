//! Structural model extracted from source units

use serde::Serialize;

use super::type_parser::{parse_type, TypeRef};

/// Visibility modifier for class members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,    // +
    Private,   // -
    Protected, // #
    #[default]
    Package, // ~
}

impl Visibility {
    /// Pick the access keyword out of a run of modifiers
    pub fn from_modifiers(modifiers: &str) -> Self {
        modifiers
            .split_whitespace()
            .find_map(Self::from_keyword)
            .unwrap_or_default()
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "protected" => Some(Visibility::Protected),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }
}

/// What a declaration declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Enum,
    Interface,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Enum => "enum",
            ClassKind::Interface => "interface",
        }
    }
}

/// A field declared before the first method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    /// Raw declared type text
    pub declared_type: String,
    /// Parsed form of `declared_type`, `None` when malformed
    pub type_ref: Option<TypeRef>,
    pub visibility: Visibility,
}

impl Attribute {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Self {
            name: name.into(),
            type_ref: parse_type(&declared_type),
            declared_type,
            visibility: Visibility::default(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: String,
}

impl Parameter {
    pub fn new(param_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }
}

/// Role of a method within its class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Regular,
    Constructor,
    EntryPoint,
}

/// A method signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<Parameter>,
    pub kind: MethodKind,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::default(),
            parameters: Vec::new(),
            kind: MethodKind::Regular,
        }
    }

    /// Constructors are always rendered public
    pub fn constructor(name: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            kind: MethodKind::Constructor,
            ..Self::new(name)
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        if self.kind != MethodKind::Constructor {
            self.visibility = visibility;
        }
        self
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        if kind == MethodKind::Constructor {
            self.visibility = Visibility::Public;
        }
        self
    }

    pub fn with_parameter(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_parameters(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(params);
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }
}

/// A declared class, enum or interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    pub name: String,
    pub kind: ClassKind,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// Names declared in `class Box<T>`; never relation targets
    pub type_parameters: Vec<String>,
    /// Only populated for enums
    pub enum_constants: Vec<String>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes: Vec::new(),
            methods: Vec::new(),
            extends: None,
            implements: Vec::new(),
            type_parameters: Vec::new(),
            enum_constants: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Enum)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn with_extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    pub fn with_implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn is_type_parameter(&self, name: &str) -> bool {
        self.type_parameters.iter().any(|param| param == name)
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    pub fn add_enum_constant(&mut self, constant: impl Into<String>) {
        self.enum_constants.push(constant.into());
    }
}
