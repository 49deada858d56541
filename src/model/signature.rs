//! Selector, signature and qualified-name value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a method belongs to instances or to the class object.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MethodSide {
    #[default]
    Instance,
    Class,
}

impl MethodSide {
    /// The `-` / `+` prefix used in qualified names.
    pub fn sigil(self) -> char {
        match self {
            Self::Instance => '-',
            Self::Class => '+',
        }
    }
}

/// A selector name such as `run`, `setName:` or `insertObject:atIndex:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default setter selector for a property name: `title` -> `setTitle:`.
    pub fn setter_for(property: &str) -> Self {
        let mut chars = property.chars();
        let name = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        Self(format!("set{name}:"))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A method identified independently of the class that implements it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    pub selector: Selector,
    #[serde(default)]
    pub side: MethodSide,
}

impl MethodSignature {
    pub fn new(selector: impl Into<Selector>, side: MethodSide) -> Self {
        Self {
            selector: selector.into(),
            side,
        }
    }

    pub fn instance(selector: &str) -> Self {
        Self::new(selector, MethodSide::Instance)
    }

    pub fn class(selector: &str) -> Self {
        Self::new(selector, MethodSide::Class)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.sigil(), self.selector)
    }
}

/// Human-readable name of one implementation: `-[Class sel]` or `-[Class(Category) sel]`.
///
/// An anonymous extension renders with empty parentheses, `-[Class() sel]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub side: MethodSide,
    pub class_name: String,
    pub category: Option<String>,
    pub selector: Selector,
}

impl QualifiedName {
    pub fn for_class(class_name: &str, signature: &MethodSignature) -> Self {
        Self {
            side: signature.side,
            class_name: class_name.to_string(),
            category: None,
            selector: signature.selector.clone(),
        }
    }

    pub fn for_category(class_name: &str, category: &str, signature: &MethodSignature) -> Self {
        Self {
            side: signature.side,
            class_name: class_name.to_string(),
            category: Some(category.to_string()),
            selector: signature.selector.clone(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(
                f,
                "{}[{}({}) {}]",
                self.side.sigil(),
                self.class_name,
                category,
                self.selector
            ),
            None => write!(f, "{}[{} {}]", self.side.sigil(), self.class_name, self.selector),
        }
    }
}
