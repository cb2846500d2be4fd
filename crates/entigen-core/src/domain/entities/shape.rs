//! Source descriptors and the type shapes they produce.
//!
//! Two extraction paths exist:
//!
//! - **Loaded**: the type is compiled into the running program and describes
//!   itself through [`Describe`].
//! - **Syntax**: the type lives in a source file (or text) that still has to
//!   be parsed by a `SourceParser` adapter.
//!
//! Both end in a [`TypeShape`], which is the only input to
//! [`Entity::from_shape`](crate::domain::Entity::from_shape). Nothing
//! downstream can tell the paths apart.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{TypeName, TypeRef};

/// Where an entity description comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDescriptor {
    /// A type already known to the program.
    Loaded(TypeShape),
    /// A source file on disk.
    File(PathBuf),
    /// Source text held in memory; `origin` is used in diagnostics.
    Text { origin: String, text: String },
}

impl SourceDescriptor {
    pub fn of<T: Describe>() -> Self {
        Self::Loaded(T::shape())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn text(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Short label for logs and error messages.
    pub fn origin(&self) -> String {
        match self {
            Self::Loaded(shape) => format!("type {}", shape.name),
            Self::File(path) => path.display().to_string(),
            Self::Text { origin, .. } => origin.clone(),
        }
    }
}

/// Types that can describe their own shape without parsing.
///
/// ```
/// use entigen_core::domain::{Describe, FieldShape, TypeShape};
///
/// struct Customer {
///     id: u64,
///     tags: Vec<String>,
/// }
///
/// impl Describe for Customer {
///     fn shape() -> TypeShape {
///         TypeShape::new("Customer")
///             .field(FieldShape::of::<u64>("id").key())
///             .field(FieldShape::of::<Vec<String>>("tags"))
///     }
/// }
///
/// assert_eq!(Customer::shape().fields[1].type_ref.to_string(), "Vec<String>");
/// ```
pub trait Describe {
    fn shape() -> TypeShape;
}

/// Syntax-level description of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeShape {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldShape>,
}

impl TypeShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }
}

/// One data member of a [`TypeShape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_key: bool,
    #[serde(default)]
    pub is_required: bool,
}

impl FieldShape {
    /// A field whose requiredness follows its type: everything except
    /// `Option<T>` is required.
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        let is_required = !type_ref.is_optional();
        Self {
            name: name.into(),
            type_ref,
            description: String::new(),
            is_key: false,
            is_required,
        }
    }

    pub fn of<T: TypeName>(name: impl Into<String>) -> Self {
        Self::new(name, T::type_ref())
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }
}
