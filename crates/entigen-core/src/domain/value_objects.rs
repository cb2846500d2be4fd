//! Value objects shared by the metadata model.
//!
//! [`TypeRef`] is the structured form of a property's declared type. Both
//! extraction paths (parsed syntax and already-loaded types) produce a
//! `TypeRef`, and the metadata model only ever stores its rendered string.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A possibly parameterized type descriptor.
///
/// Renders as `Name` or `Name<Arg1,Arg2>` with arguments rendered
/// recursively and no whitespace, e.g. `HashMap<String,Vec<i32>>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// A non-parameterized type.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A parameterized type with arguments in declaration order.
    pub fn generic(name: impl Into<String>, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// `true` for `Option<T>`; such fields are optional members.
    pub fn is_optional(&self) -> bool {
        self.name == "Option" && self.args.len() == 1
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }

        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

/// Static type-name lookup for types already known to the program.
///
/// This is the loaded-type counterpart of parsing a declared type out of
/// source text.
pub trait TypeName {
    fn type_ref() -> TypeRef;
}

macro_rules! leaf_type_name {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TypeName for $ty {
                fn type_ref() -> TypeRef {
                    TypeRef::named($name)
                }
            }
        )*
    };
}

leaf_type_name! {
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
}

macro_rules! unary_type_name {
    ($($outer:ident),* $(,)?) => {
        $(
            impl<T: TypeName> TypeName for $outer<T> {
                fn type_ref() -> TypeRef {
                    TypeRef::generic(stringify!($outer), [T::type_ref()])
                }
            }
        )*
    };
}

unary_type_name!(Vec, Option, Box, HashSet, BTreeSet);

impl<K: TypeName, V: TypeName> TypeName for HashMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::generic("HashMap", [K::type_ref(), V::type_ref()])
    }
}

impl<K: TypeName, V: TypeName> TypeName for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::generic("BTreeMap", [K::type_ref(), V::type_ref()])
    }
}
