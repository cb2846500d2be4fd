//! Syntax-based extractor backed by `syn`.
//!
//! The first `struct` found (depth-first, descending into inline `mod`
//! blocks) is the type declaration; its named fields are the data members.
//! Nothing is resolved semantically: a field of type `Status` is recorded
//! as `Status` whether or not such a type exists.

use quote::ToTokens;
use syn::{
    Attribute, Expr, ExprLit, Fields, GenericArgument, Item, ItemStruct, Lit, LitStr, Meta,
    PathArguments, Type, ext::IdentExt,
};
use tracing::{debug, instrument};

use entigen_core::{
    application::{ApplicationError, SourceLocation, ports::SourceParser},
    domain::{FieldShape, TypeRef, TypeShape},
    error::EntigenResult,
};

/// Parses Rust source text into a [`TypeShape`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SynSourceParser;

impl SynSourceParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for SynSourceParser {
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    fn parse(&self, origin: &str, text: &str) -> EntigenResult<TypeShape> {
        let file = syn::parse_file(text).map_err(|e| {
            let start = e.span().start();
            ApplicationError::ParseError {
                origin: origin.to_string(),
                // proc-macro2 columns are 0-based
                location: SourceLocation::new(start.line, start.column + 1),
                message: e.to_string(),
            }
        })?;

        let item = first_struct(&file.items).ok_or_else(|| ApplicationError::NoTypeDeclaration {
            origin: origin.to_string(),
        })?;

        let shape = shape_of(item);
        debug!(name = %shape.name, fields = shape.fields.len(), "Struct found");
        Ok(shape)
    }
}

fn first_struct(items: &[Item]) -> Option<&ItemStruct> {
    items.iter().find_map(|item| match item {
        Item::Struct(s) => Some(s),
        Item::Mod(m) => m.content.as_ref().and_then(|(_, inner)| first_struct(inner)),
        _ => None,
    })
}

fn shape_of(item: &ItemStruct) -> TypeShape {
    let mut shape = TypeShape::new(item.ident.unraw().to_string()).described(description(&item.attrs));

    // Tuple and unit structs have no named data members.
    if let Fields::Named(named) = &item.fields {
        for field in &named.named {
            let Some(ident) = &field.ident else { continue };

            let mut member = FieldShape::new(ident.unraw().to_string(), type_ref(&field.ty))
                .described(description(&field.attrs));
            if has_marker(&field.attrs, "key") {
                member = member.key();
            }
            if has_marker(&field.attrs, "required") {
                member = member.required();
            }
            shape = shape.field(member);
        }
    }

    shape
}

// ── Attributes ────────────────────────────────────────────────────────────────

fn has_marker(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|a| a.path().is_ident(name))
}

/// Explicit `#[description]` wins over doc comments; otherwise empty.
fn description(attrs: &[Attribute]) -> String {
    if let Some(explicit) = attrs
        .iter()
        .filter(|a| a.path().is_ident("description"))
        .find_map(explicit_description)
    {
        return explicit;
    }

    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| string_value(&a.meta))
        .map(|line| line.trim().to_string())
        .collect();

    lines.join("\n").trim().to_string()
}

fn explicit_description(attr: &Attribute) -> Option<String> {
    match &attr.meta {
        Meta::NameValue(_) => string_value(&attr.meta),
        Meta::List(_) => attr.parse_args::<LitStr>().ok().map(|s| s.value()),
        Meta::Path(_) => None,
    }
}

fn string_value(meta: &Meta) -> Option<String> {
    match meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

// ── Types ─────────────────────────────────────────────────────────────────────

fn type_ref(ty: &Type) -> TypeRef {
    match ty {
        Type::Path(p) if p.qself.is_none() => match p.path.segments.last() {
            Some(segment) => {
                let args = match &segment.arguments {
                    PathArguments::AngleBracketed(generic) => generic
                        .args
                        .iter()
                        .filter_map(|arg| match arg {
                            GenericArgument::Type(t) => Some(type_ref(t)),
                            GenericArgument::Lifetime(_) => None,
                            other => Some(TypeRef::named(compact(other))),
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                TypeRef::generic(segment.ident.unraw().to_string(), args)
            }
            None => TypeRef::named(compact(ty)),
        },
        Type::Reference(r) => {
            let prefix = if r.mutability.is_some() { "&mut " } else { "&" };
            TypeRef::named(format!("{prefix}{}", type_ref(&r.elem)))
        }
        Type::Slice(s) => TypeRef::named(format!("[{}]", type_ref(&s.elem))),
        Type::Array(a) => TypeRef::named(format!("[{};{}]", type_ref(&a.elem), compact(&a.len))),
        Type::Tuple(t) => {
            let elems: Vec<String> = t.elems.iter().map(|e| type_ref(e).to_string()).collect();
            TypeRef::named(format!("({})", elems.join(",")))
        }
        Type::Paren(p) => type_ref(&p.elem),
        Type::Group(g) => type_ref(&g.elem),
        other => TypeRef::named(compact(other)),
    }
}

/// Token text with whitespace kept only where two words would merge.
fn compact(tokens: &impl ToTokens) -> String {
    let text = tokens.to_token_stream().to_string();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && out.chars().last().is_some_and(is_word) && is_word(c) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use entigen_core::error::{EntigenError, ErrorKind};

    use super::*;

    fn parse(text: &str) -> EntigenResult<TypeShape> {
        SynSourceParser::new().parse("test.rs", text)
    }

    fn types(shape: &TypeShape) -> Vec<String> {
        shape.fields.iter().map(|f| f.type_ref.to_string()).collect()
    }

    #[test]
    fn named_fields_become_members_in_order() {
        let shape = parse(
            r#"
            pub struct Customer {
                pub id: u64,
                pub name: String,
                pub email: Option<String>,
            }
            "#,
        )
        .unwrap();

        assert_eq!(shape.name, "Customer");
        let names: Vec<_> = shape.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
        let required: Vec<_> = shape.fields.iter().map(|f| f.is_required).collect();
        assert_eq!(required, vec![true, true, false]);
    }

    #[test]
    fn generic_types_render_recursively_without_spaces() {
        let shape = parse(
            r#"
            struct Report<'a> {
                totals: std::collections::HashMap<String, Vec<i32>>,
                label: &'a str,
                buffer: &'a mut [u8],
                grid: [[f32; 3]; 4],
                pair: (u8, Option<bool>),
                cow: Cow<'a, str>,
                sink: Box<dyn Write + Send>,
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            types(&shape),
            vec![
                "HashMap<String,Vec<i32>>",
                "&str",
                "&mut [u8]",
                "[[f32;3];4]",
                "(u8,Option<bool>)",
                "Cow<str>",
                "Box<dyn Write+Send>",
            ]
        );
    }

    #[test]
    fn descriptions_prefer_explicit_attribute() {
        let shape = parse(
            r#"
            /// An order placed by a customer.
            ///   Spans two lines.
            struct Order {
                /// Ignored doc
                #[description = "Primary identifier"]
                #[key]
                id: u64,
                #[description("When it was placed")]
                placed_at: i64,
                /// Free text
                note: Option<String>,
                plain: bool,
            }
            "#,
        )
        .unwrap();

        assert_eq!(shape.description, "An order placed by a customer.\nSpans two lines.");
        let described: Vec<_> = shape.fields.iter().map(|f| f.description.as_str()).collect();
        assert_eq!(
            described,
            vec!["Primary identifier", "When it was placed", "Free text", ""]
        );
        assert!(shape.fields[0].is_key);
        assert!(!shape.fields[1].is_key);
    }

    #[test]
    fn required_marker_overrides_option() {
        let shape = parse("struct A { #[required] b: Option<u8>, c: Option<u8> }").unwrap();

        assert!(shape.fields[0].is_required);
        assert!(!shape.fields[1].is_required);
    }

    #[test]
    fn first_struct_wins_including_nested_modules() {
        let shape = parse(
            r#"
            use std::fmt;
            enum Kind { A, B }
            mod inner {
                pub struct Nested { pub x: u8 }
            }
            struct Later { y: u8 }
            "#,
        )
        .unwrap();

        assert_eq!(shape.name, "Nested");
    }

    #[test]
    fn tuple_struct_has_no_members() {
        let shape = parse("pub struct Meters(pub f64);").unwrap();

        assert_eq!(shape.name, "Meters");
        assert!(shape.fields.is_empty());
    }

    #[test]
    fn raw_identifiers_are_unescaped() {
        let shape = parse("struct r#Match { r#type: u8 }").unwrap();

        assert_eq!(shape.name, "Match");
        assert_eq!(shape.fields[0].name, "type");
    }

    #[test]
    fn no_struct_is_reported() {
        let err = parse("fn main() {}\nenum E { A }").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoTypeDeclaration);
    }

    #[test]
    fn syntax_error_carries_location() {
        let err = parse("pub struct Order {\n    id: u64,\n    name String,\n}").unwrap_err();

        match err {
            EntigenError::Application(ApplicationError::ParseError {
                origin, location, ..
            }) => {
                assert_eq!(origin, "test.rs");
                assert_eq!(location.line, 3);
                assert!(location.column >= 1);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
