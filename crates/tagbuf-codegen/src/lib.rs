// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Derive macro for `tagbuf::Describe`.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Attribute, Data, DataEnum, DeriveInput, Fields, LitStr};

/// Per-field options from `#[tagbuf(...)]`.
#[derive(Default)]
struct FieldOptions {
    rename: Option<String>,
    skip: bool,
}

/// `#[derive(Describe)]` macro: generates a `tagbuf::Describe` impl
///
/// Supports:
/// - Structs with named fields: fields in declaration order, wire name = field name
/// - Tuple structs: wire names "0", "1", ...
/// - Fieldless enums: encoded as the `#[repr]` integer (default `i32`)
///
/// Field attributes:
/// - `#[tagbuf(rename = "wire_name")]`: hash a different name into the field id
/// - `#[tagbuf(skip)]`: leave the field out of the encoding
///
/// Generic types are rejected; describe them by hand.
///
/// Example:
/// ```ignore
/// use tagbuf::Describe;
///
/// #[derive(Describe, Default)]
/// struct Order {
///     id: u64,
///     #[tagbuf(rename = "customer")]
///     client: String,
///     lines: Vec<Line>,
///     #[tagbuf(skip)]
///     cached_total: f64,
/// }
///
/// #[derive(Describe, Default, Clone, Copy)]
/// #[repr(u8)]
/// enum Status {
///     #[default]
///     Open = 1,
///     Closed = 2,
/// }
/// ```
#[proc_macro_derive(Describe, attributes(tagbuf))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic types; implement it by hand",
        )
        .to_compile_error()
        .into();
    }

    let expanded = match &input.data {
        Data::Struct(data) => describe_struct(&input, &data.fields),
        Data::Enum(data) => describe_enum(&input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input,
            "Only structs and fieldless enums are supported",
        )),
    };

    match expanded {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn describe_struct(
    input: &DeriveInput,
    fields: &Fields,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let mut accessors = Vec::new();
    let mut descriptors = Vec::new();
    let mut seen: Vec<(String, u64)> = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let options = field_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        let member = match &field.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = syn::Index::from(index);
                quote! { #index }
            }
        };
        let wire_name = options.rename.unwrap_or_else(|| match &field.ident {
            Some(ident) => unraw(&ident.to_string()),
            None => index.to_string(),
        });
        let id = compute_fnv1a_hash(&wire_name);
        if let Some((other, _)) = seen.iter().find(|(_, seen_id)| *seen_id == id) {
            return Err(syn::Error::new_spanned(
                field,
                format!("wire name `{wire_name}` collides with field `{other}`"),
            ));
        }
        seen.push((wire_name.clone(), id));

        let ty = &field.ty;
        let get = format_ident!("__tagbuf_get_{}", index);
        let get_mut = format_ident!("__tagbuf_get_mut_{}", index);
        accessors.push(quote! {
            fn #get(owner: &#name) -> &#ty {
                &owner.#member
            }
            fn #get_mut(owner: &mut #name) -> &mut #ty {
                &mut owner.#member
            }
        });
        descriptors.push(quote! {
            ::tagbuf::types::FieldDescriptor::with_id::<#name, #ty>(#wire_name, #id, #get, #get_mut)
        });
    }

    Ok(quote! {
        impl ::tagbuf::types::Describe for #name {
            fn describe() -> ::tagbuf::types::TypeDescriptor {
                #(#accessors)*

                ::tagbuf::types::TypeDescriptor::new::<Self>(
                    ::tagbuf::types::TypeKind::Struct(::std::vec![#(#descriptors),*]),
                )
            }
        }
    })
}

fn describe_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Only fieldless enums are supported",
            ));
        }
    }
    let underlying = repr_kind(&input.attrs)?;

    let variants: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let to_raw_arms = variants.iter().map(|variant| {
        quote! { #name::#variant => #name::#variant as i64 }
    });
    let from_raw_arms = variants.iter().map(|variant| {
        quote! { raw if raw == #name::#variant as i64 => ::std::option::Option::Some(#name::#variant) }
    });

    Ok(quote! {
        impl ::tagbuf::types::Describe for #name {
            fn describe() -> ::tagbuf::types::TypeDescriptor {
                fn __tagbuf_to_raw(value: &#name) -> i64 {
                    match value {
                        #(#to_raw_arms,)*
                    }
                }
                fn __tagbuf_from_raw(raw: i64) -> ::std::option::Option<#name> {
                    match raw {
                        #(#from_raw_arms,)*
                        _ => ::std::option::Option::None,
                    }
                }

                ::tagbuf::types::TypeDescriptor::new::<Self>(::tagbuf::types::TypeKind::Enum(
                    ::tagbuf::types::EnumDecl::new::<#name>(
                        ::tagbuf::PrimitiveKind::#underlying,
                        __tagbuf_to_raw,
                        __tagbuf_from_raw,
                    ),
                ))
            }
        }
    })
}

fn field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("tagbuf")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"` or `skip`"))
            }
        })?;
    }
    Ok(options)
}

/// Underlying `PrimitiveKind` variant from `#[repr(..)]`.
fn repr_kind(attrs: &[Attribute]) -> syn::Result<syn::Ident> {
    let mut kind = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            let variant = match meta.path.get_ident().map(ToString::to_string).as_deref() {
                Some("i8") => "I8",
                Some("u8") => "U8",
                Some("i16") => "I16",
                Some("u16") => "U16",
                Some("i32") => "I32",
                Some("u32") => "U32",
                Some("i64" | "isize") => "I64",
                Some("u64" | "usize") => "U64",
                // repr(C), repr(align(..)) and friends say nothing about the width
                _ => {
                    if meta.input.peek(syn::token::Paren) {
                        let _args;
                        syn::parenthesized!(_args in meta.input);
                    }
                    return Ok(());
                }
            };
            kind = Some(format_ident!("{}", variant));
            Ok(())
        })?;
    }
    Ok(kind.unwrap_or_else(|| format_ident!("I32")))
}

/// Strip the `r#` prefix of raw identifiers.
fn unraw(name: &str) -> String {
    name.strip_prefix("r#").unwrap_or(name).to_string()
}

/// Compute FNV-1a hash (64-bit) for field ids
fn compute_fnv1a_hash(s: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(compute_fnv1a_hash(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(compute_fnv1a_hash("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_unraw() {
        assert_eq!(unraw("r#type"), "type");
        assert_eq!(unraw("value"), "value");
    }
}
