//! `#[derive(Payload)]` implementation.

use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::Span;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{
    Attribute, Data, DeriveInput, Fields, Ident, LitStr, Path, ext::IdentExt, parse_macro_input,
};

/// Struct-level `#[payload(...)]` options.
struct ContainerArgs {
    name: Option<String>,
    krate: Option<Path>,
}

impl ContainerArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = ContainerArgs {
            name: None,
            krate: None,
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("payload")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.name = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.krate = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown payload attribute, expected `name` or `crate`"))
                }
            })?;
        }

        Ok(args)
    }
}

/// Field-level `#[payload(...)]` options.
struct FieldArgs {
    rename: Option<String>,
    skip: bool,
}

impl FieldArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = FieldArgs {
            rename: None,
            skip: false,
        };

        for attr in attrs.iter().filter(|a| a.path().is_ident("payload")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.rename = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    args.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown payload attribute, expected `rename` or `skip`"))
                }
            })?;
        }

        Ok(args)
    }
}

/// Path to `hostwatch_core` as seen from the crate being expanded.
///
/// Goes through the `hostwatch` facade when the caller depends on it, so
/// users of the facade alone need no direct `hostwatch-core` dependency.
fn core_path() -> proc_macro2::TokenStream {
    if let Ok(found) = crate_name("hostwatch") {
        let facade = match found {
            // `hostwatch` declares `extern crate self as hostwatch`, and its
            // tests and demos see it as an ordinary dependency.
            FoundCrate::Itself => Ident::new("hostwatch", Span::call_site()),
            FoundCrate::Name(name) => Ident::new(&name, Span::call_site()),
        };
        return quote! { ::#facade::hostwatch_core };
    }

    match crate_name("hostwatch-core") {
        Ok(FoundCrate::Name(name)) => {
            let core = Ident::new(&name, Span::call_site());
            quote! { ::#core }
        }
        _ => quote! { ::hostwatch_core },
    }
}

pub fn derive_payload_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Payload cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &data.fields,
                    "Payload fields must be named",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Payload can only be derived for structs",
            ));
        }
    };

    let container = ContainerArgs::from_attrs(&input.attrs)?;
    let krate = container
        .krate
        .map(|path| quote! { #path })
        .unwrap_or_else(core_path);
    let shape_name = container.name.unwrap_or_else(|| name.to_string());

    let mut getters = Vec::new();
    let mut defs = Vec::new();
    let mut published_names = HashSet::new();

    for field in fields {
        let args = FieldArgs::from_attrs(&field.attrs)?;
        if args.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let published = args.rename.unwrap_or_else(|| ident.unraw().to_string());
        if !published_names.insert(published.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate payload field name `{published}`"),
            ));
        }
        let getter = format_ident!("__hostwatch_get_{}", ident.unraw());

        getters.push(quote! {
            #[allow(non_snake_case)]
            fn #getter(
                payload: &dyn ::core::any::Any,
            ) -> ::core::option::Option<&dyn ::core::any::Any> {
                payload
                    .downcast_ref::<#name>()
                    .map(|p| &p.#ident as &dyn ::core::any::Any)
            }
        });
        defs.push(quote! { #krate::FieldDef::new(#published, #getter) });
    }

    Ok(quote! {
        const _: () = {
            #(#getters)*

            static __HOSTWATCH_SHAPE: #krate::Shape = #krate::Shape::new(
                #shape_name,
                ::core::any::TypeId::of::<#name>,
                &[#(#defs),*],
            );

            impl #krate::Payload for #name {
                fn shape(&self) -> &'static #krate::Shape {
                    &__HOSTWATCH_SHAPE
                }

                fn as_any(&self) -> &dyn ::core::any::Any {
                    self
                }
            }
        };
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        expand(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_duplicate_published_names_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Clash {
                #[payload(rename = "HttpContext")]
                request: u32,
                #[payload(rename = "HttpContext")]
                response: u32,
            }
        };
        assert_eq!(
            expand_err(input),
            "duplicate payload field name `HttpContext`"
        );
    }

    #[test]
    fn test_rename_onto_existing_field_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Clash {
                exception: u32,
                #[payload(rename = "exception")]
                error: u32,
            }
        };
        assert!(expand_err(input).contains("`exception`"));
    }

    #[test]
    fn test_skipped_field_does_not_clash() {
        let input: DeriveInput = parse_quote! {
            struct Fine {
                #[payload(rename = "status")]
                code: u16,
                #[payload(skip)]
                status: u16,
            }
        };
        assert!(expand(&input).is_ok());
    }

    #[test]
    fn test_generics_and_tuples_rejected() {
        let generic: DeriveInput = parse_quote! { struct Wrap<T> { value: T } };
        assert_eq!(
            expand_err(generic),
            "Payload cannot be derived for generic types"
        );

        let tuple: DeriveInput = parse_quote! { struct Pair(u32, u32); };
        assert_eq!(expand_err(tuple), "Payload fields must be named");
    }

    #[test]
    fn test_explicit_crate_path_is_used() {
        let input: DeriveInput = parse_quote! {
            #[payload(crate = "my_core")]
            struct Tick { count: u64 }
        };
        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("my_core :: Payload"));
    }
}
