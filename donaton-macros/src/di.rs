//! Macros for dependency injection

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Field, Fields, Token};

/// Where the value of a field comes from
enum FieldSource {
    Container,
    Fallback(Option<Expr>),
    Skip,
}

/// Creates a derive-macro for the `Inject` trait
pub(super) fn expand_inject(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "`Inject` can only be derived for structs"
        ));
    };

    let body = match &data.fields {
        Fields::Named(fields) => {
            let values = fields.named
                .iter()
                .map(|field| {
                    let ident = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #ident: #value })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            quote! { Self { #(#values),* } }
        },
        Fields::Unnamed(fields) => {
            let values = fields.unnamed
                .iter()
                .map(field_value)
                .collect::<syn::Result<Vec<_>>>()?;
            quote! { Self(#(#values),*) }
        },
        Fields::Unit => quote! { Self }
    };

    Ok(quote! {
        impl #impl_generics ::donaton_di::Inject for #name #ty_generics #where_clause {
            #[inline]
            fn inject(container: &::donaton_di::Container) -> ::core::result::Result<Self, ::donaton_di::error::Error> {
                ::core::result::Result::Ok(#body)
            }
        }
    })
}

fn field_value(field: &Field) -> syn::Result<TokenStream> {
    let ty = &field.ty;
    let resolved = quote! { <#ty as ::donaton_di::FromContainer>::from_container(container) };
    let value = match field_source(field)? {
        FieldSource::Container => quote! { #resolved? },
        FieldSource::Fallback(None) => quote! {
            ::donaton_di::inject::or_else::<#ty, _>(#resolved, ::core::default::Default::default)?
        },
        FieldSource::Fallback(Some(expr)) => quote! {
            ::donaton_di::inject::or_else::<#ty, _>(#resolved, || #expr)?
        },
        FieldSource::Skip => quote! { ::core::default::Default::default() }
    };
    Ok(value)
}

fn field_source(field: &Field) -> syn::Result<FieldSource> {
    let mut source = FieldSource::Container;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                let fallback = if meta.input.peek(Token![=]) {
                    Some(meta.value()?.parse::<Expr>()?)
                } else {
                    None
                };
                source = FieldSource::Fallback(fallback);
                Ok(())
            } else if meta.path.is_ident("skip") {
                source = FieldSource::Skip;
                Ok(())
            } else {
                Err(meta.error("expected `default`, `default = ...` or `skip`"))
            }
        })?;
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::expand_inject;

    fn expand(input: &str) -> syn::Result<String> {
        let input = syn::parse_str::<syn::DeriveInput>(input)?;
        expand_inject(&input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn it_resolves_named_fields() {
        let expanded = expand("struct Auth { users: Arc<dyn Users> }").unwrap();

        assert!(expanded.contains("impl :: donaton_di :: Inject for Auth"));
        assert!(expanded.contains("users : < Arc < dyn Users > as :: donaton_di :: FromContainer > :: from_container (container) ?"));
    }

    #[test]
    fn it_resolves_tuple_fields() {
        let expanded = expand("struct Pair(Arc<A>, Arc<B>);").unwrap();

        assert!(expanded.contains("Self (< Arc < A > as :: donaton_di :: FromContainer >"));
        assert!(expanded.contains("< Arc < B > as :: donaton_di :: FromContainer >"));
    }

    #[test]
    fn it_expands_unit_struct() {
        let expanded = expand("struct Marker;").unwrap();

        assert!(expanded.contains(":: core :: result :: Result :: Ok (Self)"));
    }

    #[test]
    fn it_uses_fallbacks() {
        let expanded = expand(r#"
            struct Mailer {
                #[inject(default)]
                retries: Arc<u32>,
                #[inject(default = String::from("noreply"))]
                sender: Arc<String>,
                #[inject(skip)]
                sent: Vec<String>,
            }
        "#).unwrap();

        assert!(expanded.contains("or_else :: < Arc < u32 > , _ >"));
        assert!(expanded.contains("String :: from (\"noreply\")"));
        assert!(expanded.contains("sent : :: core :: default :: Default :: default ()"));
    }

    #[test]
    fn it_keeps_generics() {
        let expanded = expand("struct Holder<T: Send + Sync + 'static> { inner: Arc<T> }").unwrap();

        assert!(expanded.contains(":: donaton_di :: Inject for Holder < T >"));
        assert!(expanded.contains("'static"));
    }

    #[test]
    fn it_rejects_enums() {
        let err = expand("enum Choice { A, B }").unwrap_err();

        assert_eq!(err.to_string(), "`Inject` can only be derived for structs");
    }

    #[test]
    fn it_rejects_unknown_attributes() {
        let err = expand("struct Auth { #[inject(lazy)] users: Arc<dyn Users> }").unwrap_err();

        assert_eq!(err.to_string(), "expected `default`, `default = ...` or `skip`");
    }
}
