use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DataEnum, DeriveInput, Expr, ExprLit, Fields, Lit, LitStr, Meta,
    Variant, parse_macro_input,
};

/// Derive an inherent `name()` method for an enum that returns the variant name.
///
/// For unit variants, the match arm uses `Type::Variant`.
/// For tuple variants, it uses `Type::Variant(..)`.
/// For struct variants, it uses `Type::Variant { .. }`.
///
/// # Example
///
/// ```ignore
/// #[derive(EnumKindName)]
/// enum K { Unit, Tuple(u8), Struct { x: u8 } }
/// # impl K { /* name() generated */ }
/// ```
#[proc_macro_derive(EnumKindName)]
pub fn derive_enum_kind_name(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(
            &input,
            "EnumKindName can only be derived for enums",
        )
        .to_compile_error()
        .into();
    };

    let arms = data_enum.variants.iter().map(|v| {
        let v_ident = &v.ident;
        let v_name = v_ident.to_string();
        match &v.fields {
            Fields::Unit => quote! { #name::#v_ident => #v_name },
            Fields::Unnamed(_) => quote! { #name::#v_ident(..) => #v_name },
            Fields::Named(_) => quote! { #name::#v_ident { .. } => #v_name },
        }
    });

    let expanded = quote! {
        impl #name {
            /// Return the enum variant name.
            #[must_use]
            pub fn name(&self) -> &'static str {
                match self {
                    #( #arms, )*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive a closed lexeme table for a fieldless enum.
///
/// Generates three inherent items:
/// - `ALL`: every variant in declaration order,
/// - `as_str(&self) -> &'static str`: the source spelling of the variant,
/// - `from_lexeme(&str) -> Option<Self>`: the exact inverse of `as_str`.
///
/// The spelling defaults to the variant name. A container attribute
/// `#[lexeme(rename_all = "lowercase")]` lowercases every default spelling and
/// a variant attribute `#[lexeme = "->"]` overrides one spelling.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Copy, Lexeme)]
/// #[lexeme(rename_all = "lowercase")]
/// enum Word {
///     Module,
///     #[lexeme = "->"]
///     Arrow,
/// }
/// // Word::Module.as_str() == "module"
/// // Word::from_lexeme("->") == Some(Word::Arrow)
/// ```
#[proc_macro_derive(Lexeme, attributes(lexeme))]
pub fn derive_lexeme(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_lexeme(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_lexeme(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Lexeme can only be derived for enums",
        ));
    };

    let lowercase = rename_all_lowercase(input)?;

    let mut idents = Vec::with_capacity(variants.len());
    let mut spellings = Vec::with_capacity(variants.len());
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Lexeme variants cannot carry fields",
            ));
        }
        let spelling = variant_spelling(variant, lowercase)?;
        if spellings.contains(&spelling) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate lexeme `{spelling}`"),
            ));
        }
        idents.push(&variant.ident);
        spellings.push(spelling);
    }

    Ok(quote! {
        impl #name {
            /// Every variant in declaration order.
            pub const ALL: &'static [#name] = &[ #( #name::#idents, )* ];

            /// The source spelling of this lexeme.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    #( #name::#idents => #spellings, )*
                }
            }

            /// Look up the lexeme spelled exactly as `text`.
            #[must_use]
            pub fn from_lexeme(text: &str) -> Option<Self> {
                match text {
                    #( #spellings => Some(#name::#idents), )*
                    _ => None,
                }
            }
        }
    })
}

fn rename_all_lowercase(input: &DeriveInput) -> syn::Result<bool> {
    let mut lowercase = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("lexeme") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let rule: LitStr = meta.value()?.parse()?;
                if rule.value() == "lowercase" {
                    lowercase = true;
                    Ok(())
                } else {
                    Err(meta.error("only `rename_all = \"lowercase\"` is supported"))
                }
            } else {
                Err(meta.error("unsupported lexeme attribute"))
            }
        })?;
    }
    Ok(lowercase)
}

fn variant_spelling(variant: &Variant, lowercase: bool) -> syn::Result<String> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("lexeme") {
            continue;
        }
        let Meta::NameValue(pair) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                attr,
                "expected `#[lexeme = \"...\"]`",
            ));
        };
        return match &pair.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(spelling),
                ..
            }) => Ok(spelling.value()),
            other => Err(syn::Error::new_spanned(
                other,
                "lexeme spelling must be a string literal",
            )),
        };
    }

    let name = variant.ident.to_string();
    Ok(if lowercase { name.to_lowercase() } else { name })
}
