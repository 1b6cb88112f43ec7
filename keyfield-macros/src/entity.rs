use crate::utils::{apply_derives, attribute_fields, ensure_id_field};
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[entity] 宏实现
/// - 若缺失则追加字段 `id: IdType`，并置于字段最前
/// - 合并派生：Debug（可关闭）、Default、Serialize、Deserialize
/// - 实现 `::keyfield::entity::Entity`，以及（默认开启的）`::keyfield::entity::KeyedEntity`
/// - 实现 `::keyfield::persist::Attributes`：按字段名只写入目标字段
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(|| syn::parse_quote! { String });
    ensure_id_field(fields_named, &id_type);
    let (attributes, writable) = attribute_fields(fields_named);
    let writable_names: Vec<String> = writable.iter().map(|i| i.unraw().to_string()).collect();

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(::serde::Serialize),
        syn::parse_quote!(::serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    // 命名空间默认取调用方 crate 名，类别默认取结构体名小写
    let namespace = match cfg.namespace {
        Some(lit) => quote! { #lit },
        None => quote! { ::core::env!("CARGO_CRATE_NAME") },
    };
    let kind = cfg
        .kind
        .unwrap_or_else(|| LitStr::new(&ident.to_string().to_lowercase(), ident.span()));

    let keyed_impl = if cfg.keyed.unwrap_or(true) {
        quote! {
            impl #impl_generics ::keyfield::entity::KeyedEntity for #ident #ty_generics #where_clause {
                const NAMESPACE: &'static str = #namespace;
                const KIND: &'static str = #kind;
            }
        }
    } else {
        quote! {}
    };

    let expanded = quote! {
        #st

        impl #impl_generics ::keyfield::entity::Entity for #ident #ty_generics #where_clause {
            type Id = #id_type;

            fn new(id: Self::Id) -> Self {
                Self { id, ..::core::default::Default::default() }
            }

            fn id(&self) -> &Self::Id { &self.id }
        }

        #keyed_impl

        impl #impl_generics ::keyfield::persist::Attributes for #ident #ty_generics #where_clause {
            const ATTRIBUTES: &'static [&'static str] = &[#(#attributes),*];
            const WRITABLE_ATTRIBUTES: &'static [&'static str] = &[#(#writable_names),*];

            #[allow(unused_variables)]
            fn set_attribute(
                &mut self,
                name: &str,
                value: ::keyfield::persist::Value,
            ) -> ::keyfield::error::FieldResult<()> {
                match name {
                    #( #writable_names => {
                        self.#writable = ::keyfield::persist::decode_attribute(name, value)?;
                    } )*
                    other => {
                        return ::core::result::Result::Err(
                            ::keyfield::persist::unknown_attribute::<Self>(other),
                        );
                    }
                }
                ::core::result::Result::Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

#[derive(Default)]
struct EntityAttrConfig {
    id_ty: Option<Type>,
    namespace: Option<LitStr>,
    kind: Option<LitStr>,
    derive_debug: Option<bool>,
    keyed: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let elems = Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;
        for elem in elems {
            match elem {
                EntityAttrElem::Id(key, ty) => set_once(&mut cfg.id_ty, *ty, &key)?,
                EntityAttrElem::Namespace(key, lit) => {
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "namespace must not be empty"));
                    }
                    set_once(&mut cfg.namespace, lit, &key)?
                }
                EntityAttrElem::Kind(key, lit) => {
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "kind must not be empty"));
                    }
                    set_once(&mut cfg.kind, lit, &key)?
                }
                EntityAttrElem::Debug(key, b) => set_once(&mut cfg.derive_debug, b, &key)?,
                EntityAttrElem::Keyed(key, b) => set_once(&mut cfg.keyed, b, &key)?,
            }
        }
        Ok(cfg)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &syn::Ident) -> Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{key}' in attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

enum EntityAttrElem {
    Id(syn::Ident, Box<Type>),
    Namespace(syn::Ident, LitStr),
    Kind(syn::Ident, LitStr),
    Debug(syn::Ident, bool),
    Keyed(syn::Ident, bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;

        if key == "id" {
            let ty: Type = input.parse()?;
            Ok(EntityAttrElem::Id(key, Box::new(ty)))
        } else if key == "namespace" {
            Ok(EntityAttrElem::Namespace(key, input.parse()?))
        } else if key == "kind" {
            Ok(EntityAttrElem::Kind(key, input.parse()?))
        } else if key == "debug" {
            let b = parse_bool(input, &key)?;
            Ok(EntityAttrElem::Debug(key, b))
        } else if key == "keyed" {
            let b = parse_bool(input, &key)?;
            Ok(EntityAttrElem::Keyed(key, b))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'id', 'namespace', 'kind', 'debug' or 'keyed'",
            ))
        }
    }
}

fn parse_bool(input: ParseStream, key: &syn::Ident) -> Result<bool> {
    match input.parse::<syn::Expr>()? {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected boolean literal for '{key}'"),
        )),
    }
}
