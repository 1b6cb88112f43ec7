use proc_macro2::TokenTree;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::{Attribute, Field, FieldsNamed, Ident, Path, Token, Type, punctuated::Punctuated};

/// 把 `required` 与结构体上已有的 derive 合并为一个 `#[derive(...)]`，
/// 其余属性保持原样跟在后面
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let mut others = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        match attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            Ok(list) => existing.extend(list),
            Err(_) => others.push(attr),
        }
    }

    let mut seen = HashSet::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    attrs.push(syn::parse_quote!(#[derive(#(#merged),*)]));
    attrs.extend(others);
}

// Serialize 与 serde::Serialize 视为同一个派生；std/core 限定路径按末段比较，
// 其余路径按完整路径比较，避免 `my::Default` 被 `Default` 吞掉
fn derive_key(path: &Path) -> String {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    match segments.as_slice() {
        [.., last] if last == "Serialize" || last == "Deserialize" => format!("serde::{last}"),
        [first, .., last] if first == "std" || first == "core" => last.clone(),
        _ => segments.join("::"),
    }
}

/// 确保 `id` 字段位于最前；已存在时复用原定义
pub(crate) fn ensure_id_field(fields: &mut FieldsNamed, id_ty: &Type) {
    let is_id = |f: &Field| f.ident.as_ref().is_some_and(|i| i == "id");

    let old = std::mem::take(&mut fields.named);
    let id_field: Field = old
        .iter()
        .find(|f| is_id(f))
        .cloned()
        .unwrap_or_else(|| syn::parse_quote! { id: #id_ty });

    let mut named: Punctuated<Field, Token![,]> = Punctuated::new();
    named.push(id_field);
    for f in old.into_iter().filter(|f| !is_id(f)) {
        named.push(f);
    }
    fields.named = named;
}

/// 实体属性：全部字段名，以及可按名字写入的字段（排除 `id` 与 serde 跳过反序列化的字段）
pub(crate) fn attribute_fields(fields: &FieldsNamed) -> (Vec<String>, Vec<Ident>) {
    let mut all = Vec::new();
    let mut writable = Vec::new();
    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        all.push(ident.unraw().to_string());
        if ident != "id" && !skips_deserializing(field) {
            writable.push(ident.clone());
        }
    }
    (all, writable)
}

fn skips_deserializing(field: &Field) -> bool {
    field
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("serde"))
        .filter_map(|a| a.meta.require_list().ok())
        .any(|list| {
            list.tokens.clone().into_iter().any(|tt| {
                matches!(tt, TokenTree::Ident(ref i) if i == "skip" || i == "skip_deserializing")
            })
        })
}
