//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

struct FieldInfo {
    ident: syn::Ident,
    name: String,
    type_name: String,
    tag: String,
    ty: syn::Type,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let table_name = get_table_name(&input)?;
    let fields = fields
        .iter()
        .map(field_info)
        .collect::<Result<Vec<_>>>()?;

    let descriptors = fields.iter().map(|f| {
        let field_name = &f.name;
        let type_name = &f.type_name;
        let tag = &f.tag;
        quote! {
            ::orma::FieldDescriptor::new(#field_name, #type_name).with_tag(#tag)
        }
    });

    let getters = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        quote! {
            #field_name => ::core::option::Option::Some(::orma::Value::from(
                ::core::clone::Clone::clone(&self.#ident),
            )),
        }
    });

    let setters = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        let ty = &f.ty;
        quote! {
            #field_name => {
                self.#ident = <#ty as ::orma::FromValue>::from_value(value)
                    .map_err(|e| ::orma::OrmError::decode(#field_name, e))?;
                ::core::result::Result::Ok(())
            }
        }
    });

    let table_fn = table_name.map(|table| {
        quote! {
            fn table_name() -> ::core::option::Option<::std::string::String> {
                ::core::option::Option::Some(::std::string::String::from(#table))
            }
        }
    });

    let type_name = name.unraw().to_string();

    Ok(quote! {
        impl #impl_generics ::orma::Entity for #name #ty_generics #where_clause {
            fn descriptor() -> ::orma::EntityDescriptor {
                const FIELDS: &[::orma::FieldDescriptor] = &[#(#descriptors),*];
                ::orma::EntityDescriptor {
                    type_name: #type_name,
                    fields: FIELDS,
                }
            }

            #table_fn

            fn field_value(&self, field: &str) -> ::core::option::Option<::orma::Value> {
                match field {
                    #(#getters)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field(&mut self, field: &str, value: ::orma::Value) -> ::orma::OrmResult<()> {
                match field {
                    #(#setters)*
                    _ => ::core::result::Result::Err(::orma::OrmError::unknown_field(field)),
                }
            }
        }
    })
}

fn get_table_name(input: &DeriveInput) -> Result<Option<String>> {
    let mut table = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                table = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute on struct, expected `table`"))
            }
        })?;
    }
    Ok(table)
}

fn field_info(field: &syn::Field) -> Result<FieldInfo> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };

    let mut column: Option<String> = None;
    let mut raw_tag: Option<String> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                column = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("tag") {
                raw_tag = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute on field, expected `column` or `tag`"))
            }
        })?;
    }

    let tag = match (column, raw_tag) {
        (Some(column), Some(_)) => {
            return Err(syn::Error::new_spanned(
                field,
                format!("`column = \"{column}\"` and `tag` cannot be combined"),
            ));
        }
        (Some(column), None) => format!("column={column}"),
        (None, Some(tag)) => tag,
        (None, None) => String::new(),
    };

    let ty = field.ty.clone();
    let type_name = quote!(#ty).to_string().replace(' ', "");

    Ok(FieldInfo {
        name: ident.unraw().to_string(),
        ident,
        type_name,
        tag,
        ty,
    })
}
