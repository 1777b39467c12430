//! Derive macro for orma
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity;

/// Derive the `Entity` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use orma::Entity;
///
/// #[derive(Entity, Default)]
/// #[orm(table = "users")]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Override the derived table name
/// - `#[orm(column = "name")]` - Map a field to a different column name
/// - `#[orm(tag = "column=name")]` - Pass a raw `key=value` tag through to the registry
///
/// Every field type must convert into `orma::Value` and implement `orma::FromValue`.
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
