//! Declarative entity descriptors.
//!
//! An [`Entity`] describes its fields once, as static data, and gives the
//! registry everything it needs to build a [`Model`](super::Model). The
//! `#[derive(Entity)]` macro writes these impls; they can also be written by
//! hand.

use crate::error::OrmResult;
use crate::value::Value;
use std::any::TypeId;
use std::fmt;

/// Static description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Logical field name (the Rust identifier).
    pub name: &'static str,
    /// Rust type of the field, as written in the struct.
    pub type_name: &'static str,
    /// Override tag in `key1=value1,key2=value2` form; empty for none.
    pub tag: &'static str,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            tag: "",
        }
    }

    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }
}

/// Static description of an entity struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Unqualified struct name, e.g. `UserProfile`.
    pub type_name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldDescriptor],
}

/// A struct that maps to a table.
///
/// `field_value` and `set_field` are the value-binding seam: the builder reads
/// UPDATE/INSERT arguments through the former, the row scanner writes through
/// the latter. Both address fields by logical name.
pub trait Entity: Send + Sync + 'static {
    /// The declarative field list.
    fn descriptor() -> EntityDescriptor;

    /// Custom table name. `None` derives it from the type name.
    fn table_name() -> Option<String> {
        None
    }

    /// Read a field by logical name; `None` if there is no such field.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Write a field by logical name.
    fn set_field(&mut self, field: &str, value: Value) -> OrmResult<()>;
}

/// Type-erased handle to an [`Entity`] implementation.
///
/// Table references and joins name other entities through this handle so the
/// builder can resolve their models without knowing their Rust types.
#[derive(Clone, Copy)]
pub struct EntityType {
    type_id: TypeId,
    descriptor: fn() -> EntityDescriptor,
    table_name: fn() -> Option<String>,
}

impl EntityType {
    pub fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            descriptor: T::descriptor,
            table_name: T::table_name,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn descriptor(&self) -> EntityDescriptor {
        (self.descriptor)()
    }

    pub fn table_name(&self) -> Option<String> {
        (self.table_name)()
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor().type_name
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for EntityType {}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityType").field(&self.type_name()).finish()
    }
}
