use super::{
    Entity, EntityType, Field, Model, ModelOption, TAG_KEY_COLUMN, parse_tag, underscore_name,
};
use crate::error::{OrmError, OrmResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe cache of entity models keyed by type identity.
///
/// `get` parses an entity on first use; `register` always re-parses and
/// replaces the cached entry, so the last registration wins.
#[derive(Debug, Default)]
pub struct Registry {
    models: RwLock<HashMap<TypeId, Arc<Model>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached model for `T`, registering it with no options on first use.
    pub fn get<T: Entity>(&self) -> OrmResult<Arc<Model>> {
        self.get_type(EntityType::of::<T>())
    }

    /// Parse `T`, apply `opts` in order and store the result.
    pub fn register<T: Entity>(
        &self,
        opts: impl IntoIterator<Item = ModelOption>,
    ) -> OrmResult<Arc<Model>> {
        self.register_type(EntityType::of::<T>(), opts)
    }

    pub fn get_type(&self, entity: EntityType) -> OrmResult<Arc<Model>> {
        let cached = self
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entity.type_id())
            .cloned();
        match cached {
            Some(model) => Ok(model),
            None => self.register_type(entity, std::iter::empty()),
        }
    }

    pub fn register_type(
        &self,
        entity: EntityType,
        opts: impl IntoIterator<Item = ModelOption>,
    ) -> OrmResult<Arc<Model>> {
        let mut model = parse_model(entity)?;
        for opt in opts {
            opt(&mut model)?;
        }
        tracing::trace!(
            target: "orma.registry",
            entity = entity.type_name(),
            table = %model.table_name,
            fields = model.fields.len(),
            "registered model"
        );
        let model = Arc::new(model);
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity.type_id(), Arc::clone(&model));
        Ok(model)
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_model(entity: EntityType) -> OrmResult<Model> {
    let desc = entity.descriptor();
    if desc.fields.is_empty() {
        return Err(OrmError::NotAStruct(desc.type_name.to_string()));
    }

    let mut fields = Vec::with_capacity(desc.fields.len());
    for (index, fd) in desc.fields.iter().enumerate() {
        let mut tags = parse_tag(fd.tag)?;
        let column = match tags.remove(TAG_KEY_COLUMN) {
            Some(column) if !column.is_empty() => column,
            _ => underscore_name(fd.name),
        };
        fields.push(Field {
            name: fd.name.to_string(),
            column,
            type_name: fd.type_name.to_string(),
            index,
        });
    }

    let table_name = entity
        .table_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| underscore_name(desc.type_name));

    Model::new(table_name, fields)
}
