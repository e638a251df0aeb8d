//! Spring request-mapping annotations matched against a [`FilterMap`].

use indexmap::IndexMap;

use crate::annotation::{
    self, Values, DELETE_MAPPING, GET_MAPPING, PATCH_MAPPING, POST_MAPPING, PUT_MAPPING,
    REQUEST_MAPPING,
};
use crate::filter::{FilterMap, METHOD, PATH, VALUE};
use crate::model::{Annotated, Annotation, MethodModel};
use crate::{Error, Result};

/// The mapping annotations a handler method may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingKind {
    Request,
    Get,
    Post,
    Delete,
    Patch,
    Put,
}

impl MappingKind {
    /// Shorthand annotations in the order they are looked up.
    pub const SHORTHANDS: [MappingKind; 5] = [
        MappingKind::Get,
        MappingKind::Post,
        MappingKind::Delete,
        MappingKind::Patch,
        MappingKind::Put,
    ];

    pub fn annotation_name(self) -> &'static str {
        match self {
            MappingKind::Request => REQUEST_MAPPING,
            MappingKind::Get => GET_MAPPING,
            MappingKind::Post => POST_MAPPING,
            MappingKind::Delete => DELETE_MAPPING,
            MappingKind::Patch => PATCH_MAPPING,
            MappingKind::Put => PUT_MAPPING,
        }
    }

    /// Shorthands fix the HTTP verb, so they cannot be filtered on `method`.
    pub fn is_shorthand(self) -> bool {
        !matches!(self, MappingKind::Request)
    }
}

/// The mapping annotation selected for a method.
#[derive(Debug, Clone, Copy)]
pub struct Mapping<'a> {
    pub kind: MappingKind,
    pub annotation: &'a Annotation,
}

impl<'a> Mapping<'a> {
    /// `@RequestMapping` if present, otherwise the first shorthand found.
    pub fn of(method: &'a MethodModel) -> Option<Self> {
        std::iter::once(MappingKind::Request)
            .chain(MappingKind::SHORTHANDS)
            .find_map(|kind| {
                method
                    .annotation(kind.annotation_name())
                    .map(|annotation| Mapping { kind, annotation })
            })
    }

    /// Member values with `path` and `value` mirrored onto each other.
    pub fn values(&self) -> Result<IndexMap<String, Values>> {
        let mut map = annotation::value_map(self.annotation)?;
        match (map.get(PATH).cloned(), map.get(VALUE).cloned()) {
            (Some(path), None) => {
                map.insert(VALUE.to_string(), path);
            }
            (None, Some(value)) => {
                map.insert(PATH.to_string(), value);
            }
            _ => {}
        }
        Ok(map)
    }

    /// Whether this mapping satisfies every constraint of `filter`.
    pub fn matches(&self, filter: &FilterMap) -> Result<bool> {
        let dropped;
        let filter = if self.kind.is_shorthand() {
            dropped = filter.without(METHOD);
            &dropped
        } else {
            filter
        };

        for (key, required) in filter.iter() {
            ensure_no_nulls(key, required, "filter")?;
        }
        if filter.is_empty() {
            return Ok(true);
        }
        if self.annotation.is_marker() {
            return Ok(false);
        }

        let declared = self.values()?;
        for (key, required) in filter.iter() {
            let Some(present) = declared.get(key) else {
                return Ok(false);
            };
            ensure_no_nulls(key, present, "annotation")?;
            if !required.iter().all(|value| present.contains(value)) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn ensure_no_nulls(key: &str, values: &Values, source: &str) -> Result<()> {
    if values.iter().any(Option::is_none) {
        return Err(Error::InvalidFilter(format!(
            "null value in {} key '{}'; mapping values must be non-null strings",
            source, key
        )));
    }
    Ok(())
}

/// Whether `method` carries a mapping annotation satisfying `filter`.
///
/// Methods without a mapping annotation never match.
pub fn matches(method: &MethodModel, filter: &FilterMap) -> Result<bool> {
    match Mapping::of(method) {
        Some(mapping) => mapping.matches(filter),
        None => Ok(false),
    }
}
