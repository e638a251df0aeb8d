//! Jackson-aware naming, optionality and description of bean fields.
//!
//! Jackson lets a property be renamed, required or ignored on the field
//! itself, on its getter, or at the type level. The rules here walk those
//! sources in precedence order:
//!
//! 1. A `@JsonProperty` on the field owns the property; the getter is not consulted.
//! 2. Otherwise a getter that is not `@JsonIgnore`d may rename (`@JsonProperty`,
//!    `@JsonGetter`), relax (`required = false`) or document the property.
//! 3. Otherwise the field's own identifier and comment are used.
//!
//! `@JsonIgnoreProperties` on the class removes properties by their final name.

use crate::annotation::{
    self, JSON_ANY_GETTER, JSON_GETTER, JSON_IGNORE, JSON_IGNORE_PROPERTIES, JSON_PROPERTY, VALUE,
};
use crate::getter::find_getter;
use crate::model::{Annotated, ClassModel, Comment, FieldModel, MethodModel, VariableModel};
use crate::{Descriptor, Result};

/// Field-level acceptance: not static, not synthetic, not `@JsonIgnore`.
pub fn is_field_accepted(field: &FieldModel) -> bool {
    !field.is_static && !field.synthetic && !field.has_annotation(JSON_IGNORE)
}

/// Property names listed in the class's `@JsonIgnoreProperties`.
pub fn ignored_properties(class: &ClassModel) -> Result<Vec<String>> {
    let Some(ignore) = class.annotation(JSON_IGNORE_PROPERTIES) else {
        return Ok(Vec::new());
    };
    Ok(annotation::values(ignore, VALUE)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect())
}

/// Variable-level acceptance.
///
/// Rejects properties ignored at the type level, and every variable of a
/// multi-variable field that carries an explicit `@JsonProperty` name.
pub fn is_variable_accepted(
    class: &ClassModel,
    field: &FieldModel,
    variable: &VariableModel,
    ignored: &[String],
) -> Result<bool> {
    if field.variables.len() > 1 && property_name(field)?.is_some() {
        return Ok(false);
    }
    let name = field_name(class, field, variable)?;
    Ok(!ignored.contains(&name))
}

/// `@JsonProperty` value on a declaration, if any.
pub fn property_name(node: &impl Annotated) -> Result<Option<String>> {
    match node.annotation(JSON_PROPERTY) {
        Some(property) => annotation::value(property, VALUE, None),
        None => Ok(None),
    }
}

/// `@JsonGetter` value on a declaration, if any.
pub fn getter_property_name(node: &impl Annotated) -> Result<Option<String>> {
    match node.annotation(JSON_GETTER) {
        Some(getter) => annotation::value(getter, VALUE, None),
        None => Ok(None),
    }
}

/// The getter that may speak for a field: only when the field has no
/// `@JsonProperty`, and only when the getter is not `@JsonIgnore`d.
fn delegate_getter<'a>(
    class: &'a ClassModel,
    field: &FieldModel,
    variable: &VariableModel,
) -> Option<&'a MethodModel> {
    if field.has_annotation(JSON_PROPERTY) {
        return None;
    }
    find_getter(class, variable).filter(|getter| !getter.has_annotation(JSON_IGNORE))
}

/// Effective property name.
pub fn field_name(class: &ClassModel, field: &FieldModel, variable: &VariableModel) -> Result<String> {
    if field.has_annotation(JSON_PROPERTY) {
        return Ok(property_name(field)?.unwrap_or_else(|| variable.name.clone()));
    }
    if let Some(getter) = delegate_getter(class, field, variable) {
        if let Some(name) = property_name(getter)? {
            return Ok(name);
        }
        if let Some(name) = getter_property_name(getter)? {
            return Ok(name);
        }
    }
    Ok(variable.name.clone())
}

/// Effective optionality.
pub fn is_optional(class: &ClassModel, field: &FieldModel, variable: &VariableModel) -> Result<bool> {
    if variable.ty.is_optional() {
        return Ok(true);
    }
    if let Some(property) = field.annotation(JSON_PROPERTY) {
        return annotation::is_not_required(property);
    }
    match delegate_getter(class, field, variable).and_then(|g| g.annotation(JSON_PROPERTY)) {
        Some(property) => annotation::is_not_required(property),
        None => Ok(false),
    }
}

/// The comment documenting the property: the getter's when the getter
/// carries Jackson metadata, otherwise the field's.
pub fn field_comment<'a>(
    class: &'a ClassModel,
    field: &'a FieldModel,
    variable: &VariableModel,
) -> Option<&'a Comment> {
    let from_getter = delegate_getter(class, field, variable).filter(|getter| {
        getter.has_annotation(JSON_PROPERTY)
            || getter.has_annotation(JSON_GETTER)
            || getter.has_annotation(JSON_ANY_GETTER)
    });
    match from_getter {
        Some(getter) => getter.comment.as_ref(),
        None => field.comment.as_ref(),
    }
}

/// Resolve name, optionality and description for an accepted variable.
///
/// Returns `None` when no comment documents the property.
pub fn resolve(
    class: &ClassModel,
    field: &FieldModel,
    variable: &VariableModel,
) -> Result<Option<Descriptor>> {
    let Some(comment) = field_comment(class, field, variable) else {
        return Ok(None);
    };
    let name = field_name(class, field, variable)?;
    let optional = is_optional(class, field, variable)?;
    Ok(Some(Descriptor::new(name, comment.text()).with_optional(optional)))
}
