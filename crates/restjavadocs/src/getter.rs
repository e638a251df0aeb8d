//! Accessor lookup by JavaBeans naming convention.

use crate::model::{ClassModel, MethodModel, VariableModel};

/// Getter name for a variable: `getName`, or `isName` for a `boolean` primitive.
pub fn getter_name(variable: &VariableModel) -> String {
    let prefix = if variable.ty.is_boolean_primitive() {
        "is"
    } else {
        "get"
    };
    format!("{}{}", prefix, capitalize(&variable.name))
}

/// Find the zero-argument getter returning exactly the variable's declared type.
pub fn find_getter<'a>(class: &'a ClassModel, variable: &VariableModel) -> Option<&'a MethodModel> {
    let name = getter_name(variable);
    let getter = class
        .methods_named(&name)
        .find(|m| m.parameters.is_empty() && m.return_type.same_declared_type(&variable.ty));
    getter
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
