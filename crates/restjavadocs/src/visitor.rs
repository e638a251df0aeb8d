//! Field and method traversal.
//!
//! A traversal walks every class of a [`CompilationUnit`] in declaration
//! order. Fields go through two predicates (field, then declarator) before
//! being processed; methods go through one. An optional annotation gate
//! restricts the walk to declarations carrying that annotation.
//!
//! Each concrete visitor returns its descriptors from `visit` and also keeps
//! them, so `descriptors()` can be queried afterwards.

use tracing::{debug, trace};

use crate::annotation::{self, REQUEST_PARAM};
use crate::filter::FilterMap;
use crate::model::{Annotated, ClassModel, CompilationUnit, FieldModel, MethodModel, VariableModel};
use crate::{jackson, javadoc, mapping, Descriptor, Error, Result};

/// Two-stage field traversal.
pub trait FieldVisitor {
    /// Called once per class before its fields are walked.
    fn enter_class(&mut self, _class: &ClassModel) -> Result<()> {
        Ok(())
    }

    /// Field-level predicate. The default honors only the annotation gate.
    fn accept_field(&self, _class: &ClassModel, field: &FieldModel, gate: Option<&str>) -> Result<bool> {
        Ok(gate.map_or(true, |name| field.has_annotation(name)))
    }

    /// Declarator-level predicate.
    fn accept_variable(
        &self,
        _class: &ClassModel,
        _field: &FieldModel,
        _variable: &VariableModel,
    ) -> Result<bool> {
        Ok(true)
    }

    /// Produce the descriptor for an accepted declarator, if it has one.
    fn process(
        &self,
        class: &ClassModel,
        field: &FieldModel,
        variable: &VariableModel,
    ) -> Result<Option<Descriptor>>;
}

/// Method traversal.
pub trait MethodVisitor {
    /// Method-level predicate. The default honors only the annotation gate.
    fn accept_method(&self, _class: &ClassModel, method: &MethodModel, gate: Option<&str>) -> Result<bool> {
        Ok(gate.map_or(true, |name| method.has_annotation(name)))
    }

    /// Produce descriptors for an accepted method.
    fn process(&self, class: &ClassModel, method: &MethodModel) -> Result<Vec<Descriptor>>;
}

/// Walk the fields of one class.
pub fn walk_fields<V: FieldVisitor + ?Sized>(
    visitor: &mut V,
    class: &ClassModel,
    gate: Option<&str>,
) -> Result<Vec<Descriptor>> {
    visitor.enter_class(class)?;
    let mut out = Vec::new();
    for field in &class.fields {
        if !visitor.accept_field(class, field, gate)? {
            continue;
        }
        for variable in &field.variables {
            if !visitor.accept_variable(class, field, variable)? {
                trace!("skipping {}.{}", class.name, variable.name);
                continue;
            }
            if let Some(descriptor) = visitor.process(class, field, variable)? {
                out.push(descriptor);
            }
        }
    }
    trace!("visited class {}", class.name);
    Ok(out)
}

/// Walk the methods of one class.
pub fn walk_methods<V: MethodVisitor + ?Sized>(
    visitor: &V,
    class: &ClassModel,
    gate: Option<&str>,
) -> Result<Vec<Descriptor>> {
    let mut out = Vec::new();
    for method in &class.methods {
        if visitor.accept_method(class, method, gate)? {
            trace!("processing method {}.{}", class.name, method.name);
            out.extend(visitor.process(class, method)?);
        }
    }
    trace!("visited class {}", class.name);
    Ok(out)
}

fn cached(descriptors: &Option<Vec<Descriptor>>) -> Result<&[Descriptor]> {
    descriptors.as_deref().ok_or(Error::NotVisited)
}

macro_rules! field_visit {
    () => {
        /// Walk every class of `unit`, returning and caching the descriptors.
        pub fn visit(&mut self, unit: &CompilationUnit, gate: Option<&str>) -> Result<Vec<Descriptor>> {
            self.descriptors = None;
            let mut out = Vec::new();
            for class in &unit.classes {
                out.extend(walk_fields(&mut *self, class, gate)?);
            }
            self.descriptors = Some(out.clone());
            Ok(out)
        }

        /// Walk one class, returning and caching the descriptors.
        pub fn visit_class(&mut self, class: &ClassModel, gate: Option<&str>) -> Result<Vec<Descriptor>> {
            self.descriptors = None;
            let out = walk_fields(&mut *self, class, gate)?;
            self.descriptors = Some(out.clone());
            Ok(out)
        }

        /// Descriptors of the last traversal.
        pub fn descriptors(&self) -> Result<&[Descriptor]> {
            cached(&self.descriptors)
        }
    };
}

/// Plain fields: identifier as name, field comment as description, required.
#[derive(Debug, Default)]
pub struct FieldDescriptorVisitor {
    descriptors: Option<Vec<Descriptor>>,
}

impl FieldDescriptorVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    field_visit!();
}

impl FieldVisitor for FieldDescriptorVisitor {
    fn process(
        &self,
        _class: &ClassModel,
        field: &FieldModel,
        variable: &VariableModel,
    ) -> Result<Option<Descriptor>> {
        Ok(field
            .comment
            .as_ref()
            .map(|comment| Descriptor::new(variable.name.clone(), comment.text())))
    }
}

/// Plain fields as request parameters: optional only for `Optional` types.
#[derive(Debug, Default)]
pub struct ParameterDescriptorVisitor {
    descriptors: Option<Vec<Descriptor>>,
}

impl ParameterDescriptorVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    field_visit!();
}

impl FieldVisitor for ParameterDescriptorVisitor {
    fn process(
        &self,
        _class: &ClassModel,
        field: &FieldModel,
        variable: &VariableModel,
    ) -> Result<Option<Descriptor>> {
        Ok(field.comment.as_ref().map(|comment| {
            Descriptor::new(variable.name.clone(), comment.text()).with_optional(variable.ty.is_optional())
        }))
    }
}

/// Jackson-aware fields, serving both payload fields and bean-backed
/// request parameters.
#[derive(Debug, Default)]
pub struct JacksonFieldVisitor {
    /// `@JsonIgnoreProperties` of the class being walked
    ignored: Vec<String>,
    descriptors: Option<Vec<Descriptor>>,
}

impl JacksonFieldVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    field_visit!();
}

impl FieldVisitor for JacksonFieldVisitor {
    fn enter_class(&mut self, class: &ClassModel) -> Result<()> {
        self.ignored = jackson::ignored_properties(class)?;
        Ok(())
    }

    fn accept_field(&self, _class: &ClassModel, field: &FieldModel, gate: Option<&str>) -> Result<bool> {
        Ok(gate.map_or(true, |name| field.has_annotation(name)) && jackson::is_field_accepted(field))
    }

    fn accept_variable(
        &self,
        class: &ClassModel,
        field: &FieldModel,
        variable: &VariableModel,
    ) -> Result<bool> {
        jackson::is_variable_accepted(class, field, variable, &self.ignored)
    }

    fn process(
        &self,
        class: &ClassModel,
        field: &FieldModel,
        variable: &VariableModel,
    ) -> Result<Option<Descriptor>> {
        jackson::resolve(class, field, variable)
    }
}

/// Spring MVC handler methods: one descriptor per documented `@RequestParam`.
#[derive(Debug, Default)]
pub struct SpringWebParameterVisitor {
    filter: FilterMap,
    descriptors: Option<Vec<Descriptor>>,
}

impl SpringWebParameterVisitor {
    pub fn new(filter: FilterMap) -> Self {
        Self {
            filter,
            descriptors: None,
        }
    }

    pub fn filter(&self) -> &FilterMap {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMap) {
        self.filter = filter;
    }

    /// Walk every class of `unit`, returning and caching the descriptors.
    pub fn visit(&mut self, unit: &CompilationUnit, gate: Option<&str>) -> Result<Vec<Descriptor>> {
        self.descriptors = None;
        let mut out = Vec::new();
        for class in &unit.classes {
            out.extend(walk_methods(&*self, class, gate)?);
        }
        self.descriptors = Some(out.clone());
        Ok(out)
    }

    /// Walk one class, returning and caching the descriptors.
    pub fn visit_class(&mut self, class: &ClassModel, gate: Option<&str>) -> Result<Vec<Descriptor>> {
        self.descriptors = None;
        let out = walk_methods(&*self, class, gate)?;
        self.descriptors = Some(out.clone());
        Ok(out)
    }

    /// Descriptors of the last traversal.
    pub fn descriptors(&self) -> Result<&[Descriptor]> {
        cached(&self.descriptors)
    }
}

impl MethodVisitor for SpringWebParameterVisitor {
    fn accept_method(&self, _class: &ClassModel, method: &MethodModel, gate: Option<&str>) -> Result<bool> {
        if !mapping::matches(method, &self.filter)? {
            return Ok(false);
        }
        Ok(gate.map_or(true, |name| method.has_annotation(name)))
    }

    fn process(&self, _class: &ClassModel, method: &MethodModel) -> Result<Vec<Descriptor>> {
        let mut out = Vec::new();
        for parameter in &method.parameters {
            let Some(request_param) = parameter.annotation(REQUEST_PARAM) else {
                continue;
            };
            let optional =
                parameter.ty.is_optional() || annotation::is_not_required(request_param)?;
            let description = match &method.comment {
                Some(comment) => javadoc::describe(&comment.raw, &parameter.name)?,
                None => None,
            };
            match description {
                Some(description) => out.push(
                    Descriptor::new(parameter.name.clone(), description).with_optional(optional),
                ),
                None => debug!(
                    "could not find a description for parameter {} of {}",
                    parameter.name, method.name
                ),
            }
        }
        Ok(out)
    }
}
