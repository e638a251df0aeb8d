//! Structural model of parsed Java classes.
//!
//! The model is produced by [`crate::parse`] (or built by hand in tests) and is
//! read-only to the resolution rules. It keeps only what descriptor
//! extraction needs: annotations, declared types, comments and declaration
//! order.

use std::path::PathBuf;

/// Canonical name of the optional wrapper type.
pub const OPTIONAL_TYPE: &str = "java.util.Optional";

const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// A declared type as written in source, plus its resolved qualified name when known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Source text with whitespace removed, e.g. `Optional<String>`
    pub text: String,
    /// Qualified name, e.g. `java.util.Optional<String>`
    pub resolved: Option<String>,
    pub primitive: bool,
    pub array: bool,
}

impl TypeRef {
    pub fn new(text: &str) -> Self {
        let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let array = text.ends_with("[]");
        let primitive = PRIMITIVE_TYPES.contains(&text.trim_end_matches("[]"));
        let resolved = primitive.then(|| text.clone());
        Self {
            text,
            resolved,
            primitive,
            array,
        }
    }

    /// Create a type with an explicit resolved name
    pub fn with_resolved(mut self, resolved: Option<String>) -> Self {
        self.resolved = resolved;
        self
    }

    /// The raw type name without generic arguments or array dimensions.
    pub fn base_name(&self) -> &str {
        let end = self.text.find(['<', '[']).unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// True only for the non-array `boolean` primitive.
    pub fn is_boolean_primitive(&self) -> bool {
        self.primitive && !self.array && self.text == "boolean"
    }

    /// True when the type resolves to `java.util.Optional`, raw or parameterized.
    pub fn is_optional(&self) -> bool {
        let name = self.resolved.as_deref().unwrap_or(&self.text);
        name == OPTIONAL_TYPE
            || name
                .strip_prefix(OPTIONAL_TYPE)
                .is_some_and(|rest| rest.starts_with('<'))
    }

    /// Exact declared-type equality (no widening, no inheritance).
    pub fn same_declared_type(&self, other: &TypeRef) -> bool {
        self.text == other.text
    }
}

/// An expression appearing as an annotation member value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal contents without quotes
    String(String),
    /// Character literal contents without quotes
    Char(String),
    Bool(bool),
    /// Numeric literal as written
    Number(String),
    Null,
    /// A bare or dotted name, e.g. `RESPONSE` or `java.lang.Long`
    Name(String),
    FieldAccess {
        scope: Box<Expr>,
        name: String,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Array(Vec<Expr>),
    Annotation(Box<Annotation>),
    /// Any other expression, kept as source text
    Other(String),
}

impl Expr {
    pub fn string(value: &str) -> Self {
        Expr::String(value.to_string())
    }

    pub fn strings(values: &[&str]) -> Self {
        Expr::Array(values.iter().map(|v| Expr::string(v)).collect())
    }

    /// Build a field access chain from dotted text, e.g. `RequestMethod.GET`
    pub fn field_access(dotted: &str) -> Self {
        match dotted.rsplit_once('.') {
            Some((scope, name)) => Expr::FieldAccess {
                scope: Box::new(Expr::field_access(scope)),
                name: name.to_string(),
            },
            None => Expr::Name(dotted.to_string()),
        }
    }
}

/// The three shapes an annotation usage can take.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArgs {
    /// `@JsonIgnore`
    Marker,
    /// `@JsonProperty("name")`
    Single(Expr),
    /// `@JsonProperty(value = "name", required = false)`
    Normal(Vec<(String, Expr)>),
}

/// One annotation attached to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Name as written, simple (`JsonProperty`) or qualified
    pub name: String,
    pub args: AnnotationArgs,
}

impl Annotation {
    pub fn marker(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: AnnotationArgs::Marker,
        }
    }

    pub fn single(name: &str, value: Expr) -> Self {
        Self {
            name: name.to_string(),
            args: AnnotationArgs::Single(value),
        }
    }

    pub fn normal(name: &str, pairs: Vec<(&str, Expr)>) -> Self {
        Self {
            name: name.to_string(),
            args: AnnotationArgs::Normal(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect(),
            ),
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.args, AnnotationArgs::Marker)
    }

    /// Whether this usage refers to the annotation type `name`.
    ///
    /// Either side may be simple or qualified; a simple name on one side
    /// matches any qualified name with the same last segment.
    pub fn matches(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        let ours_qualified = self.name.contains('.');
        let theirs_qualified = name.contains('.');
        if ours_qualified && theirs_qualified {
            return false;
        }
        self.simple_name() == simple_name(name)
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Declarations that carry annotations.
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    /// First annotation matching `name`
    fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.matches(name))
    }

    fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    Javadoc,
}

/// A comment attached to the declaration that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Full comment text including delimiters
    pub raw: String,
}

impl Comment {
    /// Classify a raw comment by its delimiters
    pub fn new(raw: &str) -> Self {
        let kind = if raw.starts_with("//") {
            CommentKind::Line
        } else if raw.starts_with("/**") && raw != "/**/" {
            CommentKind::Javadoc
        } else {
            CommentKind::Block
        };
        Self {
            kind,
            raw: raw.to_string(),
        }
    }

    /// Comment text without delimiters or leading `*` continuation markers.
    pub fn text(&self) -> String {
        let body = match self.kind {
            CommentKind::Line => return self.raw.trim_start_matches('/').trim().to_string(),
            CommentKind::Javadoc => self.raw.trim_start_matches("/**"),
            CommentKind::Block => self.raw.trim_start_matches("/*"),
        };
        body.trim_end_matches("*/")
            .lines()
            .map(|line| line.trim().trim_start_matches('*').trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One declarator of a field declaration (`a` in `int a, b;`).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableModel {
    pub name: String,
    pub ty: TypeRef,
}

impl VariableModel {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    pub variables: Vec<VariableModel>,
    pub annotations: Vec<Annotation>,
    pub comment: Option<Comment>,
    pub is_static: bool,
    /// Inserted by the parser rather than present in source
    pub synthetic: bool,
}

impl FieldModel {
    /// A field declaring `names`, all of type `ty`
    pub fn new(ty: &str, names: &[&str]) -> Self {
        let ty = TypeRef::new(ty);
        Self {
            variables: names
                .iter()
                .map(|name| VariableModel::new(name, ty.clone()))
                .collect(),
            annotations: Vec::new(),
            comment: None,
            is_static: false,
            synthetic: false,
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_comment(mut self, raw: &str) -> Self {
        self.comment = Some(Comment::new(raw));
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Override the resolved type of every declarator
    pub fn with_resolved_type(mut self, resolved: &str) -> Self {
        for variable in &mut self.variables {
            variable.ty.resolved = Some(resolved.to_string());
        }
        self
    }
}

impl Annotated for FieldModel {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel {
    pub name: String,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
}

impl ParameterModel {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for ParameterModel {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodModel {
    pub name: String,
    pub return_type: TypeRef,
    pub parameters: Vec<ParameterModel>,
    pub annotations: Vec<Annotation>,
    pub comment: Option<Comment>,
}

impl MethodModel {
    pub fn new(name: &str, return_type: &str) -> Self {
        Self {
            name: name.to_string(),
            return_type: TypeRef::new(return_type),
            parameters: Vec::new(),
            annotations: Vec::new(),
            comment: None,
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterModel) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_comment(mut self, raw: &str) -> Self {
        self.comment = Some(Comment::new(raw));
        self
    }
}

impl Annotated for MethodModel {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassModel {
    /// Simple name: "JacksonPOJO"
    pub name: String,
    /// Full path: "com.example.beans.JacksonPOJO"
    pub qualified: String,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<FieldModel>,
    pub methods: Vec<MethodModel>,
}

impl ClassModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            qualified: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodModel) -> Self {
        self.methods.push(method);
        self
    }

    /// Methods declared with the given name, in declaration order
    pub fn methods_named<'a, 'b>(&'a self, name: &'b str) -> impl Iterator<Item = &'a MethodModel> + 'b
    where
        'a: 'b,
    {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

impl Annotated for ClassModel {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// All classes declared in one source file.
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub path: PathBuf,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub classes: Vec<ClassModel>,
}

impl CompilationUnit {
    /// Find a class by simple or qualified name
    pub fn class(&self, name: &str) -> Option<&ClassModel> {
        self.classes
            .iter()
            .find(|c| c.qualified == name || c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_primitives() {
        let ty = TypeRef::new("boolean");
        assert!(ty.primitive);
        assert!(ty.is_boolean_primitive());
        assert_eq!(ty.resolved.as_deref(), Some("boolean"));

        let arr = TypeRef::new("boolean[]");
        assert!(arr.array);
        assert!(!arr.is_boolean_primitive());

        assert!(!TypeRef::new("Boolean").is_boolean_primitive());
    }

    #[test]
    fn test_type_ref_optional_detection() {
        let unresolved = TypeRef::new("Optional<String>");
        assert!(!unresolved.is_optional());

        let resolved = unresolved.with_resolved(Some("java.util.Optional<String>".to_string()));
        assert!(resolved.is_optional());

        assert!(TypeRef::new("java.util.Optional").is_optional());
        assert!(!TypeRef::new("java.util.OptionalInt").is_optional());
    }

    #[test]
    fn test_type_ref_strips_whitespace() {
        let ty = TypeRef::new("Map<String, List<String>>");
        assert_eq!(ty.text, "Map<String,List<String>>");
        assert_eq!(ty.base_name(), "Map");
        assert!(ty.same_declared_type(&TypeRef::new("Map<String,List<String>>")));
    }

    #[test]
    fn test_annotation_matches_simple_and_qualified() {
        let simple = Annotation::marker("JsonProperty");
        assert!(simple.matches("JsonProperty"));
        assert!(simple.matches("com.fasterxml.jackson.annotation.JsonProperty"));
        assert!(!simple.matches("JsonGetter"));

        let qualified = Annotation::marker("com.fasterxml.jackson.annotation.JsonProperty");
        assert!(qualified.matches("JsonProperty"));
        assert!(!qualified.matches("org.example.JsonProperty"));
    }

    #[test]
    fn test_comment_text_javadoc() {
        let comment = Comment::new("/**\n   * different name than the field\n   */");
        assert_eq!(comment.kind, CommentKind::Javadoc);
        assert_eq!(comment.text(), "different name than the field");
    }

    #[test]
    fn test_comment_text_block_and_line() {
        assert_eq!(Comment::new("/* id of the entry */").text(), "id of the entry");
        assert_eq!(Comment::new("/* id of the entry */").kind, CommentKind::Block);
        let line = Comment::new("// not annotated but included");
        assert_eq!(line.kind, CommentKind::Line);
        assert_eq!(line.text(), "not annotated but included");
    }

    #[test]
    fn test_comment_text_multiline() {
        let comment = Comment::new(
            "/**\n * @deprecated Use something else.\n *\n * different name.\n */",
        );
        assert_eq!(comment.text(), "@deprecated Use something else.\ndifferent name.");
    }

    #[test]
    fn test_field_builder() {
        let field = FieldModel::new("String", &["one", "two"])
            .with_annotation(Annotation::marker("JsonIgnore"))
            .with_comment("// two at once");
        assert_eq!(field.variables.len(), 2);
        assert!(field.has_annotation("JsonIgnore"));
        assert_eq!(field.variables[1].name, "two");
    }

    #[test]
    fn test_compilation_unit_class_lookup() {
        let mut class = ClassModel::new("User");
        class.qualified = "com.example.User".to_string();
        let unit = CompilationUnit {
            classes: vec![class],
            ..Default::default()
        };
        assert!(unit.class("User").is_some());
        assert!(unit.class("com.example.User").is_some());
        assert!(unit.class("Missing").is_none());
    }

    #[test]
    fn test_methods_named_outlives_the_name() {
        fn first<'a>(class: &'a ClassModel, field: &str) -> Option<&'a MethodModel> {
            let name = format!("get{}", field);
            let method = class.methods_named(&name).next();
            method
        }

        let class = ClassModel::new("Bean")
            .with_method(MethodModel::new("getId", "long"))
            .with_method(MethodModel::new("setId", "void"))
            .with_method(MethodModel::new("getId", "Long"));
        assert_eq!(first(&class, "Id").unwrap().return_type.text, "long");
        assert_eq!(class.methods_named("getId").count(), 2);
        assert!(first(&class, "Name").is_none());
    }
}
