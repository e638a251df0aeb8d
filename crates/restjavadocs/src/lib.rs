//! restjavadocs: field and request-parameter descriptors from annotated Java sources
//!
//! This crate provides the building blocks for documentation pipelines that
//! need descriptor lists without hand-maintained tables:
//! - A structural model of Java classes, built with tree-sitter
//! - Annotation value resolution (marker, single-member and key/value shapes)
//! - Jackson-aware field naming, optionality and description rules
//! - Spring request-mapping filters and Javadoc `@param` lookup
//! - Field and method visitors driving the above

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod annotation;
pub mod config;
pub mod filter;
pub mod getter;
pub mod jackson;
pub mod javadoc;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod payload;
pub mod request;
pub mod source;
pub mod visitor;

// Re-export main types
pub use filter::{FilterMap, RequestMappingFilter};
pub use model::{
    Annotation, AnnotationArgs, ClassModel, Comment, CommentKind, CompilationUnit, Expr,
    FieldModel, MethodModel, ParameterModel, TypeRef, VariableModel,
};
pub use parse::parse_java;
pub use visitor::{
    FieldDescriptorVisitor, FieldVisitor, JacksonFieldVisitor, MethodVisitor,
    ParameterDescriptorVisitor, SpringWebParameterVisitor,
};

/// A documented field or parameter: the unit handed to documentation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    /// Name as it appears on the wire (after any rename)
    pub name: String,
    /// Cleaned comment text
    pub description: String,
    /// Whether the field or parameter may be omitted
    #[serde(default)]
    pub optional: bool,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            optional: false,
        }
    }

    /// Mark the descriptor as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set optionality from a flag
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.optional {
            write!(f, "{} (optional): {}", self.name, self.description)
        } else {
            write!(f, "{}: {}", self.name, self.description)
        }
    }
}

/// Errors that can occur while extracting descriptors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse file: {path}")]
    ParseError { path: PathBuf },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid JSON filter: {0}")]
    InvalidFilterJson(String),

    #[error("Failed to deserialize JSON: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed Javadoc comment: {0}")]
    MalformedJavadoc(String),

    #[error("Unsupported literal expression: {0}")]
    UnsupportedLiteral(String),

    #[error("Descriptors requested before any class was visited")]
    NotVisited,

    #[error("Invalid class name: {0}")]
    InvalidClassName(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
