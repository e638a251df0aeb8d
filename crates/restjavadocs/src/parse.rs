//! Java front end: tree-sitter syntax tree to [`CompilationUnit`].
//!
//! Only the declarations descriptor extraction looks at are modeled: classes
//! (nested ones included), their fields and methods, annotations with their
//! member expressions, declared types and the comment right before each
//! declaration.
//!
//! ```
//! use restjavadocs::parse_java;
//! use std::path::Path;
//!
//! let source = r#"
//! package com.example;
//!
//! public class User {
//!     /** login name */
//!     @JsonProperty("login")
//!     private String name;
//! }
//! "#;
//!
//! let unit = parse_java(Path::new("User.java"), source).unwrap();
//! let user = unit.class("com.example.User").unwrap();
//! assert_eq!(user.fields[0].variables[0].name, "name");
//! ```

use std::cell::RefCell;
use std::path::Path;

use tracing::warn;
use tree_sitter::Node;

use crate::model::{
    Annotation, AnnotationArgs, ClassModel, Comment, CompilationUnit, Expr, FieldModel,
    MethodModel, ParameterModel, TypeRef, VariableModel,
};
use crate::{Error, Result};

// Thread-local parser reuse - avoids creating a new parser per file
thread_local! {
    static JAVA_PARSER: RefCell<tree_sitter::Parser> = RefCell::new({
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .expect("tree-sitter-java grammar incompatible with tree-sitter version");
        parser
    });
}

/// `java.lang` types, visible without an import.
const JAVA_LANG_TYPES: &[&str] = &[
    "Object", "String", "Boolean", "Byte", "Character", "Short", "Integer", "Long", "Float",
    "Double", "Number", "Void", "Iterable", "CharSequence", "Enum", "Class",
];

/// `java.util` types resolved through a `java.util.*` import.
const JAVA_UTIL_TYPES: &[&str] = &[
    "Optional", "List", "Map", "Set", "Collection", "ArrayList", "HashMap", "HashSet", "Date",
    "UUID",
];

/// Parse one Java source file into its structural model.
///
/// Syntax errors are logged and the recoverable parts of the tree are
/// still modeled.
pub fn parse_java(file: &Path, source: &str) -> Result<CompilationUnit> {
    JAVA_PARSER.with(|parser| {
        let mut parser = parser.borrow_mut();
        let tree = parser.parse(source, None).ok_or_else(|| Error::ParseError {
            path: file.to_path_buf(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            warn!("Syntax errors in {:?}; modeling what could be recovered", file);
        }

        let src = source.as_bytes();
        let mut unit = CompilationUnit {
            path: file.to_path_buf(),
            ..Default::default()
        };

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => unit.package = package_name(&child, src),
                "import_declaration" => {
                    if let Some(import) = import_path(&child, src) {
                        unit.imports.push(import);
                    }
                }
                _ => {}
            }
        }

        let scope = Scope {
            package: unit.package.clone(),
            imports: unit.imports.clone(),
        };
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            collect_types(&child, src, &scope, None, &mut unit.classes);
        }
        Ok(unit)
    })
}

/// Names visible to type resolution in one file.
struct Scope {
    package: Option<String>,
    imports: Vec<String>,
}

impl Scope {
    /// Qualified name of a declared type, when it can be told from the file alone.
    fn resolve(&self, ty: &TypeRef) -> Option<String> {
        if ty.primitive {
            return Some(ty.text.clone());
        }
        let base = ty.base_name();
        let rest = &ty.text[base.len()..];
        if base.contains('.') {
            return Some(ty.text.clone());
        }
        let suffix = format!(".{}", base);
        if let Some(import) = self.imports.iter().find(|i| i.ends_with(&suffix)) {
            return Some(format!("{}{}", import, rest));
        }
        if JAVA_LANG_TYPES.contains(&base) {
            return Some(format!("java.lang.{}{}", base, rest));
        }
        let util_wildcard = self.imports.iter().any(|i| i == "java.util.*");
        if util_wildcard && JAVA_UTIL_TYPES.contains(&base) {
            return Some(format!("java.util.{}{}", base, rest));
        }
        None
    }

    fn type_ref(&self, text: &str) -> TypeRef {
        let ty = TypeRef::new(text);
        let resolved = self.resolve(&ty);
        ty.with_resolved(resolved)
    }
}

fn text<'a>(node: &Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

/// Find a child node by its kind.
pub fn find_child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            if cursor.node().kind() == kind {
                return Some(cursor.node());
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    None
}

fn package_name(node: &Node, source: &[u8]) -> Option<String> {
    find_child_by_kind(node, "scoped_identifier")
        .or_else(|| find_child_by_kind(node, "identifier"))
        .map(|name| strip_whitespace(text(&name, source)))
}

/// `import static a.b.C;` → `a.b.C`, `import java.util.*;` → `java.util.*`
fn import_path(node: &Node, source: &[u8]) -> Option<String> {
    let body = text(node, source)
        .trim()
        .strip_prefix("import")?
        .trim()
        .trim_end_matches(';')
        .trim();
    let body = body.strip_prefix("static ").unwrap_or(body);
    let path = strip_whitespace(body);
    (!path.is_empty()).then_some(path)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Model `node` if it declares a type. Classes and interfaces become
/// [`ClassModel`]s; enums and records only contribute their nested types.
fn collect_types(
    node: &Node,
    source: &[u8],
    scope: &Scope,
    outer: Option<&str>,
    out: &mut Vec<ClassModel>,
) {
    match node.kind() {
        "class_declaration" | "interface_declaration" => {
            collect_class(node, source, scope, outer, out)
        }
        "enum_declaration" | "record_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let nested = nested_name(outer, text(&name_node, source));
            if let Some(body) = node.child_by_field_name("body") {
                for member in members(&body) {
                    collect_types(&member, source, scope, Some(&nested), out);
                }
            }
        }
        _ => {}
    }
}

fn nested_name(outer: Option<&str>, name: &str) -> String {
    match outer {
        Some(outer) => format!("{}.{}", outer, name),
        None => name.to_string(),
    }
}

/// Named members of a type body; enum bodies keep theirs after the constants.
fn members<'t>(body: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = body.walk();
    let mut out = Vec::new();
    for child in body.named_children(&mut cursor) {
        if child.kind() == "enum_body_declarations" {
            let mut inner = child.walk();
            out.extend(child.named_children(&mut inner));
        } else {
            out.push(child);
        }
    }
    out
}

fn collect_class(
    node: &Node,
    source: &[u8],
    scope: &Scope,
    outer: Option<&str>,
    out: &mut Vec<ClassModel>,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = text(&name_node, source).to_string();
    let nested = nested_name(outer, &name);
    let qualified = match &scope.package {
        Some(package) => format!("{}.{}", package, nested),
        None => nested.clone(),
    };

    let mut class = ClassModel {
        name,
        qualified,
        annotations: annotations(node, source),
        ..Default::default()
    };

    let mut inner = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        for child in members(&body) {
            match child.kind() {
                "field_declaration" => class.fields.push(field(&child, source, scope)),
                // Interface fields are implicitly static
                "constant_declaration" => class.fields.push(FieldModel {
                    is_static: true,
                    ..field(&child, source, scope)
                }),
                "method_declaration" => {
                    if let Some(method) = method(&child, source, scope) {
                        class.methods.push(method);
                    }
                }
                _ => collect_types(&child, source, scope, Some(&nested), &mut inner),
            }
        }
    }

    out.push(class);
    out.extend(inner);
}

fn field(node: &Node, source: &[u8], scope: &Scope) -> FieldModel {
    let declared = node
        .child_by_field_name("type")
        .map(|ty| text(&ty, source))
        .unwrap_or_default();

    let mut variables = Vec::new();
    let mut any_missing = node.is_missing();
    let mut cursor = node.walk();
    for declarator in node.children_by_field_name("declarator", &mut cursor) {
        let Some(name) = declarator.child_by_field_name("name") else {
            continue;
        };
        any_missing |= name.is_missing();
        // `int a[]` declares an array just like `int[] a`
        let dims = declarator
            .child_by_field_name("dimensions")
            .map(|d| text(&d, source))
            .unwrap_or_default();
        let ty = scope.type_ref(&format!("{}{}", declared, dims));
        variables.push(VariableModel::new(text(&name, source), ty));
    }

    FieldModel {
        synthetic: any_missing || variables.is_empty(),
        variables,
        annotations: annotations(node, source),
        comment: leading_comment(node, source),
        is_static: has_modifier(node, source, "static"),
    }
}

fn method(node: &Node, source: &[u8], scope: &Scope) -> Option<MethodModel> {
    let name = text(&node.child_by_field_name("name")?, source).to_string();
    let return_type = node
        .child_by_field_name("type")
        .map(|ty| scope.type_ref(text(&ty, source)))
        .unwrap_or_else(|| TypeRef::new("void"));

    let mut parameters = Vec::new();
    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "formal_parameter" {
                continue;
            }
            let (Some(param_name), Some(ty)) = (
                param.child_by_field_name("name"),
                param.child_by_field_name("type"),
            ) else {
                continue;
            };
            let dims = param
                .child_by_field_name("dimensions")
                .map(|d| text(&d, source))
                .unwrap_or_default();
            parameters.push(ParameterModel {
                name: text(&param_name, source).to_string(),
                ty: scope.type_ref(&format!("{}{}", text(&ty, source), dims)),
                annotations: annotations(&param, source),
            });
        }
    }

    Some(MethodModel {
        name,
        return_type,
        parameters,
        annotations: annotations(node, source),
        comment: leading_comment(node, source),
    })
}

fn has_modifier(node: &Node, source: &[u8], modifier: &str) -> bool {
    let Some(modifiers) = find_child_by_kind(node, "modifiers") else {
        return false;
    };
    let mut cursor = modifiers.walk();
    let found = modifiers
        .children(&mut cursor)
        .any(|child| text(&child, source) == modifier);
    found
}

/// The comment right before a declaration, unless it trails the previous one on the same line.
fn leading_comment(node: &Node, source: &[u8]) -> Option<Comment> {
    let prev = node.prev_sibling()?;
    if !matches!(prev.kind(), "line_comment" | "block_comment") {
        return None;
    }
    if let Some(before) = prev.prev_sibling() {
        let trailing = before.is_named()
            && !matches!(before.kind(), "line_comment" | "block_comment")
            && before.end_position().row == prev.start_position().row;
        if trailing {
            return None;
        }
    }
    Some(Comment::new(text(&prev, source)))
}

fn annotations(node: &Node, source: &[u8]) -> Vec<Annotation> {
    let Some(modifiers) = find_child_by_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let found = modifiers
        .named_children(&mut cursor)
        .filter_map(|child| annotation(&child, source))
        .collect();
    found
}

fn annotation(node: &Node, source: &[u8]) -> Option<Annotation> {
    let name = match node.kind() {
        "marker_annotation" | "annotation" => {
            strip_whitespace(text(&node.child_by_field_name("name")?, source))
        }
        _ => return None,
    };
    let Some(arguments) = node.child_by_field_name("arguments") else {
        return Some(Annotation {
            name,
            args: AnnotationArgs::Marker,
        });
    };

    let mut cursor = arguments.walk();
    let members: Vec<Node> = arguments
        .named_children(&mut cursor)
        .filter(|n| !is_comment(n))
        .collect();

    let args = if members.is_empty() {
        AnnotationArgs::Marker
    } else if members.iter().all(|m| m.kind() == "element_value_pair") {
        AnnotationArgs::Normal(
            members
                .iter()
                .filter_map(|pair| {
                    let key = text(&pair.child_by_field_name("key")?, source).to_string();
                    let value = pair.child_by_field_name("value")?;
                    Some((key, expr(&value, source)))
                })
                .collect(),
        )
    } else {
        AnnotationArgs::Single(expr(&members[0], source))
    };
    Some(Annotation { name, args })
}

fn is_comment(node: &Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

fn expr(node: &Node, source: &[u8]) -> Expr {
    let raw = text(node, source);
    match node.kind() {
        "string_literal" => Expr::String(unescape(strip_quotes(raw, '"'))),
        "character_literal" => Expr::Char(unescape(strip_quotes(raw, '\''))),
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        "null_literal" => Expr::Null,
        "decimal_integer_literal"
        | "hex_integer_literal"
        | "octal_integer_literal"
        | "binary_integer_literal"
        | "decimal_floating_point_literal"
        | "hex_floating_point_literal" => Expr::Number(raw.to_string()),
        "identifier" => Expr::Name(raw.to_string()),
        "scoped_identifier" => Expr::field_access(&strip_whitespace(raw)),
        "field_access" => match (
            node.child_by_field_name("object"),
            node.child_by_field_name("field"),
        ) {
            (Some(object), Some(field)) => Expr::FieldAccess {
                scope: Box::new(expr(&object, source)),
                name: text(&field, source).to_string(),
            },
            _ => Expr::Other(raw.to_string()),
        },
        "binary_expression" => match (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) {
            (Some(left), Some(op), Some(right)) => Expr::Binary {
                op: text(&op, source).to_string(),
                left: Box::new(expr(&left, source)),
                right: Box::new(expr(&right, source)),
            },
            _ => Expr::Other(raw.to_string()),
        },
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|n| !is_comment(n));
            match inner {
                Some(inner) => expr(&inner, source),
                None => Expr::Other(raw.to_string()),
            }
        }
        "element_value_array_initializer" | "array_initializer" => {
            let mut cursor = node.walk();
            let items = node
                .named_children(&mut cursor)
                .filter(|n| !is_comment(n))
                .map(|n| expr(&n, source))
                .collect();
            Expr::Array(items)
        }
        "annotation" | "marker_annotation" => match annotation(node, source) {
            Some(annotation) => Expr::Annotation(Box::new(annotation)),
            None => Expr::Other(raw.to_string()),
        },
        _ => Expr::Other(raw.to_string()),
    }
}

fn strip_quotes(raw: &str, quote: char) -> &str {
    raw.strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote))
        .unwrap_or(raw)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
