//! Annotation member values rendered as string literals.
//!
//! Annotation members can only hold constants, enum references, class
//! literals, nested annotations or arrays of those. Constants are not
//! evaluated: `Long.MAX_VALUE` renders as the text `Long.MAX_VALUE`.

use indexmap::IndexMap;

use crate::model::{Annotation, AnnotationArgs, Expr};
use crate::{Error, Result};

/// Member name implied by single-member annotations.
pub const VALUE: &str = "value";

/// Member name carrying Jackson's and Spring's `required` flag.
pub const REQUIRED: &str = "required";

pub const JSON_PROPERTY: &str = "com.fasterxml.jackson.annotation.JsonProperty";
pub const JSON_GETTER: &str = "com.fasterxml.jackson.annotation.JsonGetter";
pub const JSON_ANY_GETTER: &str = "com.fasterxml.jackson.annotation.JsonAnyGetter";
pub const JSON_IGNORE: &str = "com.fasterxml.jackson.annotation.JsonIgnore";
pub const JSON_IGNORE_PROPERTIES: &str = "com.fasterxml.jackson.annotation.JsonIgnoreProperties";

pub const REQUEST_MAPPING: &str = "org.springframework.web.bind.annotation.RequestMapping";
pub const GET_MAPPING: &str = "org.springframework.web.bind.annotation.GetMapping";
pub const POST_MAPPING: &str = "org.springframework.web.bind.annotation.PostMapping";
pub const PUT_MAPPING: &str = "org.springframework.web.bind.annotation.PutMapping";
pub const PATCH_MAPPING: &str = "org.springframework.web.bind.annotation.PatchMapping";
pub const DELETE_MAPPING: &str = "org.springframework.web.bind.annotation.DeleteMapping";
pub const REQUEST_PARAM: &str = "org.springframework.web.bind.annotation.RequestParam";

/// Resolved member values; `None` entries stand for `null` literals.
pub type Values = Vec<Option<String>>;

/// Members of an annotation as `(key, expression)` pairs, whatever its shape.
pub fn pairs(annotation: &Annotation) -> Vec<(&str, &Expr)> {
    match &annotation.args {
        AnnotationArgs::Marker => Vec::new(),
        AnnotationArgs::Single(expr) => vec![(VALUE, expr)],
        AnnotationArgs::Normal(pairs) => pairs.iter().map(|(k, v)| (k.as_str(), v)).collect(),
    }
}

/// All members resolved into a key → values map, in declaration order.
pub fn value_map(annotation: &Annotation) -> Result<IndexMap<String, Values>> {
    pairs(annotation)
        .into_iter()
        .map(|(key, expr)| Ok((key.to_string(), collect_values(expr)?)))
        .collect()
}

/// Values of member `key`, or `None` when the annotation doesn't declare it.
pub fn values(annotation: &Annotation, key: &str) -> Result<Option<Values>> {
    match pairs(annotation).into_iter().find(|(name, _)| *name == key) {
        Some((_, expr)) => collect_values(expr).map(Some),
        None => Ok(None),
    }
}

/// Values of member `key` joined with `delimiter` (`,` when `None`).
///
/// Null entries render as `null`.
pub fn value(annotation: &Annotation, key: &str, delimiter: Option<&str>) -> Result<Option<String>> {
    Ok(values(annotation, key)?.map(|values| {
        values
            .iter()
            .map(|v| v.as_deref().unwrap_or("null"))
            .collect::<Vec<_>>()
            .join(delimiter.unwrap_or(","))
    }))
}

/// Whether member `required` is explicitly `false`.
pub fn is_not_required(annotation: &Annotation) -> Result<bool> {
    Ok(value(annotation, REQUIRED, None)?.as_deref() == Some("false"))
}

/// Flatten an array expression (or wrap a scalar) into rendered values.
pub fn collect_values(expr: &Expr) -> Result<Values> {
    match expr {
        Expr::Array(items) => items.iter().map(literal).collect(),
        other => Ok(vec![literal(other)?]),
    }
}

/// Render one expression as a string literal; `None` for `null`.
pub fn literal(expr: &Expr) -> Result<Option<String>> {
    let text = match expr {
        Expr::Null => return Ok(None),
        Expr::String(s) | Expr::Char(s) | Expr::Number(s) | Expr::Name(s) | Expr::Other(s) => {
            s.clone()
        }
        Expr::Bool(b) => b.to_string(),
        Expr::FieldAccess { scope, name } => match literal(scope)? {
            Some(scope) => format!("{}.{}", scope, name),
            None => name.clone(),
        },
        Expr::Binary { .. } => concatenate(expr)?,
        Expr::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| Ok(literal(item)?.unwrap_or_else(|| "null".to_string())))
                .collect::<Result<Vec<_>>>()?;
            format!("{{{}}}", rendered.join(", "))
        }
        Expr::Annotation(annotation) => format!("@{}", annotation.name),
    };
    Ok(Some(text))
}

/// Constant-fold a `+` chain into one string.
fn concatenate(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Binary { op, left, right } if op == "+" => {
            Ok(format!("{}{}", concatenate(left)?, concatenate(right)?))
        }
        Expr::Binary { op, .. } => Err(Error::UnsupportedLiteral(format!(
            "cannot evaluate binary operator '{}', only '+' is supported",
            op
        ))),
        other => Ok(literal(other)?.unwrap_or_else(|| "null".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_has_no_values() {
        let ann = Annotation::marker("JsonProperty");
        assert_eq!(values(&ann, VALUE).unwrap(), None);
        assert_eq!(value(&ann, REQUIRED, None).unwrap(), None);
        assert!(value_map(&ann).unwrap().is_empty());
    }

    #[test]
    fn test_single_member_exposes_value_only() {
        let ann = Annotation::single("JsonProperty", Expr::string("differentName"));
        assert_eq!(
            value(&ann, VALUE, None).unwrap().as_deref(),
            Some("differentName")
        );
        assert_eq!(values(&ann, "name").unwrap(), None);
    }

    #[test]
    fn test_normal_pairs_by_literal_key() {
        let ann = Annotation::normal(
            "JsonProperty",
            vec![
                ("value", Expr::string("differentNameWithValue")),
                ("required", Expr::Bool(false)),
            ],
        );
        assert_eq!(
            value(&ann, VALUE, None).unwrap().as_deref(),
            Some("differentNameWithValue")
        );
        assert!(is_not_required(&ann).unwrap());
    }

    #[test]
    fn test_array_values_keep_order_and_join() {
        let ann = Annotation::single(
            "JsonIgnoreProperties",
            Expr::strings(&["id", "differentName", "ignoreMeToo"]),
        );
        let vals = values(&ann, VALUE).unwrap().unwrap();
        assert_eq!(
            vals,
            vec![
                Some("id".to_string()),
                Some("differentName".to_string()),
                Some("ignoreMeToo".to_string())
            ]
        );
        assert_eq!(
            value(&ann, VALUE, Some("|")).unwrap().as_deref(),
            Some("id|differentName|ignoreMeToo")
        );
    }

    #[test]
    fn test_field_access_renders_dotted() {
        let expr = Expr::field_access("RequestMethod.GET");
        assert_eq!(literal(&expr).unwrap().as_deref(), Some("RequestMethod.GET"));
    }

    #[test]
    fn test_concatenation() {
        let expr = Expr::Binary {
            op: "+".to_string(),
            left: Box::new(Expr::Binary {
                op: "+".to_string(),
                left: Box::new(Expr::string("/path")),
                right: Box::new(Expr::field_access("java.lang.Long.MAX_VALUE")),
            }),
            right: Box::new(Expr::Char("/".to_string())),
        };
        assert_eq!(
            literal(&expr).unwrap().as_deref(),
            Some("/pathjava.lang.Long.MAX_VALUE/")
        );
    }

    #[test]
    fn test_non_plus_binary_is_unsupported() {
        let expr = Expr::Binary {
            op: "*".to_string(),
            left: Box::new(Expr::Number("2".to_string())),
            right: Box::new(Expr::Number("3".to_string())),
        };
        assert!(matches!(literal(&expr), Err(Error::UnsupportedLiteral(_))));
    }

    #[test]
    fn test_null_literal_is_none() {
        let ann = Annotation::single("RequestMapping", Expr::Array(vec![Expr::Null]));
        assert_eq!(values(&ann, VALUE).unwrap(), Some(vec![None]));
        assert_eq!(value(&ann, VALUE, None).unwrap().as_deref(), Some("null"));
    }

    #[test]
    fn test_fallback_keeps_source_text() {
        let expr = Expr::Other("String.class".to_string());
        assert_eq!(literal(&expr).unwrap().as_deref(), Some("String.class"));
    }
}
