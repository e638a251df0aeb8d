//! End-to-end descriptor extraction over the Java fixtures in
//! `tests/fixtures/java/`.

use std::path::{Path, PathBuf};

use restjavadocs::filter::{CONSUMES, METHOD, PATH, PRODUCES};
use restjavadocs::{
    payload, request, source, Descriptor, Error, FilterMap, JacksonFieldVisitor,
    RequestMappingFilter, SpringWebParameterVisitor,
};

const CONTROLLER: &str = "com.example.controller.SpringRestController";
const MALFORMED: &str = "com.example.controller.SpringRestControllerMalformedComments";
const JACKSON_POJO: &str = "com.example.beans.JacksonPOJO";
const IGNORE_PROPERTIES: &str = "com.example.beans.JacksonPOJOIgnoreProperties";

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/java")
}

fn names(descriptors: &[Descriptor]) -> Vec<&str> {
    descriptors.iter().map(|d| d.name.as_str()).collect()
}

fn by_name(name: &str) -> Vec<Descriptor> {
    let filter = RequestMappingFilter::new().name(name);
    request::descriptors_matching(&fixtures(), CONTROLLER, &filter).unwrap()
}

// Payload fields

#[test]
fn jackson_pojo_fields() {
    let fields = payload::fields(&fixtures(), JACKSON_POJO, None, true).unwrap();
    assert_eq!(
        names(&fields),
        vec!["id", "differentName", "notAnnotated", "differentNameWithValue"]
    );
    assert_eq!(fields[0].description, "id of the entry");
    assert_eq!(
        fields[1],
        Descriptor::new("differentName", "different name than the field")
    );
    assert!(fields[2].description.contains("not annotated but included"));
    assert!(fields[3]
        .description
        .contains("different name than the field using value expression explicitly."));
    assert!(fields.iter().all(|d| !d.optional));
}

#[test]
fn plain_fields_ignore_jackson() {
    let fields = payload::fields(&fixtures(), JACKSON_POJO, None, false).unwrap();
    assert_eq!(
        names(&fields),
        vec!["id", "uupid", "ignored", "notAnnotated", "diffy", "optionalString"]
    );
}

#[test]
fn gated_fields() {
    let fields = payload::fields(&fixtures(), JACKSON_POJO, Some("JsonProperty"), true).unwrap();
    assert_eq!(names(&fields), vec!["id", "differentName", "differentNameWithValue"]);
}

#[test]
fn ignore_properties_and_getters() {
    let fields = payload::fields(&fixtures(), IGNORE_PROPERTIES, None, true).unwrap();
    assert_eq!(
        names(&fields),
        vec!["nameFromGetter", "notAnnotatedOptional", "optionalOnGetter"]
    );
    assert!(fields[0].description.contains("Getter for annotatedOnGetter"));
    assert!(!fields[0].optional);
    assert!(fields[1].optional);
    assert!(fields[2].optional);
    assert!(fields[2].description.contains("Getter for optionalOnGetter"));
}

#[test]
fn multi_variable_fields() {
    let fields = payload::fields(&fixtures(), "com.example.beans.LessCommonPOJO", None, true).unwrap();
    assert_eq!(names(&fields), vec!["one", "two", "three"]);
}

#[test]
fn paginated_pojo_fields() {
    let fields = payload::paginated_fields(&fixtures(), JACKSON_POJO, None, true).unwrap();
    assert_eq!(fields.len(), 4 + payload::pagination_fields().len() - 1);
    assert_eq!(fields[0].name, "content[].id");
    assert_eq!(fields[4].name, "pageable");
}

#[test]
fn class_without_fields() {
    let fields = payload::fields(&fixtures(), "com.example.util.Strings", None, true).unwrap();
    assert!(fields.is_empty());
    let paged = payload::paginated_fields(&fixtures(), "com.example.util.Strings", None, true).unwrap();
    assert_eq!(paged.len(), payload::pagination_fields().len() - 1);
}

#[test]
fn missing_source_file() {
    let result = payload::fields(&fixtures(), "com.example.beans.Missing", None, true);
    assert!(matches!(result, Err(Error::ClassNotFound(_))));
    let result = payload::fields(&fixtures(), "com.example.Outer$Inner", None, true);
    assert!(matches!(result, Err(Error::InvalidClassName(_))));
}

// Bean-backed request parameters

#[test]
fn bean_parameters() {
    let params = request::parameters(&fixtures(), "com.example.beans.SearchRequest", None, true).unwrap();
    assert_eq!(
        params,
        vec![
            Descriptor::new("q", "free-text query"),
            Descriptor::new("category", "restrict to one category").optional(),
            Descriptor::new("archived", "include archived entries").optional(),
        ]
    );

    let plain = request::parameters(&fixtures(), "com.example.beans.SearchRequest", None, false).unwrap();
    assert_eq!(names(&plain), vec!["query", "category", "archived"]);
    assert!(!plain[0].optional);
    assert!(plain[1].optional);
    assert!(!plain[2].optional);
}

// Controller parameters

#[test]
fn controller_with_single_param() {
    let params = request::descriptors(
        &fixtures(),
        "com.example.controller.VerySimpleRestController",
        &FilterMap::new(),
    )
    .unwrap();
    assert_eq!(params, vec![Descriptor::new("param", "param")]);
}

#[test]
fn controller_with_no_params() {
    let params = request::descriptors(
        &fixtures(),
        "com.example.controller.NoParametersController",
        &FilterMap::new(),
    )
    .unwrap();
    assert!(params.is_empty());
}

#[test]
fn controller_all_params() {
    let params = request::descriptors(&fixtures(), CONTROLLER, &FilterMap::new()).unwrap();
    assert!(!params.is_empty());
}

#[test]
fn class_with_no_mappings() {
    for filter in [None, Some("{}")] {
        let params = request::descriptors_from_json(&fixtures(), "com.example.util.Strings", filter).unwrap();
        assert!(params.is_empty());
    }
}

#[test]
fn no_params_endpoint_by_json() {
    let params = request::descriptors_from_json(
        &fixtures(),
        CONTROLLER,
        Some(r#"{"method": "RequestMethod.GET", "path": "/stringEndpointNoParams"}"#),
    )
    .unwrap();
    assert!(params.is_empty());
}

#[test]
fn non_required_params_by_json() {
    let params = request::descriptors_from_json(
        &fixtures(),
        CONTROLLER,
        Some(r#"{"produces": "text/plain", "path": "/stringEndpointNonRequiredParams"}"#),
    )
    .unwrap();
    assert_eq!(names(&params), vec!["nonRequiredOne", "nonRequiredTwo"]);
    assert!(params.iter().all(|d| d.optional));
}

#[test]
fn non_required_params_by_filter() {
    let filter = RequestMappingFilter::new()
        .produces(&["text/plain"])
        .method(&["RequestMethod.GET"])
        .path(&["/stringEndpointNonRequiredParams"]);
    let params = request::descriptors_matching(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|d| d.optional));
}

#[test]
fn empty_method_list_only_requires_the_key() {
    let filter = FilterMap::new()
        .with(METHOD, &[])
        .with(PATH, &["/stringEndpointNonRequiredParams"])
        .with(PRODUCES, &["text/plain"]);
    let params = request::descriptors(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(params.len(), 2);
}

#[test]
fn null_method_is_invalid() {
    let mut filter = FilterMap::new().with(PATH, &["/stringEndpointNonRequiredParams"]);
    filter.insert_raw(METHOD, vec![None]);
    let result = request::descriptors(&fixtures(), CONTROLLER, &filter);
    assert!(matches!(result, Err(Error::InvalidFilter(_))));
}

#[test]
fn unknown_method_matches_nothing() {
    let filter = FilterMap::new()
        .with(METHOD, &["JOE"])
        .with(PATH, &["/stringEndpointNonRequiredParams"]);
    assert!(request::descriptors(&fixtures(), CONTROLLER, &filter)
        .unwrap()
        .is_empty());
}

#[test]
fn all_mapping_keys() {
    let filter = RequestMappingFilter::new()
        .name("all")
        .path(&["/stringEndpointWithParams"])
        .method(&["RequestMethod.GET"])
        .params(&["match=one"])
        .headers(&["content-type=text/*"])
        .consumes(&["application/*"])
        .produces(&["text/plain"]);
    let params = request::descriptors_matching(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(
        params,
        vec![
            Descriptor::new("requiredOne", "description for requiredOne"),
            Descriptor::new("nonRequiredTwo", "description for nonRequiredTwo").optional(),
            Descriptor::new("nonRequiredThree", "description for nonRequiredThree").optional(),
        ]
    );
}

#[test]
fn concatenated_path_expression() {
    let path = "/stringEndpointWithFieldExpressionParamsjava.lang.Long.MAX_VALUE/RESPONSE/true1.13";
    let filter = RequestMappingFilter::new()
        .path(&[path])
        .method(&["RequestMethod.GET"]);
    let params = request::descriptors_matching(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(
        params,
        vec![Descriptor::new(
            "stringEndpointWithFieldExpressionParam",
            "description for stringEndpointWithFieldExpressionParam"
        )]
    );
}

#[test]
fn strict_json_filters() {
    let result = request::descriptors_from_json(&fixtures(), CONTROLLER, Some("{invalidRequest"));
    assert!(matches!(result, Err(Error::SerializationError(_))));

    let params = request::descriptors_from_json(
        &fixtures(),
        CONTROLLER,
        Some(r#"{"method": ["RequestMethod.GET"], "path": "/stringEndpointNonRequiredParams"}"#),
    )
    .unwrap();
    assert_eq!(params.len(), 2);
}

#[test]
fn required_params_by_path() {
    let filter = RequestMappingFilter::new().path(&["/stringEndpointRequiredParams"]);
    let params = request::descriptors_matching(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(names(&params), vec!["requiredOne", "requiredTwo"]);
    assert!(params.iter().all(|d| !d.optional));
}

#[test]
fn shorthand_mapping_ignores_method() {
    let filter = FilterMap::new()
        .with(PATH, &["/patchMapping"])
        .with(CONSUMES, &["patchyness"])
        .with(METHOD, &["RequestMethod.GET"]);
    let params = request::descriptors(&fixtures(), CONTROLLER, &filter).unwrap();
    assert_eq!(names(&params), vec!["requiredOne", "requiredTwo"]);
}

#[test]
fn method_gate() {
    let unit = source::load_unit(&fixtures(), CONTROLLER).unwrap();
    let filter = RequestMappingFilter::new().consumes(&["patchyness"]).to_filter_map();
    let mut visitor = SpringWebParameterVisitor::new(filter);
    let params = visitor.visit(&unit, Some("InitBinder")).unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(visitor.descriptors().unwrap().len(), 2);
}

#[test]
fn javadoc_edge_cases() {
    assert!(by_name("nocomments").is_empty());
    assert!(by_name("noparamcomments").is_empty());
    assert!(by_name("noparamcommentsdescribed").is_empty());

    let raw_optional = by_name("strangeoptional");
    assert_eq!(
        raw_optional,
        vec![Descriptor::new("optional", "just optional").optional()]
    );
}

#[test]
fn malformed_javadoc_fails() {
    let filter = RequestMappingFilter::new().name("badcomments");
    let result = request::descriptors_matching(&fixtures(), MALFORMED, &filter);
    assert!(matches!(result, Err(Error::MalformedJavadoc(_))));
}

#[test]
fn shorthand_markers_never_match_named_filters() {
    let unit = source::load_unit(&fixtures(), MALFORMED).unwrap();
    let filter = RequestMappingFilter::new().name("other").to_filter_map();
    let params = SpringWebParameterVisitor::new(filter).visit(&unit, None).unwrap();
    assert!(params.is_empty());
}

#[test]
fn visitor_reuse_replaces_cached_results() {
    let unit = source::load_unit(&fixtures(), IGNORE_PROPERTIES).unwrap();
    let mut visitor = JacksonFieldVisitor::new();
    assert!(matches!(visitor.descriptors(), Err(Error::NotVisited)));
    visitor.visit(&unit, None).unwrap();
    assert_eq!(visitor.descriptors().unwrap().len(), 3);
    visitor.visit(&unit, Some("JsonIgnore")).unwrap();
    assert!(visitor.descriptors().unwrap().is_empty());
}

#[test]
fn interface_controller() {
    let filter = RequestMappingFilter::new().path(&["/users"]);
    let params =
        request::descriptors_matching(&fixtures(), "com.example.controller.UserApi", &filter).unwrap();
    assert_eq!(
        params,
        vec![
            Descriptor::new("page", "the page to return"),
            Descriptor::new("query", "optional search text").optional(),
        ]
    );
}

#[test]
fn class_nested_in_interface() {
    let fields = payload::fields(&fixtures(), "com.example.controller.UserApi", None, true).unwrap();
    assert_eq!(
        fields,
        vec![Descriptor::new("id", "the id"), Descriptor::new("name", "display name")]
    );
}
