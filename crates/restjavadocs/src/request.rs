//! Request-parameter documentation for controllers and parameter beans.

use std::path::Path;

use crate::filter::{FilterMap, RequestMappingFilter};
use crate::source::load_unit;
use crate::visitor::{JacksonFieldVisitor, ParameterDescriptorVisitor, SpringWebParameterVisitor};
use crate::{Descriptor, Result};

/// `@RequestParam` descriptors of the controller `class_name`, restricted to
/// handler methods whose mapping satisfies `filter`.
pub fn descriptors(source_root: &Path, class_name: &str, filter: &FilterMap) -> Result<Vec<Descriptor>> {
    let unit = load_unit(source_root, class_name)?;
    SpringWebParameterVisitor::new(filter.clone()).visit(&unit, None)
}

/// Like [`descriptors`], with the filter given as a typed [`RequestMappingFilter`].
pub fn descriptors_matching(
    source_root: &Path,
    class_name: &str,
    filter: &RequestMappingFilter,
) -> Result<Vec<Descriptor>> {
    descriptors(source_root, class_name, &filter.to_filter_map())
}

/// Like [`descriptors`], with the filter given as a flat JSON object.
/// `None` means no filter.
pub fn descriptors_from_json(
    source_root: &Path,
    class_name: &str,
    filter: Option<&str>,
) -> Result<Vec<Descriptor>> {
    let filter = match filter {
        Some(json) => FilterMap::from_json(json)?,
        None => FilterMap::new(),
    };
    descriptors(source_root, class_name, &filter)
}

/// The query parameters of a paged Spring Data request.
pub fn pagination_parameters() -> Vec<Descriptor> {
    vec![
        Descriptor::new(
            "sort",
            "A collection of sort directives in the format ($propertyname,)+[asc|desc]?.",
        )
        .optional(),
        Descriptor::new("page", "The requested page number (0 indexed, defaults to 0)").optional(),
        Descriptor::new("size", "The requested page size").optional(),
    ]
}

/// Request parameters bound to the fields of a bean.
///
/// With `jackson_aware` the Jackson naming rules apply; otherwise every
/// commented field is a parameter named after its identifier.
pub fn parameters(
    source_root: &Path,
    class_name: &str,
    gate: Option<&str>,
    jackson_aware: bool,
) -> Result<Vec<Descriptor>> {
    let unit = load_unit(source_root, class_name)?;
    if jackson_aware {
        JacksonFieldVisitor::new().visit(&unit, gate)
    } else {
        ParameterDescriptorVisitor::new().visit(&unit, gate)
    }
}
