//! Payload field documentation for beans serialized by Jackson.

use std::path::Path;

use crate::source::load_unit;
use crate::visitor::{FieldDescriptorVisitor, JacksonFieldVisitor};
use crate::{Descriptor, Result};

/// Prefix of bean fields nested in a page's `content` array.
pub const CONTENT_PREFIX: &str = "content[].";

/// Field descriptors of the bean `class_name`.
///
/// `gate` keeps only fields carrying that annotation.
pub fn fields(
    source_root: &Path,
    class_name: &str,
    gate: Option<&str>,
    jackson_aware: bool,
) -> Result<Vec<Descriptor>> {
    let unit = load_unit(source_root, class_name)?;
    if jackson_aware {
        JacksonFieldVisitor::new().visit(&unit, gate)
    } else {
        FieldDescriptorVisitor::new().visit(&unit, gate)
    }
}

/// The top-level fields of a serialized Spring Data page.
pub fn pagination_fields() -> Vec<Descriptor> {
    vec![
        Descriptor::new("content", "Content array consisting of elements requested for this page"),
        Descriptor::new("pageable", "Pagination information that was used to request this page"),
        Descriptor::new("sort", "Sorting information on this page"),
        Descriptor::new("number", "Non-negative number assigned to this page"),
        Descriptor::new("size", "Non-negative number indicating the size of the page"),
        Descriptor::new("numberOfElements", "Number of elements returned with this page"),
        Descriptor::new("totalElements", "Total number of elements available in the collection"),
        Descriptor::new("totalPages", "Total number of pages available in the collection"),
        Descriptor::new("first", "True if this is the first page in the collection"),
        Descriptor::new("last", "True if this is the last page in the collection"),
    ]
}

/// Bean fields nested under `content[].`, followed by the page fields
/// other than `content` itself.
pub fn paginate(bean: Vec<Descriptor>) -> Vec<Descriptor> {
    bean.into_iter()
        .map(|d| Descriptor {
            name: format!("{}{}", CONTENT_PREFIX, d.name),
            ..d
        })
        .chain(pagination_fields().into_iter().skip(1))
        .collect()
}

/// [`fields`] of a bean returned as the content of a page.
pub fn paginated_fields(
    source_root: &Path,
    class_name: &str,
    gate: Option<&str>,
    jackson_aware: bool,
) -> Result<Vec<Descriptor>> {
    Ok(paginate(fields(source_root, class_name, gate, jackson_aware)?))
}
