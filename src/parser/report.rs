//! Structural reader for metrix++ nested-region XML reports.
//!
//! A report produced by `metrix++ view --format=xml --nest-regions` looks like:
//!
//! ```text
//! <view>
//!   <data>
//!     <file-data>
//!       <regions>
//!         <region>
//!           <info type="global" name="__global__" line_begin="1" line_end="40"/>
//!           <data>
//!             <std.code.lines code="3" comments="1" preprocessor="0"/>
//!           </data>
//!           <subregions>
//!             <subregion> ... same shape, recursively ... </subregion>
//!           </subregions>
//!         </region>
//! ```
//!
//! Functions additionally carry `<std.code.complexity cyclomatic="N"/>`.

use super::sanitizer::sanitize;
use crate::utils::error::ReportError;
use log::{debug, warn};
use roxmltree::{Document, Node};

const TOP_REGION_PATH: &[&str] = &["data", "file-data", "regions", "region"];

/// Declared 1-based inclusive line range of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub begin: u32,
    pub end: u32,
}

impl LineSpan {
    /// Number of lines covered (`end - begin + 1`)
    pub fn total_lines(&self) -> u64 {
        (u64::from(self.end) + 1).saturating_sub(u64::from(self.begin))
    }
}

/// Counts from the `<std.code.lines>` element of one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeafMetrics {
    pub code: u64,
    pub comments: u64,
    pub preprocessor: u64,
}

/// One `<region>` or `<subregion>` element of a report
#[derive(Debug, Clone, Copy)]
pub struct ReportElement<'a, 'input> {
    node: Node<'a, 'input>,
}

/// Value read from a report plus whether the sanitized retry was needed
#[derive(Debug)]
pub struct ReadOutcome<T> {
    pub value: T,
    pub sanitized: bool,
}

/// Parse a raw report and hand its top-level region to `f`
///
/// **Public** - main entry point for structural reading
///
/// The raw text is parsed as-is first. If that fails, the text is sanitized
/// and parsed exactly once more; a second failure is returned as
/// `ReportError::Malformed`.
///
/// # Errors
/// * `ReportError::Malformed` - not well-formed even after sanitizing
/// * `ReportError::MissingElement` - no top-level region
/// * anything `f` returns
pub fn read_top_region<T, F>(raw: &str, f: F) -> Result<ReadOutcome<T>, ReportError>
where
    F: FnOnce(ReportElement<'_, '_>) -> Result<T, ReportError>,
{
    let sanitized_text;
    let (document, sanitized) = match Document::parse(raw) {
        Ok(document) => (document, false),
        Err(first_error) => {
            debug!("Report is not well-formed ({}), retrying sanitized", first_error);
            sanitized_text = sanitize(raw);
            let document = Document::parse(&sanitized_text).map_err(|e| {
                warn!("Report still malformed after sanitizing: {}", e);
                ReportError::Malformed(e)
            })?;
            (document, true)
        }
    };

    let top = find_top_region(&document)?;
    let value = f(top)?;
    Ok(ReadOutcome { value, sanitized })
}

/// Locate the whole-file region element
fn find_top_region<'a, 'input>(
    document: &'a Document<'input>,
) -> Result<ReportElement<'a, 'input>, ReportError> {
    let mut node = document.root_element();
    for (depth, &name) in TOP_REGION_PATH.iter().enumerate() {
        node = child_element(node, name).ok_or_else(|| ReportError::MissingElement {
            element: name,
            context: format!("/{}", TOP_REGION_PATH[..depth].join("/")),
        })?;
    }
    Ok(ReportElement { node })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
}

impl<'a, 'input> ReportElement<'a, 'input> {
    fn info(&self) -> Result<Node<'a, 'input>, ReportError> {
        child_element(self.node, "info").ok_or_else(|| ReportError::MissingElement {
            element: "info",
            context: self.describe(),
        })
    }

    fn data_child(&self, name: &str) -> Option<Node<'a, 'input>> {
        child_element(self.node, "data").and_then(|data| child_element(data, name))
    }

    /// Position in the report, used in error messages
    fn describe(&self) -> String {
        format!("<{}> at byte {}", self.node.tag_name().name(), self.node.range().start)
    }

    /// Declared region type string, e.g. `"class"`
    pub fn declared_type(&self) -> Result<&'a str, ReportError> {
        required_attribute(self.info()?, "type")
    }

    /// Declared short name
    pub fn name(&self) -> Result<&'a str, ReportError> {
        required_attribute(self.info()?, "name")
    }

    pub fn line_span(&self) -> Result<LineSpan, ReportError> {
        let info = self.info()?;
        let begin = parse_number(info, "line_begin", required_attribute(info, "line_begin")?)?;
        let end = parse_number(info, "line_end", required_attribute(info, "line_end")?)?;
        Ok(LineSpan { begin, end })
    }

    /// Own line counts; the `<std.code.lines>` element is mandatory
    pub fn leaf_metrics(&self) -> Result<LeafMetrics, ReportError> {
        let lines = self
            .data_child("std.code.lines")
            .ok_or_else(|| ReportError::MissingElement {
                element: "std.code.lines",
                context: self.describe(),
            })?;

        Ok(LeafMetrics {
            code: optional_count(lines, "code")?.unwrap_or(0),
            comments: optional_count(lines, "comments")?.unwrap_or(0),
            preprocessor: optional_count(lines, "preprocessor")?.unwrap_or(0),
        })
    }

    /// Raw cyclomatic complexity as reported by the tool, if present
    pub fn complexity(&self) -> Result<Option<u64>, ReportError> {
        match self.data_child("std.code.complexity") {
            Some(complexity) => optional_count(complexity, "cyclomatic"),
            None => Ok(None),
        }
    }

    /// Direct child regions declared under `<subregions>`
    pub fn subregions(&self) -> impl Iterator<Item = ReportElement<'a, 'input>> {
        child_element(self.node, "subregions")
            .into_iter()
            .flat_map(|subregions| subregions.children())
            .filter(|child| child.is_element() && child.tag_name().name() == "subregion")
            .map(|node| ReportElement { node })
    }
}

fn required_attribute<'a>(node: Node<'a, '_>, attribute: &'static str) -> Result<&'a str, ReportError> {
    node.attribute(attribute)
        .ok_or_else(|| ReportError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute,
        })
}

fn optional_count(node: Node<'_, '_>, attribute: &'static str) -> Result<Option<u64>, ReportError> {
    node.attribute(attribute)
        .map(|value| parse_number(node, attribute, value))
        .transpose()
}

fn parse_number<T: std::str::FromStr>(
    node: Node<'_, '_>,
    attribute: &'static str,
    value: &str,
) -> Result<T, ReportError> {
    value.trim().parse().map_err(|_| ReportError::InvalidNumber {
        element: node.tag_name().name().to_string(),
        attribute,
        value: value.to_string(),
    })
}
