//! Path collapsing.
//!
//! Physical archive layouts vary wildly (volume prefixes, scan-batch
//! directories, vendor drop folders) but all share a grammar for their
//! leading segments. The collapser maps a physical path onto the
//! deduplicated logical tree: the `project` segment names the category,
//! `ignore` segments vanish from the public path, and the `date` segment
//! plus everything after the grammar prefix becomes the collapsed path.

use chrono::NaiveDate;

use lantern_core::error::AppError;
use lantern_core::result::AppResult;

/// Role of a leading physical path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// The segment names the category.
    Project,
    /// The segment is a `YYYY-MM-DD` date and starts the public path.
    Date,
    /// The segment is dropped from the public path (but remains part of
    /// the physical path that ties a real folder to its logical folder).
    Ignore,
}

/// Ordered role assignment for the leading segments of a physical path.
#[derive(Debug, Clone)]
pub struct PathGrammar {
    roles: Vec<SegmentRole>,
}

impl PathGrammar {
    /// Parse a grammar string such as `"ignore/project/date"`.
    ///
    /// The grammar must contain exactly one `project` tag and exactly one
    /// `date` tag; any number of `ignore` tags. Violations fail here, at
    /// startup, before any path is processed.
    pub fn parse(spec: &str) -> AppResult<Self> {
        let mut roles = Vec::new();
        for tag in spec.split('/').filter(|t| !t.is_empty()) {
            let role = match tag {
                "project" => SegmentRole::Project,
                "date" => SegmentRole::Date,
                "ignore" => SegmentRole::Ignore,
                other => {
                    return Err(AppError::configuration(format!(
                        "Unknown path grammar tag '{other}' in '{spec}'"
                    )));
                }
            };
            roles.push(role);
        }

        let projects = roles.iter().filter(|r| **r == SegmentRole::Project).count();
        let dates = roles.iter().filter(|r| **r == SegmentRole::Date).count();
        if projects != 1 {
            return Err(AppError::configuration(format!(
                "Path grammar '{spec}' must contain exactly one 'project' tag, found {projects}"
            )));
        }
        if dates != 1 {
            return Err(AppError::configuration(format!(
                "Path grammar '{spec}' must contain exactly one 'date' tag, found {dates}"
            )));
        }

        Ok(Self { roles })
    }

    /// Number of leading segments the grammar consumes.
    pub fn prefix_len(&self) -> usize {
        self.roles.len()
    }
}

/// Result of collapsing a physical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedPath {
    /// Name of the category (the `project` segment).
    pub category: String,
    /// Collapsed, user-facing path: the date segment plus every segment
    /// beyond the grammar prefix, `/`-joined in original order.
    pub public_path: String,
}

/// Pure resolver from physical paths to (category, public path) pairs.
#[derive(Debug, Clone)]
pub struct PathCollapser {
    grammar: PathGrammar,
}

impl PathCollapser {
    /// Create a collapser for the given grammar.
    pub fn new(grammar: PathGrammar) -> Self {
        Self { grammar }
    }

    /// Collapse a physical path.
    ///
    /// Fails with a validation error when the path has fewer segments
    /// than the grammar prefix or its date segment is not `YYYY-MM-DD`.
    /// Two physically distinct paths collapsing to the same public path
    /// are expected, not an error.
    pub fn collapse(&self, physical: &str) -> AppResult<CollapsedPath> {
        let segments: Vec<&str> = physical.split('/').filter(|s| !s.is_empty()).collect();
        let prefix_len = self.grammar.prefix_len();
        if segments.len() < prefix_len {
            return Err(AppError::validation(format!(
                "Malformed path '{physical}': {} segments, grammar expects at least {prefix_len}",
                segments.len()
            )));
        }

        let mut category = None;
        let mut public = Vec::with_capacity(segments.len() - prefix_len + 1);
        for (segment, role) in segments.iter().zip(&self.grammar.roles) {
            match role {
                SegmentRole::Project => category = Some(segment.to_string()),
                SegmentRole::Date => {
                    NaiveDate::parse_from_str(segment, "%Y-%m-%d").map_err(|_| {
                        AppError::validation(format!(
                            "Malformed path '{physical}': date segment '{segment}' is not YYYY-MM-DD"
                        ))
                    })?;
                    public.push(*segment);
                }
                SegmentRole::Ignore => {}
            }
        }
        public.extend(&segments[prefix_len..]);

        // Grammar parsing guarantees exactly one project segment.
        let category = category.ok_or_else(|| {
            AppError::internal(format!("Grammar consumed no project segment for '{physical}'"))
        })?;

        Ok(CollapsedPath {
            category,
            public_path: public.join("/"),
        })
    }
}
