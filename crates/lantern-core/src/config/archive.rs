//! Archive layout configuration.

use serde::{Deserialize, Serialize};

/// Settings describing the physical archive being indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Root path of the archive. Stripped from incoming physical paths
    /// before they are collapsed.
    pub root: String,
    /// Path grammar assigning roles to the leading path segments,
    /// e.g. `"ignore/project/date"`. Must contain exactly one `project`
    /// and exactly one `date` tag.
    pub path_grammar: String,
}
