//! Extension-property vocabulary
//!
//! Property names must stay bit-exact: deployed definitions already use
//! them. The `workflow.` prefix namespaces caseflow's configuration
//! against other extension properties a modeling tool may attach.

/// Comma-separated action keys declared on a user task
pub const PROP_ACTIONS: &str = "workflow.actions";

/// Comma-separated user types allowed to act on a task
pub const PROP_ALLOWED_USER_TYPES: &str = "workflow.allowed.userTypes";

/// Policy-engine action name gating a task
pub const PROP_ALLOWED_ACTION: &str = "workflow.allowed.action";

/// User types allowed when no `workflow.allowed.userTypes` is declared
/// anywhere in a task's property hierarchy
pub const DEFAULT_ALLOWED_USER_TYPES: [&str; 2] = ["agency", "public"];

/// User type substituted when no authenticated user is available
pub const UNKNOWN_USER_TYPE: &str = "unknown";

/// Build a per-action property name: `workflow.action.<key>.<suffix>`
///
/// Suffixes in use: `label`, `class`, `modal`, `modal.button.label`.
pub fn action_property(action_key: &str, suffix: &str) -> String {
    format!("workflow.action.{action_key}.{suffix}")
}

/// Split a comma-separated property value into its entries
///
/// Entries are trimmed; empty entries are dropped. Absent or malformed
/// values degrade to an empty list — list parsing never fails.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_property_names() {
        assert_eq!(
            action_property("Approve", "label"),
            "workflow.action.Approve.label"
        );
        assert_eq!(
            action_property("Reject", "modal.button.label"),
            "workflow.action.Reject.modal.button.label"
        );
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("a,b,c")), ["a", "b", "c"]);
        assert_eq!(split_list(Some(" approve , reject ")), ["approve", "reject"]);
        assert_eq!(split_list(Some("solo")), ["solo"]);
    }

    #[test]
    fn test_split_list_degrades_on_malformed_input() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(Some("  ,, ,")).is_empty());
        assert_eq!(split_list(Some(",approve,")), ["approve"]);
    }
}
