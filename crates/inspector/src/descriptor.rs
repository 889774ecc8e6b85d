//! Task and action descriptors
//!
//! Descriptors are assembled on demand from graph state and handed to
//! the service layer; they are never cached and never mutated after
//! assembly. Only the graph and its inspector are cached upstream.

use serde::{Deserialize, Serialize};

/// Action key and label synthesized for tasks that declare no actions
pub const DEFAULT_ACTION_KEY: &str = "Submit";

/// UI styling class of a task action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiClass {
    /// The emphasized action of a task — at most one per task by convention
    Primary,
    /// Any further action
    Secondary,
    /// A styling class the definition sets verbatim
    Custom(String),
}

impl UiClass {
    /// Parse a `workflow.action.<key>.class` property value
    ///
    /// `primary` and `secondary` (case-insensitive) map to the known
    /// variants; anything else is carried through verbatim.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("primary") {
            Self::Primary
        } else if trimmed.eq_ignore_ascii_case("secondary") {
            Self::Secondary
        } else {
            Self::Custom(trimmed.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Custom(class) => class,
        }
    }
}

impl std::fmt::Display for UiClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One action a user may take on a task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowActionDescriptor {
    /// Action key, as declared in `workflow.actions`
    pub key: String,
    /// Display label (`workflow.action.<key>.label`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_label: Option<String>,
    /// Styling class, explicit or assigned by the first-wins default pass
    pub ui_class: UiClass,
    /// Confirmation-modal context (`workflow.action.<key>.modal`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_context: Option<String>,
    /// Confirmation-modal button label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_button_label: Option<String>,
}

impl WorkflowActionDescriptor {
    /// The action synthesized for a task that declares no actions
    pub fn default_action() -> Self {
        Self {
            key: DEFAULT_ACTION_KEY.to_owned(),
            ui_label: Some(DEFAULT_ACTION_KEY.to_owned()),
            ui_class: UiClass::Primary,
            modal_context: None,
            modal_button_label: None,
        }
    }
}

/// A user task as presented to the service layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTaskDescriptor {
    /// Task key — the user-task node id
    pub key: String,
    /// Display name of the task, if the definition declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The actions available on this task, in declaration order
    pub actions: Vec<WorkflowActionDescriptor>,
}
