use serde::{Deserialize, Serialize};

/// Tracked state of one managed record.
///
/// `id` is the record's domain while the record is tracked and `None` once it
/// is absent. `attributes` holds whatever the last read observed; an imported
/// state has an id but no attributes until it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState<T> {
    pub id: Option<String>,
    pub attributes: Option<T>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> ResourceState<T> {
    pub fn absent() -> Self {
        Self {
            id: None,
            attributes: None,
        }
    }

    /// Adopt an existing remote record by its domain.
    pub fn imported(domain: impl Into<String>) -> Self {
        Self {
            id: Some(domain.into()),
            attributes: None,
        }
    }

    pub fn visible(domain: impl Into<String>, attributes: T) -> Self {
        Self {
            id: Some(domain.into()),
            attributes: Some(attributes),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_none()
    }

    /// Drop identity and attributes.
    pub fn clear(&mut self) {
        self.id = None;
        self.attributes = None;
    }
}

/// What it takes to move a record from its read state to the desired one.
///
/// Every managed field is immutable, so the only in-place outcome is
/// `NoChange`; anything else goes through delete-then-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    NoChange,
    Replace { fields: Vec<&'static str> },
}

impl PlanAction {
    pub(crate) fn from_changes(fields: Vec<&'static str>) -> Self {
        if fields.is_empty() {
            Self::NoChange
        } else {
            Self::Replace { fields }
        }
    }
}
