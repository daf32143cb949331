//! Write guard and deletion sequencing for soft-deletable entities.
//!
//! Repositories receive a [`SaveGuard`] at construction and call it before
//! every insert or update. Deletion is described by a [`DeletionPlan`] that
//! fixes the order in which hooks and the soft-delete write run:
//!
//! 1. the entity's own hook (e.g. retiring a part's current track),
//! 2. the hierarchy hook for tree-shaped entities (descendant cascade),
//! 3. the base soft-delete write, always last and always exactly once.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Save guard
// ---------------------------------------------------------------------------

/// The state of a row a caller is about to write.
#[derive(Debug, Clone, Copy)]
pub struct WriteTarget<'a> {
    pub entity: &'static str,
    /// `None` for a row that does not exist yet.
    pub id: Option<DbId>,
    pub deleted_at: Option<&'a Timestamp>,
}

impl<'a> WriteTarget<'a> {
    /// A row about to be inserted.
    pub fn new_row(entity: &'static str) -> Self {
        Self {
            entity,
            id: None,
            deleted_at: None,
        }
    }

    /// An existing row about to be updated.
    pub fn existing(entity: &'static str, id: DbId, deleted_at: Option<&'a Timestamp>) -> Self {
        Self {
            entity,
            id: Some(id),
            deleted_at,
        }
    }
}

/// A check run before every write. Returning `Err` aborts the write.
pub type SaveGuard = fn(&WriteTarget<'_>) -> Result<(), CoreError>;

/// Refuses writes to rows whose deletion timestamp is populated.
pub fn reject_deleted(target: &WriteTarget<'_>) -> Result<(), CoreError> {
    match target.deleted_at {
        Some(_) => Err(CoreError::AlreadyDeleted {
            entity: target.entity,
            id: target.id.unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Deletion plan
// ---------------------------------------------------------------------------

/// One step of an entity's deletion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    EntityHook,
    HierarchyHook,
    SoftDelete,
}

impl DeletionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityHook => "entity_hook",
            Self::HierarchyHook => "hierarchy_hook",
            Self::SoftDelete => "soft_delete",
        }
    }
}

impl std::fmt::Display for DeletionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which optional hooks an entity runs before its soft-delete write.
///
/// The step order does not depend on the order the builder methods are
/// called in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionPlan {
    entity_hook: bool,
    hierarchy_hook: bool,
}

impl DeletionPlan {
    /// Only the base soft-delete write.
    pub const fn base() -> Self {
        Self {
            entity_hook: false,
            hierarchy_hook: false,
        }
    }

    pub const fn with_entity_hook(self) -> Self {
        Self {
            entity_hook: true,
            ..self
        }
    }

    pub const fn with_hierarchy_hook(self) -> Self {
        Self {
            hierarchy_hook: true,
            ..self
        }
    }

    /// The ordered steps to execute.
    pub fn steps(&self) -> Vec<DeletionStep> {
        let mut steps = Vec::with_capacity(3);
        if self.entity_hook {
            steps.push(DeletionStep::EntityHook);
        }
        if self.hierarchy_hook {
            steps.push(DeletionStep::HierarchyHook);
        }
        steps.push(DeletionStep::SoftDelete);
        steps
    }
}

/// Part records retire their current track before being soft-deleted.
pub const PART_RECORD_DELETION: DeletionPlan = DeletionPlan::base().with_entity_hook();

/// Part categories are a tree: descendants go first.
pub const PART_CATEGORY_DELETION: DeletionPlan = DeletionPlan::base().with_hierarchy_hook();
