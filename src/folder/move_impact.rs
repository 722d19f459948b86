//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Sharetree.
//
// Sharetree is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Sharetree is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Sharetree. If not, see <http://www.gnu.org/licenses/>.

//! Deciding whether moving a folder changes who can see it.
//!
//! When a folder is moved, its permissions are recomputed according to the
//! move policy configured for the type of root it is moved under:
//!
//! - `inherit`: the folder takes the new parent's permissions.
//! - `keep`: the folder keeps its own permissions.
//! - `merge`: the two sets are merged per entity (see `merge`).
//!
//! In all cases, permissions the folder inherited from an ancestor are lost,
//! and permissions the new parent passes down to its children are gained.
//!
//! The analysis compares the set of entities holding any permission before and
//! after the move. Only the set matters; a change in grades is not considered
//! a change in visibility.
//!
//! Moving a private folder under the `inherit` policy also looks at every
//! folder below it. If any of those is shared with a set of entities other
//! than what the folder will have after the move, that takes priority over
//! anything about the folder itself.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use log::{debug, info, warn};

use super::merge::merge_folder_into_parent;
use super::model::*;
use super::permission::{PermissionRecord, SealedPermission};
use super::root_type::RootTypeClassifier;
use super::storage::{FolderStorage, PolicySource};
use crate::support::error::Error;
use crate::support::move_config::RootMarkers;

/// A request to analyse a prospective folder move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveRequest {
    /// The tree both folders live in.
    pub tree_id: String,
    /// The user on whose behalf the move is made.
    pub acting_user: Option<i32>,
    /// The folder to be moved.
    pub folder_id: String,
    /// The folder it is to be moved under.
    pub new_parent_id: String,
}

/// The full outcome of analysing a move.
///
/// Not every outcome results in a warning; see `warning()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveImpact {
    /// The folder's content type is not subject to the analysis.
    NotAnalysed,
    /// Exactly the same entities can see the folder before and after.
    Unchanged,
    /// The set of entities changes, but the folder is private to the acting
    /// user both before and after.
    StaysPrivate,
    /// The folder is shared before the move but not after.
    LosesSharing,
    /// The folder is shared both before and after the move, but with
    /// different entities.
    ChangesSharing {
        /// Whether the change comes from merging permissions, in which case
        /// everyone who could see the folder still can.
        merged: bool,
    },
    /// The folder is private before the move and shared after.
    GainsSharing,
    /// Some folder below the moved one is shared, and will end up in a shared
    /// location with different entities.
    SubfoldersToShared,
    /// Some folder below the moved one is shared, and will end up in a
    /// location that is not shared.
    SubfoldersToNotShared,
}

impl MoveImpact {
    /// Return the warning, if any, to present for this outcome.
    ///
    /// Becoming shared and being re-shared through a merge are deliberately
    /// not reported.
    pub fn warning(self) -> Option<MoveWarning> {
        match self {
            MoveImpact::LosesSharing => Some(MoveWarning::MovedToNotShared),
            MoveImpact::ChangesSharing { merged: false } => {
                Some(MoveWarning::MovedToAnotherShared)
            }
            MoveImpact::SubfoldersToShared => {
                Some(MoveWarning::SubfoldersMovedToShared)
            }
            MoveImpact::SubfoldersToNotShared => {
                Some(MoveWarning::SubfoldersMovedToNotShared)
            }
            MoveImpact::NotAnalysed
            | MoveImpact::Unchanged
            | MoveImpact::StaysPrivate
            | MoveImpact::ChangesSharing { merged: true }
            | MoveImpact::GainsSharing => None,
        }
    }
}

impl fmt::Display for MoveImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MoveImpact::NotAnalysed => write!(f, "not analysed"),
            MoveImpact::Unchanged => write!(f, "unchanged"),
            MoveImpact::StaysPrivate => write!(f, "stays private"),
            MoveImpact::LosesSharing => write!(f, "loses sharing"),
            MoveImpact::ChangesSharing { merged: false } => {
                write!(f, "changes sharing")
            }
            MoveImpact::ChangesSharing { merged: true } => {
                write!(f, "changes sharing by merge")
            }
            MoveImpact::GainsSharing => write!(f, "gains sharing"),
            MoveImpact::SubfoldersToShared => {
                write!(f, "shared subfolders move to shared")
            }
            MoveImpact::SubfoldersToNotShared => {
                write!(f, "shared subfolders move to not shared")
            }
        }
    }
}

/// Analyses prospective folder moves.
///
/// Each analysis makes a series of blocking lookups against the storage and
/// holds no state between calls.
pub struct MoveImpactAnalyzer<'a, S: ?Sized, P: ?Sized> {
    storage: &'a S,
    policies: &'a P,
    roots: &'a RootMarkers,
}

impl<'a, S, P> MoveImpactAnalyzer<'a, S, P>
where
    S: FolderStorage + ?Sized,
    P: PolicySource + ?Sized,
{
    pub fn new(
        storage: &'a S,
        policies: &'a P,
        roots: &'a RootMarkers,
    ) -> Self {
        MoveImpactAnalyzer {
            storage,
            policies,
            roots,
        }
    }

    /// Determine whether the given move warrants a warning.
    ///
    /// `Ok(None)` means the move can proceed without comment. Errors from the
    /// storage are returned as-is.
    pub fn analyze(
        &self,
        request: &MoveRequest,
    ) -> Result<Option<MoveWarning>, Error> {
        let impact = self.assess(request)?;
        let warning = impact.warning();
        match warning {
            Some(warning) => info!(
                "Moving {} under {} on behalf of {:?}: {}, warning {}",
                request.folder_id,
                request.new_parent_id,
                request.acting_user,
                impact,
                warning.key()
            ),
            None => info!(
                "Moving {} under {} on behalf of {:?}: {}",
                request.folder_id,
                request.new_parent_id,
                request.acting_user,
                impact
            ),
        }
        Ok(warning)
    }

    /// Determine the full impact of the given move, including outcomes which
    /// do not produce a warning.
    pub fn assess(&self, request: &MoveRequest) -> Result<MoveImpact, Error> {
        let user = request
            .acting_user
            .ok_or(Error::MissingParameter("acting user"))?;
        if request.tree_id.is_empty() {
            return Err(Error::MissingParameter("tree"));
        }
        if request.folder_id.is_empty() {
            return Err(Error::MissingParameter("folder"));
        }
        if request.new_parent_id.is_empty() {
            return Err(Error::MissingParameter("new parent"));
        }

        let tree_id = &request.tree_id;
        let folder = self.storage.get_folder(tree_id, &request.folder_id)?;
        if !folder.module.supports_sharing() {
            return Ok(MoveImpact::NotAnalysed);
        }

        let new_parent =
            self.storage.get_folder(tree_id, &request.new_parent_id)?;
        let root_type = RootTypeClassifier::new(self.storage, self.roots)
            .classify(tree_id, &new_parent.id, user)?;
        let policy = self.policy_for(root_type, user);
        debug!(
            "Moving {} under {}: destination root is {}, policy {}",
            folder.id, new_parent.id, root_type, policy
        );

        let old_entities = folder.entities();
        let prospective = prospective_permissions(&folder, &new_parent, policy);
        let new_entities = entity_set(&prospective);

        if folder.supports_permissions()
            && MovePolicy::Inherit == policy
            && !is_foreign(&old_entities, user)
        {
            let below = self.foreign_entities_below(tree_id, &folder.id, user)?;
            if below != new_entities && is_foreign(&below, user) {
                return Ok(if is_foreign(&new_entities, user) {
                    MoveImpact::SubfoldersToShared
                } else {
                    MoveImpact::SubfoldersToNotShared
                });
            }
        }

        Ok(compare_entities(&old_entities, &new_entities, user, policy))
    }

    /// Look up the configured policy for `root_type`, falling back to the
    /// default if it is missing or invalid.
    fn policy_for(&self, root_type: RootType, user: i32) -> MovePolicy {
        let name = self.policies.configured_policy(root_type, user);
        if name.trim().is_empty() {
            return MovePolicy::default();
        }

        name.parse().unwrap_or_else(|_| {
            warn!(
                "Unrecognised move policy {:?} for {} roots, using {}",
                name,
                root_type,
                MovePolicy::default()
            );
            MovePolicy::default()
        })
    }

    /// Collect the entities of every folder below `folder_id` (exclusive)
    /// which is shared by `user`.
    fn foreign_entities_below(
        &self,
        tree_id: &str,
        folder_id: &str,
        user: i32,
    ) -> Result<BTreeSet<i32>, Error> {
        let mut collected = BTreeSet::new();
        let mut visited = HashSet::new();
        visited.insert(folder_id.to_owned());

        let mut pending = self.storage.get_subfolders(tree_id, folder_id)?;
        while let Some(id) = pending.pop() {
            if !visited.insert(id.clone()) {
                warn!("Folder {id} in tree {tree_id} is its own ancestor");
                continue;
            }

            let subfolder = self.storage.get_folder(tree_id, &id)?;
            let entities = subfolder.entities();
            if is_foreign(&entities, user) {
                collected.extend(entities);
            }

            pending.extend(self.storage.get_subfolders(tree_id, &id)?);
        }

        Ok(collected)
    }
}

/// Compute the permissions `folder` would have after being moved under
/// `new_parent` with the given policy.
pub(crate) fn prospective_permissions(
    folder: &FolderNode,
    new_parent: &FolderNode,
    policy: MovePolicy,
) -> Vec<PermissionRecord> {
    let mut prospective: Vec<PermissionRecord> = match policy {
        MovePolicy::Inherit => new_parent
            .permissions
            .iter()
            .map(SealedPermission::to_mutable)
            .collect(),
        MovePolicy::Keep => folder
            .permissions
            .iter()
            .map(SealedPermission::to_mutable)
            .collect(),
        MovePolicy::Merge => merge_folder_into_parent(
            folder.permissions.iter().map(|p| &**p),
            new_parent.permissions.iter().map(|p| &**p),
        ),
    };

    if !new_parent.supports_permissions() {
        return prospective;
    }

    // The folder leaves whatever ancestor it inherited from
    prospective.retain(|p| {
        PermissionType::Inherited != p.kind
            || !folder.permissions.iter().any(|original| **original == *p)
    });

    for p in &new_parent.permissions {
        if PermissionType::Normal == p.kind {
            continue;
        }

        let mut inherited = p.to_mutable();
        if PermissionType::Legator == p.kind {
            inherited.legator = Some(new_parent.id.clone());
        }
        inherited.kind = PermissionType::Inherited;

        if !prospective.contains(&inherited) {
            prospective.push(inherited);
        }
    }

    prospective
}

fn compare_entities(
    old_entities: &BTreeSet<i32>,
    new_entities: &BTreeSet<i32>,
    user: i32,
    policy: MovePolicy,
) -> MoveImpact {
    if old_entities == new_entities {
        return MoveImpact::Unchanged;
    }

    match (is_foreign(old_entities, user), is_foreign(new_entities, user)) {
        (true, false) => MoveImpact::LosesSharing,
        (true, true) => MoveImpact::ChangesSharing {
            merged: MovePolicy::Merge == policy,
        },
        (false, true) => MoveImpact::GainsSharing,
        (false, false) => MoveImpact::StaysPrivate,
    }
}
