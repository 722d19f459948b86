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

//! Combining a folder's permissions with those of its new parent.

use std::collections::btree_map::{BTreeMap, Entry};

use super::model::ALL_GUESTS_ENTITY;
use super::permission::PermissionRecord;

/// Permissions keyed by entity, split into normal and system permissions.
///
/// Each half holds at most one permission per entity; later permissions for
/// the same entity replace earlier ones.
#[derive(Default)]
struct Partition {
    normal: BTreeMap<i32, PermissionRecord>,
    system: BTreeMap<i32, PermissionRecord>,
}

impl Partition {
    fn of<'a>(
        permissions: impl IntoIterator<Item = &'a PermissionRecord>,
    ) -> Self {
        let mut this = Partition::default();
        for p in permissions {
            let half = if p.is_system() {
                &mut this.system
            } else {
                &mut this.normal
            };
            half.insert(p.entity, p.clone());
        }
        this
    }

    fn into_permissions(self) -> Vec<PermissionRecord> {
        self.normal
            .into_iter()
            .chain(self.system)
            .map(|(_, p)| p)
            .collect()
    }
}

/// Merge the permissions of a folder being moved with those of its new parent.
///
/// For every entity the parent grants something to, the folder ends up with
/// the greater of its own and the parent's grades in each field, and with
/// admin rights if either side has them. When both sides have a permission for
/// the entity, the result is a new `Normal` permission which keeps only the
/// folder side's identity (entity, group flag, identifier). Normal and system
/// permissions are merged separately. The parent's all-guests permission is
/// never carried over.
///
/// The order of the result is not significant.
pub(crate) fn merge_folder_into_parent<'a, 'b>(
    folder_permissions: impl IntoIterator<Item = &'a PermissionRecord>,
    parent_permissions: impl IntoIterator<Item = &'b PermissionRecord>,
) -> Vec<PermissionRecord> {
    let mut folder = Partition::of(folder_permissions);
    let parent = Partition::of(parent_permissions);

    merge_half(&mut folder.normal, parent.normal);
    merge_half(&mut folder.system, parent.system);

    folder.into_permissions()
}

fn merge_half(
    folder: &mut BTreeMap<i32, PermissionRecord>,
    parent: BTreeMap<i32, PermissionRecord>,
) {
    for (entity, parent_permission) in parent {
        if ALL_GUESTS_ENTITY == entity {
            continue;
        }

        match folder.entry(entity) {
            Entry::Occupied(mut e) => {
                let merged = merge_one(e.get(), &parent_permission);
                e.insert(merged);
            }
            Entry::Vacant(e) => {
                e.insert(parent_permission);
            }
        }
    }
}

fn merge_one(
    own: &PermissionRecord,
    parent: &PermissionRecord,
) -> PermissionRecord {
    PermissionRecord::new(
        own.entity,
        own.is_group,
        own.grades.max(parent.grades),
    )
    .with_identifier(own.identifier())
    .with_system(own.system)
}
