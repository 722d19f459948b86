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

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::permission::{PermissionRecord, SealedPermission};
use crate::support::error::Error;

/// The capability tag a folder (or its content type) declares when permission
/// semantics apply to it.
pub const CAPABILITY_PERMISSIONS: &str = "permissions";

/// The entity id of a permission whose holder has not been set.
pub const UNSET_ENTITY: i32 = -1;

/// The pseudo-entity standing for "all guest users".
///
/// Permissions for this entity are carried as system permissions and are
/// never pulled up from a parent folder when permissions are merged.
pub const ALL_GUESTS_ENTITY: i32 = i32::MAX;

/// The `system` value of a permission which requires separate handling, such
/// as the all-guests grant.
pub const SYSTEM_PERMISSION: i32 = 1;

/// An access grade for one of the four independent permission fields.
///
/// The discriminants are the semantic values used by the rest of the folder
/// system. They are not contiguous; the packed representation uses an entirely
/// different set of codes (see `permission_codec`).
///
/// Grades are totally ordered, `None` being the lowest and `Max` the highest.
#[derive(
    Serialize_repr,
    Deserialize_repr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[repr(u32)]
pub enum Grade {
    None = 0,
    Minimal = 2,
    Moderate = 4,
    Full = 8,
    /// "Everything possible", regardless of what the field means.
    Max = 128,
}

impl Default for Grade {
    fn default() -> Self {
        Grade::None
    }
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::None,
        Grade::Minimal,
        Grade::Moderate,
        Grade::Full,
        Grade::Max,
    ];

    /// Return the semantic value of this grade.
    pub fn value(self) -> u32 {
        self as u32
    }

    /// Return the grade with the given semantic value, if there is one.
    pub fn from_value(value: u32) -> Option<Self> {
        Grade::ALL.iter().copied().find(|g| g.value() == value)
    }

    pub fn name(self) -> &'static str {
        match self {
            Grade::None => "none",
            Grade::Minimal => "minimal",
            Grade::Moderate => "moderate",
            Grade::Full => "full",
            Grade::Max => "max",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Grade::ALL
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(Error::UnknownGrade)
    }
}

/// The four access grades of a permission plus its admin flag.
///
/// This is exactly the information held by the packed permission integer.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash,
)]
pub struct Grades {
    /// Visibility of, and ability to create inside, the folder itself.
    pub folder: Grade,
    pub read: Grade,
    pub write: Grade,
    pub delete: Grade,
    #[serde(default)]
    pub admin: bool,
}

impl Grades {
    pub const NONE: Self = Grades {
        folder: Grade::None,
        read: Grade::None,
        write: Grade::None,
        delete: Grade::None,
        admin: false,
    };

    /// The canonical grant used for default and fallback permissions: the
    /// holder can see the folder and read everything in it, but nothing else.
    pub const READ_ONLY: Self = Grades {
        folder: Grade::Minimal,
        read: Grade::Full,
        write: Grade::None,
        delete: Grade::None,
        admin: false,
    };

    /// Everything, including administration of the folder.
    pub const ADMIN_ALL: Self = Grades {
        folder: Grade::Max,
        read: Grade::Max,
        write: Grade::Max,
        delete: Grade::Max,
        admin: true,
    };

    pub fn new(
        folder: Grade,
        read: Grade,
        write: Grade,
        delete: Grade,
        admin: bool,
    ) -> Self {
        Grades {
            folder,
            read,
            write,
            delete,
            admin,
        }
    }

    /// Combine two sets of grades, taking the greater grade of each field and
    /// the admin flag if either side has it.
    pub fn max(self, other: Self) -> Self {
        Grades {
            folder: self.folder.max(other.folder),
            read: self.read.max(other.read),
            write: self.write.max(other.write),
            delete: self.delete.max(other.delete),
            admin: self.admin || other.admin,
        }
    }

    /// Whether these grades allow the holder to see the folder at all.
    pub fn can_see(&self) -> bool {
        self.folder > Grade::None
    }
}

/// How a permission relates to permissions on other folders.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    /// A plain permission which applies only to the folder that carries it.
    Normal,
    /// A permission which is propagated to every subfolder.
    Legator,
    /// A permission propagated down from an ancestor's `Legator` permission.
    Inherited,
}

impl Default for PermissionType {
    fn default() -> Self {
        PermissionType::Normal
    }
}

/// The content type served by a folder.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Mail,
    Calendar,
    Contacts,
    Tasks,
    /// Generic file storage, the only module with full sharing semantics.
    Files,
    System,
}

impl Module {
    /// Whether moves of folders of this module are inspected for changes in
    /// visibility.
    pub fn supports_sharing(self) -> bool {
        Module::Files == self
    }
}

/// Which top-level hierarchy a folder ultimately descends from.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum RootType {
    /// Under the acting user's own personal folder.
    Private,
    /// Under the public root.
    Public,
    /// Under some other user's personal folder.
    Shared,
    /// The classification could not be determined.
    NotAvailable,
}

impl RootType {
    pub const ALL: [RootType; 4] = [
        RootType::Private,
        RootType::Public,
        RootType::Shared,
        RootType::NotAvailable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RootType::Private => "private",
            RootType::Public => "public",
            RootType::Shared => "shared",
            RootType::NotAvailable => "not_available",
        }
    }
}

impl fmt::Display for RootType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RootType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        RootType::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(Error::UnknownRootType)
    }
}

/// How a folder's permissions are recomputed when it is moved.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum MovePolicy {
    /// The folder takes exactly the new parent's permissions.
    Inherit,
    /// The folder keeps its own permissions.
    Keep,
    /// The folder's and the new parent's permissions are combined per entity.
    Merge,
}

impl Default for MovePolicy {
    fn default() -> Self {
        MovePolicy::Inherit
    }
}

impl MovePolicy {
    pub fn name(self) -> &'static str {
        match self {
            MovePolicy::Inherit => "inherit",
            MovePolicy::Keep => "keep",
            MovePolicy::Merge => "merge",
        }
    }
}

impl fmt::Display for MovePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MovePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        [MovePolicy::Inherit, MovePolicy::Keep, MovePolicy::Merge]
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(Error::UnknownMovePolicy)
    }
}

/// A warning about a change in visibility caused by moving a folder.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum MoveWarning {
    /// The folder was shared and no longer will be.
    MovedToNotShared,
    /// The folder was shared and will be shared with a different set of
    /// entities.
    MovedToAnotherShared,
    /// Shared subfolders will end up in a shared location with different
    /// permissions.
    SubfoldersMovedToShared,
    /// Shared subfolders will end up in a location that is not shared.
    SubfoldersMovedToNotShared,
}

impl MoveWarning {
    /// A stable key identifying this warning, suitable for looking up a
    /// localised message.
    pub fn key(self) -> &'static str {
        match self {
            MoveWarning::MovedToNotShared => "moved_to_not_shared",
            MoveWarning::MovedToAnotherShared => "moved_to_another_shared",
            MoveWarning::SubfoldersMovedToShared => {
                "subfolders_moved_to_shared"
            }
            MoveWarning::SubfoldersMovedToNotShared => {
                "subfolders_moved_to_not_shared"
            }
        }
    }
}

impl fmt::Display for MoveWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The view of a folder needed to reason about moving it.
#[derive(Clone, Debug)]
pub struct FolderNode {
    pub id: String,
    pub tree_id: String,
    /// Empty for the root of a tree.
    pub parent_id: String,
    /// The user who created the folder.
    pub created_by: i32,
    pub module: Module,
    pub permissions: Vec<SealedPermission>,
    pub capabilities: HashSet<String>,
}

impl FolderNode {
    /// Whether permission semantics apply to this folder.
    pub fn supports_permissions(&self) -> bool {
        self.capabilities.contains(CAPABILITY_PERMISSIONS)
    }

    /// Return the set of entities holding a permission on this folder.
    pub fn entities(&self) -> BTreeSet<i32> {
        entity_set(self.permissions.iter().map(|p| &**p))
    }
}

/// Return the set of distinct entities named by `permissions`.
pub fn entity_set<'a>(
    permissions: impl IntoIterator<Item = &'a PermissionRecord>,
) -> BTreeSet<i32> {
    permissions.into_iter().map(|p| p.entity).collect()
}

/// Whether `entities` grants access to anyone besides `user`.
///
/// This is the single definition of "shared" used for both the folder being
/// moved and its subfolders.
pub fn is_foreign(entities: &BTreeSet<i32>, user: i32) -> bool {
    entities.iter().any(|&e| e != user)
}
