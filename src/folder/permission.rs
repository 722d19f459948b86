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

use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::*;
use super::permission_codec;
use crate::support::error::Error;

/// A grant of access to a folder for a single user or group.
///
/// This is the mutable form, used while reading permissions from a backend or
/// computing new ones. Permissions handed out of the core are wrapped in
/// `SealedPermission`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Stable handle for the permission. When unset, the decimal form of
    /// `entity` is used.
    #[serde(default)]
    identifier: Option<String>,
    /// The user or group id, or `UNSET_ENTITY`.
    pub entity: i32,
    #[serde(default)]
    pub is_group: bool,
    pub grades: Grades,
    /// Non-zero for permissions that need separate handling, such as the
    /// all-guests grant.
    #[serde(default)]
    pub system: i32,
    #[serde(default, rename = "type")]
    pub kind: PermissionType,
    /// For `Inherited` permissions, the id of the folder holding the `Legator`
    /// permission this one came from.
    #[serde(default)]
    pub legator: Option<String>,
}

impl Default for PermissionRecord {
    fn default() -> Self {
        PermissionRecord {
            identifier: None,
            entity: UNSET_ENTITY,
            is_group: false,
            grades: Grades::NONE,
            system: 0,
            kind: PermissionType::Normal,
            legator: None,
        }
    }
}

impl PermissionRecord {
    pub fn new(entity: i32, is_group: bool, grades: Grades) -> Self {
        PermissionRecord {
            entity,
            is_group,
            grades,
            ..PermissionRecord::default()
        }
    }

    /// A normal permission for a single user.
    pub fn user(entity: i32, grades: Grades) -> Self {
        Self::new(entity, false, grades)
    }

    /// A normal permission for a group.
    pub fn group(entity: i32, grades: Grades) -> Self {
        Self::new(entity, true, grades)
    }

    /// The system permission granting access to all guest users.
    pub fn guests(grades: Grades) -> Self {
        PermissionRecord {
            system: SYSTEM_PERMISSION,
            ..Self::group(ALL_GUESTS_ENTITY, grades)
        }
    }

    /// Build a permission from the packed integer form stored by a backend.
    pub fn from_bits(
        entity: i32,
        is_group: bool,
        bits: u32,
    ) -> Result<Self, Error> {
        Ok(Self::new(entity, is_group, permission_codec::decode(bits)?))
    }

    /// Return the packed integer form of this permission's grades.
    pub fn bits(&self) -> u32 {
        let g = &self.grades;
        permission_codec::encode(g.folder, g.read, g.write, g.delete, g.admin)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_system(mut self, system: i32) -> Self {
        self.system = system;
        self
    }

    pub fn with_kind(mut self, kind: PermissionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_legator(mut self, legator: impl Into<String>) -> Self {
        self.legator = Some(legator.into());
        self
    }

    /// Return the identifier of this permission, defaulting to the entity id.
    pub fn identifier(&self) -> Cow<'_, str> {
        match self.identifier {
            Some(ref id) => Cow::Borrowed(id),
            None => Cow::Owned(self.entity.to_string()),
        }
    }

    pub fn is_system(&self) -> bool {
        0 != self.system
    }

    /// Wrap this permission so that it can no longer be changed.
    pub fn seal(self) -> SealedPermission {
        SealedPermission(Arc::new(self))
    }
}

impl PartialEq for PermissionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
            && self.entity == other.entity
            && self.is_group == other.is_group
            && self.grades == other.grades
            && self.system == other.system
            && self.kind == other.kind
            && self.legator == other.legator
    }
}

impl Eq for PermissionRecord {}

// Must agree with PartialEq, so the identifier is hashed in its effective form
impl Hash for PermissionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
        self.entity.hash(state);
        self.is_group.hash(state);
        self.grades.hash(state);
        self.system.hash(state);
        self.kind.hash(state);
        self.legator.hash(state);
    }
}

/// Mutation of a permission which may or may not permit it.
pub trait EditPermission {
    fn set_identifier(&mut self, identifier: String) -> Result<(), Error>;
    fn set_entity(&mut self, entity: i32, is_group: bool) -> Result<(), Error>;
    fn set_grades(&mut self, grades: Grades) -> Result<(), Error>;
    fn set_system(&mut self, system: i32) -> Result<(), Error>;
    fn set_kind(&mut self, kind: PermissionType) -> Result<(), Error>;
    fn set_legator(&mut self, legator: Option<String>) -> Result<(), Error>;
}

impl EditPermission for PermissionRecord {
    fn set_identifier(&mut self, identifier: String) -> Result<(), Error> {
        self.identifier = Some(identifier);
        Ok(())
    }

    fn set_entity(&mut self, entity: i32, is_group: bool) -> Result<(), Error> {
        self.entity = entity;
        self.is_group = is_group;
        Ok(())
    }

    fn set_grades(&mut self, grades: Grades) -> Result<(), Error> {
        self.grades = grades;
        Ok(())
    }

    fn set_system(&mut self, system: i32) -> Result<(), Error> {
        self.system = system;
        Ok(())
    }

    fn set_kind(&mut self, kind: PermissionType) -> Result<(), Error> {
        self.kind = kind;
        Ok(())
    }

    fn set_legator(&mut self, legator: Option<String>) -> Result<(), Error> {
        self.legator = legator;
        Ok(())
    }
}

/// A read-only, cheaply clonable permission.
///
/// Reads go through `Deref`. Every `EditPermission` method fails with
/// `Error::ImmutablePermission`; use `to_mutable()` to get an editable copy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SealedPermission(Arc<PermissionRecord>);

impl SealedPermission {
    /// Return an editable copy of this permission.
    pub fn to_mutable(&self) -> PermissionRecord {
        PermissionRecord::clone(&self.0)
    }
}

impl Deref for SealedPermission {
    type Target = PermissionRecord;

    fn deref(&self) -> &PermissionRecord {
        &self.0
    }
}

impl From<PermissionRecord> for SealedPermission {
    fn from(record: PermissionRecord) -> Self {
        record.seal()
    }
}

impl EditPermission for SealedPermission {
    fn set_identifier(&mut self, _: String) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }

    fn set_entity(&mut self, _: i32, _: bool) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }

    fn set_grades(&mut self, _: Grades) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }

    fn set_system(&mut self, _: i32) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }

    fn set_kind(&mut self, _: PermissionType) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }

    fn set_legator(&mut self, _: Option<String>) -> Result<(), Error> {
        Err(Error::ImmutablePermission)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifier_defaults_to_entity() {
        let p = PermissionRecord::user(42, Grades::READ_ONLY);
        assert_eq!("42", p.identifier());

        let p = p.with_identifier("alice");
        assert_eq!("alice", p.identifier());

        assert_eq!("-1", PermissionRecord::default().identifier());
    }

    #[test]
    fn explicit_identifier_equal_to_default_is_equal() {
        let implicit = PermissionRecord::user(42, Grades::READ_ONLY);
        let explicit = implicit.clone().with_identifier("42");
        assert_eq!(implicit, explicit);

        let mut set = HashSet::new();
        set.insert(implicit);
        assert!(set.contains(&explicit));
    }

    #[test]
    fn toml_form() {
        let p: PermissionRecord = toml::from_str(
            r#"
identifier = "team"
entity = 7
is_group = true
system = 1
type = "inherited"
legator = "up"

[grades]
folder = 2
read = 8
write = 0
delete = 128
admin = true
"#,
        )
        .unwrap();

        assert_eq!(
            PermissionRecord::group(
                7,
                Grades::new(
                    Grade::Minimal,
                    Grade::Full,
                    Grade::None,
                    Grade::Max,
                    true
                )
            )
            .with_identifier("team")
            .with_system(1)
            .with_kind(PermissionType::Inherited)
            .with_legator("up"),
            p
        );

        let value = toml::Value::try_from(&p).unwrap();
        assert_eq!(
            Some("inherited"),
            value.get("type").and_then(toml::Value::as_str)
        );
        assert_eq!(
            Some(128),
            value
                .get("grades")
                .and_then(|g| g.get("delete"))
                .and_then(toml::Value::as_integer)
        );
        assert_eq!(p, value.try_into::<PermissionRecord>().unwrap());

        // Everything but the entity and grades is optional
        let p: PermissionRecord = toml::from_str(
            "entity = 3\n[grades]\nfolder = 0\nread = 0\n\
             write = 0\ndelete = 0\n",
        )
        .unwrap();
        assert_eq!(PermissionRecord::user(3, Grades::NONE), p);
        assert_eq!("3", p.identifier());
    }

    #[test]
    fn equality_covers_every_field() {
        let base = PermissionRecord::user(42, Grades::READ_ONLY);
        assert_ne!(base, PermissionRecord::group(42, Grades::READ_ONLY));
        assert_ne!(base, PermissionRecord::user(43, Grades::READ_ONLY));
        assert_ne!(base, PermissionRecord::user(42, Grades::ADMIN_ALL));
        assert_ne!(base, base.clone().with_system(SYSTEM_PERMISSION));
        assert_ne!(base, base.clone().with_kind(PermissionType::Legator));
        assert_ne!(base, base.clone().with_legator("5"));
        assert_ne!(base, base.clone().with_identifier("alice"));
    }

    #[test]
    fn bits_round_trip_through_record() {
        let p = PermissionRecord::group(3, Grades::ADMIN_ALL);
        let back = PermissionRecord::from_bits(3, true, p.bits()).unwrap();
        assert_eq!(p, back);

        assert_matches!(
            Err(Error::CorruptPermissionBits { .. }),
            PermissionRecord::from_bits(3, true, 3)
        );
    }

    #[test]
    fn guests_are_system_permissions() {
        let p = PermissionRecord::guests(Grades::READ_ONLY);
        assert!(p.is_system());
        assert!(p.is_group);
        assert_eq!(ALL_GUESTS_ENTITY, p.entity);
        assert!(!PermissionRecord::user(1, Grades::NONE).is_system());
    }

    #[test]
    fn mutable_record_accepts_edits() {
        let mut p = PermissionRecord::user(1, Grades::NONE);
        p.set_grades(Grades::READ_ONLY).unwrap();
        p.set_entity(7, true).unwrap();
        p.set_kind(PermissionType::Inherited).unwrap();
        p.set_legator(Some("99".to_owned())).unwrap();
        p.set_system(SYSTEM_PERMISSION).unwrap();
        p.set_identifier("seven".to_owned()).unwrap();

        assert_eq!(Grades::READ_ONLY, p.grades);
        assert_eq!(7, p.entity);
        assert!(p.is_group);
        assert_eq!(PermissionType::Inherited, p.kind);
        assert_eq!(Some("99"), p.legator.as_deref());
        assert!(p.is_system());
        assert_eq!("seven", p.identifier());
    }

    #[test]
    fn sealed_record_rejects_edits() {
        let original = PermissionRecord::user(1, Grades::READ_ONLY);
        let mut sealed = original.clone().seal();

        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_grades(Grades::ADMIN_ALL)
        );
        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_entity(2, false)
        );
        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_kind(PermissionType::Legator)
        );
        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_legator(None)
        );
        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_system(1)
        );
        assert_matches!(
            Err(Error::ImmutablePermission),
            sealed.set_identifier(String::new())
        );
        assert_eq!(original, *sealed);

        let mut copy = sealed.to_mutable();
        copy.set_grades(Grades::ADMIN_ALL).unwrap();
        assert_eq!(Grades::READ_ONLY, sealed.grades);
        assert_eq!(Grades::ADMIN_ALL, copy.grades);
    }
}
