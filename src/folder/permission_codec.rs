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

//! The packed integer representation of permission grades.
//!
//! A permission's four grades and admin flag are stored by some backends as a
//! single integer. The integer is a positional base-128 number with five
//! digits. From least to most significant, the digits are the folder, read,
//! write, delete and admin fields.
//!
//! The grades are not stored by their semantic value (which can be as large as
//! 128 and so would not fit in a digit), but by a raw code:
//!
//! ```text
//! none      0 -> 0
//! minimal   2 -> 1
//! moderate  4 -> 2
//! full      8 -> 4
//! max     128 -> 64
//! ```
//!
//! The admin digit is simply 0 or 1.
//!
//! Any other digit value cannot be produced by `encode` and is reported as
//! corruption by `decode`. Raw code 3 in particular looks plausible but has
//! never been assigned a meaning.

use serde::{Deserialize, Serialize};

use super::model::{Grade, Grades};
use crate::support::error::Error;

const FIELD_BITS: u32 = 7;
const RADIX: u32 = 1 << FIELD_BITS;
const FIELD_MASK: u32 = RADIX - 1;

const FOLDER_SHIFT: u32 = 0;
const READ_SHIFT: u32 = FIELD_BITS;
const WRITE_SHIFT: u32 = 2 * FIELD_BITS;
const DELETE_SHIFT: u32 = 3 * FIELD_BITS;
const ADMIN_SHIFT: u32 = 4 * FIELD_BITS;

/// Semantic grade to raw code and back.
const GRADE_CODES: [(Grade, u32); 5] = [
    (Grade::None, 0),
    (Grade::Minimal, 1),
    (Grade::Moderate, 2),
    (Grade::Full, 4),
    (Grade::Max, 64),
];

fn raw_code(grade: Grade) -> u32 {
    GRADE_CODES
        .iter()
        .find(|&&(g, _)| g == grade)
        .map(|&(_, code)| code)
        // Every variant is in the table
        .unwrap_or(0)
}

fn grade_of(field: &'static str, code: u32) -> Result<Grade, Error> {
    GRADE_CODES
        .iter()
        .find(|&&(_, c)| c == code)
        .map(|&(g, _)| g)
        .ok_or(Error::CorruptPermissionBits { field, code })
}

fn digit(bits: u32, shift: u32) -> u32 {
    (bits >> shift) & FIELD_MASK
}

/// Pack the given grades into their integer form.
pub fn encode(
    folder: Grade,
    read: Grade,
    write: Grade,
    delete: Grade,
    admin: bool,
) -> u32 {
    [
        admin as u32,
        raw_code(delete),
        raw_code(write),
        raw_code(read),
        raw_code(folder),
    ]
    .iter()
    .fold(0, |accum, &d| accum * RADIX + d)
}

/// Unpack an integer produced by `encode`.
///
/// Fails with `Error::CorruptPermissionBits` if any digit does not correspond
/// to a valid grade or admin flag.
pub fn decode(bits: u32) -> Result<Grades, Error> {
    let admin = match digit(bits, ADMIN_SHIFT) {
        0 => false,
        1 => true,
        code => {
            return Err(Error::CorruptPermissionBits {
                field: "admin",
                code,
            })
        }
    };

    Ok(Grades {
        folder: grade_of("folder", digit(bits, FOLDER_SHIFT))?,
        read: grade_of("read", digit(bits, READ_SHIFT))?,
        write: grade_of("write", digit(bits, WRITE_SHIFT))?,
        delete: grade_of("delete", digit(bits, DELETE_SHIFT))?,
        admin,
    })
}

/// Return the packed form of `Grades::READ_ONLY`.
pub fn read_only_bits() -> u32 {
    PermissionBits::from(Grades::READ_ONLY).0
}

/// A packed permission integer, as stored by backends.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default,
)]
#[serde(transparent)]
pub struct PermissionBits(pub u32);

impl From<Grades> for PermissionBits {
    fn from(g: Grades) -> Self {
        PermissionBits(encode(g.folder, g.read, g.write, g.delete, g.admin))
    }
}

impl TryFrom<PermissionBits> for Grades {
    type Error = Error;

    fn try_from(bits: PermissionBits) -> Result<Self, Error> {
        decode(bits.0)
    }
}
