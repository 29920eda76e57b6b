// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mesh index tokens.
//!
//! Amesh identifies every radar frame by a 12-digit `YYYYMMDDHHmm` token in
//! Japan Standard Time. [`MeshIndex`] guarantees the token is well formed and
//! names a real calendar date/time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::error::{ClientError, Result};

/// UTC offset of the Amesh service, in minutes (JST).
pub const UTC_OFFSET_MINUTES: i32 = 540;

/// Number of digits in a mesh index token.
pub const MESH_INDEX_LEN: usize = 12;

const TOKEN_FORMAT: &str = "%Y%m%d%H%M";

/// The fixed JST offset used for every mesh index.
#[must_use]
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(UTC_OFFSET_MINUTES * 60).expect("JST offset is within a day")
}

/// A validated 12-digit radar frame identifier.
///
/// Ordering is lexicographic, which for fixed-width tokens is also
/// chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshIndex(String);

impl MeshIndex {
    /// Parse and validate a mesh index token.
    pub fn parse(token: &str) -> Result<Self> {
        to_datetime(token)?;
        Ok(Self(token.to_string()))
    }

    /// Build the mesh index for a point in time, truncated to the minute.
    ///
    /// The JST year must lie in 0000..=9999; other years do not fit the
    /// 12-digit token and [`MeshIndex::to_datetime`] would panic on them.
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self(time.with_timezone(&jst()).format(TOKEN_FORMAT).to_string())
    }

    /// The frame time in JST.
    #[must_use]
    pub fn to_datetime(&self) -> DateTime<FixedOffset> {
        // Validated at construction.
        to_datetime(&self.0).expect("mesh index validated on construction")
    }

    /// The raw 12-digit token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeshIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MeshIndex {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for MeshIndex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convert a raw token into its JST date/time.
///
/// Components are sliced by position: year `[0..4]`, month `[4..6]`,
/// day `[6..8]`, hour `[8..10]`, minute `[10..12]`.
pub fn to_datetime(token: &str) -> Result<DateTime<FixedOffset>> {
    if token.len() != MESH_INDEX_LEN || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::Format(format!(
            "mesh index must be {MESH_INDEX_LEN} digits, got {token:?}"
        )));
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        // All bytes are ASCII digits, so every slice is a valid number.
        token[range].parse().unwrap_or(0)
    };

    let year = i32::try_from(field(0..4)).unwrap_or(0);
    let naive = NaiveDate::from_ymd_opt(year, field(4..6), field(6..8))
        .and_then(|date| date.and_hms_opt(field(8..10), field(10..12), 0))
        .ok_or_else(|| {
            ClientError::Format(format!("mesh index {token:?} is not a valid date/time"))
        })?;

    naive
        .and_local_timezone(jst())
        .single()
        .ok_or_else(|| ClientError::Format(format!("mesh index {token:?} is ambiguous")))
}
