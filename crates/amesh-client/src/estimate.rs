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

//! Latest mesh index estimation.
//!
//! Amesh publishes a frame every [`UPDATE_INTERVAL_MINUTES`], a few minutes
//! after the nominal time. Candidates are derived from the wall clock alone,
//! newest first, so callers can probe for the latest frame without fetching
//! the index listing.

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};

use crate::mesh::{jst, MeshIndex};

/// Nominal publication cadence of the service.
pub const UPDATE_INTERVAL_MINUTES: u32 = 5;

/// Number of candidates tried when resolving the latest image.
pub const DEFAULT_CANDIDATE_COUNT: usize = 3;

/// Candidate mesh indices for the current wall-clock time.
#[must_use]
pub fn latest_candidates(max: usize) -> Vec<MeshIndex> {
    latest_candidates_at(&Utc::now(), max)
}

/// Candidate mesh indices for `now`, most recent first.
///
/// The first candidate is `now` in JST with minutes floored to the cadence;
/// each following one steps back one interval. For 2017-05-30 13:06 JST and
/// `max = 3` this yields `201705301305`, `201705301300`, `201705301255`.
#[must_use]
pub fn latest_candidates_at<Tz: TimeZone>(now: &DateTime<Tz>, max: usize) -> Vec<MeshIndex> {
    let local = now.with_timezone(&jst());
    let excess = TimeDelta::minutes(i64::from(local.minute() % UPDATE_INTERVAL_MINUTES))
        + TimeDelta::seconds(i64::from(local.second()))
        + TimeDelta::nanoseconds(i64::from(local.nanosecond()));
    let newest = local - excess;
    let step = TimeDelta::minutes(i64::from(UPDATE_INTERVAL_MINUTES));

    std::iter::successors(Some(newest), |time| Some(*time - step))
        .take(max)
        .map(|time| MeshIndex::from_datetime(&time))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn jst_time(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn tokens(indices: &[MeshIndex]) -> Vec<&str> {
        indices.iter().map(MeshIndex::as_str).collect()
    }

    #[test]
    fn test_documented_example() {
        let candidates = latest_candidates_at(&jst_time(2017, 5, 30, 13, 6, 0), 3);
        assert_eq!(
            tokens(&candidates),
            vec!["201705301305", "201705301300", "201705301255"]
        );
    }

    #[test]
    fn test_length_and_spacing() {
        let now = jst_time(2023, 8, 14, 9, 59, 59);
        for max in [1, 2, 7, 30] {
            let candidates = latest_candidates_at(&now, max);
            assert_eq!(candidates.len(), max);

            for pair in candidates.windows(2) {
                let gap = pair[0].to_datetime() - pair[1].to_datetime();
                assert_eq!(gap, TimeDelta::minutes(5));
            }
            for candidate in &candidates {
                assert_eq!(candidate.to_datetime().minute() % 5, 0);
            }
        }
    }

    #[test]
    fn test_zero_max_is_empty() {
        assert!(latest_candidates_at(&jst_time(2017, 5, 30, 13, 6, 0), 0).is_empty());
    }

    #[test]
    fn test_exact_boundary_is_kept() {
        let candidates = latest_candidates_at(&jst_time(2017, 5, 30, 13, 5, 0), 1);
        assert_eq!(tokens(&candidates), vec!["201705301305"]);
    }

    #[test]
    fn test_rolls_over_year_boundary() {
        let candidates = latest_candidates_at(&jst_time(2018, 1, 1, 0, 3, 12), 3);
        assert_eq!(
            tokens(&candidates),
            vec!["201801010000", "201712312355", "201712312350"]
        );
    }

    #[test]
    fn test_converts_from_utc() {
        // 04:06 UTC is 13:06 JST
        let utc = Utc.with_ymd_and_hms(2017, 5, 30, 4, 6, 0).unwrap();
        let candidates = latest_candidates_at(&utc, 1);
        assert_eq!(tokens(&candidates), vec!["201705301305"]);
    }

    #[test]
    fn test_utc_day_behind_jst() {
        // 20:58 UTC on the 31st is 05:58 JST on June 1st
        let utc = Utc.with_ymd_and_hms(2017, 5, 31, 20, 58, 0).unwrap();
        let candidates = latest_candidates_at(&utc, 1);
        assert_eq!(tokens(&candidates), vec!["201706010555"]);
    }
}
