use crate::consts;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// The best scores achieved so far, highest first
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct HighScores(Vec<ScoreEntry>);

impl HighScores {
    /// Read the high score list stored at `path`.  A missing file is an empty
    /// list.
    pub(crate) fn load(path: &Path) -> Result<HighScores, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HighScores::default()),
            Err(e) => return Err(LoadError::read(e)),
        };
        let mut scores =
            serde_json::from_slice::<HighScores>(&src).map_err(LoadError::deserialize)?;
        scores.normalize();
        Ok(scores)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(self).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }

    pub(crate) fn entries(&self) -> &[ScoreEntry] {
        &self.0
    }

    /// Insert `entry` after all entries with the same or a higher score and
    /// trim the list to [`MAX_HIGH_SCORES`][consts::MAX_HIGH_SCORES] entries.
    /// Returns the entry's zero-based rank if it made the list.
    pub(crate) fn add(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .0
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.0.len());
        if rank >= consts::MAX_HIGH_SCORES {
            return None;
        }
        self.0.insert(rank, entry);
        self.0.truncate(consts::MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Sort a list read from disk, which may have been edited by hand
    fn normalize(&mut self) {
        self.0.sort_by(|a, b| b.score.cmp(&a.score));
        self.0.truncate(consts::MAX_HIGH_SCORES);
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct ScoreEntry {
    pub(crate) name: String,
    pub(crate) score: u32,
    /// When the game ended, in seconds since the Unix epoch
    pub(crate) date: u64,
}

impl ScoreEntry {
    /// The UTC date on which the game ended, as `YYYY-MM-DD`
    pub(crate) fn date_string(&self) -> String {
        let (year, month, day) = civil_date(self.date / 86_400);
        format!("{year:04}-{month:02}-{day:02}")
    }
}

/// Convert a number of days since 1970-01-01 to a `(year, month, day)` date
/// in the proleptic Gregorian calendar
fn civil_date(days: u64) -> (u64, u64, u64) {
    // Count from 0000-03-01 so that leap days fall at the end of each year
    let z = days + 719_468;
    let era = z / 146_097;
    let day_of_era = z % 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let mp = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = era * 400 + year_of_era + u64::from(month <= 2);
    (year, month, day)
}

#[derive(Debug, Error)]
#[error("failed to save high scores to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    pub(crate) fn no_path() -> Self {
        SaveError(SaveErrorSource::NoPath)
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high scores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high scores to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to read high scores from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    pub(crate) fn no_path() -> Self {
        LoadError(LoadErrorSource::NoPath)
    }

    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read high scores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high scores")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case(0, "1970-01-01")]
    #[case(86_399, "1970-01-01")]
    #[case(951_782_400, "2000-02-29")]
    #[case(951_868_800, "2000-03-01")]
    #[case(1_700_000_000, "2023-11-14")]
    #[case(4_107_542_400, "2100-03-01")]
    fn test_date_string(#[case] date: u64, #[case] s: &str) {
        let e = ScoreEntry {
            name: String::from("x"),
            score: 1,
            date,
        };
        assert_eq!(e.date_string(), s);
    }

    fn entry(name: &str, score: u32) -> ScoreEntry {
        ScoreEntry {
            name: name.to_owned(),
            score,
            date: 1_700_000_000,
        }
    }

    fn names(scores: &HighScores) -> Vec<&str> {
        scores.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn add_keeps_order() {
        let mut scores = HighScores::default();
        assert_eq!(scores.add(entry("a", 5)), Some(0));
        assert_eq!(scores.add(entry("b", 9)), Some(0));
        assert_eq!(scores.add(entry("c", 5)), Some(2));
        assert_eq!(scores.add(entry("d", 0)), Some(3));
        assert_eq!(scores.add(entry("e", 7)), Some(1));
        assert_eq!(names(&scores), ["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn add_truncates() {
        let mut scores = HighScores::default();
        for i in 0..consts::MAX_HIGH_SCORES {
            let score = u32::try_from(i).unwrap() + 10;
            assert!(scores.add(entry("x", score)).is_some());
        }
        assert_eq!(scores.entries().len(), consts::MAX_HIGH_SCORES);
        assert_eq!(scores.add(entry("low", 10)), None);
        assert_eq!(scores.add(entry("top", 1000)), Some(0));
        assert_eq!(scores.entries().len(), consts::MAX_HIGH_SCORES);
        assert_eq!(scores.entries().last().map(|e| e.score), Some(11));
    }

    #[test]
    fn load_missing() {
        let tmp = tempdir().unwrap();
        let scores = HighScores::load(&tmp.path().join("scores.json")).unwrap();
        assert_eq!(scores, HighScores::default());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("scores.json");
        let mut scores = HighScores::default();
        scores.add(entry("alice", 12));
        scores.add(entry("bob", 3));
        scores.save(&path).unwrap();
        assert_eq!(HighScores::load(&path).unwrap(), scores);
    }

    #[test]
    fn load_sorts() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scores.json");
        fs_err::write(
            &path,
            r#"[{"name": "low", "score": 1, "date": 0}, {"name": "high", "score": 8, "date": 0}]"#,
        )
        .unwrap();
        let scores = HighScores::load(&path).unwrap();
        assert_eq!(names(&scores), ["high", "low"]);
    }

    #[test]
    fn load_corrupt() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("scores.json");
        fs_err::write(&path, "not json").unwrap();
        assert!(HighScores::load(&path).is_err());
    }
}
