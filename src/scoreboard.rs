//! In-memory leaderboard. Lives for the whole process; a new round does not clear it.

use chrono::NaiveDate;
use thiserror::Error;

/// Entries kept after each submission.
pub const MAX_ENTRIES: usize = 10;

/// Longest accepted player name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub recorded_at: NaiveDate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("name is empty")]
    EmptyName,
    #[error("name is {len} characters; at most {} allowed", MAX_NAME_LEN)]
    NameTooLong { len: usize },
    #[error("the round is still running")]
    RoundInProgress,
    #[error("a score was already submitted for this round")]
    AlreadySubmitted,
}

/// Trim and check a player name.
pub fn validate_name(name: &str) -> Result<&str, ScoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScoreError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ScoreError::NameTooLong { len });
    }
    Ok(name)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best first.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Record a score. Returns the 1-based rank, or `None` if it did not make the table.
    /// Ties keep earlier entries ahead.
    pub fn submit(
        &mut self,
        name: &str,
        score: u64,
        recorded_at: NaiveDate,
    ) -> Result<Option<usize>, ScoreError> {
        let name = validate_name(name)?;
        // Entries are kept sorted, so inserting after every score >= this one
        // is the same as appending and stable-sorting.
        let pos = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            pos,
            ScoreEntry {
                name: name.to_string(),
                score,
                recorded_at,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        Ok((pos < MAX_ENTRIES).then_some(pos + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn rejects_bad_names() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.submit("   ", 10, day()), Err(ScoreError::EmptyName));
        assert_eq!(
            board.submit("abcdefghijklmnopqrstu", 10, day()),
            Err(ScoreError::NameTooLong { len: 21 })
        );
        assert!(board.entries().is_empty());
    }

    #[test]
    fn trims_and_accepts_twenty_chars() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.submit("  abcdefghijklmnopqrst ", 5, day()), Ok(Some(1)));
        assert_eq!(board.entries()[0].name, "abcdefghijklmnopqrst");
        // Counted in characters, not bytes.
        assert_eq!(board.submit("ééééééééééééééééééé", 4, day()), Ok(Some(2)));
    }

    #[test]
    fn sorted_descending_and_capped() {
        let mut board = ScoreBoard::new();
        for score in [5, 50, 20, 80, 1, 30, 70, 10, 60, 40, 90, 3] {
            board.submit("p", score, day()).unwrap();
        }
        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![90, 80, 70, 60, 50, 40, 30, 20, 10, 5]);
    }

    #[test]
    fn rank_reporting() {
        let mut board = ScoreBoard::new();
        for score in 1..=10 {
            board.submit("p", score * 10, day()).unwrap();
        }
        assert_eq!(board.submit("low", 1, day()), Ok(None));
        assert_eq!(board.submit("mid", 55, day()), Ok(Some(6)));
        assert_eq!(board.entries().len(), MAX_ENTRIES);
    }

    #[test]
    fn ties_keep_earlier_entry_first() {
        let mut board = ScoreBoard::new();
        board.submit("first", 100, day()).unwrap();
        assert_eq!(board.submit("second", 100, day()), Ok(Some(2)));
        assert_eq!(board.entries()[0].name, "first");
    }
}
