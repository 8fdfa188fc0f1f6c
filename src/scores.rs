//! Per-level best results
//!
//! Pure bookkeeping: record completions, answer whether a run improved on
//! the stored best, and sum stars across levels. Serializable so the shell
//! can persist it however it likes; no I/O here.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub best_time: f32,
    pub best_stars: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    records: BTreeMap<String, LevelRecord>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run. Time and stars improve independently, so a
    /// slower run with more stars still updates the star record. Returns
    /// true when either best improved.
    pub fn record(&mut self, level: &str, time: f32, stars: u8) -> bool {
        match self.records.get_mut(level) {
            Some(record) => {
                let mut improved = false;
                if time < record.best_time {
                    record.best_time = time;
                    improved = true;
                }
                if stars > record.best_stars {
                    record.best_stars = stars;
                    improved = true;
                }
                if improved {
                    info!(
                        "new best for '{level}': {:.2}s, {} stars",
                        record.best_time, record.best_stars
                    );
                }
                improved
            }
            None => {
                self.records.insert(
                    level.to_owned(),
                    LevelRecord {
                        best_time: time,
                        best_stars: stars,
                    },
                );
                info!("first completion of '{level}': {time:.2}s, {stars} stars");
                true
            }
        }
    }

    pub fn get(&self, level: &str) -> Option<&LevelRecord> {
        self.records.get(level)
    }

    /// Total stars across all completed levels
    pub fn total_stars(&self) -> u32 {
        self.records.values().map(|r| u32::from(r.best_stars)).sum()
    }

    pub fn completed_levels(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_completion_always_records() {
        let mut board = ScoreBoard::new();
        assert!(board.record("1-1", 22.5, 2));
        let record = board.get("1-1").unwrap();
        assert_eq!(record.best_time, 22.5);
        assert_eq!(record.best_stars, 2);
    }

    #[test]
    fn test_worse_run_does_not_overwrite() {
        let mut board = ScoreBoard::new();
        board.record("1-1", 14.0, 3);
        assert!(!board.record("1-1", 20.0, 2));
        assert_eq!(board.get("1-1").unwrap().best_time, 14.0);
        assert_eq!(board.get("1-1").unwrap().best_stars, 3);
    }

    #[test]
    fn test_time_and_stars_improve_independently() {
        let mut board = ScoreBoard::new();
        board.record("1-2", 40.0, 1);
        // Slower than stored? No. Faster time, fewer stars than possible
        assert!(board.record("1-2", 25.0, 2));
        let record = board.get("1-2").unwrap();
        assert_eq!(record.best_time, 25.0);
        assert_eq!(record.best_stars, 2);

        // Slower run with more stars keeps the faster time
        assert!(board.record("1-2", 35.0, 3));
        let record = board.get("1-2").unwrap();
        assert_eq!(record.best_time, 25.0);
        assert_eq!(record.best_stars, 3);
    }

    #[test]
    fn test_total_stars() {
        let mut board = ScoreBoard::new();
        board.record("1-1", 10.0, 3);
        board.record("1-2", 50.0, 1);
        board.record("2-1", 20.0, 2);
        assert_eq!(board.total_stars(), 6);
        assert_eq!(board.completed_levels(), 3);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut board = ScoreBoard::new();
        board.record("1-1", 12.0, 3);
        let json = serde_json::to_string(&board).unwrap();
        let back: ScoreBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("1-1"), board.get("1-1"));
    }
}
