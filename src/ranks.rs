//! Rank table shown at game over
//!
//! Ranks are 15k-point bands with a capped top band. Pure presentation data:
//! the simulation never consults it.

use serde::{Deserialize, Serialize};

/// Width of one rank band
pub const RANK_BAND: u64 = 15_000;
/// Scores at or above this beat the creator's best run (123,790)
pub const BEAT_THE_GAME: u64 = 124_000;

pub const RANK_NAMES: [&str; 8] = [
    "Typical Engineer",
    "Couch Potato",
    "Weekend Jogger",
    "Daily Runner",
    "Local Prospect",
    "Regional Star",
    "National Champ",
    "Second Mo Farah",
];

const TOP_BAND: usize = RANK_NAMES.len() - 1;

/// Rank earned by a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    /// Index into `RANK_NAMES`
    Band(usize),
    BeatTheGame,
}

impl Rank {
    pub fn for_score(score: u64) -> Self {
        if score >= BEAT_THE_GAME {
            Rank::BeatTheGame
        } else {
            Rank::Band(((score / RANK_BAND) as usize).min(TOP_BAND))
        }
    }

    /// Band title; beating the game has no title of its own
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Rank::Band(index) => Some(RANK_NAMES[(*index).min(TOP_BAND)]),
            Rank::BeatTheGame => None,
        }
    }

    /// Score range label, e.g. "30k-45k"
    pub fn range_label(&self) -> String {
        match *self {
            Rank::Band(index) if index < TOP_BAND => {
                let from = index as u64 * RANK_BAND / 1000;
                format!("{}k-{}k", from, from + RANK_BAND / 1000)
            }
            Rank::Band(_) => "105k-124k".to_string(),
            Rank::BeatTheGame => "124k+".to_string(),
        }
    }

    pub fn congratulations(&self) -> String {
        match self {
            Rank::Band(index) => {
                format!("Congrats! You're a {}!", RANK_NAMES[(*index).min(TOP_BAND)])
            }
            Rank::BeatTheGame => {
                "Congrats! You exceeded the creator's high score of 123790 and beat the game!"
                    .to_string()
            }
        }
    }

    /// The rank to aim for next, if any
    pub fn next(&self) -> Option<Rank> {
        match *self {
            Rank::Band(index) if index < TOP_BAND => Some(Rank::Band(index + 1)),
            Rank::Band(_) => Some(Rank::BeatTheGame),
            Rank::BeatTheGame => None,
        }
    }

    /// Every band below the one `score` earns, lowest first
    ///
    /// The top band only counts as beaten strictly above `BEAT_THE_GAME`.
    pub fn ranks_below(score: u64) -> Vec<Rank> {
        let mut count = ((score / RANK_BAND) as usize).min(TOP_BAND);
        if score > BEAT_THE_GAME {
            count = RANK_NAMES.len();
        }
        (0..count).map(Rank::Band).collect()
    }
}
