use crate::config::Config;
use crate::highscores::{HighScores, LoadError, SaveError, ScoreEntry};
use enum_map::Enum;
use log::{info, warn};
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::time::{SystemTime, UNIX_EPOCH};

/// State shared by every screen for the lifetime of the program
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Globals {
    pub(crate) config: Config,
    /// Name that new scores are recorded under
    pub(crate) player: String,
    pub(crate) high_scores: HighScores,
}

impl Globals {
    /// Set up program-wide state.  If high scores are enabled but can't be
    /// read, a warning is logged and the game starts with an empty list.
    pub(crate) fn new(config: Config, cli_name: Option<&str>) -> Globals {
        let player = config.player_name(cli_name);
        let high_scores = if config.files.save_high_scores {
            match load_high_scores(&config) {
                Ok(scores) => scores,
                Err(e) => {
                    warn!("{:#}", anyhow::Error::new(e));
                    HighScores::default()
                }
            }
        } else {
            HighScores::default()
        };
        Globals {
            config,
            player,
            high_scores,
        }
    }

    /// Add a finished game's score to the in-memory list, returning its rank
    /// if it made the list
    pub(crate) fn record_score(&mut self, score: u32) -> Option<usize> {
        let date = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let rank = self.high_scores.add(ScoreEntry {
            name: self.player.clone(),
            score,
            date,
        });
        match rank {
            Some(r) => info!("{} scored {score}, rank #{}", self.player, r + 1),
            None => info!("{} scored {score}, not a high score", self.player),
        }
        rank
    }

    /// Write the high score list to disk, if enabled
    pub(crate) fn save_high_scores(&self) -> Result<(), SaveError> {
        if !self.config.files.save_high_scores {
            return Ok(());
        }
        let path = self
            .config
            .high_scores_file()
            .ok_or_else(SaveError::no_path)?;
        self.high_scores.save(&path)
    }
}

fn load_high_scores(config: &Config) -> Result<HighScores, LoadError> {
    let path = config.high_scores_file().ok_or_else(LoadError::no_path)?;
    HighScores::load(&path)
}

/// Return a `Rect` of the given size centered within `area`, shrunk to fit if
/// necessary
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [area] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Stepping through the variants of a fieldless enum in declaration order
pub(crate) trait EnumExt: Enum + Sized {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}
