use log::info;

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub score: Option<u32>,
}

/// Round-robin player rotation: each player gets one round per pass, scores
/// are collected as rounds finish, and the session ends when everyone played.
#[derive(Debug, Default)]
pub struct Rotation {
    players: Vec<Player>,
    active: usize,
}

impl Rotation {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            players: names
                .into_iter()
                .map(|name| Player {
                    name: name.into(),
                    score: None,
                })
                .collect(),
            active: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Whose turn it is; `None` once the session is finished.
    pub fn active_player(&self) -> Option<&str> {
        (!self.is_finished()).then(|| self.players[self.active].name.as_str())
    }

    /// Records the finished round's score for the active player and advances
    /// the rotation.
    pub fn record_score(&mut self, score: u32) {
        if self.is_finished() {
            return;
        }
        let player = &mut self.players[self.active];
        player.score = Some(score);
        info!("{} scored {}", player.name, score);
        self.active += 1;
    }

    /// True once every player has a recorded score (vacuously for an empty
    /// roster).
    pub fn is_finished(&self) -> bool {
        self.active >= self.players.len()
    }

    /// Highest score wins; ties go to whoever played first.
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_finished() {
            return None;
        }
        let mut best: Option<(&Player, u32)> = None;
        for player in &self.players {
            if let Some(score) = player.score {
                if best.map_or(true, |(_, b)| score > b) {
                    best = Some((player, score));
                }
            }
        }
        best.map(|(player, _)| player)
    }

    /// New session with the same roster.
    pub fn restart(&mut self) {
        for player in &mut self.players {
            player.score = None;
        }
        self.active = 0;
        info!("Session restarted with {} players", self.players.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_and_collects_scores() {
        let mut rotation = Rotation::new(["Ada", "Ben", "Cho"]);
        assert_eq!(rotation.active_player(), Some("Ada"));
        rotation.record_score(120);
        assert_eq!(rotation.active_player(), Some("Ben"));
        rotation.record_score(340);
        rotation.record_score(340);
        assert!(rotation.is_finished());
        assert_eq!(rotation.active_player(), None);
        // Late scores after the session ended are dropped.
        rotation.record_score(999);
        assert_eq!(rotation.players()[2].score, Some(340));
    }

    #[test]
    fn winner_is_highest_first_on_tie() {
        let mut rotation = Rotation::new(["Ada", "Ben", "Cho"]);
        assert!(rotation.winner().is_none());
        rotation.record_score(200);
        rotation.record_score(350);
        rotation.record_score(350);
        assert_eq!(rotation.winner().unwrap().name, "Ben");
    }

    #[test]
    fn restart_clears_scores_and_rewinds() {
        let mut rotation = Rotation::new(["Ada", "Ben"]);
        rotation.record_score(10);
        rotation.record_score(20);
        rotation.restart();
        assert!(!rotation.is_finished());
        assert_eq!(rotation.active_player(), Some("Ada"));
        assert!(rotation.players().iter().all(|p| p.score.is_none()));
    }

    #[test]
    fn empty_roster_is_finished_immediately() {
        let rotation = Rotation::new(Vec::<String>::new());
        assert!(rotation.is_finished());
        assert!(rotation.winner().is_none());
    }
}
