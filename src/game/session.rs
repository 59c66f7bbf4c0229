/// Process-wide mutable game state for one run.
///
/// Score and level only ever grow; the collision and win flags are sticky
/// once set.
#[derive(Debug, Clone)]
pub struct Session {
    pub score: u32,
    pub level: usize,
    pub zapper_collision: bool,
    pub game_won: bool,
    /// Distance scrolled since the last level change, in world units.
    pub travelled: f32,
    pub started: bool,
    /// Spacing between consecutive recycled sprites of one kind.
    pub sprite_dist: f32,
    /// How many zappers (and coins) are live at once.
    pub sprite_count: usize,
    pub sprites_per_level: usize,
    pub level_length: f32,
    scroll_speeds: [f32; 4],
}

impl Session {
    pub fn new() -> Self {
        let sprite_dist = 0.8;
        let sprites_per_level = 15;

        Self {
            score: 0,
            level: 0,
            zapper_collision: false,
            game_won: false,
            travelled: 0.0,
            started: false,
            sprite_dist,
            sprite_count: 3,
            sprites_per_level,
            level_length: sprites_per_level as f32 * sprite_dist,
            scroll_speeds: [0.45, 0.50, 0.70, 0.80],
        }
    }

    /// Leftward scroll speed for the current level, in units per second.
    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speeds[self.level]
    }

    /// Forward shift applied when a zapper or coin is recycled.
    pub fn recycle_shift(&self) -> f32 {
        self.sprite_count as f32 * self.sprite_dist
    }

    /// Forward shift applied when the level changer is recycled; one full lap.
    pub fn lap_shift(&self) -> f32 {
        self.sprites_per_level as f32 * self.sprite_dist
    }

    pub fn is_over(&self) -> bool {
        self.zapper_collision || self.game_won
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scroll_speed_follows_the_level_table() {
        let mut session = Session::new();
        assert_relative_eq!(session.scroll_speed(), 0.45);

        session.level = 3;
        assert_relative_eq!(session.scroll_speed(), 0.80);
    }

    #[test]
    fn shift_distances_derive_from_spacing() {
        let session = Session::new();
        assert_relative_eq!(session.recycle_shift(), 2.4, epsilon = 1e-6);
        assert_relative_eq!(session.lap_shift(), 12.0, epsilon = 1e-6);
        assert_relative_eq!(session.level_length, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn over_when_either_flag_is_set() {
        let mut session = Session::new();
        assert!(!session.is_over());

        session.game_won = true;
        assert!(session.is_over());

        let mut session = Session::new();
        session.zapper_collision = true;
        assert!(session.is_over());
    }
}
