use glam::Vec3;

use crate::game::{RECYCLE_X, Session, Sprite};

const TRIGGER_BAND: f32 = 0.1;
const MAX_LEVEL: usize = 3;

/// Invisible trigger line marking the end of a level lap. While the player
/// is inside the trigger band it re-zeros the travelled distance every
/// frame; the level itself advances once per pass.
#[derive(Debug)]
pub struct LevelChanger {
    pub sprite: Sprite,
    fired: bool,
}

impl LevelChanger {
    pub fn new(position: Vec3) -> Self {
        Self {
            sprite: Sprite::new(position),
            fired: false,
        }
    }

    pub fn advance(&mut self, dx: f32, session: &mut Session, player_x: f32) {
        self.sprite.advance(dx, 0.0, 0.0);

        if (self.sprite.position.x - player_x).abs() < TRIGGER_BAND {
            session.started = true;
            session.travelled = 0.0;

            if !self.fired {
                session.level += 1;
                if session.level > MAX_LEVEL {
                    session.level = MAX_LEVEL;
                    session.game_won = true;
                    log::info!("final level lap complete, game won");
                } else {
                    log::info!("advancing to level {}", session.level);
                }
                self.fired = true;
            }
        }

        if self.sprite.position.x <= RECYCLE_X {
            self.sprite.translate_by(session.lap_shift(), 0.0, 0.0);
            self.fired = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;

    fn changer_at(x: f32) -> LevelChanger {
        LevelChanger::new(vec3(x, -0.4, 0.0))
    }

    #[test]
    fn one_pass_advances_the_level_once() {
        let mut session = Session::new();
        let mut changer = changer_at(-0.65);

        // Several frames inside the band: level moves once, travelled
        // re-zeros every frame.
        for _ in 0..5 {
            session.travelled = 3.0;
            changer.advance(0.0, &mut session, -0.7);
            assert_relative_eq!(session.travelled, 0.0);
        }

        assert_eq!(session.level, 1);
        assert!(session.started);
        assert!(!session.game_won);
    }

    #[test]
    fn fourth_pass_wins_and_clamps_the_level() {
        let mut session = Session::new();
        let mut changer = changer_at(-0.65);

        for pass in 1..=4 {
            changer.sprite.position.x = -0.65;
            changer.sprite.reset_model();
            changer.advance(0.0, &mut session, -0.7);

            // Scroll it out so the recycle re-arms the next pass.
            changer.sprite.position.x = -1.2;
            changer.advance(0.0, &mut session, 5.0);

            if pass < 4 {
                assert_eq!(session.level, pass);
                assert!(!session.game_won);
            }
        }

        assert_eq!(session.level, 3);
        assert!(session.game_won);
    }

    #[test]
    fn win_flag_stays_set() {
        let mut session = Session::new();
        session.game_won = true;
        let mut changer = changer_at(3.0);

        changer.advance(-0.01, &mut session, -0.7);
        assert!(session.game_won);
    }

    #[test]
    fn recycle_translates_one_full_lap_forward() {
        let mut session = Session::new();
        let mut changer = changer_at(-1.14);

        changer.advance(-0.02, &mut session, 5.0);
        assert_relative_eq!(changer.sprite.position.x, -1.16 + 12.0, epsilon = 1e-5);
    }

    #[test]
    fn level_is_monotone_and_bounded() {
        let mut session = Session::new();
        let mut changer = changer_at(-0.65);

        let mut last = session.level;
        for _ in 0..10 {
            changer.sprite.position.x = -0.65;
            changer.sprite.reset_model();
            changer.advance(0.0, &mut session, -0.7);
            changer.sprite.position.x = -1.2;
            changer.advance(0.0, &mut session, 5.0);

            assert!(session.level >= last);
            assert!(session.level <= 3);
            last = session.level;
        }
    }
}
