use glam::Vec3;
use rand::Rng;

use crate::game::{RECYCLE_X, ROW_RANGE, Session, Sprite};

const OSCILLATION_SPEED: f32 = 0.0075;
const OSCILLATION_BOUND: f32 = 0.75;
const X_BIAS_RANGE: f32 = 0.2;
const OSCILLATION_THRESHOLD: f32 = 0.7;
const ELLIPSE_A: f32 = 0.03;
const ELLIPSE_B: f32 = 0.1;

/// A collectible. Some coin lives oscillate vertically; whether this one
/// does is a single random draw made at spawn, not re-rolled per frame.
/// A picked-up coin keeps scrolling as an invisible zero-size quad until it
/// recycles, so it can never score twice in one life.
#[derive(Debug)]
pub struct Coin {
    pub sprite: Sprite,
    pub exists: bool,
    going_up: bool,
    oscillation_draw: f32,
    x_bias: f32,
}

impl Coin {
    pub fn new(position: Vec3, rng: &mut impl Rng) -> Self {
        let mut coin = Self {
            sprite: Sprite::new(position),
            exists: true,
            going_up: true,
            oscillation_draw: 0.0,
            x_bias: 0.0,
        };
        coin.roll(rng);
        coin
    }

    /// Redraws the per-life random state: row, horizontal bias, and the
    /// oscillation draw; the coin exists again afterwards.
    fn roll(&mut self, rng: &mut impl Rng) {
        self.sprite.position.y = rng.gen_range(-ROW_RANGE..=ROW_RANGE);
        self.x_bias = rng.gen_range(-X_BIAS_RANGE..=X_BIAS_RANGE);
        self.sprite.position.x += self.x_bias;
        self.sprite.reset_model();

        self.oscillation_draw = rng.r#gen();
        self.exists = true;
    }

    /// Per-frame step: scroll left, recycle if off-screen, oscillate if this
    /// life drew oscillation, then test for pickup.
    pub fn advance(
        &mut self,
        dx: f32,
        session: &mut Session,
        player_pos: Vec3,
        rng: &mut impl Rng,
    ) {
        self.sprite.advance(dx, 0.0, 0.0);

        if self.sprite.position.x <= RECYCLE_X {
            self.sprite.translate_by(session.recycle_shift(), 0.0, 0.0);
            // Undo this life's bias so biases never accumulate across lives.
            self.sprite.position.x -= self.x_bias;
            self.roll(rng);
        }

        if self.oscillation_draw > OSCILLATION_THRESHOLD {
            self.oscillate();
        }

        self.check_pickup(session, player_pos);
    }

    fn oscillate(&mut self) {
        let step = if self.going_up {
            OSCILLATION_SPEED
        } else {
            -OSCILLATION_SPEED
        };
        self.sprite.translate_by(0.0, step, 0.0);

        if self.sprite.position.y >= OSCILLATION_BOUND {
            self.going_up = false;
        }
        if self.sprite.position.y <= -OSCILLATION_BOUND {
            self.going_up = true;
        }
    }

    fn check_pickup(&mut self, session: &mut Session, player_pos: Vec3) {
        if !self.exists {
            return;
        }

        if self.overlaps(player_pos) {
            session.score += 1;
            self.exists = false;
            log::debug!("coin collected, score {}", session.score);
        }
    }

    /// Normalized elliptical distance test, strict `< 1`.
    pub fn overlaps(&self, player_pos: Vec3) -> bool {
        let dx = player_pos.x - self.sprite.position.x;
        let dy = player_pos.y - self.sprite.position.y;
        dx * dx / ELLIPSE_A + dy * dy / ELLIPSE_B < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn still_coin(x: f32, y: f32) -> Coin {
        let mut coin = Coin::new(vec3(x, y, 0.0), &mut rng());
        coin.sprite.position = vec3(x, y, 0.0);
        coin.sprite.reset_model();
        coin.oscillation_draw = 0.0;
        coin
    }

    #[test]
    fn pickup_scores_exactly_once() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut coin = still_coin(0.0, 0.0);

        let player = vec3(0.05, 0.05, 0.0);
        coin.advance(0.0, &mut session, player, &mut rng);
        assert_eq!(session.score, 1);
        assert!(!coin.exists);

        // Still overlapping, but consumed: no double scoring.
        coin.advance(0.0, &mut session, player, &mut rng);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn boundary_distance_of_one_does_not_collect() {
        let coin = still_coin(0.0, 0.0);
        // dx^2 / 0.03 == 1 exactly at dx = sqrt(0.03).
        let dx = 0.03f32.sqrt();
        assert!(!coin.overlaps(vec3(dx, 0.0, 0.0)));
        assert!(coin.overlaps(vec3(dx - 1e-3, 0.0, 0.0)));
    }

    #[test]
    fn recycle_restores_existence_and_swaps_bias() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut coin = still_coin(0.0, 0.0);
        coin.exists = false;

        let old_bias = coin.x_bias;
        coin.sprite.position.x = -1.2;
        coin.sprite.reset_model();

        let player = vec3(5.0, 5.0, 0.0);
        coin.advance(0.0, &mut session, player, &mut rng);

        assert!(coin.exists);
        // Forward by 2.4, the old bias undone, the new one applied.
        let expected = -1.2 + session.recycle_shift() - old_bias + coin.x_bias;
        assert_relative_eq!(coin.sprite.position.x, expected, epsilon = 1e-5);
        assert!(coin.x_bias.abs() <= X_BIAS_RANGE);
    }

    #[test]
    fn oscillation_is_a_per_life_draw() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut coin = still_coin(2.0, 0.0);
        coin.oscillation_draw = 0.9;

        let player = vec3(-5.0, -5.0, 0.0);
        let y = coin.sprite.position.y;
        coin.advance(0.0, &mut session, player, &mut rng);
        assert_relative_eq!(coin.sprite.position.y, y + OSCILLATION_SPEED, epsilon = 1e-6);

        coin.oscillation_draw = 0.2;
        let y = coin.sprite.position.y;
        coin.advance(0.0, &mut session, player, &mut rng);
        assert_relative_eq!(coin.sprite.position.y, y, epsilon = 1e-6);
    }

    #[test]
    fn score_is_monotone_across_recycles() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut coin = still_coin(0.0, 0.0);

        let player = vec3(0.0, 0.0, 0.0);
        coin.advance(0.0, &mut session, player, &mut rng);
        let scored = session.score;
        assert_eq!(scored, 1);

        for _ in 0..3 {
            coin.sprite.position.x = -1.2;
            coin.sprite.reset_model();
            coin.advance(0.0, &mut session, vec3(5.0, 5.0, 0.0), &mut rng);
            assert!(session.score >= scored);
        }
    }
}
