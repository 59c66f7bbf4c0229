use glam::Vec3;
use rand::Rng;

use crate::game::{RECYCLE_X, ROW_RANGE, Session, Sprite};

const OSCILLATION_SPEED: f32 = 0.0075;
const OSCILLATION_BOUND: f32 = 0.75;

/// Visual/geometric variant of a zapper. Each style carries its own
/// hand-tuned collision test; there is no shared geometry code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZapperStyle {
    Vertical,
    Oscillating,
    Horizontal,
    Diagonal,
}

impl ZapperStyle {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..4) {
            0 => Self::Vertical,
            1 => Self::Oscillating,
            2 => Self::Horizontal,
            _ => Self::Diagonal,
        }
    }

    /// Index into the per-style shape and texture tables.
    pub fn index(self) -> usize {
        match self {
            Self::Vertical => 0,
            Self::Oscillating => 1,
            Self::Horizontal => 2,
            Self::Diagonal => 3,
        }
    }
}

/// An obstacle. Touching one ends the run; scrolling off the left edge
/// recycles it forward with a fresh row and style.
#[derive(Debug)]
pub struct Zapper {
    pub sprite: Sprite,
    pub style: ZapperStyle,
    going_up: bool,
}

impl Zapper {
    pub fn new(position: Vec3, rng: &mut impl Rng) -> Self {
        let mut sprite = Sprite::new(position);
        sprite.smoothstep = 1.0;
        sprite.position.y = random_row(rng);
        sprite.reset_model();

        Self {
            sprite,
            style: ZapperStyle::random(rng),
            going_up: true,
        }
    }

    /// Per-frame step: scroll left, recycle if off-screen, oscillate if this
    /// style does, then test the player for a hit.
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
            self.regenerate(rng);
        }

        if self.style == ZapperStyle::Oscillating {
            self.oscillate();
        }

        if self.collides(player_pos) {
            log::info!("zapper collision at x={:.2}", self.sprite.position.x);
            session.zapper_collision = true;
        }
    }

    fn regenerate(&mut self, rng: &mut impl Rng) {
        self.style = ZapperStyle::random(rng);
        self.sprite.position.y = random_row(rng);
        self.sprite.reset_model();
        self.going_up = true;
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

    /// Style-specific hit test against the player's center.
    pub fn collides(&self, player_pos: Vec3) -> bool {
        let dx = (player_pos.x - self.sprite.position.x).abs();
        let dy = (player_pos.y - self.sprite.position.y).abs();

        match self.style {
            ZapperStyle::Vertical | ZapperStyle::Oscillating => dx < 0.075 && dy < 0.40,
            ZapperStyle::Horizontal => dx < 0.245 && dy < 0.11,
            ZapperStyle::Diagonal => {
                // Treat the hazard as the segment between the two corners and
                // ask whether the player sits in a thin band around it, via
                // the two-foci distance trick.
                let (cx, cy) = (self.sprite.position.x, self.sprite.position.y);
                let (lx, ly) = (cx - 0.2, cy - 0.26);
                let (rx, ry) = (cx + 0.2, cy + 0.26);
                let length = 2.0 * (0.2f32 * 0.2 + 0.26 * 0.26).sqrt();

                let to_ends = ((player_pos.x - lx).powi(2) + (player_pos.y - ly).powi(2)).sqrt()
                    + ((player_pos.x - rx).powi(2) + (player_pos.y - ry).powi(2)).sqrt();

                (to_ends - length).abs() < 0.05
            }
        }
    }
}

fn random_row(rng: &mut impl Rng) -> f32 {
    rng.gen_range(-ROW_RANGE..=ROW_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn zapper_with_style(x: f32, y: f32, style: ZapperStyle) -> Zapper {
        let mut zapper = Zapper::new(vec3(x, y, 0.0), &mut rng());
        zapper.sprite.position.y = y;
        zapper.sprite.reset_model();
        zapper.style = style;
        zapper
    }

    #[test]
    fn vertical_styles_use_the_tall_box() {
        let zapper = zapper_with_style(0.0, 0.0, ZapperStyle::Vertical);
        assert!(zapper.collides(vec3(0.05, 0.39, 0.0)));
        assert!(!zapper.collides(vec3(0.08, 0.0, 0.0)));
        assert!(!zapper.collides(vec3(0.0, 0.40, 0.0)));
    }

    #[test]
    fn horizontal_style_uses_the_wide_box() {
        let zapper = zapper_with_style(0.0, 0.0, ZapperStyle::Horizontal);
        // Worked example: dx 0.2 and dy 0.05 is inside 0.245 x 0.11.
        assert!(zapper.collides(vec3(0.2, 0.05, 0.0)));
        assert!(!zapper.collides(vec3(0.25, 0.0, 0.0)));
        assert!(!zapper.collides(vec3(0.0, 0.12, 0.0)));
    }

    #[test]
    fn diagonal_style_hits_along_the_segment_only() {
        let zapper = zapper_with_style(0.0, 0.0, ZapperStyle::Diagonal);
        // On the segment: the center and a corner both collide.
        assert!(zapper.collides(vec3(0.0, 0.0, 0.0)));
        assert!(zapper.collides(vec3(0.2, 0.26, 0.0)));
        // Off to the side of the band.
        assert!(!zapper.collides(vec3(0.2, -0.26, 0.0)));
        assert!(!zapper.collides(vec3(-0.15, 0.26, 0.0)));
    }

    #[test]
    fn recycle_shifts_forward_exactly_once() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut zapper = Zapper::new(vec3(-1.10, 0.0, 0.0), &mut rng);
        zapper.style = ZapperStyle::Vertical;

        let player = vec3(-0.7, -0.7, 0.0);
        zapper.advance(-0.06, &mut session, player, &mut rng);

        // Crossed the -1.15 threshold: shifted forward by 3 * 0.8.
        assert_relative_eq!(zapper.sprite.position.x, -1.16 + 2.4, epsilon = 1e-5);

        let x = zapper.sprite.position.x;
        zapper.advance(0.0, &mut session, player, &mut rng);
        assert_relative_eq!(zapper.sprite.position.x, x, epsilon = 1e-6);
    }

    #[test]
    fn recycles_leave_session_state_untouched() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut zapper = Zapper::new(vec3(-1.0, 0.0, 0.0), &mut rng);

        let player = vec3(5.0, 5.0, 0.0);
        for _ in 0..3 {
            zapper.sprite.position.x = -1.2;
            zapper.advance(0.0, &mut session, player, &mut rng);
        }

        assert_eq!(session.score, 0);
        assert_eq!(session.level, 0);
        assert!(!session.zapper_collision);
    }

    #[test]
    fn oscillating_style_bounces_at_the_bounds() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut zapper = Zapper::new(vec3(3.0, 0.0, 0.0), &mut rng);
        zapper.sprite.position.y = 0.0;
        zapper.sprite.reset_model();
        zapper.style = ZapperStyle::Oscillating;

        let player = vec3(-5.0, -5.0, 0.0);
        for _ in 0..500 {
            zapper.advance(0.0, &mut session, player, &mut rng);
            let y = zapper.sprite.position.y;
            assert!(y >= -0.76 && y <= 0.76);
        }
        // 500 steps of 0.0075 is well past one bound, so it must have turned.
        assert!(!zapper.going_up || zapper.sprite.position.y < OSCILLATION_BOUND);
    }

    #[test]
    fn collision_flag_is_sticky() {
        let mut rng = rng();
        let mut session = Session::new();
        let mut zapper = Zapper::new(vec3(0.0, 0.0, 0.0), &mut rng);
        zapper.sprite.position.y = 0.0;
        zapper.sprite.reset_model();
        zapper.style = ZapperStyle::Vertical;

        zapper.advance(0.0, &mut session, vec3(0.0, 0.0, 0.0), &mut rng);
        assert!(session.zapper_collision);

        zapper.advance(0.0, &mut session, vec3(5.0, 5.0, 0.0), &mut rng);
        assert!(session.zapper_collision);
    }
}
