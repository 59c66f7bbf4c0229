use glam::{Mat4, Vec3, vec3};

/// Shared positional component: a position in NDC-ish world units and the
/// model matrix derived from it. Every entity owns one of these instead of
/// carrying its own transform math.
///
/// Invariant: the model always equals translation-by-current-position, since
/// no entity keeps a rotation across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub position: Vec3,
    pub model: Mat4,
    /// Scalar handed to the fragment stage to blend the "jetpack thrust"
    /// transition effect. Rendering-only, never read by gameplay.
    pub smoothstep: f32,
}

impl Sprite {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            model: Mat4::from_translation(position),
            smoothstep: 0.0,
        }
    }

    /// Composes a translation into the model and moves the position with it.
    pub fn translate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        let delta = vec3(dx, dy, dz);
        self.model *= Mat4::from_translation(delta);
        self.position += delta;
    }

    /// Rotates about the sprite's own current position: translate to the
    /// origin, rotate around z, translate back.
    pub fn rotate_by(&mut self, degrees: f32) {
        let pos = self.position;
        self.translate_by(-pos.x, -pos.y, -pos.z);
        self.model *= Mat4::from_rotation_z(degrees.to_radians());
        self.translate_by(pos.x, pos.y, pos.z);
    }

    /// Per-frame hook: apply the scroll delta for this frame and yield the
    /// model to submit for rendering.
    pub fn advance(&mut self, dx: f32, dy: f32, dz: f32) -> Mat4 {
        self.translate_by(dx, dy, dz);
        self.model
    }

    /// Rebuilds the model from the current position. Used after a recycle
    /// teleports the position directly.
    pub fn reset_model(&mut self) {
        self.model = Mat4::from_translation(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn translate_moves_position_and_model_together() {
        let mut sprite = Sprite::new(vec3(1.0, -0.5, 0.0));
        sprite.translate_by(-0.25, 0.1, 0.0);

        assert_relative_eq!(sprite.position.x, 0.75);
        assert_relative_eq!(sprite.position.y, -0.4);
        assert_eq!(sprite.model, Mat4::from_translation(sprite.position));
    }

    #[test]
    fn advance_returns_the_updated_model() {
        let mut sprite = Sprite::new(vec3(0.0, 0.0, 0.0));
        let model = sprite.advance(0.5, 0.0, 0.0);

        assert_eq!(model, Mat4::from_translation(vec3(0.5, 0.0, 0.0)));
    }

    #[test]
    fn rotate_keeps_the_position_fixed() {
        let mut sprite = Sprite::new(vec3(0.3, 0.7, 0.0));
        sprite.rotate_by(90.0);

        assert_relative_eq!(sprite.position.x, 0.3, epsilon = 1e-6);
        assert_relative_eq!(sprite.position.y, 0.7, epsilon = 1e-6);
    }

    #[test]
    fn reset_model_restores_the_pure_translation() {
        let mut sprite = Sprite::new(vec3(0.0, 0.0, 0.0));
        sprite.rotate_by(45.0);
        sprite.position = vec3(2.4, 0.1, 0.0);
        sprite.reset_model();

        assert_eq!(sprite.model, Mat4::from_translation(vec3(2.4, 0.1, 0.0)));
    }
}
