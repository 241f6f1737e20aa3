//! Model matrices for the sprites.
//!
//! Composition follows the "post-multiply" convention: each step multiplies
//! on the right, so the last step listed is the first applied to a vertex.

use glam::{Mat4, Vec3};

use crate::anim::SpriteTransformState;

/// Order in which a sprite's transform steps are multiplied together.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Composition {
    /// `T * S * R`: rotate, then scale, then translate.
    TranslateScaleRotate,
    /// `T * R`: scale is ignored.
    TranslateRotate,
}

/// Builds the model matrix for `state` in the given order.
pub fn compose(state: &SpriteTransformState, order: Composition) -> Mat4 {
    let mut m = Mat4::IDENTITY;
    m *= Mat4::from_translation(state.position.extend(0.0));
    if order == Composition::TranslateScaleRotate {
        m *= Mat4::from_scale(Vec3::new(state.scale.x, state.scale.y, 1.0));
    }
    m *= Mat4::from_rotation_z(state.rotation);
    m
}

#[inline]
pub fn primary_model(state: &SpriteTransformState) -> Mat4 {
    compose(state, Composition::TranslateScaleRotate)
}

#[inline]
pub fn orbiting_model(state: &SpriteTransformState) -> Mat4 {
    compose(state, Composition::TranslateRotate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};
    use std::f32::consts::FRAC_PI_2;

    fn apply(m: Mat4, x: f32, y: f32) -> Vec2 {
        let v = m * Vec4::new(x, y, 0.0, 1.0);
        Vec2::new(v.x, v.y)
    }

    fn state(position: Vec2, rotation: f32, scale: Vec2) -> SpriteTransformState {
        SpriteTransformState {
            position,
            rotation,
            scale,
        }
    }

    #[test]
    fn rest_state_is_identity() {
        let s = state(Vec2::ZERO, 0.0, Vec2::ONE);
        assert_eq!(primary_model(&s), Mat4::IDENTITY);
        assert_eq!(orbiting_model(&s), Mat4::IDENTITY);
    }

    #[test]
    fn primary_rotates_then_scales_then_translates() {
        let s = state(Vec2::new(1.0, 1.0), FRAC_PI_2, Vec2::splat(2.0));
        // (1, 0) -> rotate (0, 1) -> scale (0, 2) -> translate (1, 3)
        let p = apply(primary_model(&s), 1.0, 0.0);
        assert!((p - Vec2::new(1.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn order_matters_for_non_uniform_scale() {
        let s = state(Vec2::ZERO, FRAC_PI_2, Vec2::new(2.0, 1.0));
        let composed = apply(primary_model(&s), 1.0, 0.0);

        let rotate_last = Mat4::from_rotation_z(s.rotation) * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let swapped = apply(rotate_last, 1.0, 0.0);

        assert!((composed - Vec2::new(0.0, 1.0)).length() < 1e-5);
        assert!((swapped - Vec2::new(0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn orbiting_ignores_scale() {
        let s = state(Vec2::new(2.0, -1.0), 0.3, Vec2::splat(5.0));
        let expected = Mat4::from_translation(Vec3::new(2.0, -1.0, 0.0)) * Mat4::from_rotation_z(0.3);
        assert!(orbiting_model(&s).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn translation_lands_in_last_column() {
        let s = state(Vec2::new(-3.0, 4.0), 1.0, Vec2::splat(0.5));
        let m = primary_model(&s);
        assert_eq!(m.w_axis, Vec4::new(-3.0, 4.0, 0.0, 1.0));
    }

    #[test]
    fn quad_center_maps_to_position() {
        let s = state(Vec2::new(0.7, -0.2), 2.5, Vec2::splat(1.7));
        let c = apply(primary_model(&s), 0.0, 0.0);
        assert!((c - s.position).length() < 1e-6);
    }
}
