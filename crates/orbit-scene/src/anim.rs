//! Per-frame animation of the two sprites.
//!
//! Everything is a closed-form function of elapsed ticks except rotation,
//! which accumulates `speed * dt` and is never wrapped.

use glam::Vec2;

use crate::config::AnimationConfig;

/// Position, rotation and scale of one sprite for the current frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteTransformState {
    pub position: Vec2,
    /// Radians. Grows without bound; trig consumers handle periodicity.
    pub rotation: f32,
    pub scale: Vec2,
}

impl SpriteTransformState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

/// Remembers the previous frame's ticks.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClockState {
    pub previous_ticks: f32,
}

impl ClockState {
    /// Records `ticks` and returns the delta from the previous call.
    pub fn advance(&mut self, ticks: f32) -> f32 {
        let dt = compute_delta_time(ticks, self.previous_ticks);
        self.previous_ticks = ticks;
        dt
    }
}

/// `current - previous`, unclamped; a clock that runs backwards yields a
/// negative delta.
#[inline]
pub fn compute_delta_time(current_ticks: f32, previous_ticks: f32) -> f32 {
    current_ticks - previous_ticks
}

#[inline]
pub fn advance_rotation(angle: f32, delta_time: f32, speed: f32) -> f32 {
    angle + speed * delta_time
}

/// Both axes follow the same `sin(ticks)`, so the sprite slides along y = x.
#[inline]
pub fn primary_position(ticks: f32, range: f32) -> Vec2 {
    let s = range * ticks.sin();
    Vec2::new(s, s)
}

/// A point on the circle of `radius` around `primary`.
#[inline]
pub fn orbit_position(primary: Vec2, ticks: f32, radius: f32) -> Vec2 {
    primary + Vec2::new(radius * ticks.cos(), radius * ticks.sin())
}

/// Oscillates smoothly between `min` and `max`.
#[inline]
pub fn scale_factor(ticks: f32, speed: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * (0.5 + 0.5 * (ticks * speed).sin())
}

/// The whole mutable state of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub clock: ClockState,
    pub primary: SpriteTransformState,
    pub orbiting: SpriteTransformState,
}

impl SceneState {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            clock: ClockState::default(),
            primary: SpriteTransformState::at(config.primary_start),
            orbiting: SpriteTransformState::at(config.orbiting_start),
        }
    }

    /// Advances both sprites to `ticks` seconds since start.
    pub fn update(&mut self, ticks: f32, config: &AnimationConfig) {
        let dt = self.clock.advance(ticks);

        self.orbiting.rotation = advance_rotation(
            self.orbiting.rotation,
            dt,
            config.rotation_speed * config.orbiting_spin,
        );
        self.primary.rotation = advance_rotation(
            self.primary.rotation,
            dt,
            config.rotation_speed * config.primary_spin,
        );

        self.primary.position = primary_position(ticks, config.movement_range);

        let s = scale_factor(ticks, config.scale_speed, config.scale_min, config.scale_max);
        self.primary.scale = Vec2::splat(s);

        // Derived every frame; the orbiting sprite has no positional state of its own.
        self.orbiting.position = orbit_position(self.primary.position, ticks, config.orbit_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    fn sample_ticks() -> impl Iterator<Item = f32> {
        (-400..=400).map(|i| i as f32 * 0.137)
    }

    // ── delta time ────────────────────────────────────────────────────────

    #[test]
    fn delta_is_difference() {
        assert!((compute_delta_time(1.25, 1.0) - 0.25).abs() < EPS);
    }

    #[test]
    fn non_decreasing_ticks_never_go_negative() {
        let mut clock = ClockState::default();
        for ticks in [0.0, 0.016, 0.016, 0.5, 0.5, 3.0] {
            assert!(clock.advance(ticks) >= 0.0);
        }
    }

    #[test]
    fn regressing_ticks_pass_through_unclamped() {
        let mut clock = ClockState::default();
        clock.advance(5.0);
        assert!((clock.advance(2.0) - -3.0).abs() < EPS);
        assert_eq!(clock.previous_ticks, 2.0);
    }

    #[test]
    fn large_stall_is_not_clamped() {
        let mut clock = ClockState::default();
        clock.advance(1.0);
        assert!((clock.advance(61.0) - 60.0).abs() < EPS);
    }

    // ── rotation ──────────────────────────────────────────────────────────

    #[test]
    fn rotation_grows_with_positive_delta() {
        let mut angle = 0.0;
        let mut last = angle;
        for _ in 0..1000 {
            angle = advance_rotation(angle, 0.016, 2.0);
            assert!(angle > last);
            last = angle;
        }
        // Accumulated, not wrapped to [0, 2π).
        assert!(angle > 2.0 * PI);
    }

    #[test]
    fn rotation_is_strictly_increasing_in_delta() {
        let a = advance_rotation(1.0, 0.1, 1.0);
        let b = advance_rotation(1.0, 0.2, 1.0);
        assert!(b > a);
    }

    // ── positions ─────────────────────────────────────────────────────────

    #[test]
    fn primary_starts_at_origin() {
        assert_eq!(primary_position(0.0, 2.0), Vec2::ZERO);
    }

    #[test]
    fn primary_moves_along_diagonal() {
        for t in sample_ticks() {
            let p = primary_position(t, 2.0);
            assert_eq!(p.x, p.y);
            assert!(p.x.abs() <= 2.0 + EPS);
        }
    }

    #[test]
    fn orbit_at_zero_ticks() {
        let p = orbit_position(primary_position(0.0, 2.0), 0.0, 2.0);
        assert!((p - Vec2::new(2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn orbit_keeps_fixed_distance() {
        for t in sample_ticks() {
            let primary = primary_position(t, 2.0);
            let orbit = orbit_position(primary, t, 2.0);
            assert!((orbit.distance(primary) - 2.0).abs() < 1e-4, "ticks = {t}");
        }
    }

    // ── scale ─────────────────────────────────────────────────────────────

    #[test]
    fn scale_stays_in_range() {
        for t in sample_ticks() {
            let s = scale_factor(t, 1.0, 0.5, 2.0);
            assert!((0.5 - EPS..=2.0 + EPS).contains(&s), "ticks = {t}, scale = {s}");
        }
    }

    #[test]
    fn scale_peaks_at_half_pi() {
        assert!((scale_factor(FRAC_PI_2, 1.0, 0.5, 2.0) - 2.0).abs() < EPS);
    }

    #[test]
    fn scale_bottoms_out_at_three_half_pi() {
        assert!((scale_factor(3.0 * FRAC_PI_2, 1.0, 0.5, 2.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn scale_speed_compresses_period() {
        assert!((scale_factor(FRAC_PI_2 / 2.0, 2.0, 0.5, 2.0) - 2.0).abs() < EPS);
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn new_scene_uses_start_positions() {
        let scene = SceneState::new(&AnimationConfig::default());
        assert_eq!(scene.primary.position, Vec2::new(-3.0, 0.0));
        assert_eq!(scene.orbiting.position, Vec2::new(3.0, 0.0));
        assert_eq!(scene.primary.scale, Vec2::ONE);
    }

    #[test]
    fn first_update_at_zero() {
        let cfg = AnimationConfig::default();
        let mut scene = SceneState::new(&cfg);
        scene.update(0.0, &cfg);

        assert_eq!(scene.primary.position, Vec2::ZERO);
        assert!((scene.orbiting.position - Vec2::new(2.0, 0.0)).length() < EPS);
        // 0.5 + 1.5 * 0.5
        assert!((scene.primary.scale.x - 1.25).abs() < EPS);
        assert_eq!(scene.primary.rotation, 0.0);
    }

    #[test]
    fn orbiting_spins_twice_as_fast() {
        let cfg = AnimationConfig::default();
        let mut scene = SceneState::new(&cfg);
        for i in 1..=120 {
            scene.update(i as f32 / 60.0, &cfg);
        }
        assert!((scene.primary.rotation - 2.0).abs() < 1e-4);
        assert!((scene.orbiting.rotation - 4.0).abs() < 1e-4);
    }

    #[test]
    fn scale_is_uniform_and_primary_only() {
        let cfg = AnimationConfig::default();
        let mut scene = SceneState::new(&cfg);
        scene.update(FRAC_PI_2, &cfg);
        assert_eq!(scene.primary.scale.x, scene.primary.scale.y);
        assert!((scene.primary.scale.x - 2.0).abs() < EPS);
        assert_eq!(scene.orbiting.scale, Vec2::ONE);
    }

    #[test]
    fn orbiting_follows_primary() {
        let cfg = AnimationConfig::default();
        let mut scene = SceneState::new(&cfg);
        for t in sample_ticks() {
            scene.update(t, &cfg);
            let d = scene.orbiting.position.distance(scene.primary.position);
            assert!((d - cfg.orbit_radius).abs() < 1e-4);
        }
    }
}
