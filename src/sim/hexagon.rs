//! Hexagon geometry
//!
//! The hexagon is stored as a single rotation angle. Vertices and walls are
//! always derived from that raw angle, never rotated incrementally from the
//! previous frame, so they cannot drift.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_SEGMENT_LENGTH, SIDES, VERTEX_ANGLE_OFFSET, VERTEX_ANGLE_STEP};
use crate::settings::SimulationConfig;
use crate::{polar_to_cartesian, wrap_angle};

/// The rotating container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexagonState {
    /// Rotation center (fixed)
    pub center: Vec2,
    /// Center-to-vertex distance (fixed)
    pub circumradius: f32,
    /// Current rotation (radians, wrapped to [0, 2π))
    pub rotation_angle: f32,
    /// Spin rate (radians/time, fixed)
    pub angular_velocity: f32,
}

/// One wall of the hexagon at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub a: Vec2,
    pub b: Vec2,
    /// Unit normal pointing away from the hexagon center
    pub outward_normal: Vec2,
}

impl WallSegment {
    /// Build a wall from a to b, orienting the normal away from `center`
    pub fn new(a: Vec2, b: Vec2, center: Vec2) -> Self {
        let edge = b - a;
        let mut normal = edge.perp().normalize_or_zero();
        let midpoint = (a + b) * 0.5;
        if normal.dot(midpoint - center) < 0.0 {
            normal = -normal;
        }
        Self {
            a,
            b,
            outward_normal: normal,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    #[inline]
    pub fn inward_normal(&self) -> Vec2 {
        -self.outward_normal
    }

    /// Gap between a ball's surface and this wall's line (negative = penetrating)
    #[inline]
    pub fn clearance(&self, ball_center: Vec2, ball_radius: f32) -> f32 {
        (self.a - ball_center).dot(self.outward_normal) - ball_radius
    }

    /// Parameter of the point's projection onto the wall line (0 at a, 1 at b)
    pub fn projection_param(&self, point: Vec2) -> f32 {
        let ab = self.b - self.a;
        let denom = ab.length_squared();
        if denom < MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH {
            return 0.0;
        }
        (point - self.a).dot(ab) / denom
    }

    /// Point on the wall line at parameter t
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a + (self.b - self.a) * t
    }
}

impl HexagonState {
    pub fn new(center: Vec2, circumradius: f32, angular_velocity: f32) -> Self {
        Self {
            center,
            circumradius,
            rotation_angle: 0.0,
            angular_velocity,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.center, config.circumradius, config.angular_velocity)
    }

    /// Same hexagon at a different rotation
    pub fn at_angle(&self, angle: f32) -> Self {
        Self {
            rotation_angle: wrap_angle(angle),
            ..*self
        }
    }

    /// Advance the rotation by one time step
    pub fn rotated(&self, dt: f32) -> Self {
        self.at_angle(self.rotation_angle + self.angular_velocity * dt)
    }

    /// Center-to-wall distance
    #[inline]
    pub fn apothem(&self) -> f32 {
        self.circumradius * (VERTEX_ANGLE_STEP / 2.0).cos()
    }

    #[inline]
    pub fn vertices(&self) -> [Vec2; SIDES] {
        vertices_at(self.center, self.circumradius, self.rotation_angle)
    }

    #[inline]
    pub fn walls(&self) -> [WallSegment; SIDES] {
        walls_at(self)
    }

    /// Check if a point is inside (or on) the hexagon
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.walls()
            .iter()
            .all(|wall| (wall.a - point).dot(wall.outward_normal) >= 0.0)
    }

    /// Vertices of the region the ball center may occupy without touching a wall
    ///
    /// Every wall moves inward by `ball_radius`, which for a regular hexagon
    /// shrinks the circumradius by `ball_radius / cos 30°`.
    pub fn inner_vertices(&self, ball_radius: f32) -> [Vec2; SIDES] {
        let shrink = ball_radius / (VERTEX_ANGLE_STEP / 2.0).cos();
        vertices_at(
            self.center,
            (self.circumradius - shrink).max(0.0),
            self.rotation_angle,
        )
    }
}

/// Hexagon vertices for a rotation angle, counter-clockwise from vertex 0
pub fn vertices_at(center: Vec2, circumradius: f32, rotation_angle: f32) -> [Vec2; SIDES] {
    std::array::from_fn(|i| {
        let theta = rotation_angle + VERTEX_ANGLE_OFFSET + i as f32 * VERTEX_ANGLE_STEP;
        center + polar_to_cartesian(circumradius, theta)
    })
}

/// The six walls at the hexagon's current angle; wall i joins vertex i to vertex i+1
pub fn walls_at(hexagon: &HexagonState) -> [WallSegment; SIDES] {
    let vertices = hexagon.vertices();
    std::array::from_fn(|i| WallSegment::new(vertices[i], vertices[(i + 1) % SIDES], hexagon.center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_6, PI, TAU};

    fn hexagon() -> HexagonState {
        HexagonState::new(Vec2::new(400.0, 300.0), 200.0, 1.0)
    }

    #[test]
    fn test_vertices_on_circumcircle() {
        let hex = hexagon().at_angle(0.7);
        for v in hex.vertices() {
            assert!(((v - hex.center).length() - 200.0).abs() < 1e-3);
        }
        // Vertex 0 sits at rotation + 30°
        let v0 = hex.vertices()[0] - hex.center;
        let expected = 0.7 + FRAC_PI_6;
        assert!((v0.y.atan2(v0.x) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_walls_connect_consecutive_vertices() {
        let hex = hexagon().at_angle(2.0);
        let vertices = hex.vertices();
        let walls = hex.walls();
        for i in 0..SIDES {
            assert_eq!(walls[i].a, vertices[i]);
            assert_eq!(walls[i].b, vertices[(i + 1) % SIDES]);
            assert!((walls[i].length() - 200.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_outward_normals() {
        let hex = hexagon().at_angle(1.234);
        for wall in hex.walls() {
            assert!((wall.outward_normal.length() - 1.0).abs() < 1e-5);
            let mid = (wall.a + wall.b) * 0.5;
            assert!(wall.outward_normal.dot(mid - hex.center) > 0.0);
            assert!(wall.outward_normal.dot(wall.b - wall.a).abs() < 1e-3);
            // Center sits one apothem inside every wall
            assert!(((wall.a - hex.center).dot(wall.outward_normal) - hex.apothem()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_counter_clockwise_winding() {
        let hex = hexagon();
        for wall in hex.walls() {
            let cross = (wall.a - hex.center).perp_dot(wall.b - hex.center);
            assert!(cross > 0.0);
        }
    }

    #[test]
    fn test_no_drift_from_repeated_rotation() {
        // Thousands of small steps land on the same geometry as one jump
        let mut hex = hexagon();
        let dt = 1.0 / 60.0;
        for _ in 0..10_000 {
            hex = hex.rotated(dt);
        }
        for v in hex.vertices() {
            assert!(((v - hex.center).length() - 200.0).abs() < 1e-3);
        }
        let direct = hexagon().at_angle(hex.rotation_angle);
        assert_eq!(direct.vertices(), hex.vertices());
    }

    #[test]
    fn test_rotation_wraps() {
        let hex = hexagon().at_angle(TAU - 0.01).rotated(0.02);
        assert!(hex.rotation_angle >= 0.0 && hex.rotation_angle < TAU);
        assert!((hex.rotation_angle - 0.01).abs() < 1e-4);

        let spun_back = HexagonState::new(Vec2::ZERO, 100.0, -1.0).rotated(PI / 2.0);
        assert!((spun_back.rotation_angle - 1.5 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_clearance_sign() {
        let hex = hexagon();
        let wall = hex.walls()[0];
        assert!((wall.clearance(hex.center, 10.0) - (hex.apothem() - 10.0)).abs() < 1e-3);
        let outside = hex.center + wall.outward_normal * (hex.apothem() + 5.0);
        assert!((wall.clearance(outside, 10.0) + 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_contains_point() {
        let hex = hexagon().at_angle(0.3);
        assert!(hex.contains_point(hex.center));
        assert!(hex.contains_point(hex.center + Vec2::new(100.0, 50.0)));
        assert!(!hex.contains_point(hex.center + Vec2::new(0.0, 250.0)));
    }

    #[test]
    fn test_inner_vertices_clear_every_wall() {
        let hex = hexagon().at_angle(0.9);
        let r = 15.0;
        let walls = hex.walls();
        for v in hex.inner_vertices(r) {
            let mut touching = 0;
            for wall in &walls {
                let c = wall.clearance(v, r);
                assert!(c > -1e-3);
                if c.abs() < 1e-3 {
                    touching += 1;
                }
            }
            // Each inner vertex is tangent to the two walls meeting at the corner
            assert_eq!(touching, 2);
        }
    }

    #[test]
    fn test_projection_param_on_short_walls() {
        let center = Vec2::new(0.0, -1.0);
        let short = WallSegment::new(Vec2::ZERO, Vec2::new(1e-3, 0.0), center);
        assert!((short.projection_param(Vec2::new(5e-4, 2.0)) - 0.5).abs() < 1e-3);

        let collapsed = WallSegment::new(Vec2::ZERO, Vec2::new(MIN_SEGMENT_LENGTH * 0.5, 0.0), center);
        assert_eq!(collapsed.projection_param(Vec2::new(5.0, 2.0)), 0.0);
    }
}
