//! Collision detection and response against the spinning walls
//!
//! The tricky part of the simulation: the walls move. Every material point of
//! the hexagon travels at ω × r, so each bounce is resolved in the rest frame
//! of the wall point the ball touches and then transformed back.
//!
//! Detection uses each wall's full line, so a ball that ends a step on the
//! far side of a wall is always caught no matter how fast it moved. The swept
//! path (start = candidate - velocity·dt) decides where the wall was reached,
//! which picks the contact point and tells edge hits from corner hits.

use glam::Vec2;

use super::hexagon::{HexagonState, WallSegment};
use super::state::BallState;
use crate::consts::{MIN_SEGMENT_LENGTH, PENETRATION_TOLERANCE, SIDES, VERTEX_ANGLE_STEP};
use crate::perp_scaled;
use crate::settings::SimulationConfig;

/// Extra reach (fraction of ball radius) when deciding a ball is in a corner
const CORNER_SLOP: f32 = 1e-3;

/// Which part of the hexagon the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactFeature {
    /// Flat contact against one wall
    Edge { wall: usize },
    /// Contact at a vertex (shared by walls `vertex - 1` and `vertex`)
    Corner { vertex: usize },
}

/// How the velocity responded to a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    /// Normal velocity reversed and scaled by restitution
    Bounced,
    /// Approach too slow to bounce; position correction only
    Resting,
    /// Already moving away in the wall's frame
    Separating,
}

/// A detected penetration, before it is resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub feature: ContactFeature,
    /// Penetrated wall
    pub wall: usize,
    /// Second penetrated wall of a two-wall corner
    pub neighbour: Option<usize>,
    /// Contact point on the hexagon
    pub point: Vec2,
    /// Unit normal from the wall toward the ball center
    pub normal: Vec2,
    /// Fraction of the swept path at which the wall was reached
    pub time: f32,
}

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub feature: ContactFeature,
    pub point: Vec2,
    pub normal: Vec2,
    /// Depth removed by position correction
    pub penetration: f32,
    /// Velocity of the wall material at the contact point
    pub wall_velocity: Vec2,
    /// Wall-frame normal velocity before resolution (negative = approaching)
    pub normal_velocity: f32,
    pub response: ContactResponse,
}

/// Output of [`resolve`]
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub ball: BallState,
    pub contacts: Vec<ContactEvent>,
    /// Passes that found at least one contact
    pub passes: u32,
    /// Ball was still overlapping a wall after the passes and got clamped inside
    pub clamped: bool,
}

/// Velocity of a hexagon material point (rigid rotation about `center`)
#[inline]
pub fn wall_velocity_at(point: Vec2, center: Vec2, angular_velocity: f32) -> Vec2 {
    perp_scaled(angular_velocity, point - center)
}

/// Closest point on segment ab to `point`
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Bounce a velocity off a moving surface
///
/// `normal` points from the surface toward the ball. Only the normal part of
/// the wall-frame velocity is reversed and scaled by `restitution`; the
/// tangential part is kept as is.
///
/// Returns the new velocity, the wall-frame normal velocity before the
/// bounce, and how the contact responded.
pub fn reflect_in_wall_frame(
    velocity: Vec2,
    wall_velocity: Vec2,
    normal: Vec2,
    restitution: f32,
    resting_threshold: f32,
) -> (Vec2, f32, ContactResponse) {
    let relative = velocity - wall_velocity;
    let normal_velocity = relative.dot(normal);

    if normal_velocity >= 0.0 {
        return (velocity, normal_velocity, ContactResponse::Separating);
    }
    if -normal_velocity < resting_threshold {
        return (velocity, normal_velocity, ContactResponse::Resting);
    }

    let relative = relative - (1.0 + restitution) * normal_velocity * normal;
    (relative + wall_velocity, normal_velocity, ContactResponse::Bounced)
}

/// Distance from a vertex to the ball center when tangent to both walls there
#[inline]
fn corner_apex_distance(ball_radius: f32) -> f32 {
    ball_radius / (VERTEX_ANGLE_STEP / 2.0).cos()
}

/// Where along the swept path the ball first reaches a wall
///
/// Returns (fraction, ball center). A path that starts already penetrating
/// is sampled at its midpoint.
fn swept_hit(wall: &WallSegment, start: Vec2, end: Vec2, radius: f32) -> (f32, Vec2) {
    let c_start = wall.clearance(start, radius);
    let c_end = wall.clearance(end, radius);
    if c_start < 0.0 || c_start <= c_end {
        return (0.0, start.lerp(end, 0.5));
    }
    let s = (c_start / (c_start - c_end)).clamp(0.0, 1.0);
    (s, start.lerp(end, s))
}

/// Vertex-radial normal, falling back to the inward bisector when the ball
/// center is on or behind the vertex
fn corner_normal(hit: Vec2, vertex: Vec2, center: Vec2) -> Vec2 {
    let inward = (center - vertex).normalize_or_zero();
    let radial = (hit - vertex).normalize_or_zero();
    if radial.dot(inward) > 0.0 { radial } else { inward }
}

/// Find every wall the ball currently penetrates, earliest swept hit first
pub fn detect_contacts(
    ball: &BallState,
    swept_start: Vec2,
    walls: &[WallSegment; SIDES],
    hexagon: &HexagonState,
) -> Vec<Contact> {
    let p = ball.position;
    let r = ball.radius;

    let penetrating: [bool; SIDES] =
        std::array::from_fn(|k| walls[k].clearance(p, r) < -PENETRATION_TOLERANCE);

    let mut hits: Vec<(usize, f32, Vec2)> = (0..SIDES)
        .filter(|&k| penetrating[k])
        .map(|k| {
            let (time, hit) = swept_hit(&walls[k], swept_start, p, r);
            (k, time, hit)
        })
        .collect();
    if hits.is_empty() {
        return Vec::new();
    }
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));

    let corner_reach = corner_apex_distance(r) + CORNER_SLOP * r;
    let mut handled = [false; SIDES];
    let mut contacts = Vec::with_capacity(hits.len());

    for (k, time, hit) in hits {
        if handled[k] {
            continue;
        }
        let wall = &walls[k];

        // Vertex k starts wall k and ends wall k-1; vertex k+1 ends wall k and starts wall k+1
        let shared = [(k, (k + SIDES - 1) % SIDES), ((k + 1) % SIDES, (k + 1) % SIDES)];
        let corner = shared.into_iter().find(|&(vertex, neighbour)| {
            penetrating[neighbour]
                && !handled[neighbour]
                && hit.distance(walls[vertex].a) <= corner_reach
        });

        if let Some((vertex, neighbour)) = corner {
            handled[k] = true;
            handled[neighbour] = true;
            let v = walls[vertex].a;
            contacts.push(Contact {
                feature: ContactFeature::Corner { vertex },
                wall: k,
                neighbour: Some(neighbour),
                point: v,
                normal: corner_normal(hit, v, hexagon.center),
                time,
            });
            continue;
        }

        let t = wall.projection_param(hit);
        if (0.0..=1.0).contains(&t) {
            handled[k] = true;
            contacts.push(Contact {
                feature: ContactFeature::Edge { wall: k },
                wall: k,
                neighbour: None,
                point: wall.point_at(t),
                normal: wall.inward_normal(),
                time,
            });
        } else {
            let vertex = if t < 0.0 { k } else { (k + 1) % SIDES };
            let v = walls[vertex].a;
            if hit.distance(v) < r {
                handled[k] = true;
                contacts.push(Contact {
                    feature: ContactFeature::Corner { vertex },
                    wall: k,
                    neighbour: None,
                    point: v,
                    normal: corner_normal(hit, v, hexagon.center),
                    time,
                });
            }
            // Otherwise only the wall's extended line is crossed; a later pass sees it
            // Otherwise only the wall's extended line is crossed, not the wall
        }
    }

    contacts
}

/// Nearest center position that clears both walls of a corner
fn project_into_corner(
    p: Vec2,
    r: f32,
    first: &WallSegment,
    second: &WallSegment,
    vertex: Vec2,
    center: Vec2,
) -> Vec2 {
    let bisector = (center - vertex).normalize_or_zero();
    let mut best = vertex + bisector * corner_apex_distance(r);
    let mut best_dist = p.distance_squared(best);

    for (wall, other) in [(first, second), (second, first)] {
        let c = wall.clearance(p, r);
        if c >= 0.0 {
            continue;
        }
        let candidate = p + wall.inward_normal() * (-c);
        let dist = p.distance_squared(candidate);
        if other.clearance(candidate, r) >= -PENETRATION_TOLERANCE && dist < best_dist {
            best = candidate;
            best_dist = dist;
        }
    }

    best
}

/// Bounce the velocity off either corner wall it still runs into
///
/// A radial bounce off a vertex can leave a fast, glancing ball heading into
/// one of the two walls. Both walls share the vertex, so they share its
/// material velocity.
fn settle_corner_velocity(
    velocity: Vec2,
    wall_velocity: Vec2,
    inward_normals: [Vec2; 2],
    restitution: f32,
) -> Vec2 {
    let mut relative = velocity - wall_velocity;
    for normal in inward_normals {
        let vn = relative.dot(normal);
        if vn < 0.0 {
            relative -= (1.0 + restitution) * vn * normal;
        }
    }
    relative + wall_velocity
}

/// Correct position and velocity for one contact
///
/// Returns None when an earlier correction in the same pass already
/// cleared it.
fn apply_contact(
    ball: &mut BallState,
    contact: &Contact,
    walls: &[WallSegment; SIDES],
    hexagon: &HexagonState,
    config: &SimulationConfig,
) -> Option<ContactEvent> {
    let r = ball.radius;
    let wall = &walls[contact.wall];

    let penetration = match (contact.feature, contact.neighbour) {
        (ContactFeature::Corner { vertex }, Some(neighbour)) => {
            let other = &walls[neighbour];
            let depth = (-wall.clearance(ball.position, r)).max(-other.clearance(ball.position, r));
            if depth <= PENETRATION_TOLERANCE {
                return None;
            }
            ball.position =
                project_into_corner(ball.position, r, wall, other, walls[vertex].a, hexagon.center);
            depth
        }
        (ContactFeature::Corner { vertex }, None) => {
            let v = walls[vertex].a;
            let overlap = r - ball.position.distance(v);
            let depth = overlap.max(-wall.clearance(ball.position, r));
            if depth <= PENETRATION_TOLERANCE {
                return None;
            }
            if overlap > 0.0 {
                let radial = (ball.position - v).normalize_or_zero();
                let dir = if radial.dot(contact.normal) > 0.0 {
                    radial
                } else {
                    contact.normal
                };
                ball.position = v + dir * r;
            }
            let c = wall.clearance(ball.position, r);
            if c < 0.0 {
                ball.position += wall.inward_normal() * (-c);
            }
            depth
        }
        (ContactFeature::Edge { .. }, _) => {
            let c = wall.clearance(ball.position, r);
            if c >= -PENETRATION_TOLERANCE {
                return None;
            }
            // Exactly tangent afterwards, so gravity cannot sink it step by step
            ball.position += wall.inward_normal() * (-c);
            -c
        }
    };

    let wall_velocity = wall_velocity_at(contact.point, hexagon.center, hexagon.angular_velocity);
    let (velocity, normal_velocity, response) = reflect_in_wall_frame(
        ball.velocity,
        wall_velocity,
        contact.normal,
        config.restitution,
        config.resting_velocity_threshold,
    );
    ball.velocity = match contact.neighbour {
        Some(neighbour) if response != ContactResponse::Resting => settle_corner_velocity(
            velocity,
            wall_velocity,
            [wall.inward_normal(), walls[neighbour].inward_normal()],
            config.restitution,
        ),
        _ => velocity,
    };

    log::debug!(
        "{:?} contact: depth={:.4} vn={:.3} {:?}",
        contact.feature,
        penetration,
        normal_velocity,
        response
    );

    Some(ContactEvent {
        feature: contact.feature,
        point: contact.point,
        normal: contact.normal,
        penetration,
        wall_velocity,
        normal_velocity,
        response,
    })
}

/// Last resort: put the ball at the nearest position that clears every wall
/// and bounce it off the most violated wall
fn clamp_inside(
    ball: &mut BallState,
    walls: &[WallSegment; SIDES],
    hexagon: &HexagonState,
    config: &SimulationConfig,
) -> ContactEvent {
    let p = ball.position;
    let r = ball.radius;

    let mut worst = 0;
    let mut worst_clearance = f32::INFINITY;
    for (k, wall) in walls.iter().enumerate() {
        let c = wall.clearance(p, r);
        if c < worst_clearance {
            worst = k;
            worst_clearance = c;
        }
    }

    let inner = hexagon.inner_vertices(r);
    let mut target = hexagon.center;
    let mut best = f32::INFINITY;
    for i in 0..SIDES {
        let q = closest_point_on_segment(p, inner[i], inner[(i + 1) % SIDES]);
        let d = p.distance_squared(q);
        if d < best {
            best = d;
            target = q;
        }
    }

    let wall = &walls[worst];
    let point = wall.point_at(wall.projection_param(p).clamp(0.0, 1.0));
    let normal = wall.inward_normal();
    let wall_velocity = wall_velocity_at(point, hexagon.center, hexagon.angular_velocity);
    let (velocity, normal_velocity, response) = reflect_in_wall_frame(
        ball.velocity,
        wall_velocity,
        normal,
        config.restitution,
        config.resting_velocity_threshold,
    );

    log::warn!(
        "Ball still {:.4} into wall {} after resolution passes, clamping inside",
        -worst_clearance,
        worst
    );

    ball.position = target;
    ball.velocity = velocity;

    ContactEvent {
        feature: ContactFeature::Edge { wall: worst },
        point,
        normal,
        penetration: -worst_clearance,
        wall_velocity,
        normal_velocity,
        response,
    }
}

/// Resolve a candidate ball state against the walls at the current instant
///
/// Runs detection/correction passes until no wall is penetrated or the
/// configured pass budget is spent, then clamps the ball inside if anything
/// is left. Always terminates.
pub fn resolve(
    candidate: &BallState,
    walls: &[WallSegment; SIDES],
    hexagon: &HexagonState,
    config: &SimulationConfig,
    dt: f32,
) -> Resolution {
    let mut ball = *candidate;
    // Semi-implicit Euler moved the ball by exactly velocity * dt
    let swept_start = candidate.position - candidate.velocity * dt;
    let mut contacts = Vec::new();
    let mut passes = 0;

    while passes < config.max_resolution_passes {
        let detected = detect_contacts(&ball, swept_start, walls, hexagon);
        if detected.is_empty() {
            break;
        }
        passes += 1;
        for contact in &detected {
            if let Some(event) = apply_contact(&mut ball, contact, walls, hexagon, config) {
                contacts.push(event);
            }
        }
    }

    let clamped = walls
        .iter()
        .any(|wall| wall.clearance(ball.position, ball.radius) < -PENETRATION_TOLERANCE);
    if clamped {
        contacts.push(clamp_inside(&mut ball, walls, hexagon, config));
    }

    Resolution {
        ball,
        contacts,
        passes,
        clamped,
    }
}
