//! Target queries and collision shapes
//!
//! Circle-vs-circle lives in the crate root (`circles_overlap`); this module
//! holds the queries built on top of it plus the rectangular profile the
//! directional wave uses.

use glam::Vec2;

use super::state::Enemy;

/// Index of the enemy closest to `point`, skipping any ID in `exclude`
pub fn nearest_enemy(enemies: &[Enemy], point: Vec2, exclude: &[u32]) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !exclude.contains(&e.id))
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(point)
                .total_cmp(&b.pos.distance_squared(point))
        })
        .map(|(i, _)| i)
}

/// Like [`nearest_enemy`] but only within `max_distance` (inclusive)
pub fn nearest_enemy_within(
    enemies: &[Enemy],
    point: Vec2,
    max_distance: f32,
    exclude: &[u32],
) -> Option<usize> {
    nearest_enemy(enemies, point, exclude)
        .filter(|&i| enemies[i].pos.distance(point) <= max_distance)
}

/// IDs of enemies whose body overlaps a circle at `center`.
///
/// Collected up front so callers can remove enemies while applying damage.
pub fn enemies_overlapping(enemies: &[Enemy], center: Vec2, radius: f32) -> Vec<u32> {
    enemies
        .iter()
        .filter(|e| e.collides(center, radius))
        .map(|e| e.id)
        .collect()
}

/// IDs of enemies whose centre lies within `radius` of `center` (inclusive)
pub fn enemies_centered_within(enemies: &[Enemy], center: Vec2, radius: f32) -> Vec<u32> {
    enemies
        .iter()
        .filter(|e| e.pos.distance(center) <= radius)
        .map(|e| e.id)
        .collect()
}

/// Oriented slab: a leading edge moving along `dir`, `depth` thick,
/// `half_width` either side of the axis.
#[derive(Debug, Clone, Copy)]
pub struct RectProfile {
    /// Origin of the axis (where the slab was launched)
    pub origin: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    /// Distance of the leading edge from `origin`
    pub front: f32,
    pub depth: f32,
    pub half_width: f32,
}

impl RectProfile {
    /// Does a circle at `point` with `radius` touch the slab?
    ///
    /// Tested in the slab's own frame: distance along the axis must fall
    /// inside the (radius-expanded) depth band, and the perpendicular offset
    /// must be inside the half-width.
    pub fn hits_circle(&self, point: Vec2, radius: f32) -> bool {
        let rel = point - self.origin;
        let along = rel.dot(self.dir);
        let across = self.dir.perp_dot(rel).abs();

        let back = self.front - self.depth - radius;
        let front = self.front + radius;
        along >= back && along <= front && across < self.half_width + radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;

    fn enemy_at(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(id, EnemyKind::Normal, Vec2::new(x, y), 10.0)
    }

    #[test]
    fn test_nearest_enemy() {
        let enemies = vec![enemy_at(1, 100.0, 0.0), enemy_at(2, 50.0, 0.0), enemy_at(3, -200.0, 0.0)];
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO, &[]), Some(1));
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO, &[2]), Some(0));
        assert_eq!(nearest_enemy(&[], Vec2::ZERO, &[]), None);
    }

    #[test]
    fn test_nearest_within_range() {
        let enemies = vec![enemy_at(1, 200.0, 0.0)];
        assert_eq!(nearest_enemy_within(&enemies, Vec2::ZERO, 150.0, &[]), None);
        assert_eq!(nearest_enemy_within(&enemies, Vec2::ZERO, 200.0, &[]), Some(0));
    }

    #[test]
    fn test_overlap_queries() {
        let enemies = vec![enemy_at(1, 30.0, 0.0), enemy_at(2, 90.0, 0.0)];
        // 30 < 20 + 12
        assert_eq!(enemies_overlapping(&enemies, Vec2::ZERO, 20.0), vec![1]);
        assert_eq!(enemies_centered_within(&enemies, Vec2::ZERO, 90.0), vec![1, 2]);
    }

    #[test]
    fn test_rect_profile() {
        let slab = RectProfile {
            origin: Vec2::ZERO,
            dir: Vec2::X,
            front: 100.0,
            depth: 20.0,
            half_width: 30.0,
        };
        assert!(slab.hits_circle(Vec2::new(90.0, 0.0), 5.0));
        assert!(slab.hits_circle(Vec2::new(90.0, 34.0), 5.0));
        assert!(!slab.hits_circle(Vec2::new(90.0, 36.0), 5.0));
        // Behind the trailing edge
        assert!(!slab.hits_circle(Vec2::new(70.0, 0.0), 5.0));
        // Just ahead of the leading edge
        assert!(slab.hits_circle(Vec2::new(104.0, 0.0), 5.0));
        assert!(!slab.hits_circle(Vec2::new(110.0, 0.0), 5.0));
    }
}
