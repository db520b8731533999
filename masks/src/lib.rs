use collision::Mask;
use common::{Angle, Point};
use nalgebra::{Point2, Vector2};
use parry2d::query::{PointQuery, Ray, RayCast};
use parry2d::shape::{Ball, ConvexPolygon};

/// A body silhouette in the body's local frame, queried by the collision
/// set through the `Mask` contract. Ray and annulus tests rotate the query
/// into the local frame by the body's facing.
pub enum Silhouette {
    Disc(Ball),
    Convex(ConvexPolygon),
}

impl Silhouette {
    pub fn disc(radius: f64) -> Self {
        Silhouette::Disc(Ball::new(radius as f32))
    }

    /// Convex hull of an outline given in the body's local frame. Returns
    /// `None` for degenerate outlines (fewer than three distinct points).
    pub fn convex(outline: &[Point]) -> Option<Self> {
        let points: Vec<Point2<f32>> = outline
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect();
        ConvexPolygon::from_convex_hull(&points).map(Silhouette::Convex)
    }

    fn cast(&self, ray: &Ray) -> Option<f32> {
        match self {
            Silhouette::Disc(ball) => ball.cast_local_ray(ray, 1.0, true),
            Silhouette::Convex(polygon) => polygon.cast_local_ray(ray, 1.0, true),
        }
    }

    fn nearest_distance(&self, from: Point2<f32>) -> f32 {
        match self {
            Silhouette::Disc(ball) => ball.distance_to_local_point(&from, true),
            Silhouette::Convex(polygon) => polygon.distance_to_local_point(&from, true),
        }
    }

    fn farthest_distance(&self, from: Point2<f32>) -> f32 {
        match self {
            Silhouette::Disc(ball) => from.coords.norm() + ball.radius,
            Silhouette::Convex(polygon) => polygon
                .points()
                .iter()
                .map(|p| (p - from).norm())
                .fold(0.0, f32::max),
        }
    }
}

impl Mask for Silhouette {
    fn collide(&self, offset: Point, direction: Point, facing: Angle) -> f64 {
        let origin = facing.unrotate(offset);
        let dir = facing.unrotate(direction);
        let ray = Ray::new(
            Point2::new(origin.x as f32, origin.y as f32),
            Vector2::new(dir.x as f32, dir.y as f32),
        );
        match self.cast(&ray) {
            Some(toi) => toi as f64,
            None => 1.0,
        }
    }

    fn within_ring(&self, offset: Point, facing: Angle, inner: f64, outer: f64) -> bool {
        // In the local frame the annulus center sits at the unrotated offset.
        let center = facing.unrotate(offset);
        let center = Point2::new(center.x as f32, center.y as f32);
        self.nearest_distance(center) <= outer as f32
            && self.farthest_distance(center) >= inner as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_ray_entry_fraction() {
        let mask = Silhouette::disc(1.0);
        // From (-2, 0), four units along +x: the unit disc is entered at
        // x = -1, a quarter of the way in.
        let toi = mask.collide(Point::new(-2.0, 0.0), Point::new(4.0, 0.0), Angle::default());
        assert!((toi - 0.25).abs() < 1e-6);
    }

    #[test]
    fn disc_ray_miss_reports_one() {
        let mask = Silhouette::disc(1.0);
        let toi = mask.collide(Point::new(-2.0, 3.0), Point::new(4.0, 0.0), Angle::default());
        assert!(toi >= 1.0);
    }

    #[test]
    fn disc_ray_start_inside_is_zero() {
        let mask = Silhouette::disc(2.0);
        let toi = mask.collide(Point::new(0.5, 0.0), Point::new(10.0, 0.0), Angle::default());
        assert_eq!(toi, 0.0);
    }

    #[test]
    fn disc_is_rotation_invariant() {
        let mask = Silhouette::disc(1.0);
        let plain = mask.collide(Point::new(-2.0, 0.0), Point::new(4.0, 0.0), Angle::default());
        let rotated = mask.collide(
            Point::new(-2.0, 0.0),
            Point::new(4.0, 0.0),
            Angle::from_degrees(73.0),
        );
        assert!((plain - rotated).abs() < 1e-5);
    }

    #[test]
    fn convex_ray_respects_facing() {
        // A 4x2 rectangle, stood upright by a quarter turn.
        let mask = Silhouette::convex(&[
            Point::new(-2.0, -1.0),
            Point::new(2.0, -1.0),
            Point::new(2.0, 1.0),
            Point::new(-2.0, 1.0),
        ])
        .unwrap();
        let toi = mask.collide(
            Point::new(-3.0, 0.0),
            Point::new(6.0, 0.0),
            Angle::from_degrees(90.0),
        );
        // Upright, the rectangle is one unit wide: entry at x = -1.
        assert!((toi - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_outline_is_rejected() {
        assert!(Silhouette::convex(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).is_none());
    }

    #[test]
    fn disc_within_ring() {
        let mask = Silhouette::disc(1.0);
        let offset = Point::new(5.0, 0.0);
        // Nearest point at distance 4, farthest at 6.
        assert!(mask.within_ring(offset, Angle::default(), 3.0, 4.5));
        assert!(!mask.within_ring(offset, Angle::default(), 0.0, 3.9));
        assert!(!mask.within_ring(offset, Angle::default(), 6.5, 10.0));
        // Annulus center inside the disc.
        assert!(mask.within_ring(Point::new(0.5, 0.0), Angle::default(), 0.0, 1.0));
    }

    #[test]
    fn convex_within_ring() {
        let mask = Silhouette::convex(&[
            Point::new(-1.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
        ])
        .unwrap();
        let offset = Point::new(3.0, 0.0);
        // Nearest point of the square at distance 2, farthest corner at
        // sqrt(17).
        assert!(mask.within_ring(offset, Angle::default(), 4.0, 5.0));
        assert!(!mask.within_ring(offset, Angle::default(), 0.0, 1.9));
        assert!(!mask.within_ring(offset, Angle::default(), 4.2, 5.0));
    }
}
