use common::{Angle, Point};

/// Handle of a body in the caller-owned arena. A `CollisionSet` stores these
/// instead of references; queries take the arena slice and resolve handles
/// through it, so the ids passed to `add` must index that slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Allegiance handle consulted by the friend/foe rule of line queries: a
/// candidate is skipped only when it is not the designated target, both
/// sides have a government, and those governments are not enemies.
pub trait Government {
    fn is_enemy(&self, other: &Self) -> bool;
}

/// An oriented silhouette supporting ray and annulus tests in the body's
/// local frame.
pub trait Mask {
    /// Where along `direction` a ray starting `offset` away from the body's
    /// center first enters the silhouette, as a fraction of `direction`'s
    /// length. Any value >= 1 means the ray misses; values are compared as
    /// returned, without clamping.
    fn collide(&self, offset: Point, direction: Point, facing: Angle) -> f64;

    /// Whether any part of the silhouette touches the annulus whose center
    /// lies `offset` away from the body, with the given inner and outer
    /// radii.
    fn within_ring(&self, offset: Point, facing: Angle, inner: f64, outer: f64) -> bool;
}

/// The narrow contract a `CollisionSet` consults on each candidate body.
pub trait Body {
    type Government: Government;
    type Mask: Mask + ?Sized;

    fn position(&self) -> Point;

    /// Bounding radius of the silhouette. The grid footprint is the
    /// axis-aligned box of this radius; the mask rejects false positives.
    fn radius(&self) -> f64;

    fn facing(&self) -> Angle;

    fn government(&self) -> Option<&Self::Government>;

    /// The silhouette to test on the given simulation step. Masks may be
    /// step-animated, which is why the step is threaded through.
    fn mask(&self, step: u64) -> &Self::Mask;
}

/// What the projectile convenience overload of line queries needs: the
/// traced segment runs from `position` to `position + velocity`.
pub trait Projectile {
    type Body: Body;

    fn position(&self) -> Point;
    fn velocity(&self) -> Point;
    fn government(&self) -> Option<&<Self::Body as Body>::Government>;
    fn target(&self) -> Option<BodyId>;
}
