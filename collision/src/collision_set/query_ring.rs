use super::*;
use crate::body::{Body, BodyId, Mask};
use common::Point;

impl CollisionSet {
    /// All bodies within the given range of the given point. Equivalent to
    /// a ring with an inner radius of zero.
    pub fn circle<B: Body>(&mut self, bodies: &[B], center: Point, radius: f64) -> &[BodyId] {
        self.ring(bodies, center, 0.0, radius)
    }

    /// All bodies touching the annulus centered at `center` with the given
    /// inner and outer radii. The returned slice borrows an internal buffer
    /// that is overwritten by the next `ring` or `circle` call.
    pub fn ring<B: Body>(
        &mut self,
        bodies: &[B],
        center: Point,
        inner: f64,
        outer: f64,
    ) -> &[BodyId] {
        debug_assert!(self.finished, "ring query before finish()");

        // The closed range of grid cells covered by the outer disk.
        let min_x = ((center.x - outer) as i32) >> self.shift;
        let min_y = ((center.y - outer) as i32) >> self.shift;
        let max_x = ((center.x + outer) as i32) >> self.shift;
        let max_y = ((center.y + outer) as i32) >> self.shift;

        let epoch = self.next_seen_epoch();
        self.result.clear();

        let counts = &self.counts;
        let sorted = &self.sorted;
        let seen = &mut self.seen;
        let result = &mut self.result;

        for y in min_y..=max_y {
            let gy = y & self.wrap_mask;
            for x in min_x..=max_x {
                let gx = x & self.wrap_mask;
                let index = (gy * self.cells + gx) as usize;
                let begin = counts[index] as usize;
                let end = counts[index + 1] as usize;
                for entry in &sorted[begin..end] {
                    // Skip wrap aliases from other tiles of the torus.
                    if entry.x != x || entry.y != y {
                        continue;
                    }

                    if seen[entry.seen_index as usize] == epoch {
                        continue;
                    }
                    seen[entry.seen_index as usize] = epoch;

                    let body = &bodies[entry.id.index()];
                    let offset = center - body.position();
                    let length = offset.length();
                    // Accept on center distance first; the silhouette test
                    // catches bodies whose center lies outside the annulus.
                    if (length <= outer && length >= inner)
                        || body
                            .mask(self.step)
                            .within_ring(offset, body.facing(), inner, outer)
                    {
                        result.push(entry.id);
                    }
                }
            }
        }

        &self.result
    }
}
