use super::*;
use crate::body::{Body, BodyId, Government, Mask, Projectile};
use common::Point;
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum allowed length of a line query segment, in world units. Longer
/// segments are clamped so the scaled integer traversal below cannot
/// overflow 64 bits.
pub const MAX_VELOCITY: i64 = 450_000;
/// Length substituted for any segment longer than `MAX_VELOCITY`.
pub const USED_MAX_VELOCITY: i64 = MAX_VELOCITY - 1;

/// Warn only once, process-wide, about over-length segments.
static VELOCITY_WARNED: AtomicBool = AtomicBool::new(false);

/// The closest collision found so far. Seeded with the caller's cap so
/// collisions farther out than an already-known hit are never recorded.
struct Closest {
    distance: f64,
    body: Option<BodyId>,
}

impl Closest {
    fn new(distance: f64) -> Self {
        Self {
            distance,
            body: None,
        }
    }

    fn try_nearer(&mut self, distance: f64, body: BodyId) {
        if distance >= self.distance {
            return;
        }
        self.distance = distance;
        self.body = Some(body);
    }

    fn distance(&self) -> f64 {
        self.distance
    }

    fn body(&self) -> Option<BodyId> {
        self.body
    }
}

impl CollisionSet {
    /// First body hit by the projectile over this step, tracing the segment
    /// from its position to its position plus velocity.
    pub fn projectile_line<P: Projectile>(
        &mut self,
        bodies: &[P::Body],
        projectile: &P,
        closest_hit: Option<&mut f64>,
    ) -> Option<BodyId> {
        let from = projectile.position();
        let to = from + projectile.velocity();
        self.line(
            bodies,
            from,
            to,
            closest_hit,
            projectile.government(),
            projectile.target(),
        )
    }

    /// First body hit along the segment `from..to`, which may be a
    /// projectile's step or a full expected trajectory.
    ///
    /// `closest_hit` caps the search on entry; when a strictly closer body is
    /// found, the hit fraction is written back through it. `target` is
    /// always hittable regardless of government; otherwise a candidate with
    /// a government is only hittable when `government` is present and hostile
    /// to it, or when `government` is `None`.
    pub fn line<B: Body>(
        &mut self,
        bodies: &[B],
        from: Point,
        to: Point,
        closest_hit: Option<&mut f64>,
        government: Option<&B::Government>,
        target: Option<BodyId>,
    ) -> Option<BodyId> {
        debug_assert!(self.finished, "line query before finish()");

        let x = from.x as i32;
        let y = from.y as i32;
        let end_x = to.x as i32;
        let end_y = to.y as i32;

        let mut gx = x >> self.shift;
        let mut gy = y >> self.shift;
        let end_gx = end_x >> self.shift;
        let end_gy = end_y >> self.shift;

        let cap = closest_hit.as_deref().copied().unwrap_or(1.0);
        let mut closest = Closest::new(cap);

        // Very common special case: the whole segment sits in one grid cell,
        // so the stepped traversal below can be skipped entirely.
        if gx == end_gx && gy == end_gy {
            let index = ((gy & self.wrap_mask) * self.cells + (gx & self.wrap_mask)) as usize;
            let begin = self.counts[index] as usize;
            let end = self.counts[index + 1] as usize;
            for entry in &self.sorted[begin..end] {
                // Entries whose signed cell differs only landed in this bin
                // through toroidal wrapping.
                if entry.x != gx || entry.y != gy {
                    continue;
                }

                let body = &bodies[entry.id.index()];
                if target != Some(entry.id) {
                    if let (Some(theirs), Some(ours)) = (body.government(), government) {
                        if !theirs.is_enemy(ours) {
                            continue;
                        }
                    }
                }

                let offset = from - body.position();
                let range = body.mask(self.step).collide(offset, to - from, body.facing());
                closest.try_nearer(range, entry.id);
            }
            if closest.distance() < 1.0 {
                if let Some(hit) = closest_hit {
                    *hit = closest.distance();
                }
            }
            return closest.body();
        }

        let velocity = to - from;
        if velocity.length() > MAX_VELOCITY as f64 {
            if !VELOCITY_WARNED.swap(true, Ordering::Relaxed) {
                log::warn!("maximum projectile velocity is {MAX_VELOCITY}");
            }
            let new_end = from + velocity.unit() * USED_MAX_VELOCITY as f64;
            return self.line(bodies, from, new_end, closest_hit, government, target);
        }

        // Stepped traversal from the start cell to the end cell. Directions
        // of travel per axis, with zero treated as positive.
        let step_x: i32 = if x <= end_x { 1 } else { -1 };
        let step_y: i32 = if y <= end_y { 1 } else { -1 };
        let mx = (end_x as i64 - x as i64).unsigned_abs();
        let my = (end_y as i64 - y as i64).unsigned_abs();
        // Pretend each cell is scale units wide so every boundary crossing
        // below stays in exact integer arithmetic.
        let scale = mx.max(1) * my.max(1);
        let full_scale = self.cell_size as u64 * scale;

        // Remaining distance to the next cell boundary along each axis, in
        // the common scaled unit.
        let mut rx = scale * (x & self.cell_mask) as u64;
        let mut ry = scale * (y & self.cell_mask) as u64;
        if step_x > 0 {
            rx = full_scale - rx;
        }
        if step_y > 0 {
            ry = full_scale - ry;
        }

        let epoch = self.next_seen_epoch();
        let counts = &self.counts;
        let sorted = &self.sorted;
        let seen = &mut self.seen;

        loop {
            let index = ((gy & self.wrap_mask) * self.cells + (gx & self.wrap_mask)) as usize;
            let begin = counts[index] as usize;
            let end = counts[index + 1] as usize;
            for entry in &sorted[begin..end] {
                if entry.x != gx || entry.y != gy {
                    continue;
                }

                // A body straddling several visited cells is only tested once
                // per query.
                if seen[entry.seen_index as usize] == epoch {
                    continue;
                }
                seen[entry.seen_index as usize] = epoch;

                let body = &bodies[entry.id.index()];
                if target != Some(entry.id) {
                    if let (Some(theirs), Some(ours)) = (body.government(), government) {
                        if !theirs.is_enemy(ours) {
                            continue;
                        }
                    }
                }

                let offset = from - body.position();
                let range = body.mask(self.step).collide(offset, to - from, body.facing());
                closest.try_nearer(range, entry.id);
            }

            if closest.body().is_some() || (gx == end_gx && gy == end_gy) {
                break;
            }

            // Decide which boundary is crossed first: compare rx / mx with
            // ry / my without dividing.
            let diff = rx.wrapping_mul(my).wrapping_sub(ry.wrapping_mul(mx)) as i64;
            if diff == 0 {
                // The segment passes exactly through a cell corner.
                rx = full_scale;
                ry = full_scale;
                // A diagonal step must not overshoot the end cell.
                if gx == end_gx && gy + step_y == end_gy {
                    break;
                }
                if gy == end_gy && gx + step_x == end_gx {
                    break;
                }
                gx += step_x;
                gy += step_y;
            } else if diff < 0 {
                // rx is a multiple of mx by construction (scale contains mx
                // as a factor), so the division is exact; mx is nonzero or
                // the comparison could not have been negative.
                ry -= my * (rx / mx);
                rx = full_scale;
                gx += step_x;
            } else {
                // Likewise with the axes swapped.
                rx -= mx * (ry / my);
                ry = full_scale;
                gy += step_y;
            }
        }

        if closest.distance() < 1.0 {
            if let Some(hit) = closest_hit {
                *hit = closest.distance();
            }
        }
        closest.body()
    }
}
