use super::*;
use crate::body::{Body, BodyId};

impl CollisionSet {
    pub fn with_config(config: Config) -> Self {
        // Round the cell size down to a power of two; the shift count turns
        // world coordinates into grid coordinates.
        let mut shift = 0u32;
        let mut size = config.cell_size;
        while size > 1 {
            size >>= 1;
            shift += 1;
        }
        let cell_size = 1u32 << shift;
        let cell_mask = (cell_size - 1) as i32;

        let mut cells = 1i32;
        let mut count = config.cell_count;
        while count > 1 {
            count >>= 1;
            cells <<= 1;
        }
        let wrap_mask = cells - 1;

        let mut set = Self {
            shift,
            cell_size,
            cell_mask,
            cells,
            wrap_mask,
            step: 0,
            added: Vec::new(),
            counts: Vec::new(),
            sorted: Vec::new(),
            all: Vec::new(),
            seen: Vec::new(),
            seen_epoch: 0,
            result: Vec::new(),
            finished: false,
        };
        if config.pool_size > 0 {
            set.added.reserve(config.pool_size);
            set.sorted.reserve(config.pool_size);
            set.all.reserve(config.pool_size);
            set.seen.reserve(config.pool_size);
            set.result.reserve(config.pool_size);
        }
        // Leave the set usable even if clear() is never called explicitly.
        set.clear(0);
        set
    }

    pub fn new(cell_size: u32, cell_count: u32) -> Self {
        Self::with_config(Config {
            cell_size,
            cell_count,
            ..Config::default()
        })
    }

    /// Drop all bodies and start recording a new simulation step. The seen
    /// markers are per-query state and survive until the next `finish`.
    pub fn clear(&mut self, step: u64) {
        self.step = step;
        self.added.clear();
        self.sorted.clear();
        self.all.clear();
        // Two sentinel slots ahead of the histogram carry the offset-by-two
        // indexing the counting sort in finish() relies on.
        self.counts.clear();
        self.counts
            .resize((self.cells * self.cells + 2) as usize, 0);
        self.finished = false;
    }

    /// Record a body's grid footprint. `id` must be the body's index in the
    /// arena slice later handed to the queries.
    pub fn add<B: Body>(&mut self, id: BodyId, body: &B) {
        debug_assert!(
            !self.finished,
            "add() after finish() without an intervening clear()"
        );
        let position = body.position();
        let radius = body.radius();

        // The closed range of grid cells covered by the bounding box.
        let min_x = ((position.x - radius) as i32) >> self.shift;
        let min_y = ((position.y - radius) as i32) >> self.shift;
        let max_x = ((position.x + radius) as i32) >> self.shift;
        let max_y = ((position.y + radius) as i32) >> self.shift;

        let seen_index = self.all.len() as u32;
        for y in min_y..=max_y {
            let gy = y & self.wrap_mask;
            for x in min_x..=max_x {
                let gx = x & self.wrap_mask;
                self.added.push(Entry { id, seen_index, x, y });
                self.counts[(gy * self.cells + gx + 2) as usize] += 1;
            }
        }

        // Also record the body irrespective of its grid footprint.
        self.all.push(id);
    }

    /// Finish adding bodies and organize them into the lookup table.
    pub fn finish(&mut self) {
        debug_assert!(!self.finished, "finish() called twice");

        // Partial sum turns per-bin counts into output offsets; because of
        // the sentinels, counts[b + 1] is the write cursor for bin b below.
        let mut sum = 0u32;
        for slot in self.counts.iter_mut() {
            sum += *slot;
            *slot = sum;
        }

        // Single-pass stable counting sort into the bin table.
        self.sorted.clear();
        self.sorted.resize(self.added.len(), Entry::default());
        for entry in &self.added {
            let gx = entry.x & self.wrap_mask;
            let gy = entry.y & self.wrap_mask;
            let index = (gy * self.cells + gx + 1) as usize;
            self.sorted[self.counts[index] as usize] = *entry;
            self.counts[index] += 1;
        }
        // counts[b] is now where bin b begins and counts[b + 1] where it ends.

        self.seen.clear();
        self.seen.resize(self.all.len(), 0);
        self.seen_epoch = 0;
        self.finished = true;
    }
}
