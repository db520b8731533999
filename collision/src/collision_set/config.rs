/// Grid configuration for a `CollisionSet`.
#[derive(Debug, Clone)]
pub struct Config {
    /// World units per grid cell edge. Values that are not a power of two
    /// are rounded down to one.
    pub cell_size: u32,
    /// Grid side length in cells, with the same rounding rule. The grid
    /// spans `cell_size * cell_count` world units per axis and wraps
    /// toroidally outside that range.
    pub cell_count: u32,
    /// Pre-allocate storage sized for about this many bodies.
    pub pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cell_size: 256,
            cell_count: 64,
            pool_size: 1000,
        }
    }
}
