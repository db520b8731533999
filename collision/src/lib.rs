pub mod body;
pub mod collision_set;

pub use body::{Body, BodyId, Government, Mask, Projectile};
pub use collision_set::{CollisionSet, Config, MAX_VELOCITY, USED_MAX_VELOCITY};
