//! Neon implementation of the lane-parallel vector kernel for `f32`.

mod neon_vector;

pub use self::neon_vector::NeonLanes;
