pub mod sweep;

pub use sweep::{checkerboard_sweep, heat_bath, local_field, metropolis, MAX_EXPONENT};
