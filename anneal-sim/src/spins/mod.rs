pub mod board;
pub mod energy;
pub mod solution;
pub mod state;

pub use board::{render, BoardLayout};
pub use energy::energy;
pub use solution::{extract, majority, Solution};
pub use state::{parity, SpinLattice};
