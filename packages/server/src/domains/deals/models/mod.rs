mod deal;

pub use deal::*;
