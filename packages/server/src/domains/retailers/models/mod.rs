mod retailer;

pub use retailer::*;
