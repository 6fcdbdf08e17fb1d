//! Green time allocation across lanes.

mod green;

pub use green::{Allocation, GreenTimeAllocator};
