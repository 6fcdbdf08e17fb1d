//! End-to-end signal optimization: counts → density → cycle → green split.

mod signal_optimizer;

pub use signal_optimizer::SignalOptimizer;
