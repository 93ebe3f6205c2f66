//! Top-level facade crate for statsgate.
//!
//! Re-exports core types and the provider library so users can depend on a single crate.

pub mod core {
    pub use statsgate_core::*;
}

pub mod provider {
    pub use statsgate_provider::*;
}
