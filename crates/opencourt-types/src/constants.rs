//! System-wide constants for the OpenCourt engine.

/// Number of arbitrators drawn per dispute.
pub const PANEL_SIZE: usize = 3;

/// Votes on one side needed to resolve a dispute.
pub const MAJORITY: u8 = 2;

/// Default maximum listing name length in bytes.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 256;

/// Default maximum listing price (native units).
pub const DEFAULT_MAX_PRICE: u64 = 1_000_000_000;

/// Default maximum stock quantity per listing.
pub const DEFAULT_MAX_QUANTITY: u32 = 1_000_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenCourt";
