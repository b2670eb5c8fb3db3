//! Protocol constants and tuning parameters.
//!
//! Field widths here are part of the wire format shared with every peer and
//! tracker on the network; changing one breaks compatibility with existing
//! nodes.

use std::time::Duration;

// ============================================================================
// Ports and hosts
// ============================================================================

/// Default port the indexing server listens on
pub const DEFAULT_TRACKER_PORT: u16 = 9999;

/// Default host peers use to reach the indexing server (and each other)
pub const DEFAULT_TRACKER_HOST: &str = "localhost";

/// Listen port meaning "let the OS pick one"
pub const EPHEMERAL_PORT: u16 = 0;

// ============================================================================
// Wire field widths
// ============================================================================

/// Width of the peer identity announced once per tracker connection
pub const IDENTITY_FIELD_SIZE: usize = 4;

/// Width of the request tag preceding every tracker request
pub const REQUEST_TAG_SIZE: usize = 1;

/// Width of a NUL-padded filename field
pub const FILENAME_FIELD_SIZE: usize = 256;

/// Longest filename that still leaves room for the terminating NUL
pub const MAX_FILENAME_LEN: usize = FILENAME_FIELD_SIZE - 1;

/// Width of the NUL-padded search result field
pub const SEARCH_RESULT_FIELD_SIZE: usize = 4096;

/// Width of the decimal file status/size field
pub const STATUS_FIELD_SIZE: usize = 16;

// ============================================================================
// Status codes
// ============================================================================

/// Requested file could not be opened
pub const STATUS_NOT_FOUND: i64 = -1;

/// Requested file was opened but its metadata could not be read
pub const STATUS_STAT_FAILED: i64 = -2;

// ============================================================================
// Reconciliation
// ============================================================================

/// Delay between two passes over the shared directory
pub const RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

// ============================================================================
// Buffers
// ============================================================================

/// Initial capacity of a transport's read buffer
pub const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Marker separating a retrieved file's stem from the source peer identity
pub const ORIGIN_SUFFIX: &str = "-origin-";
