//! Exit codes for the function process
//!
//! Follows Unix conventions and sysexits.h where applicable.

/// Success - the ResourceList was written
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// Validation error - functionConfig is not a well-formed HelmRelease
pub const VALIDATION_ERROR: u8 = 2;

/// Generation error - a provider (usually helm) failed
pub const GENERATION_ERROR: u8 = 3;

/// Parse error - malformed field, ResourceList or helm output
pub const PARSE_ERROR: u8 = 4;

/// IO error - reading input, writing output, temp files, sibling data
pub const IO_ERROR: u8 = 5;

/// Unknown provider
pub const NOT_FOUND: u8 = 6;
