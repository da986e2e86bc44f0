//! Exit code registry for the `waybill` binary.
//!
//! Every code the CLI can return lives here, so scripts wrapping
//! `waybill` can rely on the numbers staying stable.
//!
//! | Range | Domain    | Description                            |
//! |-------|-----------|----------------------------------------|
//! | 0     | Universal | Success                                |
//! | 1     | Universal | General error (reserved, unspecified)  |
//! | 2     | Universal | Usage error (bad flags or arguments)   |
//! | 3-9   | link      | Linkage-specific codes                 |
//!
//! New codes take the next free number in their range, get a doc comment
//! naming what triggers them, and a row in the table above.

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Command finished without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Bad invocation: unknown command, malformed or missing arguments.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Link (3-9)
// =============================================================================

/// Config failed to parse or validate.
pub const EXIT_LINK_INVALID_CONFIG: u8 = 3;

/// Runtime failure: unreadable input, missing column, write error.
pub const EXIT_LINK_RUNTIME: u8 = 4;

/// Unmatched destination rows remain and --strict was given.
pub const EXIT_LINK_UNMATCHED: u8 = 5;
