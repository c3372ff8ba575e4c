//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success (including files that were already processed)
/// - 1: General error (storage failures, corrupt ledger)
/// - 2: Misuse of shell command (reserved by shells and clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Input file or configured path not found.
    pub const NOT_FOUND: i32 = 3;

    /// Missing or contradictory arguments and configuration.
    pub const INVALID_INPUT: i32 = 4;

    /// An input line could not be decoded.
    pub const MALFORMED_RECORD: i32 = 5;
}
