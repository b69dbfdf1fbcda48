//! Process exit codes

/// Clean shutdown
pub const EXIT_SUCCESS: i32 = 0;

/// Startup failed
pub const EXIT_ERROR: i32 = 1;
