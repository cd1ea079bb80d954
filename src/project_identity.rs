//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.

pub const DISPLAY_NAME: &str = "pkman";
pub const BINARY_NAME: &str = "pkman";
pub const QUALIFIER: &str = "org";
pub const ORGANIZATION: &str = "pkman";
pub const APPLICATION: &str = "pkman";
pub const ENV_PREFIX: &str = "PKMAN";
pub const SETTINGS_FILE_BASENAME: &str = "settings.kdl";
pub const DATABASE_BASENAME: &str = "pkman.db";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}
