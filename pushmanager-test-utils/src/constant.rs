//! Fixed values shared by every fixture.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Cookie signing secret of authenticated fixtures. Not a real credential.
pub static TEST_COOKIE_SECRET: &str =
    "pushmanager-test-cookie-secret-not-for-production-use-0123456789abcdef";

/// User stored in the session of template fixtures.
pub static TEST_USER: &str = "testuser";

/// IRC nickname placed in the per-test service settings.
pub static TEST_IRC_NICKNAME: &str = "pushhamster+test";

/// IRC channel placed in the per-test service settings.
pub static TEST_IRC_CHANNEL: &str = "pushmanagertest";

/// Host the API endpoint of per-test service settings points at.
pub static TEST_API_DOMAIN: &str = "localhost";

/// How long `wait()` blocks before giving up.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Root of the workspace this crate lives in
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
}

/// The application's real static asset root
pub fn static_path() -> PathBuf {
    workspace_root().join("static")
}

/// The application's real template root
pub fn template_path() -> PathBuf {
    workspace_root().join("templates")
}
