/// First page returned when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Shortest password accepted for signup and password changes.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Path the provider redirects to after a one-time-code email is opened.
pub const AUTH_CONFIRM_PATH: &str = "/auth/confirm";

/// Landing page after a successful signup.
pub const HOME_PATH: &str = "/";

/// Landing page after a successful password login.
pub const PRIVATE_AREA_PATH: &str = "/private";

/// Sign-in page unauthenticated visitors are sent to.
pub const SIGN_IN_PATH: &str = "/auth";

/// Error page for failed one-time-code confirmations.
pub const AUTH_ERROR_PATH: &str = "/auth/error";
