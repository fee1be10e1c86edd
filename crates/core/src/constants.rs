/// Constants used throughout the webfs codebase
// REST path prefix
pub const WEBHDFS_PREFIX: &str = "/webhdfs/v1";

// URI schemes
pub const WEBHDFS_SCHEME: &str = "webhdfs";
pub const SWEBHDFS_SCHEME: &str = "swebhdfs";

// Default HTTP(S) ports of the name node
pub const DEFAULT_HTTP_PORT: u16 = 50070;
pub const DEFAULT_HTTPS_PORT: u16 = 50470;

// Token kinds compiled into the client
pub const WEBHDFS_TOKEN_KIND: &str = "WEBHDFS delegation";
pub const SWEBHDFS_TOKEN_KIND: &str = "SWEBHDFS delegation";

// Query parameter names
pub const PARAM_OP: &str = "op";
pub const PARAM_USER_NAME: &str = "user.name";
pub const PARAM_DELEGATION: &str = "delegation";
pub const PARAM_TOKEN: &str = "token";
pub const PARAM_RENEWER: &str = "renewer";
pub const PARAM_TOKEN_KIND: &str = "kind";
pub const PARAM_TOKEN_SERVICE: &str = "service";

// Remote exception names
pub const INVALID_TOKEN_EXCEPTION: &str = "InvalidToken";

// Environment variable names
pub const WEBFS_LOG_VAR: &str = "WEBFS_LOG";
pub const WEBFS_URI_VAR: &str = "WEBFS_URI";
pub const WEBFS_USER_VAR: &str = "WEBFS_USER";
pub const WEBFS_AUTH_VAR: &str = "WEBFS_AUTH";
pub const WEBFS_TOKEN_REFRESH_VAR: &str = "WEBFS_TOKEN_REFRESH";
pub const WEBFS_RENEWER_VAR: &str = "WEBFS_RENEWER";
pub const WEBFS_CONNECT_TIMEOUT_VAR: &str = "WEBFS_CONNECT_TIMEOUT_SECS";
pub const WEBFS_READ_TIMEOUT_VAR: &str = "WEBFS_READ_TIMEOUT_SECS";
pub const WEBFS_DELEGATION_TOKEN_VAR: &str = "WEBFS_DELEGATION_TOKEN";
