//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default search engine backend
pub const DEFAULT_ENGINE: &str = "catalog";

/// Default engine index location (the place catalog for the `catalog` engine)
pub const DEFAULT_INDEX_PATH: &str = "/tmp/opentrep/traveldb/por.csv";

/// Default SQL database type handed to the engine
pub const DEFAULT_DB_TYPE: &str = "nodb";

/// Default SQL database connection string handed to the engine
pub const DEFAULT_DB_CONNECTION: &str = "/tmp/opentrep/sqlite/ori_por_public.db";

/// Default engine log file
pub const DEFAULT_LOG_PATH: &str = "/tmp/opentrep/trep-search.log";

/// Default base URL of a remote engine service
pub const DEFAULT_REMOTE_URL: &str = "http://127.0.0.1:7979";

/// Default remote engine request timeout in seconds
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Default map zoom level
pub const DEFAULT_ZOOM_LEVEL: i32 = 5;

/// Default map type
pub const DEFAULT_MAP_TYPE: &str = "HYBRID";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "trep-search";
