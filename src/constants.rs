// Input discovery
pub const BACKUP_FILE_PATTERN: &str = r"(?i)^(calls|sms).+\.xml(\.(xz|gz))?$";

// Pipeline defaults
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_SNAPSHOT_PATH: &str = "all.snapshot";
pub const DEFAULT_OUTPUT_JSON: &str = "data.json";
pub const DEFAULT_DATE_FIELD: &str = "readable_date";
pub const DEFAULT_TIMEZONE: &str = "local";

// Snapshot header
pub const SNAPSHOT_MAGIC: &[u8; 8] = b"SMSMERGE";
pub const SNAPSHOT_VERSION: u16 = 1;

// Naive date-time layouts tried in order, after RFC 3339 and RFC 2822.
pub const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "%b %d, %Y %I:%M:%S %p",
    "%b %d, %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

// Date-only layouts, resolved to midnight.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%d %b %Y", "%d.%m.%Y"];
