//! Constants used throughout the PPR core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "ppr.sqlite3";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Date format used for storage and for dates in URLs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keys a classification submission must contain.
pub const REQUIRED_SUBMISSION_KEYS: [&str; 10] = [
    "is_in_isolation",
    "data_accepted",
    "station",
    "room_name",
    "bed_number",
    "barthel_index",
    "expanded_barthel_index",
    "mini_mental_status",
    "selected_care_services",
    "visit_type",
];

/// Minutes granted to every classified patient day.
pub const BASE_MINUTES: i64 = 33;

/// Minutes added once per stay, on the day of admission.
pub const CASE_MINUTES: i64 = 75;

/// Minutes per general care level, A1..A4.
pub const GENERAL_LEVEL_MINUTES: [i64; 4] = [52, 98, 179, 280];

/// Minutes per special care level, S1..S4.
pub const SPECIAL_LEVEL_MINUTES: [i64; 4] = [26, 55, 87, 130];

pub const BARTHEL_INDEX_MAX: i64 = 100;
pub const EXPANDED_BARTHEL_INDEX_MAX: i64 = 90;
pub const MINI_MENTAL_STATUS_MAX: i64 = 30;
