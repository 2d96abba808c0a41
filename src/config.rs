/// Application configuration constants
///
/// Centralized configuration for the pantry core.

/// Days before the expiration date at which a reminder fires, when unset
pub const DEFAULT_LEAD_DAYS: u32 = 3;

/// Longest lead time accepted from the user or a stored settings file
pub const MAX_LEAD_DAYS: u32 = 365;

/// Hour of day (local, 24h) at which reminders fire, when unset
pub const DEFAULT_REMINDER_HOUR: u32 = 12;

/// Date format used for every stored product date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored value of a date the user left empty
pub const UNSET_DATE: &str = "-";

/// Names longer than this are shortened for list rows
pub const SHORT_NAME_MAX_CHARS: usize = 18;

/// Directory under the platform data dir holding the reference stores
pub const APP_DATA_DIR: &str = "PantryReminders";

pub const PRODUCTS_FILE: &str = "products.json";

pub const PREFERENCES_FILE: &str = "preferences.json";
