use crate::config::{DEFAULT_LEAD_DAYS, DEFAULT_REMINDER_HOUR, MAX_LEAD_DAYS, PREFERENCES_FILE};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Reminder settings the scheduler depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Days before expiration at which the reminder fires
    #[serde(default = "default_lead_days")]
    pub lead_days: u32,
    /// Local hour of day, 0..=23
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: u32,
    /// Master switch; while off no trigger is installed
    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,
}

fn default_lead_days() -> u32 {
    DEFAULT_LEAD_DAYS
}

fn default_reminder_hour() -> u32 {
    DEFAULT_REMINDER_HOUR
}

fn default_notifications_enabled() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            lead_days: DEFAULT_LEAD_DAYS,
            reminder_hour: DEFAULT_REMINDER_HOUR,
            notifications_enabled: true,
        }
    }
}

impl Preferences {
    /// Build preferences from user input, rejecting impossible values.
    /// Notifications start enabled.
    pub fn validated(lead_days: i64, reminder_hour: i64) -> AppResult<Self> {
        let lead_days = u32::try_from(lead_days)
            .ok()
            .filter(|d| *d <= MAX_LEAD_DAYS)
            .ok_or_else(|| AppError::validation(format!("invalid lead time: {} days", lead_days)))?;
        let reminder_hour = u32::try_from(reminder_hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| AppError::validation(format!("invalid reminder hour: {}", reminder_hour)))?;
        Ok(Self {
            lead_days,
            reminder_hour,
            notifications_enabled: true,
        })
    }

    /// Whether switching from `self` to `other` installs, moves or removes any trigger.
    pub fn affects_schedule(&self, other: &Preferences) -> bool {
        if self.notifications_enabled != other.notifications_enabled {
            return true;
        }
        other.notifications_enabled
            && (self.lead_days != other.lead_days || self.reminder_hour != other.reminder_hour)
    }
}

/// Load preferences from the data directory.
///
/// A missing file yields defaults. An unreadable or corrupt file is logged
/// and also yields defaults, so a damaged settings file never blocks reminders.
pub fn load_preferences(app_data_path: &Path) -> Preferences {
    let path = app_data_path.join(PREFERENCES_FILE);

    if !path.exists() {
        return Preferences::default();
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read preferences, using defaults");
            return Preferences::default();
        }
    };

    let mut prefs = match serde_json::from_str::<Preferences>(&content) {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt preferences, using defaults");
            return Preferences::default();
        }
    };

    if prefs.reminder_hour >= 24 {
        warn!(hour = prefs.reminder_hour, "stored reminder hour out of range, using default");
        prefs.reminder_hour = DEFAULT_REMINDER_HOUR;
    }
    if prefs.lead_days > MAX_LEAD_DAYS {
        warn!(lead_days = prefs.lead_days, "stored lead time out of range, using default");
        prefs.lead_days = DEFAULT_LEAD_DAYS;
    }
    prefs
}

/// Save preferences to the data directory
pub fn save_preferences(app_data_path: &Path, prefs: &Preferences) -> AppResult<()> {
    let path = app_data_path.join(PREFERENCES_FILE);
    let content = serde_json::to_string_pretty(prefs)
        .map_err(|e| AppError::preferences(e.to_string()))?;
    fs::write(&path, content).map_err(|e| AppError::preferences(e.to_string()))?;
    info!(lead_days = prefs.lead_days, hour = prefs.reminder_hour, "preferences saved");
    Ok(())
}
