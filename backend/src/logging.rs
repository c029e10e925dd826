//! Runtime-adjustable log level and output format.
//!
//! [`LogControl`] is created once at start-up and handed to whatever needs to
//! read or change the logging configuration (the management endpoint, the
//! server bootstrap). There is no process-wide registry: the only global is
//! the `tracing` subscriber itself, whose level filter and formatting layer
//! are wrapped in `tracing_subscriber::reload` layers owned by the control.

use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, fmt as tracing_fmt, reload};

/// Supported log levels, most verbose first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> LevelFilter {
        let level = match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        };
        LevelFilter::from_level(level)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

impl FromStr for LogLevel {
    type Err = LogControlError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(LogControlError::InvalidLevel {
                value: value.to_owned(),
            }),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = LogControlError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(LogControlError::InvalidFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// Current logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LogSettings {
    /// Parse optional raw settings, falling back to defaults for absent or
    /// unrecognised values.
    ///
    /// Returns the settings plus every value that had to be discarded, so the
    /// caller can report them once logging is up.
    pub fn from_raw_lossy(
        level: Option<&str>,
        format: Option<&str>,
    ) -> (Self, Vec<LogControlError>) {
        let mut rejected = Vec::new();
        let level = level.map_or(Ok(LogLevel::default()), str::parse);
        let format = format.map_or(Ok(LogFormat::default()), str::parse);
        let settings = Self {
            level: level.unwrap_or_else(|err| {
                rejected.push(err);
                LogLevel::default()
            }),
            format: format.unwrap_or_else(|err| {
                rejected.push(err);
                LogFormat::default()
            }),
        };
        (settings, rejected)
    }
}

/// Errors raised while changing the logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogControlError {
    /// The requested level is not one of DEBUG, INFO, WARN, ERROR.
    #[error("invalid log level: {value}. valid levels are: DEBUG, INFO, WARN, ERROR")]
    InvalidLevel { value: String },
    /// The requested format is not one of json, text.
    #[error("invalid log format: {value}. valid formats are: json, text")]
    InvalidFormat { value: String },
    /// The subscriber rejected the new configuration.
    #[error("failed to apply logging configuration: {message}")]
    Reload { message: String },
    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {message}")]
    Install { message: String },
}

type LevelLayer = reload::Layer<LevelFilter, Registry>;
type FilteredRegistry = Layered<LevelLayer, Registry>;
type FormatLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

fn format_layer(format: LogFormat) -> FormatLayer {
    match format {
        LogFormat::Text => tracing_fmt::layer().with_target(false).boxed(),
        LogFormat::Json => tracing_fmt::layer().json().boxed(),
    }
}

struct ReloadHandles {
    level: reload::Handle<LevelFilter, Registry>,
    format: reload::Handle<FormatLayer, FilteredRegistry>,
}

fn reload_error(err: reload::Error) -> LogControlError {
    LogControlError::Reload {
        message: err.to_string(),
    }
}

impl ReloadHandles {
    fn reload_level(&self, level: LogLevel) -> Result<(), LogControlError> {
        self.level.reload(level.as_filter()).map_err(reload_error)
    }

    fn reload_format(&self, format: LogFormat) -> Result<(), LogControlError> {
        self.format
            .reload(format_layer(format))
            .map_err(reload_error)
    }
}

/// Owner of the logging configuration.
///
/// # Examples
/// ```
/// use user_service::logging::{LogControl, LogFormat, LogLevel, LogSettings};
///
/// let control = LogControl::detached(LogSettings::default());
/// let settings = control.set_level("debug").expect("valid level");
/// assert_eq!(settings.level, LogLevel::Debug);
/// assert_eq!(settings.format, LogFormat::Text);
/// ```
pub struct LogControl {
    settings: RwLock<LogSettings>,
    handles: Option<ReloadHandles>,
}

impl LogControl {
    /// Install the global `tracing` subscriber configured with `settings`.
    ///
    /// # Errors
    /// Returns [`LogControlError::Install`] when a global subscriber is
    /// already set.
    pub fn install(settings: LogSettings) -> Result<Self, LogControlError> {
        let (level_layer, level) = reload::Layer::new(settings.level.as_filter());
        let (format_layer, format) = reload::Layer::new(format_layer(settings.format));

        tracing_subscriber::registry()
            .with(level_layer)
            .with(format_layer)
            .try_init()
            .map_err(|err| LogControlError::Install {
                message: err.to_string(),
            })?;

        Ok(Self {
            settings: RwLock::new(settings),
            handles: Some(ReloadHandles { level, format }),
        })
    }

    /// Track settings without touching any subscriber.
    pub fn detached(settings: LogSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            handles: None,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> LogSettings {
        match self.settings.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Change the level; accepts DEBUG, INFO, WARN, ERROR in any case.
    pub fn set_level(&self, level: &str) -> Result<LogSettings, LogControlError> {
        let level: LogLevel = level.parse()?;
        self.update(
            |handles| handles.reload_level(level),
            |settings| settings.level = level,
        )
    }

    /// Change the output format; accepts `json` or `text` in any case.
    pub fn set_format(&self, format: &str) -> Result<LogSettings, LogControlError> {
        let format: LogFormat = format.parse()?;
        self.update(
            |handles| handles.reload_format(format),
            |settings| settings.format = format,
        )
    }

    /// Reload the one layer a setter touches, then record the change. The
    /// stored settings only ever describe layers that were reloaded.
    fn update(
        &self,
        reload: impl FnOnce(&ReloadHandles) -> Result<(), LogControlError>,
        change: impl FnOnce(&mut LogSettings),
    ) -> Result<LogSettings, LogControlError> {
        let mut guard = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handles) = &self.handles {
            reload(handles)?;
        }
        change(&mut *guard);
        Ok(*guard)
    }
}

impl fmt::Debug for LogControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogControl")
            .field("settings", &self.settings())
            .field("installed", &self.handles.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for log setting parsing and updates.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DEBUG", LogLevel::Debug)]
    #[case("info", LogLevel::Info)]
    #[case(" Warn ", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    fn levels_parse_case_insensitively(#[case] raw: &str, #[case] expected: LogLevel) {
        assert_eq!(raw.parse::<LogLevel>(), Ok(expected));
    }

    #[rstest]
    #[case("trace")]
    #[case("")]
    #[case("verbose")]
    fn unknown_levels_are_rejected(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<LogLevel>(),
            Err(LogControlError::InvalidLevel {
                value: raw.to_owned()
            })
        );
    }

    #[rstest]
    #[case("JSON", LogFormat::Json)]
    #[case("text", LogFormat::Text)]
    fn formats_parse_case_insensitively(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>(), Ok(expected));
    }

    #[rstest]
    fn levels_display_in_upper_case() {
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[rstest]
    fn lossy_parsing_falls_back_to_defaults() {
        let (settings, rejected) = LogSettings::from_raw_lossy(Some("loud"), Some("json"));
        assert_eq!(settings.level, LogLevel::Info);
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(
            rejected,
            vec![LogControlError::InvalidLevel {
                value: "loud".to_owned()
            }]
        );
    }

    #[rstest]
    fn absent_raw_values_use_defaults() {
        let (settings, rejected) = LogSettings::from_raw_lossy(None, None);
        assert_eq!(settings, LogSettings::default());
        assert!(rejected.is_empty());
    }

    #[rstest]
    fn invalid_updates_leave_settings_untouched() {
        let control = LogControl::detached(LogSettings::default());
        assert!(control.set_level("loud").is_err());
        assert!(control.set_format("xml").is_err());
        assert_eq!(control.settings(), LogSettings::default());
    }

    /// Handles whose level layer is live while the format layer's
    /// subscriber has already been dropped.
    fn handles_with_dead_format_layer() -> (impl tracing::Subscriber, ReloadHandles) {
        let (level_layer, level) = reload::Layer::new(LevelFilter::INFO);
        let live = tracing_subscriber::registry().with(level_layer);

        let (other_level, _) = reload::Layer::new(LevelFilter::INFO);
        let (format_layer, format) = reload::Layer::new(format_layer(LogFormat::Text));
        drop(
            tracing_subscriber::registry()
                .with(other_level)
                .with(format_layer),
        );

        (live, ReloadHandles { level, format })
    }

    #[rstest]
    fn failed_reload_keeps_settings_in_step_with_the_subscriber() {
        let (_live, handles) = handles_with_dead_format_layer();
        let control = LogControl {
            settings: RwLock::new(LogSettings::default()),
            handles: Some(handles),
        };

        let settings = control.set_level("debug").expect("level layer is live");
        assert_eq!(settings.level, LogLevel::Debug);

        let err = control.set_format("json").expect_err("format layer is gone");
        assert!(matches!(err, LogControlError::Reload { .. }));
        assert_eq!(
            control.settings(),
            LogSettings {
                level: LogLevel::Debug,
                format: LogFormat::Text,
            }
        );
    }

    #[rstest]
    fn updates_are_independent() {
        let control = LogControl::detached(LogSettings::default());
        control.set_format("json").expect("valid format");
        let settings = control.set_level("error").expect("valid level");
        assert_eq!(
            settings,
            LogSettings {
                level: LogLevel::Error,
                format: LogFormat::Json,
            }
        );
    }
}
