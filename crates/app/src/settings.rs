use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    cli::GlobalArgs,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/pocketbook.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Session token sent as `Authorization: Bearer`. Empty means anonymous.
    pub token: String,
    /// IANA name used to decide what "today" is.
    pub timezone: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: String::new(),
            timezone: "Asia/Seoul".to_string(),
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

/// File, then `POCKETBOOK_*` environment, then command line.
pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("POCKETBOOK"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }

    Ok(settings)
}
