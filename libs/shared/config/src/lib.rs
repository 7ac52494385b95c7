use std::env;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3008;
pub const DEFAULT_CLINIC_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;
pub const DEFAULT_SLOT_DURATION_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub clinic_timezone: Tz,
    pub default_slot_duration_minutes: i64,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            clinic_timezone: DEFAULT_CLINIC_TIMEZONE,
            default_slot_duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|raw| match raw.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("PORT '{}' is not a valid port, using {}", raw, DEFAULT_PORT);
                        None
                    }
                })
                .unwrap_or(DEFAULT_PORT),
            clinic_timezone: env::var("CLINIC_TIMEZONE")
                .map(|name| parse_timezone(&name))
                .unwrap_or_else(|_| {
                    warn!("CLINIC_TIMEZONE not set, using {}", DEFAULT_CLINIC_TIMEZONE);
                    DEFAULT_CLINIC_TIMEZONE
                }),
            default_slot_duration_minutes: env::var("DEFAULT_SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|raw| raw.parse::<i64>().ok().filter(|minutes| *minutes > 0))
                .unwrap_or(DEFAULT_SLOT_DURATION_MINUTES),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Remote store not configured - falling back to in-memory storage");
        }

        config
    }

    /// True when the PostgREST-backed store can be used.
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    /// Current instant in the clinic's operating timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.clinic_timezone)
    }
}

fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("CLINIC_TIMEZONE '{}' is not a known zone, using {}", name, DEFAULT_CLINIC_TIMEZONE);
        DEFAULT_CLINIC_TIMEZONE
    })
}
