use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

/// Crate directory holding `config/base.yaml`.
pub const SERVICE_DIR: &str = "outline-service";

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable the credential has historically been deployed under.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    /// 0 binds a random port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<Secret<String>>,
    pub generation_mode: GenerationMode,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_base: GEMINI_API_BASE.to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            api_key: None,
            generation_mode: GenerationMode::default(),
        }
    }
}

impl GeminiSettings {
    /// The configured API key, treating blank values as absent.
    pub fn credential(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .cloned()
    }
}

/// How the upstream is asked to shape its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// JSON output shaped only by the prompt's instructions.
    Json,
    /// JSON output enforced server-side with a `responseSchema`.
    #[default]
    Schema,
}

/// Persona and billing parameters rendered into the prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub consultant: String,
    pub firm: String,
    pub experience: String,
    pub currency: String,
    pub rates: Vec<RateSettings>,
    pub bands: Vec<BandSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateSettings {
    pub service: String,
    pub hourly_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandSettings {
    pub size: String,
    pub min_hours: u32,
    /// Open-ended when absent.
    #[serde(default)]
    pub max_hours: Option<u32>,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            consultant: "Daniyal Khan".to_string(),
            firm: "Priority Tech".to_string(),
            experience: "8+ years of experience in Agile, ITIL, Azure cloud migrations, \
                         data analytics (Databricks, SQL, Power BI), and cybersecurity"
                .to_string(),
            currency: "CAD".to_string(),
            rates: vec![
                RateSettings {
                    service: "Standard IT Project Management".to_string(),
                    hourly_rate: 115,
                },
                RateSettings {
                    service: "Specialized Consulting (Data Analytics, Cloud Architecture, \
                              Cybersecurity)"
                        .to_string(),
                    hourly_rate: 145,
                },
            ],
            bands: vec![
                BandSettings {
                    size: "Small".to_string(),
                    min_hours: 40,
                    max_hours: Some(80),
                },
                BandSettings {
                    size: "medium".to_string(),
                    min_hours: 80,
                    max_hours: Some(160),
                },
                BandSettings {
                    size: "large".to_string(),
                    min_hours: 160,
                    max_hours: None,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub log_level: String,
    /// OTLP export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

/// Load settings from `config/base.yaml`, `APP_*` variables and `GEMINI_API_KEY`.
pub fn get_configuration() -> Result<Settings, AppError> {
    let configuration_directory = core_config::configuration_directory(SERVICE_DIR)?;

    core_config::load(
        &configuration_directory,
        &["cors.allowed_origins"],
        &[("gemini.api_key", std::env::var(API_KEY_ENV).ok())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_not_a_credential() {
        let settings = GeminiSettings {
            api_key: Some(Secret::new("   ".to_string())),
            ..GeminiSettings::default()
        };
        assert!(settings.credential().is_none());
    }

    #[test]
    fn present_api_key_is_a_credential() {
        let settings = GeminiSettings {
            api_key: Some(Secret::new("key-123".to_string())),
            ..GeminiSettings::default()
        };
        let credential = settings.credential().unwrap();
        assert_eq!(credential.expose_secret(), "key-123");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = GeminiSettings {
            api_key: Some(Secret::new("super-secret".to_string())),
            ..GeminiSettings::default()
        };
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }

    #[test]
    fn generation_mode_parses_lowercase() {
        let mode: GenerationMode = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(mode, GenerationMode::Json);
        assert_eq!(GenerationMode::default(), GenerationMode::Schema);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "gemini": { "model": "gemini-2.0-flash" } }"#).unwrap();
        assert_eq!(settings.gemini.model, "gemini-2.0-flash");
        assert_eq!(settings.gemini.api_base, GEMINI_API_BASE);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.pricing.rates.len(), 2);
    }
}
