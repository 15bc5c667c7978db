//! xrpqr runtime configuration handling

use crate::document::{PageLayout, PageSize};
use crate::error::{Error, Result};
use crate::payment::FiatCurrency;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XrpqrConfig {
    /// Remote price feed settings
    pub price_feed: PriceFeedOptions,
    /// QR rendering settings
    pub qr: QrOptions,
    /// Page geometry of the generated PDF
    pub layout: PageLayout,
    /// Default output locations and currency
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl XrpqrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    ///
    /// Runs before logging is set up, so nothing is logged here; the chosen
    /// file is kept in [`XrpqrConfig::source`].
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.source = source;

        config.apply_env_overrides()?;
        config.layout.validate().map_err(Error::Config)?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["xrpqr.toml", "xrpqr.yaml", "xrpqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("xrpqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) -> Result<()> {
        self.price_feed.apply_env_overrides()?;
        self.qr.apply_env_overrides();
        self.output.apply_env_overrides()?;
        self.logging.apply_env_overrides();

        if let Ok(size) = env::var("XRPQR_PAGE_SIZE") {
            self.layout.page_size = size.parse::<PageSize>().map_err(Error::Config)?;
        }
        Ok(())
    }
}

/// Where and how exchange rates are fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedOptions {
    /// Base URL of a CoinGecko-compatible API
    pub base_url: String,
    /// Asset identifier of XRP on the feed
    pub asset_id: String,
    /// Request timeout; unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

impl Default for PriceFeedOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            asset_id: "ripple".to_string(),
            timeout_secs: None,
        }
    }
}

impl PriceFeedOptions {
    pub(crate) fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var("XRPQR_PRICE_FEED_URL") {
            self.base_url = url;
        }
        if let Ok(asset) = env::var("XRPQR_PRICE_ASSET_ID") {
            self.asset_id = asset;
        }
        if let Ok(timeout) = env::var("XRPQR_PRICE_TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("XRPQR_PRICE_TIMEOUT_SECS '{timeout}': {e}"))
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }
}

/// QR error correction levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EccLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    #[default]
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl EccLevel {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }
}

impl From<EccLevel> for qrcode::EcLevel {
    fn from(level: EccLevel) -> Self {
        match level {
            EccLevel::L => qrcode::EcLevel::L,
            EccLevel::M => qrcode::EcLevel::M,
            EccLevel::Q => qrcode::EcLevel::Q,
            EccLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// QR raster settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Pixels per QR module
    pub module_size: u32,
    /// Quiet zone width, in modules
    pub border: u32,
    /// Error correction level
    pub ecc: EccLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: 5,
            ecc: EccLevel::M,
        }
    }
}

impl QrOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("XRPQR_QR_MODULE_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.module_size = parsed.max(1);
            }
        }
        if let Ok(border) = env::var("XRPQR_QR_BORDER") {
            if let Ok(parsed) = border.parse::<u32>() {
                self.border = parsed;
            }
        }
        if let Ok(ecc) = env::var("XRPQR_QR_ECC") {
            if let Some(parsed) = EccLevel::parse(&ecc) {
                self.ecc = parsed;
            }
        }
    }
}

/// Default output artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// PDF written by default
    pub pdf_path: PathBuf,
    /// QR image written by default
    pub qr_path: PathBuf,
    /// Currency used when the caller does not name one
    pub currency: FiatCurrency,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("xrp_qr_payment.pdf"),
            qr_path: PathBuf::from("qr_code.png"),
            currency: FiatCurrency::Eur,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = env::var("XRPQR_OUTPUT_PDF") {
            self.pdf_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("XRPQR_OUTPUT_QR") {
            self.qr_path = PathBuf::from(path);
        }
        if let Ok(currency) = env::var("XRPQR_CURRENCY") {
            self.currency = currency.parse()?;
        }
        Ok(())
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `XRPQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("XRPQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("XRPQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("XRPQR_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("XRPQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_reproduce_original_outputs() {
        let config = XrpqrConfig::default();
        assert_eq!(config.output.pdf_path, PathBuf::from("xrp_qr_payment.pdf"));
        assert_eq!(config.output.qr_path, PathBuf::from("qr_code.png"));
        assert_eq!(config.output.currency, FiatCurrency::Eur);
        assert_eq!(config.qr.module_size, 10);
        assert_eq!(config.qr.border, 5);
        assert_eq!(config.layout.page_size, PageSize::Letter);
        assert_eq!(config.price_feed.asset_id, "ripple");
        assert!(config.price_feed.timeout_secs.is_none());
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let file = write_config(
            ".toml",
            r#"
[price_feed]
timeout_secs = 5

[qr]
border = 2
ecc = "H"

[layout]
page_size = "a4"
qr_size = 180.0

[output]
currency = "USD"
"#,
        );

        let config = XrpqrConfig::from_file(file.path()).unwrap();
        assert_eq!(config.price_feed.timeout_secs, Some(5));
        assert_eq!(config.price_feed.asset_id, "ripple");
        assert_eq!(config.qr.border, 2);
        assert_eq!(config.qr.ecc, EccLevel::H);
        assert_eq!(config.qr.module_size, 10);
        assert_eq!(config.layout.page_size, PageSize::A4);
        assert_eq!(config.layout.qr_size, 180.0);
        assert_eq!(config.layout.title_offset, 100.0);
        assert_eq!(config.output.currency, FiatCurrency::Usd);
    }

    #[test]
    fn yaml_is_accepted() {
        let file = write_config(
            ".yaml",
            "logging:\n  level: debug\n  rotation: daily\noutput:\n  pdf_path: invoice.pdf\n",
        );

        let config = XrpqrConfig::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
        assert_eq!(config.output.pdf_path, PathBuf::from("invoice.pdf"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_config(".ini", "level = info");
        let err = XrpqrConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_rejects_layout_that_does_not_fit() {
        let file = write_config(".toml", "[layout]\nqr_size = -200.0\n");

        let err = XrpqrConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn load_remembers_source_file() {
        let file = write_config(".toml", "[qr]\nborder = 3\n");

        let config = XrpqrConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.source.as_deref(), Some(file.path()));
        assert_eq!(config.qr.border, 3);
    }

    #[test]
    fn ecc_level_maps_to_encoder_level() {
        assert_eq!(qrcode::EcLevel::from(EccLevel::L), qrcode::EcLevel::L);
        assert_eq!(EccLevel::parse("q"), Some(EccLevel::Q));
        assert_eq!(EccLevel::parse("x"), None);
    }
}
