use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration for a feed run
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// FlareSolverr endpoint used to bypass the site's bot protection
    #[serde(default = "default_flaresolverr_url")]
    pub flaresolverr_url: String,
    /// Landing page to scrape
    #[serde(default = "default_page_url")]
    pub page_url: String,
    /// Base used to resolve relative article and image URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Where the rendered feed is written
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Advertised feed location for the atom:link self reference
    #[serde(default = "default_self_link")]
    pub self_link: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            flaresolverr_url: default_flaresolverr_url(),
            page_url: default_page_url(),
            base_url: default_base_url(),
            output_file: default_output_file(),
            self_link: default_self_link(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_flaresolverr_url() -> String {
    "http://localhost:8191/v1".to_string()
}

fn default_page_url() -> String {
    "https://www.scientificamerican.com/latest-issue/".to_string()
}

fn default_base_url() -> String {
    "https://www.scientificamerican.com".to_string()
}

fn default_output_file() -> String {
    "feed.xml".to_string()
}

fn default_self_link() -> String {
    "https://www.scientificamerican.com/latest-issue/feed.xml".to_string()
}

fn default_timeout() -> u64 {
    70
}

impl FeedConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SCIAM_ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: SCIAM_FLARESOLVERR_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<FeedConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Environment variables with SCIAM_ prefix
        .add_source(Environment::with_prefix("SCIAM").try_parsing(true))
        .build()?;

    settings.try_deserialize()
}
