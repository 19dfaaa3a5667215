use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.coindesk.com/v1/bpi/historical/close.json";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub coindesk: CoindeskSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CoindeskSettings {
    pub endpoint: String,
}

/// Frame size used until the page reports its container size
#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    pub width: u32,
    pub height: u32,
}

/// Defaults, then `config/app.*`, then `BPI__SECTION__KEY` environment overrides
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("coindesk.endpoint", DEFAULT_ENDPOINT)?
        .set_default("view.width", 1200_i64)?
        .set_default("view.height", 700_i64)?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("BPI").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Historical close URL for the inclusive range `start..=end`
pub fn build_history_url(endpoint: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}?start={}&end={}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(&start.format("%Y-%m-%d").to_string()),
        urlencoding::encode(&end.format("%Y-%m-%d").to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_history_url() {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 12, 31).unwrap();

        assert_eq!(
            build_history_url(DEFAULT_ENDPOINT, start, end),
            "https://api.coindesk.com/v1/bpi/historical/close.json?start=2017-01-01&end=2017-12-31"
        );
        assert_eq!(
            build_history_url("http://localhost:9000/close.json/", start, end),
            "http://localhost:9000/close.json?start=2017-01-01&end=2017-12-31"
        );
    }

    #[test]
    fn test_load_app_config() {
        let config = load_app_config().unwrap();
        assert!(!config.server.bind.is_empty());
        assert!(config.coindesk.endpoint.starts_with("http"));
        assert!(config.view.width > 0 && config.view.height > 0);
    }
}
