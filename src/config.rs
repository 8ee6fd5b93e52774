use std::time::Duration;

use anyhow::Context;
use secrecy::Secret;

use crate::gateway::modification::{Amount, CaptureRequest};

const DEFAULT_ENDPOINT: &str = "https://pal-test.adyen.com/pal/servlet/Payment/v10/capture";
const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gateway: GatewayConfig,
    /// Capture request sent by the plain text endpoint, absent when not configured
    pub demo_request: Option<CaptureRequest>,
}

/// Payment API endpoint and web service user credentials
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub username: String,
    pub password: Secret<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let timeout = lookup("CAPTURE_TIMEOUT_SECS")
            .map(|secs| secs.parse().map(Duration::from_secs))
            .transpose()
            .context("CAPTURE_TIMEOUT_SECS must be a whole number of seconds")?;

        let gateway = GatewayConfig {
            endpoint: lookup("CAPTURE_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            username: required("CAPTURE_USERNAME")?,
            password: Secret::new(required("CAPTURE_PASSWORD")?),
            timeout,
        };

        let demo_request = match (lookup("MERCHANT_ACCOUNT"), lookup("ORIGINAL_REFERENCE")) {
            (Some(merchant_account), Some(original_reference)) => {
                let value = match lookup("CAPTURE_VALUE") {
                    Some(value) => value
                        .parse()
                        .context("CAPTURE_VALUE must be an integer amount in minor units")?,
                    None => 199,
                };
                Some(CaptureRequest {
                    merchant_account,
                    original_reference,
                    reference: lookup("CAPTURE_REFERENCE"),
                    modification_amount: Amount {
                        currency: lookup("CAPTURE_CURRENCY").unwrap_or_else(|| "EUR".to_string()),
                        value,
                    },
                })
            }
            (None, None) => None,
            (Some(_), None) => anyhow::bail!("ORIGINAL_REFERENCE must be set with MERCHANT_ACCOUNT"),
            (None, Some(_)) => anyhow::bail!("MERCHANT_ACCOUNT must be set with ORIGINAL_REFERENCE"),
        };

        Ok(Self {
            port,
            gateway,
            demo_request,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("CAPTURE_USERNAME", "ws@Company.Example"),
        ("CAPTURE_PASSWORD", "hunter2"),
        ("MERCHANT_ACCOUNT", "ExampleMerchant"),
        ("ORIGINAL_REFERENCE", "8313547924770610"),
    ];

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.port, 3030);
        assert_eq!(config.gateway.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.gateway.password.expose_secret(), "hunter2");
        assert_eq!(config.gateway.timeout, None);
        let demo = config.demo_request.unwrap();
        assert_eq!(demo.merchant_account, "ExampleMerchant");
        assert_eq!(demo.reference, None);
        assert_eq!(demo.modification_amount.currency, "EUR");
        assert_eq!(demo.modification_amount.value, 199);
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("CAPTURE_ENDPOINT", "http://localhost:9000/capture"),
            ("CAPTURE_TIMEOUT_SECS", "15"),
            ("CAPTURE_REFERENCE", "order-42"),
            ("CAPTURE_CURRENCY", "USD"),
            ("CAPTURE_VALUE", "-5"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gateway.endpoint, "http://localhost:9000/capture");
        assert_eq!(config.gateway.timeout, Some(Duration::from_secs(15)));
        let demo = config.demo_request.unwrap();
        assert_eq!(demo.reference.as_deref(), Some("order-42"));
        assert_eq!(demo.modification_amount.currency, "USD");
        assert_eq!(demo.modification_amount.value, -5);
    }

    #[test]
    fn missing_credentials_fail() {
        let vars: Vec<_> = REQUIRED
            .into_iter()
            .filter(|(k, _)| *k != "CAPTURE_PASSWORD")
            .collect();
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("CAPTURE_PASSWORD"));
    }

    #[test]
    fn demo_capture_is_optional() {
        let config = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap();
        assert!(config.demo_request.is_none());
    }

    #[test]
    fn half_configured_demo_capture_fails() {
        let vars = [REQUIRED[0], REQUIRED[1], REQUIRED[2]];
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("ORIGINAL_REFERENCE"));
    }

    #[test]
    fn invalid_timeout_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("CAPTURE_TIMEOUT_SECS", "soon"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }
}
