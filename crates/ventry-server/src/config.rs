use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Auth configuration. Both secrets are required fields: the server
/// refuses to start when either is missing from the config file, and the
/// two are never interchangeable (an access token does not verify under
/// the refresh secret or vice versa).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Set `Secure` (and `SameSite=None` on clearing cookies) when the
    /// server sits behind HTTPS in production.
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// Browser origin allowed to send credentialed requests.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
listen: "127.0.0.1:8080"
db:
  url: "postgres://localhost/ventry"
auth:
  access_secret: "access"
  refresh_secret: "refresh"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.auth.access_secret, "access");
        assert_eq!(config.auth.refresh_secret, "refresh");
        assert!(!config.auth.cookie_secure);
        assert_eq!(config.cors_origin, "http://localhost:3000");
    }

    #[test]
    fn test_missing_secret_fails_to_parse() {
        let yaml = r#"
listen: "127.0.0.1:8080"
db:
  url: "postgres://localhost/ventry"
auth:
  access_secret: "access"
"#;
        assert!(serde_yml::from_str::<ServerConfig>(yaml).is_err());
    }
}
