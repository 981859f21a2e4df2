//! Credential loading from the environment.
//!
//! Keys arrive as space-separated `accountId:key` pairs in
//! `SIROCCO_API_KEYS` and `SIROCCO_SECRET_KEYS`; every account must
//! appear in both.

use std::collections::HashMap;

use sirocco_core::error::ConfigError;
use sirocco_core::traits::Credentials;
use sirocco_core::types::AccountId;

const API_KEYS_VAR: &str = "SIROCCO_API_KEYS";
const SECRET_KEYS_VAR: &str = "SIROCCO_SECRET_KEYS";

/// Loads per-account credentials from the environment.
pub fn load_credentials() -> Result<HashMap<AccountId, Credentials>, ConfigError> {
    let api_keys = parse_keyed_list(API_KEYS_VAR, &require_var(API_KEYS_VAR)?)?;
    let secret_keys = parse_keyed_list(SECRET_KEYS_VAR, &require_var(SECRET_KEYS_VAR)?)?;
    pair_credentials(api_keys, &secret_keys)
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar {
        name: name.to_string(),
    })
}

/// Parses a space-separated list of `accountId:key` entries.
fn parse_keyed_list(
    name: &str,
    value: &str,
) -> Result<HashMap<AccountId, String>, ConfigError> {
    let mut keys = HashMap::new();
    for entry in value.split_whitespace() {
        let (account, key) = entry.split_once(':').ok_or_else(|| {
            ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: format!("entry '{entry}' is not in accountId:key form"),
            }
        })?;
        let account_id: AccountId =
            account.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: format!("'{account}' is not an account id"),
            })?;
        keys.insert(account_id, key.to_string());
    }
    Ok(keys)
}

fn pair_credentials(
    api_keys: HashMap<AccountId, String>,
    secret_keys: &HashMap<AccountId, String>,
) -> Result<HashMap<AccountId, Credentials>, ConfigError> {
    let mut credentials = HashMap::new();
    for (account_id, api_key) in api_keys {
        let secret = secret_keys
            .get(&account_id)
            .ok_or_else(|| ConfigError::InvalidEnvVar {
                name: SECRET_KEYS_VAR.to_string(),
                reason: format!("no secret key for account {account_id}"),
            })?;
        credentials.insert(account_id, Credentials::new(api_key, secret));
    }
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyed_list() {
        let keys = parse_keyed_list(API_KEYS_VAR, "1:1api 2:2api 3:3api").unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[&1], "1api");
        assert_eq!(keys[&3], "3api");
    }

    #[test]
    fn test_parse_keyed_list_key_may_contain_colons() {
        let keys = parse_keyed_list(API_KEYS_VAR, "1:abc:def").unwrap();
        assert_eq!(keys[&1], "abc:def");
    }

    #[test]
    fn test_parse_keyed_list_rejects_missing_separator() {
        let result = parse_keyed_list(API_KEYS_VAR, "1api");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_parse_keyed_list_rejects_bad_account() {
        let result = parse_keyed_list(API_KEYS_VAR, "one:1api");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_pair_credentials() {
        let api_keys = parse_keyed_list(API_KEYS_VAR, "1:1api 2:2api").unwrap();
        let secrets = parse_keyed_list(SECRET_KEYS_VAR, "1:1secret 2:2secret").unwrap();

        let credentials = pair_credentials(api_keys, &secrets).unwrap();
        assert_eq!(credentials.len(), 2);
        assert_eq!(credentials[&1].api_key, "1api");
        assert_eq!(credentials[&1].api_secret(), "1secret");
    }

    #[test]
    fn test_pair_credentials_missing_secret() {
        let api_keys = parse_keyed_list(API_KEYS_VAR, "1:1api 2:2api").unwrap();
        let secrets = parse_keyed_list(SECRET_KEYS_VAR, "1:1secret").unwrap();

        let result = pair_credentials(api_keys, &secrets);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }
}
