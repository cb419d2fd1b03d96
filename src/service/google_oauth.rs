use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{config::Config, models::accountmodel::ExternalIdentity};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl From<GoogleUserInfo> for ExternalIdentity {
    fn from(info: GoogleUserInfo) -> Self {
        // Google may omit the display name; fall back to the mailbox.
        let name = info
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| info.email.split('@').next().unwrap_or_default().to_string());

        ExternalIdentity {
            provider_subject: info.sub,
            email: info.email,
            name,
            avatar_url: info.picture,
        }
    }
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Token exchange error: {0}")]
    TokenExchange(String),
    #[error("User info error: {0}")]
    UserInfo(String),
    #[error("Google account email is not verified")]
    UnverifiedEmail,
}

#[derive(Debug, Clone)]
pub struct GoogleAuthService {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_url: config.google_redirect_url.clone(),
            http: reqwest::Client::new(),
        }
    }

    pub fn get_authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&scope=openid%20email%20profile&redirect_uri={}&state={}&prompt=select_account",
            AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode(state),
        )
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http.post(TOKEN_URL).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OAuthError::TokenExchange(format!(
                "HTTP {} - {}",
                status, error_text
            )));
        }

        let token_response: Value = response.json().await?;

        token_response["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                OAuthError::TokenExchange("Access token missing from response".to_string())
            })
    }

    pub async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, OAuthError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OAuthError::UserInfo(format!("HTTP {} - {}", status, error_text)));
        }

        let user_info: GoogleUserInfo = response.json().await?;
        if !user_info.email_verified {
            return Err(OAuthError::UnverifiedEmail);
        }

        Ok(user_info)
    }

    pub async fn exchange_code_for_identity(
        &self,
        code: &str,
    ) -> Result<ExternalIdentity, OAuthError> {
        let access_token = self.exchange_code(code).await?;
        let user_info = self.get_user_info(&access_token).await?;
        Ok(user_info.into())
    }
}
