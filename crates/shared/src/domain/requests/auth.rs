use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Sent by the OAuth2 login flow once the provider has verified the user.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OAuthSuccessRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}
