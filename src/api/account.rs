//! Account and authentication endpoints

use crate::models::{
    CreateUserRequest, CreateUserResponse, LoginRequest, LoginResponse, UserProfile,
};

use super::client::HttpClient;
use super::endpoints;
use super::error::ApiError;

/// Register a new account. Does not log in.
pub async fn create_user(
    client: &HttpClient,
    request: &CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    client.post(endpoints::USER_CREATE, request).await
}

/// Exchange credentials for a token pair. Storing the pair is the caller's
/// job; this wrapper only performs the call.
pub async fn login(
    client: &HttpClient,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    client.post(endpoints::AUTH_LOGIN, request).await
}

/// Profile of the authenticated account.
pub async fn profile(client: &HttpClient) -> Result<UserProfile, ApiError> {
    client.get(endpoints::USER_PROFILE).await
}
