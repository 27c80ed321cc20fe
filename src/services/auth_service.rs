use crate::database::DataStore;
use crate::models::{PublicUser, User};
use crate::utils::AppError;
use bcrypt::{hash, verify};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// bcrypt work factor for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 10;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: usize,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Signs and checks session tokens with one shared HS256 secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Tokens carry no expiry.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let claims = Claims {
            user_id: user.id.to_hex(),
            iat: chrono::Utc::now().timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(AppError::Validation("Email is invalid".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        Ok(())
    }
}

// bcrypt is CPU-bound; keep it off the request threads.
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
}

// User registration
pub async fn register(
    store: &dyn DataStore,
    signer: &TokenSigner,
    request: &RegisterRequest,
) -> Result<AuthResponse, AppError> {
    request.validate()?;

    let email = request.email.trim();
    if store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_password(request.password.clone()).await?;
    let user = User::new(request.name.trim().to_string(), email.to_string(), password_hash);

    // The unique index still catches a concurrent registration of the same email.
    store.insert_user(&user).await?;

    let token = signer.issue(&user)?;
    log::info!("✅ User registered successfully: {}", user.email);

    Ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
}

// User login
pub async fn login(
    store: &dyn DataStore,
    signer: &TokenSigner,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let user = store
        .find_user_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(request.password.clone(), user.password.clone()).await? {
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = signer.issue(&user)?;

    Ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
}
