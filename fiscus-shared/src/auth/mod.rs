/// Authentication and authorization utilities
///
/// This module provides the security primitives for Fiscus:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`extract`]: Bearer-token extractor that authenticates requests
/// - [`ownership`]: Record-level ownership checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing, 24 hour expiration
/// - **Ownership**: Every data access is checked against the caller
///
/// # Example
///
/// ```no_run
/// use fiscus_shared::auth::jwt::{create_token, Claims};
/// use fiscus_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "jane@example.com".to_string());
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod extract;
pub mod jwt;
pub mod ownership;
pub mod password;
