/// Authentication utilities for the back office
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: Staff access token generation and validation
///
/// # Example
///
/// ```no_run
/// use pcshop_shared::auth::password::{hash_password, verify_password};
/// use pcshop_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("correct horse battery")?;
/// assert!(verify_password("correct horse battery", &hash)?);
///
/// let claims = Claims::new(1, "admin");
/// let token = create_token(&claims, "a-secret-of-at-least-32-characters!")?;
/// let decoded = validate_token(&token, "a-secret-of-at-least-32-characters!")?;
/// assert_eq!(decoded.user_id()?, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
