use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::users::User, repositories::user_repo::UserRepository, Error, Result};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    jwt_secret: String,
}

/// Token claims; tokens are issued by the account service sharing `JWT_SECRET`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        Self { repo, jwt_secret }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.repo.get_user(user_id).await
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<Uuid> {
        let decode = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::InvalidToken)?;

        Uuid::parse_str(&decode.claims.sub).map_err(|_| Error::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;
    use crate::repositories::MemoryRepo;

    fn token(sub: &str, secret: &str, ttl_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now as usize,
            exp: (now + ttl_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryRepo::new()), "secret".to_string())
    }

    #[test]
    fn decodes_subject_of_valid_token() {
        let user_id = Uuid::now_v7();
        let decoded = service()
            .decode_token(token(&user_id.to_string(), "secret", 3600))
            .unwrap();
        assert_eq!(decoded, user_id);
    }

    #[test]
    fn rejects_wrong_secret_expired_or_malformed_subject() {
        let user_id = Uuid::now_v7().to_string();
        let service = service();

        assert!(matches!(
            service.decode_token(token(&user_id, "other", 3600)),
            Err(Error::InvalidToken)
        ));
        assert!(matches!(
            service.decode_token(token(&user_id, "secret", -3600)),
            Err(Error::InvalidToken)
        ));
        assert!(matches!(
            service.decode_token(token("albert", "secret", 3600)),
            Err(Error::InvalidToken)
        ));
    }
}
