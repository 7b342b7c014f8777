use crate::config::AppConfig;
use crate::errors::PortalError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 使用 Argon2id 和配置中的成本参数哈希密码
pub fn hash_password(password: &str) -> Result<String, PortalError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| PortalError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PortalError::validation(format!("密码哈希失败: {e}")))
}

/// 校验密码，成本参数取自哈希串本身
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 密码哈希中的盐，每次修改密码都会变化；无法解析时返回 None
pub fn password_stamp(hash: &str) -> Option<String> {
    PasswordHash::new(hash)
        .ok()
        .and_then(|parsed| parsed.salt)
        .map(|salt| salt.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Coursework42").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Coursework42", &hash));
        assert!(!verify_password("coursework42", &hash));
    }

    #[test]
    fn test_password_stamp_changes_with_each_hash() {
        let first = hash_password("Coursework42").unwrap();
        let second = hash_password("Coursework42").unwrap();
        let stamp = password_stamp(&first).unwrap();
        assert!(first.contains(&stamp));
        assert_ne!(password_stamp(&second), Some(stamp));
        assert!(password_stamp("plain-text").is_none());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plain-text"));
        assert!(!verify_password("anything", ""));
    }
}
