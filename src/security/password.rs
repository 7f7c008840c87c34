use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(password, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // В тестах берём минимальную стоимость, DEFAULT_COST слишком медленный
    #[test]
    fn test_correct_password_verifies() {
        let hashed = hash("парольНаВход1!", 4).expect("hashing should succeed");
        assert!(verify_password("парольНаВход1!", &hashed).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hashed = hash("correct-horse", 4).expect("hashing should succeed");
        assert!(!verify_password("battery-staple", &hashed).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash("one-password", 4).unwrap();
        let second = hash("one-password", 4).unwrap();
        assert_ne!(first, second);
    }
}
