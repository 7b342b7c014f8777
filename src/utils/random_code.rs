use rand::Rng;

/// 去掉易混淆字符（0/O、1/I/L）的字母表
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机码，用于课程邀请码
pub fn generate_random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// 生成随机口令，满足密码策略（大小写字母 + 数字）
pub fn generate_random_password(len: usize) -> String {
    const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
    const UPPER: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ";
    const DIGITS: &[u8] = b"23456789";

    let len = len.max(8);
    let mut rng = rand::rng();
    let mut pick = |set: &[u8]| set[rng.random_range(0..set.len())] as char;

    let mut password = String::with_capacity(len);
    password.push(pick(UPPER));
    password.push(pick(LOWER));
    password.push(pick(DIGITS));
    for i in 3..len {
        let set = match i % 3 {
            0 => LOWER,
            1 => UPPER,
            _ => DIGITS,
        };
        password.push(pick(set));
    }
    password
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_code_length_and_alphabet() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_random_password(16);
            assert_eq!(password.len(), 16);
            assert!(validate_password(&password).is_ok(), "{password}");
        }
    }
}
