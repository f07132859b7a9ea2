// =====================================================================================
// PASSWORD POLICY SERVICE - STRENGTH RULES, GENERATION, HASH HOOKS
// =====================================================================================

use std::fmt::Display;
use std::future::Future;

use rand::Rng;
use tracing::{debug, instrument};

use shared_models::error::{CoreError, FieldErrors, ValidationError};

use crate::models::PasswordRule;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const DEFAULT_GENERATED_LENGTH: usize = 12;

/// Specials accepted by the strict first-violation policy.
pub const STRICT_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
/// Specials accepted by the collect-all policy used for registration data.
pub const PROFILE_SPECIAL_CHARS: &str = "@$#%^&*()_+=[]{}|\\:;\"'<>,.?/~`";

const UPPERCASE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMERIC_CHARS: &str = "0123456789";
const GENERATOR_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
// Accepted by both policies, so a generated password passes either one.
const GUARANTEED_SPECIAL_CHARS: &str = "@#$%^&*(),.?:{}|<>";

/// A set of character-class rules a password must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub special_chars: &'static str,
    /// Specials quoted in the rule message.
    pub special_label: &'static str,
}

impl PasswordPolicy {
    pub const STRICT: PasswordPolicy = PasswordPolicy {
        min_length: MIN_PASSWORD_LENGTH,
        special_chars: STRICT_SPECIAL_CHARS,
        special_label: "!@#$%^&*",
    };

    pub const PROFILE: PasswordPolicy = PasswordPolicy {
        min_length: MIN_PASSWORD_LENGTH,
        special_chars: PROFILE_SPECIAL_CHARS,
        special_label: "@$#%^&*",
    };

    fn satisfies(&self, rule: PasswordRule, password: &str) -> bool {
        match rule {
            PasswordRule::MinLength => password.chars().count() >= self.min_length,
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Number => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::SpecialCharacter => password.chars().any(|c| self.special_chars.contains(c)),
        }
    }

    pub fn message(&self, rule: PasswordRule) -> String {
        rule.message(self.special_label)
    }

    /// Every broken rule, in checking order.
    pub fn violations(&self, password: &str) -> Vec<PasswordRule> {
        PasswordRule::ORDER
            .into_iter()
            .filter(|rule| !self.satisfies(*rule, password))
            .collect()
    }

    /// The first broken rule, if any.
    pub fn first_violation(&self, password: &str) -> Option<PasswordRule> {
        PasswordRule::ORDER
            .into_iter()
            .find(|rule| !self.satisfies(*rule, password))
    }
}

/// Strict policy: reports only the first rule the password breaks.
///
/// `None` stands for a value that was not a string at all.
#[instrument(skip(password))]
pub fn validate_first_violation(password: Option<&str>) -> Result<(), ValidationError> {
    let password = password.ok_or_else(|| ValidationError::rule("Password must be a string."))?;

    match PasswordPolicy::STRICT.first_violation(password) {
        Some(rule) => {
            debug!("Password rejected: {:?}", rule);
            Err(ValidationError::Rule(PasswordPolicy::STRICT.message(rule)))
        }
        None => Ok(()),
    }
}

/// Collect-all policy: reports every rule the password breaks under the
/// `password` field.
#[instrument(skip(password))]
pub fn validate_all_rules(password: &str) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::new();
    for rule in PasswordPolicy::PROFILE.violations(password) {
        errors.add("password", PasswordPolicy::PROFILE.message(rule));
    }
    errors.into_result()
}

/// Runs the caller's one-way hash over a present password.
pub async fn hash_password<F, Fut, E>(password: Option<&str>, hash_fn: F) -> Result<String, CoreError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Display,
{
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ValidationError::rule("Invalid password provided for hashing.").into()),
    };

    hash_fn(password.to_string())
        .await
        .map_err(|e| CoreError::operation(format!("Error hashing password: {}", e)))
}

/// Delegates to the caller's comparison once both sides are present.
pub async fn compare_passwords<F, Fut, E>(
    password: Option<&str>,
    hashed_password: Option<&str>,
    compare_fn: F,
) -> Result<bool, CoreError>
where
    F: FnOnce(String, String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: Display,
{
    let (password, hashed) = match (password, hashed_password) {
        (Some(p), Some(h)) if !p.is_empty() && !h.is_empty() => (p, h),
        _ => {
            return Err(ValidationError::rule(
                "Both password and hashed password must be provided.",
            )
            .into())
        }
    };

    compare_fn(password.to_string(), hashed.to_string())
        .await
        .map_err(|e| CoreError::operation(format!("Error comparing passwords: {}", e)))
}

pub fn generate_strong_password(length: usize) -> String {
    generate_strong_password_with(length, &mut rand::thread_rng())
}

/// Lengths below 4 are raised to 4 so every character class still fits.
pub fn generate_strong_password_with<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    let length = length.max(4);
    let all_chars: Vec<char> = UPPERCASE_CHARS
        .chars()
        .chain(LOWERCASE_CHARS.chars())
        .chain(NUMERIC_CHARS.chars())
        .chain(GENERATOR_SPECIAL_CHARS.chars())
        .collect();

    let mut password = String::with_capacity(length);
    password.push(pick(UPPERCASE_CHARS, rng));
    password.push(pick(LOWERCASE_CHARS, rng));
    password.push(pick(NUMERIC_CHARS, rng));
    password.push(pick(GUARANTEED_SPECIAL_CHARS, rng));

    for _ in 4..length {
        password.push(all_chars[rng.gen_range(0..all_chars.len())]);
    }

    shuffle_string_with(&password, rng)
}

pub fn shuffle_string(input: &str) -> String {
    shuffle_string_with(input, &mut rand::thread_rng())
}

/// Fisher–Yates over the characters of `input`.
pub fn shuffle_string_with<R: Rng + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    for i in (1..chars.len()).rev() {
        let j = rng.gen_range(0..=i);
        chars.swap(i, j);
    }
    chars.into_iter().collect()
}

fn pick<R: Rng + ?Sized>(alphabet: &str, rng: &mut R) -> char {
    let chars: Vec<char> = alphabet.chars().collect();
    chars[rng.gen_range(0..chars.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_first_violation_order() {
        let cases = [
            (None, "Password must be a string."),
            (Some("Ab1!"), "Password must be at least 8 characters long."),
            (Some("abcdefg1!"), "Password must contain at least one uppercase letter."),
            (Some("ABCDEFG1!"), "Password must contain at least one lowercase letter."),
            (Some("Abcdefgh!"), "Password must contain at least one number."),
            (Some("Abcdefgh1"), "Password must contain at least one special character (!@#$%^&*)."),
        ];

        for (input, expected) in cases {
            assert_matches!(
                validate_first_violation(input),
                Err(ValidationError::Rule(msg)) if msg == expected,
                "input {:?}", input
            );
        }

        assert!(validate_first_violation(Some("Abcdefg1!")).is_ok());
    }

    #[test]
    fn test_first_violation_reports_length_before_everything_else() {
        assert_matches!(
            validate_first_violation(Some("a")),
            Err(ValidationError::Rule(msg)) if msg.contains("at least 8 characters")
        );
    }

    #[test]
    fn test_all_rules_collects_every_violation() {
        let err = validate_all_rules("abc").unwrap_err();
        let fields = err.field_errors().unwrap();
        let messages = fields.get("password").unwrap();

        assert_eq!(messages.len(), 4);
        assert!(messages.iter().any(|m| m.contains("8 characters")));
        assert!(messages.iter().any(|m| m.contains("uppercase")));
        assert!(messages.iter().any(|m| m.contains("number")));
        assert!(messages.iter().any(|m| m.contains("special")));
    }

    #[test]
    fn test_special_character_message_names_each_policy_set() {
        assert_matches!(
            validate_first_violation(Some("Abcdefgh1")),
            Err(ValidationError::Rule(msg)) if msg.contains("(!@#$%^&*)")
        );

        let err = validate_all_rules("Abcdefgh1").unwrap_err();
        let messages = err.field_errors().unwrap().get("password").unwrap().to_vec();
        assert_eq!(messages, vec!["Password must contain at least one special character (@$#%^&*).".to_string()]);
        for label_char in PasswordPolicy::PROFILE.special_label.chars() {
            assert!(PROFILE_SPECIAL_CHARS.contains(label_char));
        }
        for label_char in PasswordPolicy::STRICT.special_label.chars() {
            assert!(STRICT_SPECIAL_CHARS.contains(label_char));
        }
    }

    #[test]
    fn test_policies_disagree_on_bang() {
        // '!' is special for the strict policy only.
        assert!(validate_first_violation(Some("Abcdefg1!")).is_ok());
        assert!(validate_all_rules("Abcdefg1!").is_err());
        assert!(validate_all_rules("Abcdefg1@").is_ok());
    }

    #[test]
    fn test_generated_passwords_pass_both_policies() {
        let mut rng = StdRng::seed_from_u64(7);
        for length in [4, 8, 12, 16, 32, 64] {
            for _ in 0..200 {
                let password = generate_strong_password_with(length, &mut rng);
                assert_eq!(password.chars().count(), length);
                if length >= MIN_PASSWORD_LENGTH {
                    assert!(validate_first_violation(Some(&password)).is_ok(), "{}", password);
                    assert!(validate_all_rules(&password).is_ok(), "{}", password);
                }
            }
        }
    }

    #[test]
    fn test_default_generator_length() {
        let password = generate_strong_password(DEFAULT_GENERATED_LENGTH);
        assert_eq!(password.chars().count(), 12);
        assert!(validate_first_violation(Some(&password)).is_ok());
    }

    #[test]
    fn test_short_lengths_are_clamped_to_four() {
        let mut rng = StdRng::seed_from_u64(1);
        for length in 0..4 {
            let password = generate_strong_password_with(length, &mut rng);
            assert_eq!(password.chars().count(), 4);
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| GUARANTEED_SPECIAL_CHARS.contains(c)));
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for input in ["", "a", "ab", "hello world", "ÄöÜ-ß✓", "aaaaabbbbb"] {
            let shuffled = shuffle_string_with(input, &mut rng);
            let mut a: Vec<char> = input.chars().collect();
            let mut b: Vec<char> = shuffled.chars().collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_shuffle_reaches_every_permutation_of_three() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..6000 {
            *counts.entry(shuffle_string_with("abc", &mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        // Each of the six orders should land near 1000.
        for count in counts.values() {
            assert!((800..1200).contains(count), "skewed counts: {:?}", counts);
        }
    }

    #[tokio::test]
    async fn test_hash_password_delegates_to_hook() {
        let hashed = hash_password(Some("Secret1!"), |p| async move {
            Ok::<_, String>(format!("hashed:{}", p.len()))
        })
        .await
        .unwrap();
        assert_eq!(hashed, "hashed:8");
    }

    #[tokio::test]
    async fn test_hash_password_rejects_missing_password() {
        let result = hash_password(None, |p| async move { Ok::<_, String>(p) }).await;
        assert_matches!(result, Err(CoreError::Validation(ValidationError::Rule(_))));

        let result = hash_password(Some(""), |p| async move { Ok::<_, String>(p) }).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_hash_failure_is_operation_error() {
        let result = hash_password(Some("Secret1!"), |_| async move {
            Err::<String, _>("backend down")
        })
        .await;
        assert_matches!(result, Err(CoreError::Operation(msg)) if msg == "Error hashing password: backend down");
    }

    #[tokio::test]
    async fn test_compare_passwords() {
        let matches = compare_passwords(Some("pw"), Some("hash:pw"), |p, h| async move {
            Ok::<_, String>(h == format!("hash:{}", p))
        })
        .await
        .unwrap();
        assert!(matches);

        let missing = compare_passwords(Some("pw"), None, |_, _| async move { Ok::<_, String>(true) }).await;
        assert_matches!(missing, Err(CoreError::Validation(_)));

        let failed = compare_passwords(Some("pw"), Some("h"), |_, _| async move {
            Err::<bool, _>("bad hash")
        })
        .await;
        assert_matches!(failed, Err(CoreError::Operation(_)));
    }
}
