// =====================================================================================
// SECURITY CELL MODELS
// =====================================================================================

use serde::{Deserialize, Serialize};

use crate::services::password::MIN_PASSWORD_LENGTH;

// =====================================================================================
// PASSWORD POLICY MODELS
// =====================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Number,
    SpecialCharacter,
}

impl PasswordRule {
    /// Checking order shared by both password strategies.
    pub const ORDER: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::Uppercase,
        PasswordRule::Lowercase,
        PasswordRule::Number,
        PasswordRule::SpecialCharacter,
    ];

    /// `special_label` is the sample of special characters the message quotes.
    pub fn message(&self, special_label: &str) -> String {
        match self {
            PasswordRule::MinLength => {
                format!("Password must be at least {} characters long.", MIN_PASSWORD_LENGTH)
            }
            PasswordRule::Uppercase => "Password must contain at least one uppercase letter.".to_string(),
            PasswordRule::Lowercase => "Password must contain at least one lowercase letter.".to_string(),
            PasswordRule::Number => "Password must contain at least one number.".to_string(),
            PasswordRule::SpecialCharacter => {
                format!("Password must contain at least one special character ({}).", special_label)
            }
        }
    }
}

// =====================================================================================
// REQUEST/RESPONSE MODELS
// =====================================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordValidationRequest {
    #[serde(default)]
    pub password: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StrictPolicyResult {
    pub valid: bool,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllRulesPolicyResult {
    pub valid: bool,
    pub violations: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordValidationResponse {
    pub requirements_met: bool,
    pub strict: StrictPolicyResult,
    pub all_rules: AllRulesPolicyResult,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeneratePasswordRequest {
    pub length: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePasswordResponse {
    pub password: String,
    pub length: usize,
}
