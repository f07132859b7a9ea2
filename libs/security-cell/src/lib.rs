// =====================================================================================
// SECURITY CELL - INPUT VALIDATION & PASSWORD POLICY
// =====================================================================================
//
// Pure validation core shared by the other cells:
// - Field predicates (email, password, phone) and required-field checks
// - Entity validators that report every failing field at once
// - Password strength strategies, generation, and caller-supplied hash hooks
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{PasswordRule, PasswordValidationResponse};

pub use services::password::{
    compare_passwords, generate_strong_password, hash_password, shuffle_string,
    validate_all_rules, validate_first_violation, PasswordPolicy,
};
pub use services::validation::{
    validate_email, validate_health_data, validate_password, validate_phone_number,
    validate_required_fields, validate_user_data,
};

pub use router::create_security_router;
