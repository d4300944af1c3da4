// Pipeline de validation explicite pour l'inscription: une liste ordonnée
// de prédicats qui accumulent les erreurs par champ. Les vérifications
// d'unicité (username/email) ont besoin de la base et se font dans le
// service, avec le même accumulateur.
use std::collections::BTreeMap;

use validator::ValidateEmail;

use crate::errors::ApiError;
use crate::models::dto::RegisterRequest;

#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        ErrorAccumulator::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

type Check = fn(&RegisterRequest, &mut ErrorAccumulator);

// L'ordre des prédicats fixe l'ordre d'évaluation; les erreurs
// s'accumulent au lieu de court-circuiter
const REGISTRATION_CHECKS: &[Check] = &[
    check_username,
    check_email,
    check_full_name,
    check_password_length,
    check_password_confirmation,
    check_password_not_username,
];

pub fn run_registration_checks(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    for check in REGISTRATION_CHECKS {
        check(request, acc);
    }
}

fn check_username(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    if request.username.trim().is_empty() {
        acc.add("username", "Username is required");
    } else if request.username.len() > 12 {
        acc.add("username", "Username must be at most 12 characters");
    }
}

fn check_email(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    if !request.email.validate_email() {
        acc.add("email", "Enter a valid email address");
    }
}

fn check_full_name(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    if request.full_name.trim().is_empty() {
        acc.add("full_name", "Full name is required");
    }
}

fn check_password_length(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    // Bornes exclusives: 8 et 16 sont rejetés, 9 à 15 acceptés
    let len = request.password.chars().count();
    if len <= 8 || len >= 16 {
        acc.add("password", "Password must be between 9 and 15 characters long.");
    }
}

fn check_password_confirmation(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    if request.password != request.confirm_password {
        acc.add("password", "Password fields did not match.");
    }
}

fn check_password_not_username(request: &RegisterRequest, acc: &mut ErrorAccumulator) {
    if request.password == request.username {
        acc.add("password", "Password must not be equal to username");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Doe".to_string(),
            password: "Secret123".to_string(),
            confirm_password: "Secret123".to_string(),
        }
    }

    fn run(request: &RegisterRequest) -> Result<(), ApiError> {
        let mut acc = ErrorAccumulator::new();
        run_registration_checks(request, &mut acc);
        acc.into_result()
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(run(&valid_request()).is_ok());
    }

    #[test]
    fn test_password_length_bounds() {
        let mut request = valid_request();

        // 8 caractères: rejeté
        request.password = "A".repeat(8);
        request.confirm_password = request.password.clone();
        assert!(run(&request).is_err());

        // 9 caractères: accepté
        request.password = "A".repeat(9);
        request.confirm_password = request.password.clone();
        assert!(run(&request).is_ok());

        // 15 caractères: accepté
        request.password = "A".repeat(15);
        request.confirm_password = request.password.clone();
        assert!(run(&request).is_ok());

        // 16 caractères: rejeté
        request.password = "A".repeat(16);
        request.confirm_password = request.password.clone();
        assert!(run(&request).is_err());
    }

    #[test]
    fn test_password_confirmation_mismatch() {
        let mut request = valid_request();
        request.confirm_password = "Different123".to_string();

        match run(&request) {
            Err(ApiError::Validation(map)) => {
                assert!(map.get("password").unwrap().iter().any(|m| m.contains("match")));
            }
            other => panic!("expected Validation, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_password_equal_to_username_rejected() {
        let mut request = valid_request();
        request.username = "Secret123456".to_string();
        request.password = "Secret123456".to_string();
        request.confirm_password = "Secret123456".to_string();
        assert!(run(&request).is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        assert!(run(&request).is_err());
    }

    #[test]
    fn test_username_too_long_rejected() {
        let mut request = valid_request();
        request.username = "a".repeat(13);
        assert!(run(&request).is_err());
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let request = RegisterRequest {
            username: "".to_string(),
            email: "bad".to_string(),
            full_name: " ".to_string(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };

        match run(&request) {
            Err(ApiError::Validation(map)) => {
                assert!(map.contains_key("username"));
                assert!(map.contains_key("email"));
                assert!(map.contains_key("full_name"));
                assert!(map.contains_key("password"));
                // Longueur + mismatch accumulés sur le même champ
                assert_eq!(map.get("password").unwrap().len(), 2);
            }
            other => panic!("expected Validation, got {:?}", other.err()),
        }
    }
}
