//! Register Client Use Case

use std::sync::Arc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use super::events::ClientRegistered;
use crate::client::entity::{Client, Gender};
use crate::client::repository::ClientRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Phone pattern: digits with optional leading +, 6 to 15 digits
fn phone_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9]{6,15}$").unwrap())
}

/// Command for registering a new client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientCommand {
    pub full_name: String,

    pub phone: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    /// Device token if the member enrolled a fingerprint at registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_data: Option<String>,
}

/// Use case for registering a new client.
pub struct RegisterClientUseCase<U: UnitOfWork> {
    client_repo: Arc<ClientRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RegisterClientUseCase<U> {
    pub fn new(client_repo: Arc<ClientRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            client_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: RegisterClientCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ClientRegistered> {
        let full_name = command.full_name.trim();
        if full_name.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "FULL_NAME_REQUIRED",
                "Client full name is required",
            ));
        }

        let phone = command.phone.trim();
        if !phone_pattern().is_match(phone) {
            return UseCaseResult::failure(UseCaseError::validation(
                "INVALID_PHONE",
                "Phone must be 6-15 digits, optionally prefixed with +",
            ));
        }

        // Business rule: phone is the front-desk lookup key, must be unique
        match self.client_repo.find_by_phone(phone).await {
            Ok(Some(_)) => {
                return UseCaseResult::failure(UseCaseError::business_rule(
                    "PHONE_EXISTS",
                    format!("A client with phone '{}' is already registered", phone),
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to check phone uniqueness: {}",
                    e
                )));
            }
        }

        let mut client = Client::new(full_name, phone);
        client.email = command.email.clone();
        client.gender = command.gender;
        client.birth_date = command.birth_date;
        if let Some(ref token) = command.fingerprint_id {
            client.enroll_fingerprint(token, command.fingerprint_data.clone());
        }

        let event = ClientRegistered::new(&ctx, &client.id, &client.full_name, &client.phone);

        self.unit_of_work.commit(&client, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = RegisterClientCommand {
            full_name: "Aya Ziyad".to_string(),
            phone: "0601010101".to_string(),
            email: Some("aya@example.com".to_string()),
            gender: Some(Gender::Female),
            birth_date: NaiveDate::from_ymd_opt(2005, 5, 15),
            fingerprint_id: None,
            fingerprint_data: None,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("fullName"));
        assert!(json.contains("0601010101"));
    }

    #[test]
    fn phone_pattern_accepts_digits() {
        assert!(phone_pattern().is_match("0601010101"));
        assert!(phone_pattern().is_match("+212601010101"));
        assert!(!phone_pattern().is_match("06-01-01"));
        assert!(!phone_pattern().is_match("12345"));
        assert!(!phone_pattern().is_match(""));
    }
}
