//! Update Client Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use super::events::ClientUpdated;
use crate::client::entity::Gender;
use crate::client::repository::ClientRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for updating a client. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientCommand {
    pub client_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_data: Option<String>,
}

/// Use case for updating a client's details.
pub struct UpdateClientUseCase<U: UnitOfWork> {
    client_repo: Arc<ClientRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateClientUseCase<U> {
    pub fn new(client_repo: Arc<ClientRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            client_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateClientCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ClientUpdated> {
        let mut client = match self.client_repo.find_by_id(&command.client_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CLIENT_NOT_FOUND",
                    format!("Client with ID '{}' not found", command.client_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch client: {}",
                    e
                )));
            }
        };

        // Phone changes must keep the uniqueness guarantee
        if let Some(ref phone) = command.phone {
            if phone != &client.phone {
                match self.client_repo.find_by_phone(phone).await {
                    Ok(Some(other)) if other.id != client.id => {
                        return UseCaseResult::failure(UseCaseError::business_rule(
                            "PHONE_EXISTS",
                            format!("A client with phone '{}' is already registered", phone),
                        ));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        return UseCaseResult::failure(UseCaseError::commit(format!(
                            "Failed to check phone uniqueness: {}",
                            e
                        )));
                    }
                }
                client.phone = phone.clone();
            }
        }

        if let Some(ref name) = command.full_name {
            if name.trim().is_empty() {
                return UseCaseResult::failure(UseCaseError::validation(
                    "FULL_NAME_REQUIRED",
                    "Client full name cannot be blank",
                ));
            }
            client.full_name = name.trim().to_string();
        }
        if let Some(ref email) = command.email {
            client.email = Some(email.clone());
        }
        if let Some(gender) = command.gender {
            client.gender = Some(gender);
        }
        if let Some(birth_date) = command.birth_date {
            client.birth_date = Some(birth_date);
        }

        let enrolled = command.fingerprint_id.is_some();
        if let Some(ref token) = command.fingerprint_id {
            client.enroll_fingerprint(token, command.fingerprint_data.clone());
        }

        client.updated_at = chrono::Utc::now();

        let event = ClientUpdated::new(&ctx, &client.id, enrolled);

        self.unit_of_work.commit(&client, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = UpdateClientCommand {
            client_id: "C1".to_string(),
            full_name: None,
            phone: Some("0602020202".to_string()),
            email: None,
            gender: None,
            birth_date: None,
            fingerprint_id: Some("FP-7".to_string()),
            fingerprint_data: None,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("clientId"));
        assert!(json.contains("fingerprintId"));
        assert!(!json.contains("fullName"));
    }
}
