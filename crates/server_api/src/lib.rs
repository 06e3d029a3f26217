use shared::{
    domain::ContactId,
    error::{ApiError, ErrorCode},
    protocol::{ContactRecord, CreateContactRequest, UpdateContactRequest},
};
use storage::Storage;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_contacts(ctx: &ApiContext) -> Result<Vec<ContactRecord>, ApiError> {
    let contacts = ctx.storage.list_contacts().await.map_err(internal)?;
    Ok(contacts
        .into_iter()
        .map(|contact| ContactRecord {
            id: contact.contact_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
        })
        .collect())
}

pub async fn create_contact(
    ctx: &ApiContext,
    req: &CreateContactRequest,
) -> Result<ContactId, ApiError> {
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();
    let email = req.email.trim();
    if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "You must include a first name, last name and email",
        ));
    }

    ctx.storage
        .insert_contact(first_name, last_name, email)
        .await
        .map_err(|err| {
            // Duplicate email trips the UNIQUE constraint; treat it as caller error.
            if storage::is_unique_violation(&err) {
                ApiError::new(ErrorCode::Validation, "a contact with this email already exists")
            } else {
                internal(err)
            }
        })
}

pub async fn update_contact(
    ctx: &ApiContext,
    contact_id: ContactId,
    req: &UpdateContactRequest,
) -> Result<(), ApiError> {
    let updated = ctx
        .storage
        .update_contact(
            contact_id,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            req.email.as_deref(),
        )
        .await
        .map_err(internal)?;
    if !updated {
        return Err(ApiError::new(ErrorCode::NotFound, "contact not found"));
    }
    Ok(())
}

pub async fn delete_contact(ctx: &ApiContext, contact_id: ContactId) -> Result<(), ApiError> {
    let deleted = ctx
        .storage
        .delete_contact(contact_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(ApiError::new(ErrorCode::NotFound, "contact not found"));
    }
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> ApiContext {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        ApiContext { storage }
    }

    fn create_request(first: &str, last: &str, email: &str) -> CreateContactRequest {
        CreateContactRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_list_round_trips_the_contact() {
        let ctx = setup().await;
        let id = create_contact(&ctx, &create_request("Ada", "Lovelace", "ada@example.com"))
            .await
            .expect("create");

        let contacts = list_contacts(&ctx).await.expect("list");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id, id);
        assert_eq!(contacts[0].full_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let ctx = setup().await;
        let err = create_contact(&ctx, &create_request("  ", "Lovelace", "ada@example.com"))
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::Validation));
        assert!(err.message.contains("first name"));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let ctx = setup().await;
        create_contact(&ctx, &create_request("Ada", "Lovelace", "ada@example.com"))
            .await
            .expect("create");
        let err = create_contact(&ctx, &create_request("Augusta", "King", "ada@example.com"))
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::Validation));
    }

    #[tokio::test]
    async fn update_patches_only_the_provided_fields() {
        let ctx = setup().await;
        let id = create_contact(&ctx, &create_request("Ada", "Lovelace", "ada@example.com"))
            .await
            .expect("create");

        update_contact(
            &ctx,
            id,
            &UpdateContactRequest {
                last_name: Some("King".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");

        let contacts = list_contacts(&ctx).await.expect("list");
        assert_eq!(contacts[0].first_name, "Ada");
        assert_eq!(contacts[0].last_name, "King");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let ctx = setup().await;
        let err = update_contact(&ctx, ContactId(99), &UpdateContactRequest::default())
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let ctx = setup().await;
        let err = delete_contact(&ctx, ContactId(99))
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::NotFound));
    }
}
