use tracing::{info, warn};

use crate::domain::validation;
use crate::storage::UserRepository;
use shared::{CreateUserRequest, FieldErrors, UpdateUserRequest, User};

/// Error produced by user operations.
///
/// "Not found" is not an error: operations addressing a single record
/// return `Option`/`bool` results instead.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("There is some validation error!")]
    Validation(FieldErrors),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

impl UserError {
    fn single(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
        UserError::Validation(errors)
    }
}

/// Service for managing user records
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// List all users. An empty list is a normal result, not an error.
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        info!("Listing all users");

        let users = self.repo.find_all().await?;

        info!("Found {} users", users.len());
        Ok(users)
    }

    /// Create a new user after full validation.
    ///
    /// Email uniqueness is enforced by the store's unique index; there is
    /// deliberately no service-level pre-check here (edit has one), so a
    /// concurrent duplicate surfaces as a constraint failure which is
    /// mapped back to a validation error on `email`.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, UserError> {
        info!("Creating user: email={}", request.email);

        let errors = validation::validate_create(&request);
        if !errors.is_empty() {
            return Err(UserError::Validation(errors));
        }

        let id = self.repo.insert(&request).await.map_err(map_store_error)?;

        info!("Created user {} with id {}", request.email, id);

        Ok(User {
            id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            comment: request.comment,
            client_id: request.client_id,
        })
    }

    /// Get a user by id; `None` when absent
    pub async fn show(&self, id: i64) -> Result<Option<User>, UserError> {
        info!("Getting user: {}", id);

        let user = self.repo.find_by_id(id).await?;

        if user.is_none() {
            warn!("User not found: {}", id);
        }

        Ok(user)
    }

    /// Apply a partial update to an existing user.
    ///
    /// Returns `Ok(None)` when no user has the requested id. Only supplied
    /// fields are validated and applied; absent fields keep their current
    /// values. If the email changes, an explicit lookup rejects an address
    /// already held by another record before the write. That check and the
    /// write are not atomic; a concurrent create or edit can still collide
    /// and is then caught by the store's unique index.
    pub async fn edit(&self, request: UpdateUserRequest) -> Result<Option<User>, UserError> {
        let Some(id) = request.id else {
            return Err(UserError::single("id", "id field is required"));
        };

        info!("Updating user: {}", id);

        let Some(mut user) = self.repo.find_by_id(id).await? else {
            warn!("User not found: {}", id);
            return Ok(None);
        };

        if let Some(email) = &request.email {
            if *email != user.email && self.repo.find_by_email(email).await?.is_some() {
                return Err(UserError::single("email", "Email already exists"));
            }
        }

        let errors = validation::validate_update(&request);
        if !errors.is_empty() {
            return Err(UserError::Validation(errors));
        }

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(phone) = request.phone {
            user.phone = Some(phone);
        }
        if let Some(comment) = request.comment {
            user.comment = comment;
        }
        if let Some(client_id) = request.client_id {
            user.client_id = client_id;
        }

        self.repo.update(&user).await.map_err(map_store_error)?;

        info!("Updated user: {}", user.id);
        Ok(Some(user))
    }

    /// Delete a user by id; `false` when no such user exists
    pub async fn delete(&self, id: i64) -> Result<bool, UserError> {
        info!("Deleting user: {}", id);

        let Some(user) = self.repo.find_by_id(id).await? else {
            warn!("User not found: {}", id);
            return Ok(false);
        };

        self.repo.delete(user.id).await?;

        info!("Deleted user: {}", user.id);
        Ok(true)
    }
}

/// Map a store failure into the domain taxonomy.
///
/// A unique-constraint violation can only come from the email index, so it
/// is reported as a validation error on `email` rather than a persistence
/// failure.
fn map_store_error(err: anyhow::Error) -> UserError {
    if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return UserError::single("email", "User with this email already exists");
        }
    }
    UserError::Persistence(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> UserService {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        UserService::new(UserRepository::new(db))
    }

    fn alice_request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: Some("1234567890".to_string()),
            comment: "hi".to_string(),
            client_id: "3f6c6e0e-8d6a-4f6b-9d6e-1a2b3c4d5e6f".to_string(),
        }
    }

    fn field_errors(err: UserError) -> FieldErrors {
        match err {
            UserError::Validation(errors) => errors,
            UserError::Persistence(e) => panic!("Expected validation error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_create_and_show_round_trip() {
        let service = setup_test().await;

        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");
        assert!(created.id > 0);

        let shown = service
            .show(created.id)
            .await
            .expect("Failed to show user")
            .expect("User should exist");

        assert_eq!(shown, created);
        assert_eq!(shown.name, "Alice");
        assert_eq!(shown.email, "alice@example.com");
        assert_eq!(shown.phone, Some("1234567890".to_string()));
        assert_eq!(shown.comment, "hi");
    }

    #[tokio::test]
    async fn test_create_missing_required_fields() {
        let service = setup_test().await;

        let result = service.create(CreateUserRequest::default()).await;
        let errors = field_errors(result.expect_err("Blank request must fail validation"));

        for field in ["name", "email", "comment", "client_id"] {
            assert!(errors.contains_key(field), "Missing error for {}", field);
        }
        assert!(!errors.contains_key("phone"));
    }

    #[tokio::test]
    async fn test_create_invalid_email_and_phone() {
        let service = setup_test().await;

        let mut request = alice_request();
        request.email = "not-an-email".to_string();
        request.phone = Some("12345".to_string());

        let errors = field_errors(
            service
                .create(request)
                .await
                .expect_err("Invalid fields must fail validation"),
        );
        assert_eq!(errors["email"], vec!["Please enter a valid email"]);
        assert_eq!(
            errors["phone"],
            vec!["Phone number should be a 10-digit number"]
        );
    }

    #[tokio::test]
    async fn test_create_without_phone_is_valid() {
        let service = setup_test().await;

        let mut request = alice_request();
        request.phone = None;

        let created = service.create(request).await.expect("Failed to create user");
        assert_eq!(created.phone, None);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_maps_to_validation_error() {
        let service = setup_test().await;
        service
            .create(alice_request())
            .await
            .expect("Failed to create first user");

        let mut duplicate = alice_request();
        duplicate.name = "Another Alice".to_string();

        let errors = field_errors(
            service
                .create(duplicate)
                .await
                .expect_err("Duplicate email must be rejected"),
        );
        assert_eq!(
            errors["email"],
            vec!["User with this email already exists"]
        );
    }

    #[tokio::test]
    async fn test_show_absent_user() {
        let service = setup_test().await;

        let user = service.show(999).await.expect("Failed to query user");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_edit_requires_id() {
        let service = setup_test().await;

        let request = UpdateUserRequest {
            comment: Some("no id supplied".to_string()),
            ..Default::default()
        };

        let errors = field_errors(
            service
                .edit(request)
                .await
                .expect_err("Edit without id must fail"),
        );
        assert_eq!(errors["id"], vec!["id field is required"]);
    }

    #[tokio::test]
    async fn test_edit_absent_user_is_not_found() {
        let service = setup_test().await;

        let request = UpdateUserRequest {
            id: Some(999),
            comment: Some("whatever".to_string()),
            ..Default::default()
        };

        let result = service.edit(request).await.expect("Failed to edit");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_edit_partial_leaves_other_fields_unchanged() {
        let service = setup_test().await;
        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        let request = UpdateUserRequest {
            id: Some(created.id),
            comment: Some("updated comment".to_string()),
            ..Default::default()
        };

        let updated = service
            .edit(request)
            .await
            .expect("Failed to edit")
            .expect("User should exist");

        assert_eq!(updated.comment, "updated comment");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.phone, created.phone);
        assert_eq!(updated.client_id, created.client_id);

        // Changes must be persisted, not just echoed
        let reloaded = service
            .show(created.id)
            .await
            .expect("Failed to show user")
            .expect("User should exist");
        assert_eq!(reloaded.comment, "updated comment");
    }

    #[tokio::test]
    async fn test_edit_email_taken_by_another_user() {
        let service = setup_test().await;
        service
            .create(alice_request())
            .await
            .expect("Failed to create alice");

        let mut bob_request = alice_request();
        bob_request.name = "Bob".to_string();
        bob_request.email = "bob@example.com".to_string();
        let bob = service
            .create(bob_request)
            .await
            .expect("Failed to create bob");

        let request = UpdateUserRequest {
            id: Some(bob.id),
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };

        let errors = field_errors(
            service
                .edit(request)
                .await
                .expect_err("Taken email must be rejected"),
        );
        assert_eq!(errors["email"], vec!["Email already exists"]);
    }

    #[tokio::test]
    async fn test_edit_unchanged_email_succeeds() {
        let service = setup_test().await;
        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        let request = UpdateUserRequest {
            id: Some(created.id),
            email: Some(created.email.clone()),
            name: Some("Alice Renamed".to_string()),
            ..Default::default()
        };

        let updated = service
            .edit(request)
            .await
            .expect("Edit with own email should succeed")
            .expect("User should exist");
        assert_eq!(updated.name, "Alice Renamed");
        assert_eq!(updated.email, created.email);
    }

    #[tokio::test]
    async fn test_edit_validates_supplied_fields_only() {
        let service = setup_test().await;
        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        let request = UpdateUserRequest {
            id: Some(created.id),
            phone: Some("123".to_string()),
            ..Default::default()
        };

        let errors = field_errors(
            service
                .edit(request)
                .await
                .expect_err("Bad phone must fail validation"),
        );
        assert_eq!(
            errors["phone"],
            vec!["Phone number should be a 10-digit number"]
        );
        assert_eq!(errors.len(), 1, "Absent fields must not be validated");
    }

    #[tokio::test]
    async fn test_delete_then_show_not_found() {
        let service = setup_test().await;
        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        let deleted = service
            .delete(created.id)
            .await
            .expect("Failed to delete user");
        assert!(deleted);

        let user = service
            .show(created.id)
            .await
            .expect("Failed to query user");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_user_is_not_found() {
        let service = setup_test().await;

        let deleted = service.delete(999).await.expect("Failed to delete");
        assert!(!deleted, "Deleting a nonexistent user reports not-found");
    }

    #[tokio::test]
    async fn test_list_empty_then_populated() {
        let service = setup_test().await;

        let users = service.list().await.expect("Failed to list users");
        assert!(users.is_empty(), "Empty store lists no users");

        service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        let users = service.list().await.expect("Failed to list users");
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_email_can_be_reused() {
        let service = setup_test().await;
        let created = service
            .create(alice_request())
            .await
            .expect("Failed to create user");

        service
            .delete(created.id)
            .await
            .expect("Failed to delete user");

        // Uniqueness holds over stored records only; hard delete frees the address
        service
            .create(alice_request())
            .await
            .expect("Email of a deleted user should be reusable");
    }
}
