//! Document domain service.
//!
//! Implements the driving ports for document use-cases over the driven
//! ports for storage, user resolution, and notification delivery. All
//! authorization decisions route through [`Document::can_access`] (reads
//! and writes) or [`Document::is_owner`] (sharing); nothing here rebuilds
//! those checks inline.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, DocumentsCommand, DocumentsQuery,
    NotificationSender, NotificationSenderError, ShareNotification, UserDirectory,
    UserDirectoryError, UsersQuery,
};
use crate::domain::{Document, DocumentId, EmailAddress, Error, User, UserId};

/// Document service implementing the driving ports.
#[derive(Clone)]
pub struct DocumentsService<R, U, N> {
    documents: Arc<R>,
    users: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<R, U, N> DocumentsService<R, U, N> {
    /// Create a new service over the given adapters.
    pub fn new(documents: Arc<R>, users: Arc<U>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            documents,
            users,
            notifier,
            clock,
        }
    }
}

impl<R, U, N> DocumentsService<R, U, N>
where
    R: DocumentRepository,
    U: UserDirectory,
    N: NotificationSender,
{
    fn map_repository_error(error: DocumentRepositoryError) -> Error {
        match error {
            DocumentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("document storage unavailable: {message}"))
            }
            DocumentRepositoryError::Query { message } => {
                Error::internal(format!("document storage error: {message}"))
            }
        }
    }

    fn map_directory_error(error: UserDirectoryError) -> Error {
        match error {
            UserDirectoryError::Connection { message } => {
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserDirectoryError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
        }
    }

    fn map_notification_error(error: NotificationSenderError) -> Error {
        match error {
            NotificationSenderError::Transport { message }
            | NotificationSenderError::Timeout { message } => {
                Error::service_unavailable(format!("notification delivery failed: {message}"))
            }
            NotificationSenderError::Rejected { message } => {
                Error::internal(format!("notification rejected: {message}"))
            }
        }
    }

    fn document_not_found(id: DocumentId) -> Error {
        Error::not_found(format!("document {id} does not exist"))
    }

    /// Fetch `id` or fail with not-found.
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, Error> {
        self.documents
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::document_not_found(id))
    }

    /// Fetch `id` and require that `user` may access it.
    ///
    /// Existence is not concealed from authenticated strangers: a document
    /// that exists but is inaccessible yields forbidden, not not-found.
    async fn fetch_accessible(&self, user: &UserId, id: DocumentId) -> Result<Document, Error> {
        let document = self.fetch_document(id).await?;
        if !document.can_access(user) {
            return Err(Error::forbidden(format!(
                "no access to document {id}"
            )));
        }
        Ok(document)
    }
}

#[async_trait]
impl<R, U, N> DocumentsQuery for DocumentsService<R, U, N>
where
    R: DocumentRepository,
    U: UserDirectory,
    N: NotificationSender,
{
    async fn list_documents(&self, user: &UserId) -> Result<Vec<Document>, Error> {
        self.documents
            .find_accessible(user)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_document(&self, user: &UserId, id: DocumentId) -> Result<Document, Error> {
        self.fetch_accessible(user, id).await
    }
}

#[async_trait]
impl<R, U, N> DocumentsCommand for DocumentsService<R, U, N>
where
    R: DocumentRepository,
    U: UserDirectory,
    N: NotificationSender,
{
    async fn create_document(
        &self,
        owner: &UserId,
        title: Option<String>,
    ) -> Result<Document, Error> {
        let document = Document::create(*owner, title, self.clock.utc());
        self.documents
            .insert(&document)
            .await
            .map_err(Self::map_repository_error)?;
        tracing::info!(document_id = %document.id(), owner = %owner, "document created");
        Ok(document)
    }

    async fn update_content(
        &self,
        user: &UserId,
        id: DocumentId,
        content: String,
    ) -> Result<Document, Error> {
        let mut document = self.fetch_accessible(user, id).await?;
        document.replace_content(content, self.clock.utc());
        self.documents
            .update(&document)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(document)
    }

    async fn share_with_user(
        &self,
        owner: &UserId,
        id: DocumentId,
        email: &EmailAddress,
    ) -> Result<Document, Error> {
        // Re-fetch immediately before mutating so a concurrent share is
        // folded in rather than overwritten.
        let mut document = self.fetch_document(id).await?;
        if !document.is_owner(owner) {
            return Err(Error::forbidden(format!(
                "only the owner may share document {id}"
            )));
        }

        let collaborator = self
            .users
            .find_by_email(email)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| {
                Error::not_found(format!("no user registered under {email}"))
                    .with_details(json!({ "resource": "user" }))
            })?;

        // Sharing with the owner or an existing collaborator is a no-op.
        if document.add_collaborator(*collaborator.id()) {
            self.documents
                .update(&document)
                .await
                .map_err(Self::map_repository_error)?;
            tracing::info!(
                document_id = %id,
                collaborator = %collaborator.id(),
                "collaborator added"
            );
        }
        Ok(document)
    }
}

#[async_trait]
impl<R, U, N> UsersQuery for DocumentsService<R, U, N>
where
    R: DocumentRepository,
    U: UserDirectory,
    N: NotificationSender,
{
    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("no user with id {id}")))
    }
}

#[async_trait]
impl<R, U, N> ShareNotification for DocumentsService<R, U, N>
where
    R: DocumentRepository,
    U: UserDirectory,
    N: NotificationSender,
{
    async fn notify_share(&self, id: DocumentId, recipient: &EmailAddress) -> Result<(), Error> {
        let document = self.fetch_document(id).await?;
        self.notifier
            .send(recipient, &document)
            .await
            .map_err(Self::map_notification_error)?;
        tracing::info!(document_id = %id, "share notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockDocumentRepository, MockNotificationSender, MockUserDirectory,
    };
    use crate::domain::{DEFAULT_TITLE, DisplayName, ErrorCode, User};
    use chrono::{DateTime, Local, TimeDelta, Utc};
    use rstest::rstest;

    /// Clock pinned to a fixed instant.
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    type Service =
        DocumentsService<MockDocumentRepository, MockUserDirectory, MockNotificationSender>;

    fn make_service(
        documents: MockDocumentRepository,
        users: MockUserDirectory,
        notifier: MockNotificationSender,
        now: DateTime<Utc>,
    ) -> Service {
        DocumentsService::new(
            Arc::new(documents),
            Arc::new(users),
            Arc::new(notifier),
            Arc::new(FixedClock(now)),
        )
    }

    fn user_named(email: &str) -> User {
        User::new(
            UserId::random(),
            EmailAddress::new(email).expect("valid email"),
            DisplayName::new("Someone").expect("valid name"),
        )
    }

    #[tokio::test]
    async fn create_document_persists_with_clock_timestamp() {
        let now = Utc::now();
        let owner = UserId::random();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_insert()
            .withf(move |doc: &Document| {
                doc.is_owner(&owner) && doc.updated_at() == now && doc.title() == DEFAULT_TITLE
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let document = service
            .create_document(&owner, None)
            .await
            .expect("creation succeeds");
        assert_eq!(document.title(), DEFAULT_TITLE);
        assert_eq!(document.content(), "");
    }

    #[tokio::test]
    async fn list_documents_passes_through_repository_order() {
        let now = Utc::now();
        let owner = UserId::random();
        let newer = Document::create(owner, Some("B".to_owned()), now);
        let older = Document::create(owner, Some("A".to_owned()), now - TimeDelta::hours(1));
        let expected = vec![newer.clone(), older.clone()];

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_accessible()
            .times(1)
            .return_once(move |_| Ok(vec![newer, older]));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let listed = service
            .list_documents(&owner)
            .await
            .expect("listing succeeds");
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn get_document_allows_owner_and_collaborator() {
        let now = Utc::now();
        let owner = UserId::random();
        let collaborator = UserId::random();
        let mut document = Document::create(owner, None, now);
        document.add_collaborator(collaborator);
        let id = document.id();

        for reader in [owner, collaborator] {
            let stored = document.clone();
            let mut documents = MockDocumentRepository::new();
            documents
                .expect_find_by_id()
                .times(1)
                .return_once(move |_| Ok(Some(stored)));
            let service = make_service(
                documents,
                MockUserDirectory::new(),
                MockNotificationSender::new(),
                now,
            );
            let fetched = service
                .get_document(&reader, id)
                .await
                .expect("access granted");
            assert_eq!(fetched.id(), id);
        }
    }

    #[tokio::test]
    async fn get_document_rejects_strangers_with_forbidden() {
        let now = Utc::now();
        let document = Document::create(UserId::random(), None, now);
        let id = document.id();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let error = service
            .get_document(&UserId::random(), id)
            .await
            .expect_err("stranger denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn get_document_reports_missing_documents() {
        let now = Utc::now();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let error = service
            .get_document(&UserId::random(), DocumentId::random())
            .await
            .expect_err("missing document");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_content_persists_replacement_for_collaborator() {
        let created = Utc::now();
        let now = created + TimeDelta::minutes(5);
        let owner = UserId::random();
        let collaborator = UserId::random();
        let mut document = Document::create(owner, None, created);
        document.add_collaborator(collaborator);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents
            .expect_update()
            .withf(move |doc: &Document| doc.content() == "revised" && doc.updated_at() == now)
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let updated = service
            .update_content(&collaborator, id, "revised".to_owned())
            .await
            .expect("update succeeds");
        assert_eq!(updated.content(), "revised");
        assert_eq!(updated.updated_at(), now);
    }

    #[tokio::test]
    async fn update_content_rejects_strangers_without_writing() {
        let now = Utc::now();
        let document = Document::create(UserId::random(), None, now);
        let id = document.id();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents.expect_update().times(0);

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let error = service
            .update_content(&UserId::random(), id, "sneaky".to_owned())
            .await
            .expect_err("stranger denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn share_grants_access_and_persists() {
        let now = Utc::now();
        let owner = UserId::random();
        let recipient = user_named("bob@example.com");
        let recipient_id = *recipient.id();
        let document = Document::create(owner, None, now);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents
            .expect_update()
            .withf(move |doc: &Document| doc.is_collaborator(&recipient_id))
            .times(1)
            .return_once(|_| Ok(()));

        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(recipient)));

        let service = make_service(documents, users, MockNotificationSender::new(), now);
        let email = EmailAddress::new("bob@example.com").expect("valid email");
        let shared = service
            .share_with_user(&owner, id, &email)
            .await
            .expect("share succeeds");
        assert!(shared.is_collaborator(&recipient_id));
    }

    #[tokio::test]
    async fn share_is_idempotent_and_skips_redundant_writes() {
        let now = Utc::now();
        let owner = UserId::random();
        let recipient = user_named("bob@example.com");
        let recipient_id = *recipient.id();
        let mut document = Document::create(owner, None, now);
        document.add_collaborator(recipient_id);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents.expect_update().times(0);

        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(recipient)));

        let service = make_service(documents, users, MockNotificationSender::new(), now);
        let email = EmailAddress::new("bob@example.com").expect("valid email");
        let shared = service
            .share_with_user(&owner, id, &email)
            .await
            .expect("repeat share succeeds");
        assert_eq!(
            shared
                .collaborators()
                .iter()
                .filter(|c| **c == recipient_id)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn sharing_with_the_owner_is_a_no_op() {
        let now = Utc::now();
        let owner_user = user_named("owner@example.com");
        let owner = *owner_user.id();
        let document = Document::create(owner, None, now);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents.expect_update().times(0);

        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(owner_user)));

        let service = make_service(documents, users, MockNotificationSender::new(), now);
        let email = EmailAddress::new("owner@example.com").expect("valid email");
        let shared = service
            .share_with_user(&owner, id, &email)
            .await
            .expect("self-share succeeds");
        assert!(shared.collaborators().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn only_the_owner_may_share() {
        let now = Utc::now();
        let owner = UserId::random();
        let collaborator = UserId::random();
        let mut document = Document::create(owner, None, now);
        document.add_collaborator(collaborator);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents.expect_update().times(0);

        let mut users = MockUserDirectory::new();
        users.expect_find_by_email().times(0);

        let service = make_service(documents, users, MockNotificationSender::new(), now);
        let email = EmailAddress::new("carol@example.com").expect("valid email");
        let error = service
            .share_with_user(&collaborator, id, &email)
            .await
            .expect_err("collaborator cannot share");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn share_with_unknown_email_names_the_missing_resource() {
        let now = Utc::now();
        let owner = UserId::random();
        let document = Document::create(owner, None, now);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));
        documents.expect_update().times(0);

        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));

        let service = make_service(documents, users, MockNotificationSender::new(), now);
        let email = EmailAddress::new("ghost@example.com").expect("valid email");
        let error = service
            .share_with_user(&owner, id, &email)
            .await
            .expect_err("unknown recipient");
        assert_eq!(error.code(), ErrorCode::NotFound);
        let details = error.details.expect("details present");
        assert_eq!(details["resource"], "user");
    }

    #[tokio::test]
    async fn current_user_resolves_through_the_directory() {
        let now = Utc::now();
        let user = user_named("ada@example.com");
        let id = *user.id();

        let mut users = MockUserDirectory::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));

        let service = make_service(
            MockDocumentRepository::new(),
            users,
            MockNotificationSender::new(),
            now,
        );
        let resolved = service.current_user(&id).await.expect("user resolved");
        assert_eq!(*resolved.id(), id);
    }

    #[tokio::test]
    async fn current_user_reports_unknown_sessions() {
        let now = Utc::now();
        let mut users = MockUserDirectory::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let service = make_service(
            MockDocumentRepository::new(),
            users,
            MockNotificationSender::new(),
            now,
        );
        let error = service
            .current_user(&UserId::random())
            .await
            .expect_err("unknown user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn notify_share_delivers_for_existing_documents() {
        let now = Utc::now();
        let document = Document::create(UserId::random(), Some("Plan".to_owned()), now);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .withf(move |recipient: &EmailAddress, doc: &Document| {
                recipient.as_ref() == "bob@example.com" && doc.id() == id
            })
            .times(1)
            .return_once(|_, _| Ok(()));

        let service = make_service(documents, MockUserDirectory::new(), notifier, now);
        let email = EmailAddress::new("bob@example.com").expect("valid email");
        service
            .notify_share(id, &email)
            .await
            .expect("notification sent");
    }

    #[tokio::test]
    async fn notify_share_requires_an_existing_document() {
        let now = Utc::now();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let mut notifier = MockNotificationSender::new();
        notifier.expect_send().times(0);

        let service = make_service(documents, MockUserDirectory::new(), notifier, now);
        let email = EmailAddress::new("bob@example.com").expect("valid email");
        let error = service
            .notify_share(DocumentId::random(), &email)
            .await
            .expect_err("missing document");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(
        NotificationSenderError::transport("connection refused"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        NotificationSenderError::timeout("no response"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        NotificationSenderError::rejected("mailbox unroutable"),
        ErrorCode::InternalError
    )]
    #[tokio::test]
    async fn notify_share_maps_sender_failures(
        #[case] failure: NotificationSenderError,
        #[case] expected: ErrorCode,
    ) {
        let now = Utc::now();
        let document = Document::create(UserId::random(), None, now);
        let id = document.id();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(document)));

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .times(1)
            .return_once(move |_, _| Err(failure));

        let service = make_service(documents, MockUserDirectory::new(), notifier, now);
        let email = EmailAddress::new("bob@example.com").expect("valid email");
        let error = service
            .notify_share(id, &email)
            .await
            .expect_err("delivery fails");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[case(
        DocumentRepositoryError::connection("pool exhausted"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        DocumentRepositoryError::query("relation missing"),
        ErrorCode::InternalError
    )]
    #[tokio::test]
    async fn storage_failures_map_to_availability_codes(
        #[case] failure: DocumentRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let now = Utc::now();
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_accessible()
            .times(1)
            .return_once(move |_| Err(failure));

        let service = make_service(
            documents,
            MockUserDirectory::new(),
            MockNotificationSender::new(),
            now,
        );
        let error = service
            .list_documents(&UserId::random())
            .await
            .expect_err("storage failure surfaces");
        assert_eq!(error.code(), expected);
    }
}
