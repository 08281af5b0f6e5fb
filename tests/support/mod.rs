//! Shared harness for HTTP integration tests.
//!
//! Wires the real documents service over in-memory adapters so scenarios
//! exercise handlers, session middleware, and the domain service together
//! without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::{test as actix_test, web, App};
use async_trait::async_trait;
use mockable::DefaultClock;

use collabdoc::domain::ports::{
    DocumentRepository, DocumentRepositoryError, LoginCredentials, LoginService,
    NotificationSender, NotificationSenderError, UserDirectory, UserDirectoryError,
};
use collabdoc::domain::{
    Document, DocumentId, DocumentsService, EmailAddress, Error, User, UserId,
};
use collabdoc::inbound::http::state::HttpState;
use collabdoc::inbound::http::{documents, users};

pub const TEST_PASSWORD: &str = "password";

/// In-memory document store implementing the repository port.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<HashMap<DocumentId, Document>>,
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self.store.lock().expect("store lock").get(&id).cloned())
    }

    async fn find_accessible(
        &self,
        user: &UserId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let store = self.store.lock().expect("store lock");
        let mut documents: Vec<Document> = store
            .values()
            .filter(|doc| doc.can_access(user))
            .cloned()
            .collect();
        documents.sort_by_key(|doc| std::cmp::Reverse(doc.updated_at()));
        Ok(documents)
    }

    async fn insert(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        self.store
            .lock()
            .expect("store lock")
            .insert(document.id(), document.clone());
        Ok(())
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        self.store
            .lock()
            .expect("store lock")
            .insert(document.id(), document.clone());
        Ok(())
    }
}

/// Registered accounts serving both the directory and login ports.
#[derive(Default)]
pub struct TestAccounts {
    users: Mutex<Vec<User>>,
}

impl TestAccounts {
    pub fn register(&self, id: &str, email: &str, display_name: &str) -> User {
        let user = User::try_from_strings(id, email, display_name).expect("valid test user");
        self.users.lock().expect("users lock").push(user.clone());
        user
    }
}

#[async_trait]
impl UserDirectory for TestAccounts {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserDirectoryError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserDirectoryError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.email() == email).cloned())
    }
}

#[async_trait]
impl LoginService for TestAccounts {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if credentials.password() != TEST_PASSWORD {
            return Err(Error::unauthorized("invalid credentials"));
        }
        let users = self.users.lock().expect("users lock");
        users
            .iter()
            .find(|user| user.email() == credentials.email())
            .cloned()
            .ok_or_else(|| Error::unauthorized("invalid credentials"))
    }
}

/// Notification recorder implementing the sender port.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(DocumentId, EmailAddress)>>,
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(
        &self,
        recipient: &EmailAddress,
        document: &Document,
    ) -> Result<(), NotificationSenderError> {
        self.sent
            .lock()
            .expect("sent lock")
            .push((document.id(), recipient.clone()));
        Ok(())
    }
}

/// Adapters shared between the app under test and scenario assertions.
pub struct Harness {
    pub accounts: Arc<TestAccounts>,
    pub repository: Arc<InMemoryRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            accounts: Arc::new(TestAccounts::default()),
            repository: Arc::new(InMemoryRepository::default()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }
}

impl Harness {
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let service = Arc::new(DocumentsService::new(
            self.repository.clone(),
            self.accounts.clone(),
            self.notifier.clone(),
            Arc::new(DefaultClock),
        ));
        let state = HttpState {
            login: self.accounts.clone(),
            users: service.clone(),
            documents_query: service.clone(),
            documents_command: service.clone(),
            share_notification: service,
        };

        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".into())
            .cookie_secure(false)
            .build();

        App::new()
            .app_data(web::Data::new(state))
            .wrap(collabdoc::Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(users::login)
                    .service(users::current_user)
                    .service(documents::create_document)
                    .service(documents::list_documents)
                    .service(documents::get_document)
                    .service(documents::update_content)
                    .service(documents::share_document)
                    .service(documents::share_document_by_email),
            )
    }
}

/// Authenticate `email` and return the issued session cookie.
pub async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login for {email} failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
