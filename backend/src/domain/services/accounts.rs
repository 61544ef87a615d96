//! Account service: registration, login, and profile lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::PERSISTENCE_FAILURE;
use crate::domain::ports::{
    AccountService, CredentialHasher, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Argon2CredentialHasher, Email, Error, LoginCredentials, PasswordDigest, Registration,
    UserAccount, UserDetails,
};

/// Account service implementing [`AccountService`].
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<U> AccountsService<U> {
    /// Create a new service backed by the given user repository, hashing
    /// with Argon2id.
    pub fn new(users: Arc<U>) -> Self {
        Self {
            users,
            hasher: Arc::new(Argon2CredentialHasher),
        }
    }

    /// Replace the password hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }
}

fn map_user_error(operation: &'static str, err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::DuplicateEmail { email } => {
            info!(%email, operation, "email already registered");
            Error::invalid_request("email already registered")
        }
        other => {
            error!(error = %other, operation, "user repository failed");
            Error::internal(PERSISTENCE_FAILURE)
        }
    }
}

#[async_trait]
impl<U> AccountService for AccountsService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<(), Error> {
        let password = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal("password hashing failed")
            })?;
        let account = UserAccount {
            details: registration.details().clone(),
            password,
        };
        self.users
            .insert(&account)
            .await
            .map_err(|err| map_user_error("register", err))?;
        info!(email = %account.details.email, "user registered");
        Ok(())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<Email, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_user_error("login", err))?;
        // Unknown emails still pay for a verification.
        let stand_in = PasswordDigest::unknown_account();
        let digest = account.as_ref().map_or(&stand_in, |account| &account.password);
        let verified = self.hasher.verify(digest, credentials.password()).await;
        match account {
            Some(account) if verified => Ok(account.details.email),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }

    async fn profile(&self, email: &Email) -> Result<UserDetails, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(|err| map_user_error("profile", err))?
            .map(|account| account.details)
            .ok_or_else(|| {
                warn!(%email, "session names a user that no longer exists");
                Error::unauthorized("login required")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCredentialHasher, MockUserRepository};
    use crate::domain::services::fixtures::email;
    use crate::domain::{ErrorCode, PasswordHashingError, RegistrationParts};
    use rstest::rstest;

    fn make_service(repo: MockUserRepository) -> AccountsService<MockUserRepository> {
        AccountsService::new(Arc::new(repo))
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration::try_new(RegistrationParts {
            name: "Ada",
            email,
            password,
            ..RegistrationParts::default()
        })
        .expect("valid registration")
    }

    fn stored_account(email_raw: &str, password: &str) -> UserAccount {
        UserAccount {
            details: registration(email_raw, password).details().clone(),
            password: PasswordDigest::hash(password).expect("hash"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_a_hashed_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .withf(|account: &UserAccount| {
                account.details.email.as_ref() == "ada@x.com"
                    && account.password.as_ref() != "secret"
                    && account.password.verify("secret")
            })
            .times(1)
            .return_once(|_| Ok(()));

        make_service(repo)
            .register(registration("Ada@X.com", "secret"))
            .await
            .expect("registration succeeds");
    }

    #[rstest]
    #[case(UserRepositoryError::duplicate_email("ada@x.com"), ErrorCode::InvalidRequest)]
    #[case(UserRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[case(UserRepositoryError::connection("refused"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn register_maps_repository_errors(
        #[case] failure: UserRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_insert().return_once(move |_| Err(failure));

        let err = make_service(repo)
            .register(registration("ada@x.com", "secret"))
            .await
            .expect_err("insert fails");
        assert_eq!(err.code(), expected);
        assert!(!err.message().contains("boom"));
    }

    #[rstest]
    #[case("secret", true)]
    #[case("wrong", false)]
    #[tokio::test]
    async fn login_verifies_the_password(#[case] password: &str, #[case] succeeds: bool) {
        let account = stored_account("ada@x.com", "secret");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email: &Email| email.as_ref() == "ada@x.com")
            .return_once(move |_| Ok(Some(account)));

        let creds = LoginCredentials::try_from_parts("ADA@x.com", password).expect("creds");
        let result = make_service(repo).login(&creds).await;
        match (succeeds, result) {
            (true, Ok(found)) => assert_eq!(found, email("ada@x.com")),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (_, other) => panic!("unexpected login outcome: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn login_rejects_unknown_users_like_wrong_passwords() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));

        let creds = LoginCredentials::try_from_parts("ghost@x.com", "pw").expect("creds");
        let err = make_service(repo).login(&creds).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_users_still_pay_for_a_verification() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_verify()
            .withf(|digest: &PasswordDigest, candidate: &str| {
                *digest == PasswordDigest::unknown_account() && candidate == "pw"
            })
            .times(1)
            .return_const(false);

        let service = make_service(repo).with_hasher(Arc::new(hasher));
        let creds = LoginCredentials::try_from_parts("ghost@x.com", "pw").expect("creds");
        let err = service.login(&creds).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn hashing_failures_are_internal_and_skip_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert().times(0);
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().return_once(|_| {
            Err(PasswordHashingError::new("blocking pool shut down"))
        });

        let err = make_service(repo)
            .with_hasher(Arc::new(hasher))
            .register(registration("ada@x.com", "secret"))
            .await
            .expect_err("hashing fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_returns_details_without_password() {
        let account = stored_account("ada@x.com", "secret");
        let expected = account.details.clone();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .return_once(move |_| Ok(Some(account)));

        let details = make_service(repo)
            .profile(&email("ada@x.com"))
            .await
            .expect("profile");
        assert_eq!(details, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_of_vanished_user_requires_login() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));

        let err = make_service(repo)
            .profile(&email("ghost@x.com"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "login required");
    }
}
