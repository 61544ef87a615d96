//! In-memory adapter implementing every driven port.
//!
//! Used when no database URL is configured and by HTTP tests. All state sits
//! behind one [`Mutex`]; locks are never held across an await point because
//! no method awaits.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    InvitationRepository, InvitationRepositoryError, ProjectRepository, ProjectRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Email, Invitation, InvitationDecision, InvitationKey, InvitationStatus, NewInvitation,
    NewProject, ProjectDetails, ProjectId, UserAccount, UserDetails,
};

#[derive(Debug)]
struct StoredInvitation {
    status: InvitationStatus,
    created_at: DateTime<Utc>,
    sequence: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<Email, UserAccount>,
    projects: BTreeMap<ProjectId, ProjectDetails>,
    members: HashMap<ProjectId, Vec<Email>>,
    invitations: BTreeMap<InvitationKey, StoredInvitation>,
    next_project_id: i64,
    next_sequence: u64,
}

impl StoreState {
    fn is_member(&self, project_id: ProjectId, email: &Email) -> bool {
        self.members
            .get(&project_id)
            .is_some_and(|members| members.contains(email))
    }
}

/// Process-local store for users, projects, teams, and invitations.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }

    /// Insert an account without going through the async port.
    ///
    /// Handy for seeding fixtures before the runtime starts.
    pub fn insert_account(&self, account: UserAccount) -> Result<(), UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::connection)?;
        let email = account.details.email.clone();
        if state.users.contains_key(&email) {
            return Err(UserRepositoryError::duplicate_email(email.as_ref()));
        }
        state.users.insert(email, account);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        self.insert_account(account.clone())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state.users.get(email).cloned())
    }

    async fn find_eligible(
        &self,
        project_id: ProjectId,
        skills: &[String],
    ) -> Result<Vec<UserDetails>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        let manager = state
            .projects
            .get(&project_id)
            .map(|project| &project.manager_email);
        Ok(state
            .users
            .values()
            .filter(|account| Some(&account.details.email) != manager)
            .filter(|account| !state.is_member(project_id, &account.details.email))
            .filter(|account| account.details.skills.iter().any(|s| skills.contains(s)))
            .map(|account| account.details.clone())
            .collect())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn insert(&self, project: &NewProject) -> Result<ProjectDetails, ProjectRepositoryError> {
        let mut state = self.lock().map_err(ProjectRepositoryError::connection)?;
        if !state.users.contains_key(&project.manager_email) {
            return Err(ProjectRepositoryError::unknown_manager(
                project.manager_email.as_ref(),
            ));
        }
        state.next_project_id += 1;
        let details = ProjectDetails {
            project_id: ProjectId::new(state.next_project_id),
            manager_email: project.manager_email.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            required_skills: project.required_skills.clone(),
            created_at: project.created_at,
        };
        state.projects.insert(details.project_id, details.clone());
        Ok(details)
    }

    async fn list_for_user(
        &self,
        email: &Email,
    ) -> Result<Vec<ProjectDetails>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        let mut projects: Vec<ProjectDetails> = state
            .projects
            .values()
            .filter(|project| {
                &project.manager_email == email || state.is_member(project.project_id, email)
            })
            .cloned()
            .collect();
        projects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.project_id.cmp(&a.project_id))
        });
        Ok(projects)
    }

    async fn team_member_names(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, ProjectRepositoryError> {
        let state = self.lock().map_err(ProjectRepositoryError::connection)?;
        Ok(state
            .members
            .get(&project_id)
            .into_iter()
            .flatten()
            .filter_map(|email| state.users.get(email))
            .map(|account| account.details.name.clone())
            .collect())
    }
}

#[async_trait]
impl InvitationRepository for InMemoryStore {
    async fn insert(&self, invitation: &NewInvitation) -> Result<(), InvitationRepositoryError> {
        let mut state = self.lock().map_err(InvitationRepositoryError::connection)?;
        let key = &invitation.key;
        if !state.projects.contains_key(&key.project_id)
            || !state.users.contains_key(&key.receiver_email)
        {
            return Err(InvitationRepositoryError::unknown_reference());
        }
        if state.invitations.contains_key(key) {
            return Err(InvitationRepositoryError::duplicate());
        }
        state.next_sequence += 1;
        let stored = StoredInvitation {
            status: InvitationStatus::Pending,
            created_at: invitation.created_at,
            sequence: state.next_sequence,
        };
        state.invitations.insert(key.clone(), stored);
        Ok(())
    }

    async fn pending_for_receiver(
        &self,
        receiver: &Email,
    ) -> Result<Vec<Invitation>, InvitationRepositoryError> {
        let state = self.lock().map_err(InvitationRepositoryError::connection)?;
        let mut pending: Vec<(&InvitationKey, &StoredInvitation)> = state
            .invitations
            .iter()
            .filter(|(key, stored)| {
                &key.receiver_email == receiver && stored.status == InvitationStatus::Pending
            })
            .collect();
        pending.sort_by(|(_, a), (_, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(pending
            .into_iter()
            .filter_map(|(key, stored)| {
                let project = state.projects.get(&key.project_id)?;
                Some(Invitation {
                    project_id: key.project_id,
                    project_name: project.name.clone(),
                    manager_email: project.manager_email.clone(),
                    receiver_email: key.receiver_email.clone(),
                    status: stored.status,
                    created_at: stored.created_at,
                })
            })
            .collect())
    }

    async fn decide(
        &self,
        key: &InvitationKey,
        decision: InvitationDecision,
    ) -> Result<InvitationStatus, InvitationRepositoryError> {
        let mut state = self.lock().map_err(InvitationRepositoryError::connection)?;
        let stored = state
            .invitations
            .get_mut(key)
            .ok_or_else(InvitationRepositoryError::not_found)?;
        let next = stored
            .status
            .apply(decision)
            .map_err(|err| InvitationRepositoryError::not_pending(err.current))?;
        stored.status = next;
        if next == InvitationStatus::Accepted {
            let members = state.members.entry(key.project_id).or_default();
            if !members.contains(&key.receiver_email) {
                members.push(key.receiver_email.clone());
            }
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordDigest;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn account(name: &str, email: &str, skills: &[&str]) -> UserAccount {
        UserAccount {
            details: UserDetails {
                name: name.to_owned(),
                email: Email::new(email).expect("fixture email"),
                skills: skills.iter().map(|s| (*s).to_owned()).collect(),
                bio: None,
            },
            password: PasswordDigest::from_stored("$argon2id$fixture"),
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn email(raw: &str) -> Email {
        Email::new(raw).expect("fixture email")
    }

    fn new_project(manager: &str, name: &str, minute: u32) -> NewProject {
        NewProject {
            manager_email: email(manager),
            name: name.to_owned(),
            description: String::new(),
            required_skills: vec!["rust".to_owned()],
            created_at: at(minute),
        }
    }

    fn key(project_id: ProjectId, receiver: &str) -> InvitationKey {
        InvitationKey {
            project_id,
            receiver_email: email(receiver),
        }
    }

    #[fixture]
    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        for account in [
            account("Alice", "alice@x.com", &["rust", "sql"]),
            account("Bob", "bob@x.com", &["rust"]),
            account("Carol", "carol@x.com", &["design"]),
        ] {
            store.insert_account(account).expect("seed account");
        }
        store
    }

    #[rstest]
    fn duplicate_accounts_are_rejected(store: InMemoryStore) {
        let err = store
            .insert_account(account("Other", "alice@x.com", &[]))
            .expect_err("duplicate");
        assert_eq!(err, UserRepositoryError::duplicate_email("alice@x.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn projects_need_a_registered_manager(store: InMemoryStore) {
        let err = ProjectRepository::insert(&store, &new_project("ghost@x.com", "Nope", 0))
            .await
            .expect_err("unknown manager");
        assert!(matches!(err, ProjectRepositoryError::UnknownManager { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn accept_joins_the_team_once(store: InMemoryStore) {
        let project = ProjectRepository::insert(&store, &new_project("alice@x.com", "Engine", 0))
            .await
            .expect("project");
        let bob = key(project.project_id, "bob@x.com");
        InvitationRepository::insert(
            &store,
            &NewInvitation {
                key: bob.clone(),
                created_at: at(1),
            },
        )
        .await
        .expect("invite");

        let status = store
            .decide(&bob, InvitationDecision::Accept)
            .await
            .expect("accept");
        assert_eq!(status, InvitationStatus::Accepted);
        let err = store
            .decide(&bob, InvitationDecision::Reject)
            .await
            .expect_err("already accepted");
        assert_eq!(
            err,
            InvitationRepositoryError::not_pending(InvitationStatus::Accepted)
        );
        assert_eq!(
            store
                .team_member_names(project.project_id)
                .await
                .expect("team"),
            vec!["Bob".to_owned()]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_invitations_leave_the_team_alone(store: InMemoryStore) {
        let project = ProjectRepository::insert(&store, &new_project("alice@x.com", "Engine", 0))
            .await
            .expect("project");
        let carol = key(project.project_id, "carol@x.com");
        InvitationRepository::insert(
            &store,
            &NewInvitation {
                key: carol.clone(),
                created_at: at(1),
            },
        )
        .await
        .expect("invite");

        store
            .decide(&carol, InvitationDecision::Reject)
            .await
            .expect("reject");
        assert!(
            store
                .team_member_names(project.project_id)
                .await
                .expect("team")
                .is_empty()
        );
        assert!(
            store
                .pending_for_receiver(&email("carol@x.com"))
                .await
                .expect("pending")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn invitations_need_existing_rows(store: InMemoryStore) {
        let err = InvitationRepository::insert(
            &store,
            &NewInvitation {
                key: key(ProjectId::new(9), "bob@x.com"),
                created_at: at(0),
            },
        )
        .await
        .expect_err("unknown project");
        assert_eq!(err, InvitationRepositoryError::unknown_reference());
    }

    #[rstest]
    #[tokio::test]
    async fn listings_are_newest_first(store: InMemoryStore) {
        let older = ProjectRepository::insert(&store, &new_project("alice@x.com", "Old", 0))
            .await
            .expect("project");
        let newer = ProjectRepository::insert(&store, &new_project("bob@x.com", "New", 5))
            .await
            .expect("project");
        for (project_id, minute) in [(older.project_id, 1), (newer.project_id, 6)] {
            InvitationRepository::insert(
                &store,
                &NewInvitation {
                    key: key(project_id, "carol@x.com"),
                    created_at: at(minute),
                },
            )
            .await
            .expect("invite");
        }

        let pending = store
            .pending_for_receiver(&email("carol@x.com"))
            .await
            .expect("pending");
        let names: Vec<&str> = pending.iter().map(|i| i.project_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Old"]);

        for project_id in [older.project_id, newer.project_id] {
            store
                .decide(&key(project_id, "carol@x.com"), InvitationDecision::Accept)
                .await
                .expect("accept");
        }
        let projects = store
            .list_for_user(&email("carol@x.com"))
            .await
            .expect("projects");
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[rstest]
    #[tokio::test]
    async fn eligible_users_skip_manager_and_members(store: InMemoryStore) {
        let project = ProjectRepository::insert(&store, &new_project("alice@x.com", "Engine", 0))
            .await
            .expect("project");
        let skills = vec!["rust".to_owned(), "design".to_owned()];

        let before = store
            .find_eligible(project.project_id, &skills)
            .await
            .expect("eligible");
        let emails: Vec<&str> = before.iter().map(|u| u.email.as_ref()).collect();
        assert_eq!(emails, vec!["bob@x.com", "carol@x.com"]);

        let bob = key(project.project_id, "bob@x.com");
        InvitationRepository::insert(
            &store,
            &NewInvitation {
                key: bob.clone(),
                created_at: at(1),
            },
        )
        .await
        .expect("invite");
        store
            .decide(&bob, InvitationDecision::Accept)
            .await
            .expect("accept");

        let after = store
            .find_eligible(project.project_id, &skills)
            .await
            .expect("eligible");
        let emails: Vec<&str> = after.iter().map(|u| u.email.as_ref()).collect();
        assert_eq!(emails, vec!["carol@x.com"]);
    }
}
