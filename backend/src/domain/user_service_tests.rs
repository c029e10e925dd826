//! Tests for the user service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockUserStore;
use crate::domain::UserErrorKind;
use crate::test_support::{FixedUserIdGenerator, MutableClock, fixture_timestamp};

const USER_ID: &str = "11111111-1111-1111-1111-111111111111";

#[fixture]
fn user_id() -> UserId {
    UserId::new(USER_ID).expect("fixture user id")
}

#[fixture]
fn stored_user(user_id: UserId) -> User {
    User::create(
        user_id,
        NewUser {
            email: "ada@example.com".to_owned(),
            name: "Ada Lovelace".to_owned(),
            avatar: Some("https://example.com/ada.png".to_owned()),
        },
        fixture_timestamp(),
    )
}

fn make_service(store: MockUserStore, clock: Arc<MutableClock>) -> UserService<MockUserStore> {
    let id = UserId::new(USER_ID).expect("fixture user id");
    UserService::new(Arc::new(store), clock, Arc::new(FixedUserIdGenerator(id)))
}

fn later(seconds: i64) -> Arc<MutableClock> {
    let clock = MutableClock::default();
    clock.advance_seconds(seconds);
    Arc::new(clock)
}

fn unavailable() -> UserStoreError {
    UserStoreError::unavailable("backend offline")
}

#[rstest]
#[tokio::test]
async fn list_users_reports_has_more(stored_user: User) {
    let mut store = MockUserStore::new();
    let page_users = vec![stored_user.clone(), stored_user];
    store
        .expect_list()
        .withf(|page: &PageRequest| page.limit() == 2 && page.offset() == 0)
        .times(1)
        .return_once(move |_| Ok((page_users, 5)));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let page = service
        .list_users(PageRequest::new(2, 0).expect("page"))
        .await
        .expect("list succeeds");

    assert_eq!(page.items().len(), 2);
    assert_eq!(page.total(), 5);
    assert!(page.has_more());
}

#[rstest]
#[tokio::test]
async fn list_users_on_last_page_has_no_more(stored_user: User) {
    let mut store = MockUserStore::new();
    store
        .expect_list()
        .times(1)
        .return_once(move |_| Ok((vec![stored_user], 5)));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let page = service
        .list_users(PageRequest::new(10, 4).expect("page"))
        .await
        .expect("list succeeds");

    assert_eq!(page.items().len(), 1);
    assert!(!page.has_more());
}

#[rstest]
#[tokio::test]
async fn list_users_wraps_store_failures() {
    let mut store = MockUserStore::new();
    store
        .expect_list()
        .times(1)
        .return_once(|_| Err(unavailable()));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .list_users(PageRequest::default())
        .await
        .expect_err("list fails");

    assert_eq!(err, UserServiceError::ListFailed(unavailable()));
}

#[rstest]
#[tokio::test]
async fn create_user_assigns_identity_and_timestamps(user_id: UserId) {
    let expected_id = user_id.clone();
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .withf(move |user: &User| {
            user.id == expected_id
                && user.is_active
                && user.created_at == fixture_timestamp()
                && user.updated_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let user = service
        .create_user(NewUser {
            email: "grace@example.com".to_owned(),
            name: "Grace Hopper".to_owned(),
            avatar: None,
        })
        .await
        .expect("create succeeds");

    assert_eq!(user.id, user_id);
    assert_eq!(user.email, "grace@example.com");
    assert_eq!(user.name, "Grace Hopper");
    assert!(user.avatar.is_none());
    assert_eq!(user.created_at, user.updated_at);
}

#[rstest]
#[tokio::test]
async fn create_user_surfaces_id_collisions_without_retrying(user_id: UserId) {
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|user: &User| Err(UserStoreError::already_exists(user.id.to_string())));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .create_user(NewUser {
            email: "grace@example.com".to_owned(),
            name: "Grace Hopper".to_owned(),
            avatar: None,
        })
        .await
        .expect_err("collision");

    assert_eq!(err, UserServiceError::AlreadyExists { id: user_id });
}

#[rstest]
#[tokio::test]
async fn create_user_wraps_other_store_failures() {
    let mut store = MockUserStore::new();
    store
        .expect_create()
        .times(1)
        .return_once(|_| Err(unavailable()));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .create_user(NewUser {
            email: "grace@example.com".to_owned(),
            name: "Grace Hopper".to_owned(),
            avatar: None,
        })
        .await
        .expect_err("create fails");

    assert_eq!(err.kind(), UserErrorKind::CreateFailed);
}

#[rstest]
#[case(UserStoreError::not_found(USER_ID), UserErrorKind::NotFound)]
#[case(unavailable(), UserErrorKind::GetFailed)]
#[tokio::test]
async fn get_user_classifies_store_failures(
    user_id: UserId,
    #[case] store_error: UserStoreError,
    #[case] expected: UserErrorKind,
) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .times(1)
        .return_once(move |_| Err(store_error));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service.get_user(&user_id).await.expect_err("get fails");
    assert_eq!(err.kind(), expected);
}

#[rstest]
#[tokio::test]
async fn update_user_changes_only_patched_fields(user_id: UserId, stored_user: User) {
    let original = stored_user.clone();
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .times(1)
        .return_once(move |_| Ok(stored_user));
    store
        .expect_update()
        .withf(|user: &User| user.name == "X")
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(store, later(60));
    let updated = service
        .update_user(
            &user_id,
            UserPatch {
                name: Some("X".to_owned()),
                ..UserPatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.name, "X");
    assert_eq!(updated.email, original.email);
    assert_eq!(updated.avatar, original.avatar);
    assert_eq!(updated.is_active, original.is_active);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
}

#[rstest]
#[tokio::test]
async fn update_user_stamps_even_empty_patches(user_id: UserId, stored_user: User) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .return_once(move |_| Ok(stored_user));
    store.expect_update().times(1).return_once(|_| Ok(()));

    let service = make_service(store, later(5));
    let updated = service
        .update_user(&user_id, UserPatch::default())
        .await
        .expect("update succeeds");

    let expected: DateTime<Utc> = fixture_timestamp() + chrono::TimeDelta::seconds(5);
    assert_eq!(updated.updated_at, expected);
}

#[rstest]
#[tokio::test]
async fn update_user_never_moves_updated_at_before_created_at(
    user_id: UserId,
    stored_user: User,
) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .return_once(move |_| Ok(stored_user));
    store.expect_update().times(1).return_once(|_| Ok(()));

    let service = make_service(store, later(-3_600));
    let updated = service
        .update_user(&user_id, UserPatch::default())
        .await
        .expect("update succeeds");

    assert_eq!(updated.updated_at, updated.created_at);
}

#[rstest]
#[tokio::test]
async fn update_user_on_missing_id_does_not_write(user_id: UserId) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .times(1)
        .return_once(|id: &UserId| Err(UserStoreError::not_found(id.to_string())));
    store.expect_update().times(0);

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .update_user(&user_id, UserPatch::default())
        .await
        .expect_err("missing user");

    assert_eq!(err, UserServiceError::NotFound { id: user_id });
}

#[rstest]
#[tokio::test]
async fn update_user_wraps_fetch_failures(user_id: UserId) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .return_once(|_| Err(unavailable()));
    store.expect_update().times(0);

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .update_user(&user_id, UserPatch::default())
        .await
        .expect_err("fetch fails");

    assert_eq!(err, UserServiceError::UpdateFailed(unavailable()));
}

#[rstest]
#[tokio::test]
async fn update_user_reports_concurrent_delete_as_not_found(user_id: UserId, stored_user: User) {
    let mut store = MockUserStore::new();
    store
        .expect_get_by_id()
        .return_once(move |_| Ok(stored_user));
    store
        .expect_update()
        .times(1)
        .return_once(|user: &User| Err(UserStoreError::not_found(user.id.to_string())));

    let service = make_service(store, Arc::new(MutableClock::default()));
    let err = service
        .update_user(&user_id, UserPatch::default())
        .await
        .expect_err("deleted concurrently");

    assert!(err.is_not_found());
}

#[rstest]
#[case(Ok(()), None)]
#[case(Err(UserStoreError::not_found(USER_ID)), Some(UserErrorKind::NotFound))]
#[case(Err(unavailable()), Some(UserErrorKind::DeleteFailed))]
#[tokio::test]
async fn delete_user_classifies_outcomes(
    user_id: UserId,
    #[case] outcome: Result<(), UserStoreError>,
    #[case] expected: Option<UserErrorKind>,
) {
    let mut store = MockUserStore::new();
    store
        .expect_delete()
        .times(1)
        .return_once(move |_| outcome);

    let service = make_service(store, Arc::new(MutableClock::default()));
    let result = service.delete_user(&user_id).await;
    assert_eq!(result.err().map(|err| err.kind()), expected);
}
