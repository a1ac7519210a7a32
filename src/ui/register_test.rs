use super::*;
use crate::session::SessionStore;
use crate::test_helpers::{MockApi, auth_response, manager_with, user};
use std::time::Duration;

fn filled(auth: AuthHandle) -> RegisterForm {
    RegisterForm { username: "new".into(), email: "new@b.com".into(), password: "pw".into(), ..RegisterForm::new(auth) }
}

#[tokio::test]
async fn missing_username_is_rejected_without_network() {
    let (manager, api) = manager_with(MockApi::new(), SessionStore::in_memory()).await;
    let mut form = RegisterForm { username: "  ".into(), ..filled(manager.handle()) };

    assert_eq!(form.submit().await, None);
    assert_eq!(form.error(), Some("Fill in username, email and password."));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn success_signs_in_and_navigates_home() {
    let session = SessionStore::in_memory();
    let api = MockApi { register: Ok(auth_response("tok2", user(2, "new"))), ..MockApi::new() };
    let (manager, _api) = manager_with(api, session.clone()).await;
    let mut form = filled(manager.handle());

    assert_eq!(form.submit().await, Some(Route::Home));
    assert_eq!(session.token().as_deref(), Some("tok2"));
    assert!(form.password.is_empty());
}

#[tokio::test]
async fn server_rejection_is_shown_verbatim() {
    let api = MockApi { register: Err((409, "email already registered")), ..MockApi::new() };
    let (manager, _api) = manager_with(api, SessionStore::in_memory()).await;
    let mut form = filled(manager.handle());

    assert_eq!(form.submit().await, None);
    assert_eq!(form.error(), Some("email already registered"));
    assert!(!manager.state().is_authenticated());
}

#[tokio::test]
async fn submit_is_ignored_while_another_auth_operation_runs() {
    let api = MockApi {
        login: Ok(auth_response("tok1", user(1, "a"))),
        register: Ok(auth_response("tok2", user(2, "new"))),
        login_delay: Some(Duration::from_millis(50)),
        ..MockApi::new()
    };
    let (manager, api) = manager_with(api, SessionStore::in_memory()).await;
    let mut rx = manager.subscribe();
    let mut form = filled(manager.handle());

    let login = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.login("a@b.com", "secret").await })
    };
    rx.wait_for(|s| s.loading).await.unwrap();

    assert!(form.busy());
    assert_eq!(form.submit().await, None);

    login.await.unwrap().unwrap();
    assert!(!form.busy());
    assert_eq!(api.calls(), vec!["login"]);
}
