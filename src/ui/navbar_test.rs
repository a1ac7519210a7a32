use super::*;
use crate::net::types::{User, UserId};
use crate::session::SessionStore;
use crate::state::auth::AuthState;
use crate::test_helpers::{MockApi, auth_response, manager_with, user};

#[tokio::test]
async fn guest_view_when_signed_out() {
    let (manager, _api) = manager_with(MockApi::new(), SessionStore::in_memory()).await;
    let navbar = Navbar::new(manager.handle());

    let view = navbar.view();
    assert_eq!(view, NavbarView::Guest);
    assert_eq!(view.links(), vec![Route::Home, Route::Login, Route::Register]);
}

#[tokio::test]
async fn member_view_falls_back_for_missing_profile_fields() {
    let api = MockApi { login: Ok(auth_response("tok1", User { username: None, ..user(1, "") })), ..MockApi::new() };
    let (manager, _api) = manager_with(api, SessionStore::in_memory()).await;
    manager.login("a@b.com", "secret").await.unwrap();

    let NavbarView::Member(menu) = Navbar::new(manager.handle()).view() else {
        panic!("expected member view");
    };
    assert_eq!(menu.avatar_url, DEFAULT_AVATAR);
    assert_eq!(menu.username, "Guest");
    assert_eq!(menu.email, "N/A");
    assert_eq!(menu.password_mask, "••••••••");
    assert!(!menu.dropdown_open);
}

#[tokio::test]
async fn member_view_uses_profile_fields() {
    let profile = User {
        id: UserId::from(3),
        username: Some("ada".into()),
        email: Some("ada@b.com".into()),
        avatar: Some("https://cdn.example/ada.png".into()),
    };
    let api = MockApi { login: Ok(auth_response("tok1", profile)), ..MockApi::new() };
    let (manager, _api) = manager_with(api, SessionStore::in_memory()).await;
    manager.login("ada@b.com", "secret").await.unwrap();

    let view = Navbar::new(manager.handle()).view();
    assert_eq!(view.links(), vec![Route::Home]);
    let NavbarView::Member(menu) = view else {
        panic!("expected member view");
    };
    assert_eq!(menu.username, "ada");
    assert_eq!(menu.email, "ada@b.com");
    assert_eq!(menu.avatar_url, "https://cdn.example/ada.png");
}

#[tokio::test]
async fn dropdown_toggles_and_closes() {
    let api = MockApi { login: Ok(auth_response("tok1", user(1, "a"))), ..MockApi::new() };
    let (manager, _api) = manager_with(api, SessionStore::in_memory()).await;
    manager.login("a@b.com", "secret").await.unwrap();
    let mut navbar = Navbar::new(manager.handle());

    navbar.toggle_dropdown();
    assert!(matches!(navbar.view(), NavbarView::Member(MemberMenu { dropdown_open: true, .. })));
    navbar.toggle_dropdown();
    assert!(matches!(navbar.view(), NavbarView::Member(MemberMenu { dropdown_open: false, .. })));
    navbar.toggle_dropdown();
    navbar.close_dropdown();
    assert!(matches!(navbar.view(), NavbarView::Member(MemberMenu { dropdown_open: false, .. })));
}

#[tokio::test]
async fn logout_closes_menu_and_redirects_to_login() {
    let session = SessionStore::in_memory();
    let api = MockApi {
        login: Ok(auth_response("tok1", user(1, "a"))),
        logout: Err((0, "offline")),
        ..MockApi::new()
    };
    let (manager, _api) = manager_with(api, session.clone()).await;
    manager.login("a@b.com", "secret").await.unwrap();
    let mut navbar = Navbar::new(manager.handle());
    navbar.toggle_dropdown();

    let next = navbar.logout().await.unwrap();

    assert_eq!(next, Route::Login);
    assert_eq!(navbar.view(), NavbarView::Guest);
    assert_eq!(manager.state(), AuthState::signed_out());
    assert!(!session.has_session());
}
