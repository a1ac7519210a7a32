use super::*;

#[test]
fn from_path_resolves_known_routes() {
    assert_eq!(Route::from_path("/"), Route::Home);
    assert_eq!(Route::from_path(""), Route::Home);
    assert_eq!(Route::from_path("/login"), Route::Login);
    assert_eq!(Route::from_path("/register/"), Route::Register);
    assert_eq!(Route::from_path("/login?next=/"), Route::Login);
    assert_eq!(Route::from_path("/register#top"), Route::Register);
}

#[test]
fn from_path_unknown_is_not_found() {
    assert_eq!(Route::from_path("/admin"), Route::NotFound);
    assert_eq!(Route::from_path("/login/extra"), Route::NotFound);
}

#[test]
fn path_round_trips_for_navigable_routes() {
    for route in [Route::Home, Route::Login, Route::Register] {
        assert_eq!(Route::from_path(route.path()), route);
    }
}

#[test]
fn chrome_hidden_only_on_auth_pages() {
    assert!(Route::Home.shows_chrome());
    assert!(Route::NotFound.shows_chrome());
    assert!(!Route::Login.shows_chrome());
    assert!(!Route::Register.shows_chrome());
}
