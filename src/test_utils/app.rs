use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    build_router,
    db::{create_spender, initialize},
    pagination::PaginationConfig,
    stores::sqlite::{SQLAppState, create_app_state},
};

/// An app backed by an in-memory database with the spenders Alice (1) and Bob (2).
pub(crate) fn get_test_app_state() -> SQLAppState {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    create_spender("Alice", "alice@example.com", &conn).expect("Could not create spender");
    create_spender("Bob", "bob@example.com", &conn).expect("Could not create spender");

    create_app_state(conn, PaginationConfig::default()).expect("Could not create app state")
}

pub(crate) fn get_test_server(state: SQLAppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}
