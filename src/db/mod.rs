pub mod auth;
pub mod connection;
pub mod contact;
pub mod images;
pub mod listings;
pub mod magic_auth;

pub use connection::{init_db, Database};

/// Fresh in-memory connection with the production schema applied.
#[cfg(test)]
pub fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(include_str!("../../sql/schema.sql"))
        .unwrap();
    conn
}
