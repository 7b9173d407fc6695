//! Helper functions used while bootstrapping the app

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;

/// Opens the call database, encrypted with SQLCipher in production.
///
/// Shared with the `scripts` crate so both open the database the same way.
pub async fn setup_sqlite_db_pool(
    db_host: &str,
    db_pass_encrypt: Option<&str>,
    is_prod: bool,
) -> anyhow::Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(db_host)?
        .create_if_missing(true)
        .pragma("foreign_keys", "ON");

    if is_prod {
        let db_pass_encrypt =
            db_pass_encrypt.context("DB_PASS_ENCRYPT is required in production")?;

        return Ok(SqlitePool::connect_with(
            connect_options
                .pragma("key", db_pass_encrypt.to_string())
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(connect_options).await?)
}
