//! Store and entry operations on the SQLite backend.
//!
//! Insertion order is the `entries.id` rowid: upserts keep the existing row
//! and therefore its position.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, Connection, OptionalExtension};

use super::CacheStorage;
use super::connection::CacheDb;
use super::hash::compute_key_hash;
use crate::Error;
use crate::model::{RequestKey, Response};

fn ensure_store(conn: &Connection, store: &str) -> Result<(), Error> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM stores WHERE name = ?1)",
        params![store],
        |row| row.get(0),
    )?;
    if exists { Ok(()) } else { Err(Error::NotFound(format!("store {store}"))) }
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open_store(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO stores (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![name, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY rowid")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, rusqlite::Error>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<Response>, Error> {
        let store = store.to_string();
        let hash = compute_key_hash(key);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                ensure_store(conn, &store)?;
                let row = conn
                    .query_row(
                        "SELECT status, headers_json, body FROM entries
                         WHERE store_name = ?1 AND key_hash = ?2",
                        params![store, hash],
                        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, Vec<u8>>(2)?)),
                    )
                    .optional()?;

                match row {
                    Some((status, headers_json, body)) => {
                        let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)?;
                        Ok(Some(Response { status: status as u16, headers, body }))
                    }
                    None => Ok(None),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, store: &str, key: &RequestKey, response: &Response) -> Result<(), Error> {
        let store = store.to_string();
        let hash = compute_key_hash(key);
        let key = key.clone();
        let status = response.status as i64;
        let headers_json = serde_json::to_string(&response.headers)?;
        let body = response.body.clone();
        let stored_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                ensure_store(conn, &store)?;
                conn.execute(
                    "INSERT INTO entries (store_name, key_hash, method, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(store_name, key_hash) DO UPDATE SET
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![store, hash, key.method, key.url, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, store: &str, key: &RequestKey) -> Result<bool, Error> {
        let store = store.to_string();
        let hash = compute_key_hash(key);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                ensure_store(conn, &store)?;
                let deleted = conn.execute(
                    "DELETE FROM entries WHERE store_name = ?1 AND key_hash = ?2",
                    params![store, hash],
                )?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self, store: &str) -> Result<Vec<RequestKey>, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<RequestKey>, Error> {
                ensure_store(conn, &store)?;
                let mut stmt = conn.prepare("SELECT method, url FROM entries WHERE store_name = ?1 ORDER BY id ASC")?;
                let keys = stmt
                    .query_map(params![store], |row| {
                        Ok(RequestKey { method: row.get(0)?, url: row.get(1)? })
                    })?
                    .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }
}
