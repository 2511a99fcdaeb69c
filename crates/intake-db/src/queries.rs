use intake_types::{Choice, RequestDetails, ValidatedRequest};
use rusqlite::{Connection, Row, params};

use crate::models::{AdminRow, PortfolioRow, RelayConfig, RequestRow};
use crate::{Database, Result};

pub const TELEGRAM_BOT_TOKEN_KEY: &str = "telegram_bot_token";
pub const TELEGRAM_CHAT_ID_KEY: &str = "telegram_chat_id";

impl Database {
    // -- Requests --

    /// Appends a validated request and returns its new id. The row is written
    /// whole by a single INSERT or not at all.
    pub fn insert_request(&self, req: &ValidatedRequest) -> Result<i64> {
        let (media, file_format, print_media_type, size, finishing) = match &req.details {
            RequestDetails::Online { media, file_format } => {
                (Some(media.label()), Some(file_format.label()), None, None, None)
            }
            RequestDetails::Offline {
                print_media_type,
                size,
                finishing,
            } => (
                None,
                None,
                Some(print_media_type.label()),
                Some(size.as_str()),
                Some(finishing.label()),
            ),
        };

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO requests (
                    name, role, category, description, deadline, is_urgent,
                    media, file_format, print_media_type, size, finishing
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    req.name,
                    req.role,
                    req.category().label(),
                    req.description,
                    req.deadline.format("%Y-%m-%d").to_string(),
                    req.is_urgent,
                    media,
                    file_format,
                    print_media_type,
                    size,
                    finishing,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_request(&self, id: i64) -> Result<Option<RequestRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, role, category, description, deadline, is_urgent,
                        media, file_format, print_media_type, size, finishing, created_at
                 FROM requests WHERE id = ?1",
                [id],
                request_from_row,
            )
            .optional()
        })
    }

    pub fn count_requests(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM requests", [], |r| r.get(0))?)
        })
    }

    // -- Settings --

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| query_setting(conn, key))
    }

    /// Upserts a setting. An empty value removes the key.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            if value.trim().is_empty() {
                conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
            } else {
                conn.execute(
                    "INSERT INTO settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [key, value.trim()],
                )?;
            }
            Ok(())
        })
    }

    /// Reads both relay secrets under one lock so the snapshot is consistent.
    pub fn relay_config(&self) -> Result<RelayConfig> {
        self.with_conn(|conn| {
            Ok(RelayConfig {
                bot_token: query_setting(conn, TELEGRAM_BOT_TOKEN_KEY)?,
                chat_id: query_setting(conn, TELEGRAM_CHAT_ID_KEY)?,
            })
        })
    }

    // -- Portfolio --

    /// Newest first.
    pub fn list_portfolio(&self) -> Result<Vec<PortfolioRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, image_url, category, created_at
                 FROM portfolio ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([], portfolio_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_portfolio(
        &self,
        title: &str,
        image_url: &str,
        category: Option<&str>,
    ) -> Result<PortfolioRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO portfolio (title, image_url, category) VALUES (?1, ?2, ?3)",
                params![title, image_url, category],
            )?;
            let id = conn.last_insert_rowid();
            Ok(conn.query_row(
                "SELECT id, title, image_url, category, created_at FROM portfolio WHERE id = ?1",
                [id],
                portfolio_from_row,
            )?)
        })
    }

    /// Returns `false` when no item had that id.
    pub fn delete_portfolio(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM portfolio WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    // -- Admins --

    pub fn get_admin(&self, username: &str) -> Result<Option<AdminRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT username, password_hash, created_at FROM admins WHERE username = ?1",
                [username],
                |row| {
                    Ok(AdminRow {
                        username: row.get(0)?,
                        password_hash: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn upsert_admin(&self, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO admins (username, password_hash) VALUES (?1, ?2)
                 ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash",
                [username, password_hash],
            )?;
            Ok(())
        })
    }

    pub fn count_admins(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM admins", [], |r| r.get(0))?))
    }
}

fn query_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok(RequestRow {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        deadline: row.get(5)?,
        is_urgent: row.get(6)?,
        media: row.get(7)?,
        file_format: row.get(8)?,
        print_media_type: row.get(9)?,
        size: row.get(10)?,
        finishing: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn portfolio_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioRow> {
    Ok(PortfolioRow {
        id: row.get(0)?,
        title: row.get(1)?,
        image_url: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
