//! Table definitions

use rusqlite::Connection;

use crate::Result;

pub(super) fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            age INTEGER,
            gender TEXT,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    // Symptom vocabulary
    conn.execute(
        "CREATE TABLE IF NOT EXISTS symptoms (
            code TEXT PRIMARY KEY,
            label TEXT NOT NULL,
            weight INTEGER NOT NULL
        )",
        [],
    )?;

    // NULL risk_tier means the advice applies to every tier
    conn.execute(
        "CREATE TABLE IF NOT EXISTS recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            risk_tier TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS diagnoses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER,
            score REAL NOT NULL,
            risk_tier TEXT NOT NULL,
            symptoms TEXT NOT NULL,
            strategy TEXT NOT NULL,
            matched_rule TEXT,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_symptoms (
            diagnosis_id INTEGER NOT NULL,
            user_id INTEGER,
            symptom_code TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (diagnosis_id, position),
            FOREIGN KEY (diagnosis_id) REFERENCES diagnoses(id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
        )",
        [],
    )?;

    // Indexes
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_users_name ON users(full_name)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_diagnoses_user ON diagnoses(user_id)",
        [],
    )?;

    Ok(())
}
