//! Ledger database schema.
//!
//! Mirrors `migrations/20260115100000_create_ledger_records.sql`.

/// SQL to create the ledger records table.
///
/// `inserted_at` is a sequence, not a timestamp: it only orders listings.
/// The report's own `created_at` lives in `properties`.
pub const CREATE_LEDGER_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS ledger_records (
    namespace    VARCHAR(64)  NOT NULL,
    label        VARCHAR(64)  NOT NULL,
    record_key   VARCHAR(255) NOT NULL,
    properties   JSONB        NOT NULL,
    inserted_at  BIGSERIAL,
    PRIMARY KEY (namespace, label, record_key)
);

CREATE INDEX IF NOT EXISTS idx_ledger_records_label
    ON ledger_records (namespace, label, inserted_at);
";
