//! SQLite trace store
//!
//! Reads the relational export of a CUPTI capture (Nsight Systems `.sqlite`).
//! Kernel names live in `StringIds`, kernel executions in
//! `CUPTI_ACTIVITY_KIND_KERNEL`, host launch calls in
//! `CUPTI_ACTIVITY_KIND_RUNTIME` (joined on `correlationId`), and copies in
//! `CUPTI_ACTIVITY_KIND_MEMCPY`.

use super::{KernelLaunchRow, TraceStore};
use crate::error::{AnalysisError, Result};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use tracelens_shared::{Dim3, KernelEvent, KernelSignature, MemcpyKind, TransferRecord};
use tracing::{debug, info};

const STRING_TABLE: &str = "StringIds";
const KERNEL_TABLE: &str = "CUPTI_ACTIVITY_KIND_KERNEL";
const RUNTIME_TABLE: &str = "CUPTI_ACTIVITY_KIND_RUNTIME";
const MEMCPY_TABLE: &str = "CUPTI_ACTIVITY_KIND_MEMCPY";

const KERNEL_LAUNCHES_SQL: &str = r#"
    SELECT
        s.value,
        k.gridX, k.gridY, k.gridZ,
        k.blockX, k.blockY, k.blockZ,
        r.start, r."end",
        k.start, k."end"
    FROM CUPTI_ACTIVITY_KIND_KERNEL AS k
    JOIN CUPTI_ACTIVITY_KIND_RUNTIME AS r ON r.correlationId = k.correlationId
    JOIN StringIds AS s ON k.shortName = s.id
    ORDER BY k.start, k.correlationId
"#;

const MEMCPY_SQL: &str = r#"
    SELECT bytes, start, "end"
    FROM CUPTI_ACTIVITY_KIND_MEMCPY
    WHERE copyKind = ?1
    ORDER BY start
"#;

/// Read-only handle on a trace database. The connection closes on drop.
pub struct SqliteTraceStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteTraceStore {
    /// Open a trace database read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| AnalysisError::StoreUnavailable {
            path: path.clone(),
            source,
        })?;

        info!("Opened trace store {}", path.display());
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn require_tables(&self, tables: &[&str]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT count(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1")
            .map_err(AnalysisError::query("schema lookup"))?;

        for table in tables {
            let count: i64 = stmt
                .query_row([table], |row| row.get(0))
                .map_err(AnalysisError::query("schema lookup"))?;
            if count == 0 {
                return Err(AnalysisError::MissingTable(table.to_string()));
            }
        }
        Ok(())
    }
}

fn non_negative(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

fn dim3(row: &Row<'_>, first: usize) -> rusqlite::Result<Dim3> {
    Ok(Dim3::new(row.get(first)?, row.get(first + 1)?, row.get(first + 2)?))
}

impl TraceStore for SqliteTraceStore {
    fn kernel_launches(&self) -> Result<Vec<KernelLaunchRow>> {
        self.require_tables(&[STRING_TABLE, KERNEL_TABLE, RUNTIME_TABLE])?;

        let mut stmt = self
            .conn
            .prepare(KERNEL_LAUNCHES_SQL)
            .map_err(AnalysisError::query("kernel launches"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(KernelLaunchRow {
                    signature: KernelSignature {
                        name: row.get(0)?,
                        grid: dim3(row, 1)?,
                        block: dim3(row, 4)?,
                    },
                    event: KernelEvent {
                        runtime_start: row.get(7)?,
                        runtime_end: row.get(8)?,
                        kernel_start: row.get(9)?,
                        kernel_end: row.get(10)?,
                    },
                })
            })
            .map_err(AnalysisError::query("kernel launches"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AnalysisError::query("kernel launches"))?;

        debug!("Fetched {} correlated kernel launches", rows.len());
        Ok(rows)
    }

    fn memcpy_transfers(&self, kind: MemcpyKind) -> Result<Vec<TransferRecord>> {
        self.require_tables(&[MEMCPY_TABLE])?;

        let mut stmt = self
            .conn
            .prepare(MEMCPY_SQL)
            .map_err(AnalysisError::query("memcpy transfers"))?;

        let rows = stmt
            .query_map([kind.code()], |row| {
                Ok(TransferRecord {
                    bytes: non_negative(row, 0)?,
                    start: row.get(1)?,
                    end: row.get(2)?,
                })
            })
            .map_err(AnalysisError::query("memcpy transfers"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AnalysisError::query("memcpy transfers"))?;

        debug!("Fetched {} {} transfers", rows.len(), kind);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        CREATE TABLE StringIds (id INTEGER PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE CUPTI_ACTIVITY_KIND_KERNEL (
            start INTEGER, "end" INTEGER, correlationId INTEGER, shortName INTEGER,
            gridX INTEGER, gridY INTEGER, gridZ INTEGER,
            blockX INTEGER, blockY INTEGER, blockZ INTEGER
        );
        CREATE TABLE CUPTI_ACTIVITY_KIND_RUNTIME (start INTEGER, "end" INTEGER, correlationId INTEGER);
        CREATE TABLE CUPTI_ACTIVITY_KIND_MEMCPY (start INTEGER, "end" INTEGER, bytes INTEGER, copyKind INTEGER);
    "#;

    fn build_trace(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("trace.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO StringIds VALUES (1, 'gemm'), (2, 'reduce');
            INSERT INTO CUPTI_ACTIVITY_KIND_RUNTIME VALUES (100, 150, 1), (400, 420, 2), (900, 950, 3);
            INSERT INTO CUPTI_ACTIVITY_KIND_KERNEL VALUES
                (600, 700, 2, 2, 4, 1, 1, 64, 1, 1),
                (200, 300, 1, 1, 8, 8, 1, 16, 16, 1),
                (5000, 6000, 99, 1, 8, 8, 1, 16, 16, 1);
            INSERT INTO CUPTI_ACTIVITY_KIND_MEMCPY VALUES
                (0, 10, 4096, 2), (20, 40, 8192, 1), (5, 25, 100, 2);
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_kernel_launches_join_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTraceStore::open(build_trace(&dir)).unwrap();

        let rows = store.kernel_launches().unwrap();
        // correlationId 99 has no runtime row
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].signature, KernelSignature::new("gemm", (8, 8, 1), (16, 16, 1)));
        assert_eq!(
            rows[0].event,
            KernelEvent { runtime_start: 100, runtime_end: 150, kernel_start: 200, kernel_end: 300 }
        );
        assert_eq!(rows[1].signature.name, "reduce");
    }

    #[test]
    fn test_memcpy_transfers_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteTraceStore::open(build_trace(&dir)).unwrap();

        let dtoh = store.memcpy_transfers(MemcpyKind::DeviceToHost).unwrap();
        assert_eq!(
            dtoh,
            vec![
                TransferRecord { bytes: 4096, start: 0, end: 10 },
                TransferRecord { bytes: 100, start: 5, end: 25 },
            ]
        );
        assert_eq!(store.memcpy_transfers(MemcpyKind::HostToDevice).unwrap().len(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteTraceStore::open(dir.path().join("nope.sqlite")).err().unwrap();
        assert!(matches!(err, AnalysisError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_missing_memcpy_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kernels_only.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE StringIds (id INTEGER PRIMARY KEY, value TEXT NOT NULL);",
        )
        .unwrap();
        drop(conn);

        let store = SqliteTraceStore::open(&path).unwrap();
        match store.memcpy_transfers(MemcpyKind::DeviceToHost) {
            Err(AnalysisError::MissingTable(table)) => assert_eq!(table, MEMCPY_TABLE),
            other => panic!("expected MissingTable, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_kernel_table_without_geometry_fails_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("malformed.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE StringIds (id INTEGER PRIMARY KEY, value TEXT NOT NULL);
            CREATE TABLE CUPTI_ACTIVITY_KIND_KERNEL (start INTEGER);
            CREATE TABLE CUPTI_ACTIVITY_KIND_RUNTIME (start INTEGER, "end" INTEGER, correlationId INTEGER);
            "#,
        )
        .unwrap();
        drop(conn);

        let store = SqliteTraceStore::open(&path).unwrap();
        assert!(matches!(
            store.kernel_launches(),
            Err(AnalysisError::Query { what: "kernel launches", .. })
        ));
    }

    #[test]
    fn test_negative_byte_count_fails_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_trace(&dir);
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO CUPTI_ACTIVITY_KIND_MEMCPY VALUES (50, 60, -4096, 2)",
            [],
        )
        .unwrap();
        drop(conn);

        let store = SqliteTraceStore::open(&path).unwrap();
        match store.memcpy_transfers(MemcpyKind::DeviceToHost) {
            Err(AnalysisError::Query { what, source }) => {
                assert_eq!(what, "memcpy transfers");
                assert!(matches!(
                    source,
                    rusqlite::Error::IntegralValueOutOfRange(0, -4096)
                ));
            }
            other => panic!("expected Query error, got {:?}", other.map(|r| r.len())),
        }
        // Other directions are unaffected
        assert_eq!(store.memcpy_transfers(MemcpyKind::HostToDevice).unwrap().len(), 1);
    }
}
