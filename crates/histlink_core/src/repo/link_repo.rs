//! Link store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the derived output of batch linking runs.
//! - Answer "which sources link to this entity" without rerunning matching.
//!
//! # Invariants
//! - `replace_all` swaps every derived row in one immediate transaction, so
//!   readers see either the previous run or the new one.
//! - Read paths reject invalid persisted enum values instead of masking them.
//! - Rows come back in batch order (`position`).

use crate::db::DbError;
use crate::linking::batch::{DatedSource, LinkBatch};
use crate::model::date::{DatePrecision, ParsedDate};
use crate::model::entity::EntityKind;
use crate::model::link::{
    Confidence, FragmentKind, LinkCandidate, SourceKind, SourceRef, UnmatchedFragment,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LINK_SELECT_SQL: &str = "SELECT
    source_kind,
    source_id,
    target_kind,
    target_slug,
    confidence,
    matched_text,
    note
FROM entity_links";

pub type RepoResult<T> = Result<T, RepoError>;

/// Link store error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted link data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row counts written by one `replace_all` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoredCounts {
    pub links: usize,
    pub unmatched: usize,
    pub dates: usize,
}

/// Repository interface for derived link data.
pub trait LinkRepository {
    /// Clears every derived row and stores `batch` instead.
    ///
    /// Running it twice with the same batch leaves identical rows. When a
    /// hand-built batch repeats a key, the first row wins.
    fn replace_all(&self, batch: &LinkBatch) -> RepoResult<StoredCounts>;
    fn links_for_source(&self, source: &SourceRef) -> RepoResult<Vec<LinkCandidate>>;
    fn links_for_target(&self, kind: EntityKind, slug: &str) -> RepoResult<Vec<LinkCandidate>>;
    fn all_links(&self) -> RepoResult<Vec<LinkCandidate>>;
    fn unmatched_fragments(&self) -> RepoResult<Vec<UnmatchedFragment>>;
    fn source_date(&self, source: &SourceRef) -> RepoResult<Option<ParsedDate>>;
}

/// SQLite-backed link repository.
pub struct SqliteLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LinkRepository for SqliteLinkRepository<'_> {
    fn replace_all(&self, batch: &LinkBatch) -> RepoResult<StoredCounts> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute_batch(
            "DELETE FROM entity_links;
             DELETE FROM unmatched_fragments;
             DELETE FROM source_dates;",
        )?;

        let counts = StoredCounts {
            links: insert_links(&tx, &batch.candidates)?,
            unmatched: insert_unmatched(&tx, &batch.unmatched)?,
            dates: insert_dates(&tx, &batch.dates)?,
        };
        tx.commit()?;
        Ok(counts)
    }

    fn links_for_source(&self, source: &SourceRef) -> RepoResult<Vec<LinkCandidate>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LINK_SELECT_SQL}
             WHERE source_kind = ?1 AND source_id = ?2
             ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query(params![source.kind.as_str(), source.id.as_str()])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(parse_link_row(row)?);
        }
        Ok(links)
    }

    fn links_for_target(&self, kind: EntityKind, slug: &str) -> RepoResult<Vec<LinkCandidate>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LINK_SELECT_SQL}
             WHERE target_kind = ?1 AND target_slug = ?2
             ORDER BY position ASC;"
        ))?;
        let mut rows = stmt.query(params![kind.as_str(), slug])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(parse_link_row(row)?);
        }
        Ok(links)
    }

    fn all_links(&self) -> RepoResult<Vec<LinkCandidate>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LINK_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(parse_link_row(row)?);
        }
        Ok(links)
    }

    fn unmatched_fragments(&self) -> RepoResult<Vec<UnmatchedFragment>> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, text
             FROM unmatched_fragments
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut fragments = Vec::new();
        while let Some(row) = rows.next()? {
            let kind_text: String = row.get("kind")?;
            let kind = FragmentKind::parse(&kind_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid fragment kind `{kind_text}` in unmatched_fragments.kind"
                ))
            })?;
            fragments.push(UnmatchedFragment {
                kind,
                text: row.get("text")?,
            });
        }
        Ok(fragments)
    }

    fn source_date(&self, source: &SourceRef) -> RepoResult<Option<ParsedDate>> {
        let row = self
            .conn
            .query_row(
                "SELECT original_text, year_start, year_end, month, day, precision, sort_key
                 FROM source_dates
                 WHERE source_kind = ?1 AND source_id = ?2;",
                params![source.kind.as_str(), source.id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>("original_text")?,
                        row.get::<_, Option<i32>>("year_start")?,
                        row.get::<_, Option<i32>>("year_end")?,
                        row.get::<_, Option<u32>>("month")?,
                        row.get::<_, Option<u32>>("day")?,
                        row.get::<_, String>("precision")?,
                        row.get::<_, Option<i64>>("sort_key")?,
                    ))
                },
            )
            .optional()?;

        let Some((original_text, year_start, year_end, month, day, precision_text, sort_key)) = row
        else {
            return Ok(None);
        };
        let precision = DatePrecision::parse(&precision_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid date precision `{precision_text}` in source_dates.precision"
            ))
        })?;
        Ok(Some(ParsedDate {
            original_text,
            year_start,
            year_end,
            month,
            day,
            precision,
            sort_key,
        }))
    }
}

fn insert_links(tx: &Transaction<'_>, candidates: &[LinkCandidate]) -> RepoResult<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO entity_links (
            source_kind,
            source_id,
            target_kind,
            target_slug,
            confidence,
            matched_text,
            note,
            position
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
    )?;
    let mut inserted = 0;
    for (position, candidate) in candidates.iter().enumerate() {
        inserted += stmt.execute(params![
            candidate.source.kind.as_str(),
            candidate.source.id.as_str(),
            candidate.target_kind.as_str(),
            candidate.target_slug.as_str(),
            candidate.confidence.as_str(),
            candidate.matched_text.as_str(),
            candidate.note.as_deref(),
            position as i64,
        ])?;
    }
    Ok(inserted)
}

fn insert_unmatched(tx: &Transaction<'_>, fragments: &[UnmatchedFragment]) -> RepoResult<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO unmatched_fragments (kind, text, position)
         VALUES (?1, ?2, ?3);",
    )?;
    let mut inserted = 0;
    for (position, fragment) in fragments.iter().enumerate() {
        inserted += stmt.execute(params![
            fragment.kind.as_str(),
            fragment.text.as_str(),
            position as i64,
        ])?;
    }
    Ok(inserted)
}

fn insert_dates(tx: &Transaction<'_>, dates: &[DatedSource]) -> RepoResult<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR IGNORE INTO source_dates (
            source_kind,
            source_id,
            original_text,
            year_start,
            year_end,
            month,
            day,
            precision,
            sort_key
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
    )?;
    let mut inserted = 0;
    for dated in dates {
        let date = &dated.date;
        inserted += stmt.execute(params![
            dated.source.kind.as_str(),
            dated.source.id.as_str(),
            date.original_text.as_str(),
            date.year_start,
            date.year_end,
            date.month,
            date.day,
            date.precision.as_str(),
            date.sort_key,
        ])?;
    }
    Ok(inserted)
}

fn parse_link_row(row: &Row<'_>) -> RepoResult<LinkCandidate> {
    let source_kind_text: String = row.get("source_kind")?;
    let source_kind = SourceKind::parse(&source_kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid source kind `{source_kind_text}` in entity_links.source_kind"
        ))
    })?;

    let target_kind_text: String = row.get("target_kind")?;
    let target_kind = EntityKind::parse(&target_kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid target kind `{target_kind_text}` in entity_links.target_kind"
        ))
    })?;

    let confidence_text: String = row.get("confidence")?;
    let confidence = Confidence::parse(&confidence_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid confidence `{confidence_text}` in entity_links.confidence"
        ))
    })?;

    Ok(LinkCandidate {
        source: SourceRef::new(source_kind, row.get::<_, String>("source_id")?),
        target_kind,
        target_slug: row.get("target_slug")?,
        confidence,
        matched_text: row.get("matched_text")?,
        note: row.get("note")?,
    })
}
