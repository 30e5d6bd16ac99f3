use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::constants::source as schema;
use crate::data::RawRecord;
use crate::errors::PipelineError;
use crate::source::RecordSource;
use crate::types::SourceId;

/// Record source over a CSV export of the sales table.
///
/// The root may be a single file or a directory of part files; parts are
/// read in path order so a fixed directory state yields a deterministic
/// snapshot. Columns are resolved by header name, and empty cells surface
/// as nulls — the conventional rendering of relational NULLs in CSV
/// exports. A present-but-empty distinction therefore cannot originate
/// here; sources that preserve it (e.g. in-memory) flow through unchanged.
pub struct CsvSource {
    source_id: SourceId,
    root: PathBuf,
    follow_links: bool,
}

impl CsvSource {
    /// Create a source over `root`, a CSV file or directory of `.csv` parts.
    pub fn new(source_id: impl Into<SourceId>, root: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal for directory roots.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    fn unavailable(&self, reason: String) -> PipelineError {
        PipelineError::SourceUnavailable {
            source_id: self.source_id.clone(),
            reason,
        }
    }

    /// Resolve the part files to read, in deterministic path order.
    fn part_files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        if !self.root.exists() {
            return Err(self.unavailable(format!("{} does not exist", self.root.display())));
        }
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut parts: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .filter(|path| is_csv_file(path))
            .collect();
        parts.sort();
        if parts.is_empty() {
            return Err(self.unavailable(format!(
                "no csv part files found under {}",
                self.root.display()
            )));
        }
        Ok(parts)
    }

    fn read_part(&self, path: &Path, records: &mut Vec<RawRecord>) -> Result<(), PipelineError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|err| self.unavailable(format!("failed opening {}: {err}", path.display())))?;
        let headers = reader
            .headers()
            .map_err(|err| {
                self.unavailable(format!("failed reading headers of {}: {err}", path.display()))
            })?
            .clone();

        let columns = ColumnIndexes::resolve(&headers).map_err(|missing| {
            self.unavailable(format!(
                "{} is missing required column '{missing}'",
                path.display()
            ))
        })?;

        for row in reader.records() {
            let row = row.map_err(|err| {
                self.unavailable(format!("failed reading {}: {err}", path.display()))
            })?;
            records.push(columns.project(&row));
        }
        debug!(part = %path.display(), "read csv part");
        Ok(())
    }
}

impl RecordSource for CsvSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn fetch(&self) -> Result<Vec<RawRecord>, PipelineError> {
        let parts = self.part_files()?;
        let mut records = Vec::new();
        for path in &parts {
            self.read_part(path, &mut records)?;
        }
        info!(
            source_id = %self.source_id,
            parts = parts.len(),
            records = records.len(),
            "fetched csv snapshot"
        );
        Ok(records)
    }
}

/// True if the path has a `.csv` extension (case-insensitive).
fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Header positions of the ten projected columns within one part file.
struct ColumnIndexes {
    order_id: usize,
    date: usize,
    status: usize,
    qty: usize,
    amount: usize,
    ship_state: usize,
    category: usize,
    size: usize,
    b2b: usize,
    promotion_ids: usize,
}

impl ColumnIndexes {
    /// Resolve every projected column, or return the first missing header.
    fn resolve(headers: &csv::StringRecord) -> Result<Self, String> {
        let find = |name: &str| -> Result<usize, String> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| name.to_string())
        };
        Ok(Self {
            order_id: find(schema::COL_ORDER_ID)?,
            date: find(schema::COL_DATE)?,
            status: find(schema::COL_STATUS)?,
            qty: find(schema::COL_QTY)?,
            amount: find(schema::COL_AMOUNT)?,
            ship_state: find(schema::COL_SHIP_STATE)?,
            category: find(schema::COL_CATEGORY)?,
            size: find(schema::COL_SIZE)?,
            b2b: find(schema::COL_B2B)?,
            promotion_ids: find(schema::COL_PROMOTION_IDS)?,
        })
    }

    /// Project one row onto a raw record; any other column is dropped.
    fn project(&self, row: &csv::StringRecord) -> RawRecord {
        RawRecord {
            order_id: cell(row, self.order_id),
            date: cell(row, self.date),
            status: cell(row, self.status),
            qty: cell(row, self.qty),
            amount: cell(row, self.amount),
            ship_state: cell(row, self.ship_state),
            category: cell(row, self.category),
            size: cell(row, self.size),
            b2b: cell(row, self.b2b),
            promotion_ids: cell(row, self.promotion_ids),
        }
    }
}

/// A cell value, with empty cells surfaced as nulls.
fn cell(row: &csv::StringRecord, index: usize) -> Option<String> {
    match row.get(index) {
        Some("") | None => None,
        Some(value) => Some(value.to_string()),
    }
}
