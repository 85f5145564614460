//! Inspection Common Library
//!
//! 缺陷写真のファイル名規則・分類・集計（I/Oなし）

pub mod batch;
pub mod category;
pub mod error;
pub mod filename;
pub mod severity;
pub mod statistics;
pub mod taxonomy;
pub mod types;

pub use batch::{classify_batch, ClassifiedBatch, NamingViolation, ViolationPolicy};
pub use category::DefectCategory;
pub use error::{Error, Result};
pub use filename::{parse_file_name, ParsedName, CLOSE_UP_MARKER};
pub use severity::Severity;
pub use statistics::{StatColumn, StatRow, StatisticsAggregator, TOTAL_LABEL};
pub use taxonomy::{classify, lookup, Classification, MatchKind};
pub use types::{CloseUpRecord, DefectIdentity, DefectRecord};
