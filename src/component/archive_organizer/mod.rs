//! 紅外線相機資料庫整理元件
//!
//! 把散亂的相機原始資料整理成去重、分類、命名一致的新資料庫

pub mod audit;
pub mod capture_time;
pub mod classifier;
pub mod correspondence;
pub mod deduplicator;
mod main;
pub mod naming;
pub mod patcher;
pub mod placement;
pub mod record;
pub mod sequencer;

pub use capture_time::{FileKind, extract_capture_time};
pub use classifier::{TimelapseRule, classify};
pub use correspondence::{CorrespondenceError, CorrespondenceTable, normalize_station_name, resolve_station};
pub use deduplicator::{DeduplicationOutcome, deduplicate};
pub use main::ArchiveOrganizer;
pub use naming::{plan_names, plan_records};
pub use patcher::{PatchError, PatchFilter, TimestampPatch, patch_area};
pub use placement::{PlacementOutcome, place_file, prepare_cleaned_structure};
pub use record::MediaRecord;
pub use sequencer::assign_sequences;
