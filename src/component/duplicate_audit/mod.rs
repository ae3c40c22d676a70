//! 重複檔案稽核元件
//!
//! 只掃描與回報，不搬移也不刪除；用 BLAKE3 內容雜湊分組

mod main;

pub use main::{DuplicateAudit, find_duplicate_groups};
