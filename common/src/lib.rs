//! Warehouse Scan Common Library
//!
//! 倉庫の仕分けスキャナーの中核（シート解析・照合・読み取り確定・照会セッション）。
//! 入出力は持たず、タイマー判定の時刻も呼び出し側から渡す
//! （履歴の表示用タイムスタンプのみ実時刻）。

pub mod error;
pub mod excess;
pub mod history;
pub mod layout;
pub mod matcher;
pub mod parser;
pub mod session;
pub mod store;
pub mod timer;
pub mod timings;
pub mod validator;

pub use error::{Error, Result};
pub use excess::{
    lookup_excess, ExcessLookup, ExcessRecord, ExcessRecordBuilder, ShipmentType,
    SubmissionResponse,
};
pub use history::{ScanHistory, ScanHistoryEntry};
pub use layout::{column_letter, ZoneColumn, ZoneColumnMap};
pub use matcher::{match_code, MatchResult, ADDRESS_PLACEHOLDER};
pub use parser::{parse_csv, parse_csv_line};
pub use session::{Feedback, LookupEvent, LookupSession, Trigger};
pub use store::{Row, StoreSummary, TabularStore};
pub use timer::{TimerDomain, TimerSlot};
pub use timings::ScanTimings;
pub use validator::{Observation, ReadValidator, ValidatedCode};
