//! Fixed vocabulary of the attendance export.
//!
//! The export is produced by the webinar platform in Traditional Chinese, so
//! the column names below must match it verbatim.

/// Substring in the first cell of the row that opens the attendee-detail block.
pub const SECTION_MARKER: &str = "觀眾詳細資訊";

/// Substring expected in the first cell of the attendee-detail header row.
pub const HEADER_ATTENDED_MARKER: &str = "已出席";

/// Substring expected in the second cell of the attendee-detail header row.
pub const HEADER_USERNAME_MARKER: &str = "使用者名稱（原始名稱）";

pub const FIRST_NAME: &str = "名字";
pub const LAST_NAME: &str = "姓氏";
pub const EMAIL: &str = "電子郵件地址";
pub const DURATION_MINUTES: &str = "出席時間（分鐘）";
pub const SPECIALTY: &str = "Specialty";
pub const COUNTRY: &str = "國家/地區名稱";

/// Column holding the reference number in the summary spreadsheet.
pub const REFERENCE: &str = "ref";

/// Column order of the summary spreadsheet.
pub const SUMMARY_COLUMNS: [&str; 7] = [
    FIRST_NAME,
    LAST_NAME,
    EMAIL,
    DURATION_MINUTES,
    SPECIALTY,
    COUNTRY,
    REFERENCE,
];
