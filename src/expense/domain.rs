//! The closed sets of values a bill can take: bill type, sub-head and status.
//!
//! Each set is stored in SQLite as its text form and parsed back with [FromStr],
//! so an unexpected value in the database surfaces as a conversion error
//! rather than silently turning into a default.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Implements [Display] and the SQLite conversions for an enum with an `as_str` method and a
/// [FromStr] implementation.
macro_rules! text_column {
    ($name:ident) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

/// Whether a bill records money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    /// Money spent.
    Expense,
    /// Money received.
    Income,
}

impl BillType {
    /// Every bill type.
    pub const ALL: [BillType; 2] = [BillType::Expense, BillType::Income];

    /// The name used for the bill type in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::Expense => "expense",
            BillType::Income => "income",
        }
    }
}

impl FromStr for BillType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bill_type| bill_type.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidBillType(s.to_owned()))
    }
}

text_column!(BillType);

/// The budget category code a bill is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubHead {
    /// The BCA programme budget.
    #[serde(rename = "BCA")]
    Bca,
    /// The BBA programme budget.
    #[serde(rename = "BBA")]
    Bba,
    /// The OMSP budget.
    #[serde(rename = "OMSP")]
    Omsp,
    /// Examination expenses.
    #[serde(rename = "Exam")]
    Exam,
    /// The SW budget.
    #[serde(rename = "SW")]
    Sw,
    /// General expenses.
    #[serde(rename = "GEN")]
    Gen,
    /// National Service Scheme.
    #[serde(rename = "NSS")]
    Nss,
    /// National Cadet Corps.
    #[serde(rename = "NCC")]
    Ncc,
}

impl SubHead {
    /// Every sub-head, in the order the dashboard lists them.
    pub const ALL: [SubHead; 8] = [
        SubHead::Bca,
        SubHead::Bba,
        SubHead::Omsp,
        SubHead::Exam,
        SubHead::Sw,
        SubHead::Gen,
        SubHead::Nss,
        SubHead::Ncc,
    ];

    /// The code used for the sub-head in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubHead::Bca => "BCA",
            SubHead::Bba => "BBA",
            SubHead::Omsp => "OMSP",
            SubHead::Exam => "Exam",
            SubHead::Sw => "SW",
            SubHead::Gen => "GEN",
            SubHead::Nss => "NSS",
            SubHead::Ncc => "NCC",
        }
    }
}

impl FromStr for SubHead {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub_head| sub_head.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidSubHead(s.to_owned()))
    }
}

text_column!(SubHead);

/// Where a bill is in the approval workflow.
///
/// Any status may follow any other status. The variants are declared in the
/// usual order of approval so that sorting by status follows the workflow.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Submitted and waiting to be checked. Every bill starts here.
    #[default]
    Pending,
    /// Checked against the receipts.
    Verified,
    /// Approved for payment.
    Approved,
    /// Paid out or received.
    Completed,
    /// Refused at some step of the workflow.
    Rejected,
}

impl Status {
    /// Every status, in workflow order.
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::Verified,
        Status::Approved,
        Status::Completed,
        Status::Rejected,
    ];

    /// The name used for the status in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Verified => "verified",
            Status::Approved => "approved",
            Status::Completed => "completed",
            Status::Rejected => "rejected",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidStatus(s.to_owned()))
    }
}

text_column!(Status);

/// Parse an optional filter value, treating a missing or blank string as "no filter".
///
/// # Errors
/// Returns the parse error of `T` if `value` is neither blank nor valid.
pub(crate) fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, Error>
where
    T: FromStr<Err = Error>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{BillType, Status, SubHead, parse_optional};

    #[test]
    fn parses_every_status() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
    }

    #[test]
    fn parses_every_sub_head() {
        for sub_head in SubHead::ALL {
            assert_eq!(sub_head.as_str().parse::<SubHead>(), Ok(sub_head));
        }
    }

    #[test]
    fn rejects_unknown_status() {
        assert_eq!(
            "paid".parse::<Status>(),
            Err(Error::InvalidStatus("paid".to_owned()))
        );
    }

    #[test]
    fn sub_head_codes_are_case_sensitive() {
        assert_eq!(
            "bca".parse::<SubHead>(),
            Err(Error::InvalidSubHead("bca".to_owned()))
        );
    }

    #[test]
    fn serde_names_match_database_names() {
        assert_eq!(serde_json::to_string(&SubHead::Exam).unwrap(), "\"Exam\"");
        assert_eq!(serde_json::to_string(&SubHead::Omsp).unwrap(), "\"OMSP\"");
        assert_eq!(serde_json::to_string(&Status::Rejected).unwrap(), "\"rejected\"");
        assert_eq!(serde_json::to_string(&BillType::Income).unwrap(), "\"income\"");
    }

    #[test]
    fn blank_filter_is_wildcard() {
        assert_eq!(parse_optional::<Status>(None), Ok(None));
        assert_eq!(parse_optional::<Status>(Some("")), Ok(None));
        assert_eq!(parse_optional::<Status>(Some("  ")), Ok(None));
        assert_eq!(
            parse_optional::<Status>(Some("approved")),
            Ok(Some(Status::Approved))
        );
        assert!(parse_optional::<BillType>(Some("refund")).is_err());
    }

    #[test]
    fn unknown_value_in_database_is_a_conversion_error() {
        let conn = Connection::open_in_memory().unwrap();

        let result = conn.query_row("SELECT 'paid'", [], |row| row.get::<_, Status>(0));

        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(..))
        ));
    }
}
