//! Service exception calendar entries (GTFS `calendar_dates.txt`).

use chrono::NaiveDate;

/// Error returned when a calendar row cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidServiceException {
    #[error("invalid date {0:?}: expected YYYYMMDD")]
    Date(String),

    #[error("unknown exception type {0}")]
    Type(u8),
}

/// GTFS `exception_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExceptionType {
    /// Service added for the date, typically a replacement schedule.
    Replacement = 1,
    /// Service removed for the date.
    NoService = 2,
}

impl TryFrom<u8> for ExceptionType {
    type Error = InvalidServiceException;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ExceptionType::Replacement),
            2 => Ok(ExceptionType::NoService),
            other => Err(InvalidServiceException::Type(other)),
        }
    }
}

/// A dated change to regular service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceException {
    pub date: NaiveDate,
    pub exception_type: ExceptionType,
}

impl ServiceException {
    /// Parse from the GTFS wire form: a `YYYYMMDD` date and numeric type.
    pub fn parse(date: &str, exception_type: u8) -> Result<Self, InvalidServiceException> {
        let trimmed = date.trim();
        if trimmed.len() != 8 {
            return Err(InvalidServiceException::Date(date.to_string()));
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y%m%d")
            .map_err(|_| InvalidServiceException::Date(date.to_string()))?;
        Ok(Self {
            date,
            exception_type: ExceptionType::try_from(exception_type)?,
        })
    }

    /// The date in `YYYYMMDD` form.
    pub fn date_string(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    pub fn is_no_service(&self) -> bool {
        self.exception_type == ExceptionType::NoService
    }
}
