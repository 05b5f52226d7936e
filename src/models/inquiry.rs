use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Wire format of `preferred_time` as produced by `<input type="datetime-local">`.
pub const PREFERRED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("message must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Accepted,
    Declined,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Accepted => "accepted",
            InquiryStatus::Declined => "declined",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Inquiry {
    pub id: i64,
    pub car_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub message: String,
    pub preferred_time: Option<DateTime<Utc>>,
    pub contact_phone: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inquiry enriched with car and user display data. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InquiryFull {
    pub id: i64,
    pub car_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub message: String,
    pub preferred_time: Option<DateTime<Utc>>,
    pub contact_phone: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub car_name: String,
    pub car_vin: String,
    pub buyer_name: String,
    pub seller_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateInquiryRequest {
    #[validate(
        required(message = "car_id is required"),
        range(min = 1, message = "car_id must be a positive integer")
    )]
    pub car_id: Option<i64>,
    #[validate(
        required(message = "buyer_id is required"),
        range(min = 1, message = "buyer_id must be a positive integer")
    )]
    pub buyer_id: Option<i64>,
    #[validate(
        required(message = "seller_id is required"),
        range(min = 1, message = "seller_id must be a positive integer")
    )]
    pub seller_id: Option<i64>,
    #[validate(
        required(message = "message is required"),
        custom(function = validate_not_blank)
    )]
    pub message: Option<String>,
    #[validate(length(max = 32, message = "contact_phone must be at most 32 characters"))]
    pub contact_phone: Option<String>,
    /// `YYYY-MM-DDTHH:MM`, interpreted as UTC. Empty means absent.
    pub preferred_time: Option<String>,
}

/// Validated insert payload; ids and message are guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInquiry {
    pub car_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub message: String,
    pub preferred_time: Option<DateTime<Utc>>,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InquiryStatus,
}

/// Raw list filters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInquiriesQuery {
    pub buyer_id: Option<String>,
    pub seller_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InquiryFilter {
    pub buyer_id: Option<i64>,
    pub seller_id: Option<i64>,
}

impl InquiryFilter {
    pub fn matches(&self, inquiry: &Inquiry) -> bool {
        self.buyer_id.map_or(true, |id| inquiry.buyer_id == id)
            && self.seller_id.map_or(true, |id| inquiry.seller_id == id)
    }
}

impl TryFrom<ListInquiriesQuery> for InquiryFilter {
    type Error = String;

    fn try_from(query: ListInquiriesQuery) -> Result<Self, Self::Error> {
        fn parse_id(name: &str, raw: Option<String>) -> Result<Option<i64>, String> {
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => value
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| format!("{} must be an integer", name)),
            }
        }

        Ok(Self {
            buyer_id: parse_id("buyer_id", query.buyer_id)?,
            seller_id: parse_id("seller_id", query.seller_id)?,
        })
    }
}
