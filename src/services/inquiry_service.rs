use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::config::parse_utc_minute;
use crate::middleware::error_handling::{AppError, Result};
use crate::models::inquiry::{
    CreateInquiryRequest, Inquiry, InquiryFilter, InquiryFull, InquiryStatus, NewInquiry,
};
use crate::repositories::InquiryRepository;

#[derive(Clone)]
pub struct InquiryService {
    repo: Arc<dyn InquiryRepository>,
    preferred_time_min: Option<DateTime<Utc>>,
}

impl InquiryService {
    pub fn new(repo: Arc<dyn InquiryRepository>, preferred_time_min: Option<DateTime<Utc>>) -> Self {
        Self { repo, preferred_time_min }
    }

    pub async fn create_inquiry(&self, request: CreateInquiryRequest) -> Result<Inquiry> {
        let new_inquiry = self.prepare(request)?;
        let inquiry = self.repo.insert(&new_inquiry).await?;

        tracing::info!(
            inquiry_id = inquiry.id,
            car_id = inquiry.car_id,
            buyer_id = inquiry.buyer_id,
            seller_id = inquiry.seller_id,
            "Inquiry created"
        );
        Ok(inquiry)
    }

    pub async fn list_inquiries(&self, filter: InquiryFilter) -> Result<Vec<InquiryFull>> {
        self.repo.list(&filter).await
    }

    /// Updating an id that does not exist is a no-op, not an error.
    pub async fn update_status(&self, inquiry_id: i64, status: InquiryStatus) -> Result<()> {
        let updated = self.repo.update_status(inquiry_id, status).await?;

        if updated == 0 {
            tracing::info!(inquiry_id, %status, "Status update matched no inquiry");
        } else {
            tracing::info!(inquiry_id, %status, "Inquiry status updated");
        }
        Ok(())
    }

    /// Validates the request and turns it into an insert payload.
    fn prepare(&self, request: CreateInquiryRequest) -> Result<NewInquiry> {
        request.validate()?;

        let preferred_time = match request.preferred_time.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(self.parse_preferred_time(raw)?),
        };

        let (Some(car_id), Some(buyer_id), Some(seller_id), Some(message)) =
            (request.car_id, request.buyer_id, request.seller_id, request.message)
        else {
            return Err(AppError::BadRequest("car_id, buyer_id, seller_id and message are required".to_string()));
        };

        Ok(NewInquiry {
            car_id,
            buyer_id,
            seller_id,
            message,
            preferred_time,
            contact_phone: request.contact_phone.unwrap_or_default(),
        })
    }

    fn parse_preferred_time(&self, raw: &str) -> Result<DateTime<Utc>> {
        let parsed = parse_utc_minute(raw).map_err(|_| {
            AppError::BadRequest("Invalid preferred_time format, expected YYYY-MM-DDTHH:MM".to_string())
        })?;

        if let Some(min) = self.preferred_time_min {
            if parsed < min {
                return Err(AppError::BadRequest(format!(
                    "preferred_time cannot be earlier than {}",
                    min.format("%Y-%m-%d %H:%M UTC")
                )));
            }
        }

        Ok(parsed)
    }
}
