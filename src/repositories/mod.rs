pub mod inquiry_repo;
pub mod schema;

pub use inquiry_repo::*;
pub use schema::*;

use async_trait::async_trait;

use crate::middleware::error_handling::Result;
use crate::models::inquiry::{Inquiry, InquiryFilter, InquiryFull, InquiryStatus, NewInquiry};

/// Storage seam for inquiries. `PgInquiryRepository` is the production
/// implementation; tests plug in an in-memory one.
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Inserts a row with status `new` and store-assigned id/timestamps.
    async fn insert(&self, inquiry: &NewInquiry) -> Result<Inquiry>;

    /// Matching inquiries joined with car/user display data, newest first.
    async fn list(&self, filter: &InquiryFilter) -> Result<Vec<InquiryFull>>;

    /// Returns the number of rows updated (0 when the id does not exist).
    async fn update_status(&self, id: i64, status: InquiryStatus) -> Result<u64>;

    async fn ping(&self) -> Result<()>;
}
