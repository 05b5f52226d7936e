use async_trait::async_trait;
use sqlx::{Connection, PgPool, Postgres, QueryBuilder};

use super::InquiryRepository;
use crate::middleware::error_handling::Result;
use crate::models::inquiry::{Inquiry, InquiryFilter, InquiryFull, InquiryStatus, NewInquiry};

const INQUIRY_COLUMNS: &str = "id, car_id, buyer_id, seller_id, message, preferred_time, \
     COALESCE(contact_phone, '') AS contact_phone, status, created_at, updated_at";

const LIST_INQUIRIES_SQL: &str = r#"
    SELECT
        i.id, i.car_id, i.buyer_id, i.seller_id, i.message, i.preferred_time,
        COALESCE(i.contact_phone, '') AS contact_phone, i.status, i.created_at, i.updated_at,
        TRIM(COALESCE(cars.brand, '') || ' ' || COALESCE(cars.model, '')) AS car_name,
        COALESCE(cars.vin, '') AS car_vin,
        concat_ws(' ', buyers.last_name, buyers.first_name, buyers.middle_name) AS buyer_name,
        concat_ws(' ', sellers.last_name, sellers.first_name, sellers.middle_name) AS seller_name
    FROM inquiries AS i
    LEFT JOIN cars ON cars.id = i.car_id
    LEFT JOIN users AS buyers ON buyers.id = i.buyer_id
    LEFT JOIN users AS sellers ON sellers.id = i.seller_id
    WHERE TRUE
"#;

#[derive(Clone)]
pub struct PgInquiryRepository {
    pool: PgPool,
}

impl PgInquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Timestamps are set here rather than left to column defaults, which a
    // table created by another tool may not have.
    fn insert_sql() -> String {
        format!(
            r#"
            INSERT INTO inquiries
                (car_id, buyer_id, seller_id, message, preferred_time, contact_phone, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING {}
            "#,
            INQUIRY_COLUMNS
        )
    }

    fn list_query(filter: &InquiryFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(LIST_INQUIRIES_SQL);

        if let Some(buyer_id) = filter.buyer_id {
            builder.push(" AND i.buyer_id = ").push_bind(buyer_id);
        }
        if let Some(seller_id) = filter.seller_id {
            builder.push(" AND i.seller_id = ").push_bind(seller_id);
        }

        builder.push(" ORDER BY i.created_at DESC, i.id DESC");
        builder
    }
}

#[async_trait]
impl InquiryRepository for PgInquiryRepository {
    async fn insert(&self, inquiry: &NewInquiry) -> Result<Inquiry> {
        let created = sqlx::query_as::<_, Inquiry>(&Self::insert_sql())
            .bind(inquiry.car_id)
            .bind(inquiry.buyer_id)
            .bind(inquiry.seller_id)
            .bind(&inquiry.message)
            .bind(inquiry.preferred_time)
            .bind(&inquiry.contact_phone)
            .bind(InquiryStatus::New.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list(&self, filter: &InquiryFilter) -> Result<Vec<InquiryFull>> {
        let inquiries = Self::list_query(filter)
            .build_query_as::<InquiryFull>()
            .fetch_all(&self.pool)
            .await?;

        Ok(inquiries)
    }

    async fn update_status(&self, id: i64, status: InquiryStatus) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE inquiries SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }
}
