use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    middleware::error_handling::{AppError, Result},
    models::inquiry::{
        CreateInquiryRequest, Inquiry, InquiryFilter, InquiryFull, ListInquiriesQuery,
        UpdateStatusRequest,
    },
    AppState,
};

pub async fn create_inquiry(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateInquiryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Inquiry>)> {
    let Json(request) = payload?;

    let inquiry = state.inquiries.create_inquiry(request).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// `buyer_id` / `seller_id` filters are optional and combinable.
pub async fn list_inquiries(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListInquiriesQuery>, QueryRejection>,
) -> Result<Json<Vec<InquiryFull>>> {
    let Query(params) = query?;
    let filter = InquiryFilter::try_from(params).map_err(AppError::BadRequest)?;

    let inquiries = state.inquiries.list_inquiries(filter).await?;
    Ok(Json(inquiries))
}

pub async fn update_inquiry_status(
    State(state): State<AppState>,
    inquiry_id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Path(inquiry_id) = inquiry_id?;
    let Json(request) = payload?;

    state.inquiries.update_status(inquiry_id, request.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
