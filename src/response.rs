//! Success response helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn deleted() -> (StatusCode, Json<Confirmation>) {
    (
        StatusCode::OK,
        Json(Confirmation {
            message: "Apartment deleted successfully",
        }),
    )
}
