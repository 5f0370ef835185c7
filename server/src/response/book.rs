use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use application::transfer::BookDto;
use kernel::prelude::entity::BookId;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct CreatedBookResponse {
    isbn: String,
}

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    isbn: String,
    title: String,
    price: i64,
    quantity_available: i32,
    status: String,
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<BookId> for BookPresenter {
    type To = CreatedBookResponse;
    fn emit(&self, input: BookId) -> Self::To {
        CreatedBookResponse { isbn: input.into() }
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Response;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        match input {
            Some(book) => BookResponse {
                isbn: book.isbn,
                title: book.title,
                price: book.price_amount,
                quantity_available: book.quantity_available,
                status: book.status,
            }
            .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl Exhaust<Option<()>> for BookPresenter {
    type To = StatusCode;
    fn emit(&self, input: Option<()>) -> Self::To {
        match input {
            Some(()) => StatusCode::NO_CONTENT,
            None => StatusCode::NOT_FOUND,
        }
    }
}
