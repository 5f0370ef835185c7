use serde::Deserialize;

use application::transfer::{
    ChangeStockDto, DeleteBookDto, GetBookDto, RegisterBookDto, UpdateBookDto,
};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct RegisterBookRequest {
    isbn: String,
    title: String,
    price: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    price: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStockRequest {
    amount: i32,
}

#[derive(Debug)]
pub struct GetBookRequest {
    isbn: String,
}

impl GetBookRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    isbn: String,
}

impl DeleteBookRequest {
    pub fn new(isbn: String) -> Self {
        Self { isbn }
    }
}

pub struct BookTransformer;

impl Intake<RegisterBookRequest> for BookTransformer {
    type To = RegisterBookDto;
    fn emit(&self, input: RegisterBookRequest) -> Self::To {
        RegisterBookDto {
            isbn: input.isbn,
            title: input.title,
            price: input.price,
        }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { isbn: input.isbn }
    }
}

impl Intake<(String, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (String, UpdateBookRequest)) -> Self::To {
        let (isbn, input) = input;
        UpdateBookDto {
            isbn,
            title: input.title,
            price: input.price,
        }
    }
}

impl Intake<(String, ChangeStockRequest)> for BookTransformer {
    type To = ChangeStockDto;
    fn emit(&self, input: (String, ChangeStockRequest)) -> Self::To {
        let (isbn, input) = input;
        ChangeStockDto {
            isbn,
            amount: input.amount,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { isbn: input.isbn }
    }
}
