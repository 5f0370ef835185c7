use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use application::service::{
    AdjustStockService, DeleteBookService, GetBookService, RegisterBookService, UpdateBookService,
};
use kernel::interface::database::DatabaseConnection;
use kernel::interface::repository::BookRepository;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookTransformer, ChangeStockRequest, DeleteBookRequest, GetBookRequest, RegisterBookRequest,
    UpdateBookRequest,
};
use crate::response::BookPresenter;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<Database, Repository> BookRouter for Router<AppModule<Database, Repository>>
where
    Database: DatabaseConnection,
    Repository: BookRepository<Database::Connection> + BookRepository<Database::Transaction>,
{
    fn route_book(self) -> Self {
        self.route(
            "/books",
            post(
                |State(module): State<AppModule<Database, Repository>>,
                 req: Result<Json<RegisterBookRequest>, JsonRejection>| async move {
                    let Json(req) = req.map_err(ErrorStatus::from)?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.register_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:isbn",
            get(
                |State(module): State<AppModule<Database, Repository>>,
                 Path(isbn): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(isbn))
                        .handle(|dto| async move { module.get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule<Database, Repository>>,
                 Path(isbn): Path<String>,
                 req: Result<Json<UpdateBookRequest>, JsonRejection>| async move {
                    let Json(req) = req.map_err(ErrorStatus::from)?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((isbn, req))
                        .handle(|dto| async move { module.update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule<Database, Repository>>,
                 Path(isbn): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(isbn))
                        .handle(|dto| async move { module.delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:isbn/stock/increase",
            post(
                |State(module): State<AppModule<Database, Repository>>,
                 Path(isbn): Path<String>,
                 req: Result<Json<ChangeStockRequest>, JsonRejection>| async move {
                    let Json(req) = req.map_err(ErrorStatus::from)?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((isbn, req))
                        .handle(|dto| async move { module.increase_stock(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:isbn/stock/decrease",
            post(
                |State(module): State<AppModule<Database, Repository>>,
                 Path(isbn): Path<String>,
                 req: Result<Json<ChangeStockRequest>, JsonRejection>| async move {
                    let Json(req) = req.map_err(ErrorStatus::from)?;
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((isbn, req))
                        .handle(|dto| async move { module.decrease_stock(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
