//! All API endpoint setup

use axum::Router;
use axum::routing::get;

use crate::storage::NoteStore;

pub use current_user::CurrentUser;
pub use request::Form;
pub use request::PathParameters;
pub use request::QueryParameters;
pub use request::parse_name;
pub use response::Error;
pub use response::Success;

mod current_user;
mod notes;
mod request;
mod response;

#[cfg(test)]
pub use current_user::USER_ID_HEADER;

/// Get the Axum router for all API routes
pub fn router<S: NoteStore>() -> Router {
    let notes = Router::new()
        .route("/", get(notes::list::<S>).post(notes::create::<S>))
        .route(
            "/{note}",
            get(notes::single::<S>)
                .patch(notes::update::<S>)
                .delete(notes::delete::<S>),
        );

    Router::new().nest("/notes", notes)
}

/// Fallback for everything not matching a route
pub async fn fallback() -> Error {
    Error::not_found("Not found")
}
