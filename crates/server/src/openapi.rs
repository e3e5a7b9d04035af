use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct BookDoc {
    pub id: i32,
    pub title: String,
    pub author: String,
}

#[derive(ToSchema)]
pub struct BookInputDoc {
    /// Ignored; the id comes from the database or the path.
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::books::create,
        crate::routes::books::list,
        crate::routes::books::get,
        crate::routes::books::update,
        crate::routes::books::delete,
    ),
    components(schemas(HealthResponse, BookDoc, BookInputDoc)),
    tags((name = "health"), (name = "book"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_book_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/book"));
        assert!(doc.paths.paths.contains_key("/book/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
