//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Word2Vec Server",
        version = "0.1.0",
        description = "Autocomplete and similarity queries over a pre-trained word2vec model"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
struct ServerDoc;

/// Combined OpenAPI documentation. The word2vec routes live at the root, so
/// the domain document is merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServerDoc::openapi().merge_from(domain_word2vec::ApiDoc::openapi())
    }
}
