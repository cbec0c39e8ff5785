use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::predict::{Location, PredictResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::predict::list_predictions,
        super::api::track::current,
    ),
    components(
        schemas(
            PredictResponse,
            Location,
            ErrorResponse,
            crate::predict::PassReport,
            crate::predict::PointReport,
            crate::predict::VisibleReport,
            crate::tracker::TrackPosition,
        )
    ),
    info(
        title = "Passview API",
        description = "Visible satellite pass predictions and live position",
        version = "0.1.0"
    ),
    tags(
        (name = "predict", description = "Visible pass prediction"),
        (name = "track", description = "Current satellite position")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_both_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/predict"));
        assert!(doc.paths.paths.contains_key("/api/track"));
    }
}
