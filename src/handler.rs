// Entry dispatcher: routes a gateway event to the transfer service by method

use tracing::{info, warn};

use crate::files::FileService;
use crate::models::{GatewayRequest, GatewayResponse};

const STATUS_BAD_REQUEST: u16 = 400;

/// POST uploads, GET downloads, anything else is a 400 with no body.
pub async fn dispatch(
    service: &FileService,
    req: &GatewayRequest,
) -> Result<GatewayResponse, serde_json::Error> {
    info!(method = %req.http_method, "Dispatching request");

    match req.http_method.as_str() {
        "POST" => service.upload(req).await,
        "GET" => service.download(req).await,
        other => {
            warn!(method = %other, "Unsupported method");
            Ok(GatewayResponse::status(STATUS_BAD_REQUEST))
        }
    }
}
