use shared::models::{Channel, ChannelMessage, ErrorResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ForgeLink API",
        version = "1.0.0",
        description = "API documentation for the ForgeLink chat backend"
    ),
    paths(
        crate::handlers::channels::list_channels,
        crate::handlers::history::channel_history,
    ),
    components(
        schemas(
            Channel,
            ChannelMessage,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Chat", description = "Channel listing, history, and live chat endpoints")
    )
)]
pub struct ApiDoc;
