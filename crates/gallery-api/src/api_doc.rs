//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use gallery_core::{models, Breadcrumb, PageContext};

/// Registers the bearer-token scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gallery API",
        version = "0.1.0",
        description = "Media gallery (v0): browse folders, photos and videos, download files, apply image effects, upload media and comment. All endpoints are versioned under /api/v0/."
    ),
    paths(
        // Browsing
        handlers::gallery::front_page,
        handlers::items::get_item,
        handlers::items::download_file,
        handlers::items::render_effect,
        // Administration
        handlers::folders::create_folder,
        handlers::photos::update_photo,
        handlers::photos::delete_photo,
        handlers::uploads::upload,
        // Comments
        handlers::comments::add_comment,
        handlers::comments::delete_comment,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::MediaKind,
            models::ItemHeader,
            models::MediaItem,
            models::MediaFolder,
            models::MediaFile,
            models::GeoLocation,
            models::ItemDetail,
            models::Comment,
            models::CreateCommentRequest,
            models::CreateFolderRequest,
            models::UpdatePhotoRequest,
            models::DeleteItemResponse,
            PageContext,
            Breadcrumb,
            handlers::gallery::GalleryResponse,
            handlers::uploads::UploadResponse,
            handlers::comments::DeleteCommentResponse,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "gallery", description = "Front page listings"),
        (name = "items", description = "Item details, file downloads and image effects"),
        (name = "folders", description = "Folder management"),
        (name = "photos", description = "Photo and video editing and deletion"),
        (name = "uploads", description = "Multipart media uploads"),
        (name = "comments", description = "Item comments"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
