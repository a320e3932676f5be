use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        account::{AccountOverview, UpdateProfileRequest},
        admin::{Dashboard, SetAdminRequest, SetBanRequest, UserList},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        library::{AddLibraryRequest, LibraryItem, LibraryList, LibraryRemoval},
        mixes::{
            ArchiveStats, ArtistList, CreateMixRequest, MixDetail, MixList, MixMilestone,
            RecommendRequest, RelatedMixes, UpdateMixMediaRequest, UpdateMixRequest,
        },
        reviews::{
            AdminReview, AdminReviewList, CreateReviewRequest, ReviewCreated, ReviewList,
            ReviewMixSummary,
        },
        tracks::{ReplaceTracksRequest, ReplaceTracksResponse, TrackInput, TrackList},
    },
    error::FieldIssue,
    models::{LibraryEntry, Mix, RecommendedMix, Review, Track, User},
    query::ArtistCount,
    response::{ApiResponse, Meta},
    routes::{account, admin, auth, health, library, mixes, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh,
        auth::me,
        mixes::list_mixes,
        mixes::latest_mixes,
        mixes::recommended_mixes,
        mixes::list_artists,
        mixes::archive_stats,
        mixes::get_mix,
        mixes::update_mix_media,
        mixes::related_mixes,
        mixes::list_reviews,
        mixes::create_review,
        library::list_library,
        library::add_to_library,
        library::remove_from_library,
        account::get_account,
        account::update_profile,
        admin::dashboard,
        admin::list_mixes,
        admin::create_mix,
        admin::update_mix,
        admin::delete_mix,
        admin::list_tracks,
        admin::replace_tracks,
        admin::set_recommendation,
        admin::clear_recommendation,
        admin::list_reviews,
        admin::delete_review,
        admin::list_users,
        admin::set_admin,
        admin::set_ban
    ),
    components(
        schemas(
            User,
            Mix,
            Track,
            Review,
            LibraryEntry,
            RecommendedMix,
            ArtistCount,
            FieldIssue,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MixList,
            MixDetail,
            MixMilestone,
            RelatedMixes,
            ArtistList,
            ArchiveStats,
            CreateMixRequest,
            UpdateMixRequest,
            UpdateMixMediaRequest,
            RecommendRequest,
            TrackInput,
            TrackList,
            ReplaceTracksRequest,
            ReplaceTracksResponse,
            CreateReviewRequest,
            ReviewCreated,
            ReviewList,
            ReviewMixSummary,
            AdminReview,
            AdminReviewList,
            AddLibraryRequest,
            LibraryItem,
            LibraryList,
            LibraryRemoval,
            UpdateProfileRequest,
            AccountOverview,
            SetAdminRequest,
            SetBanRequest,
            UserList,
            Dashboard,
            params::Pagination,
            params::MixSort,
            params::MixListQuery,
            params::ArtistQuery,
            params::AdminMixQuery,
            health::HealthData,
            Meta,
            ApiResponse<Mix>,
            ApiResponse<MixList>,
            ApiResponse<MixDetail>,
            ApiResponse<User>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Mixes", description = "Mix archive endpoints"),
        (name = "Reviews", description = "Mix review endpoints"),
        (name = "Library", description = "Personal library endpoints"),
        (name = "Account", description = "Account endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
