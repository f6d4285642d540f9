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
        actors::{ActorList, CreateActorRequest, UpdateActorRequest},
        genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
        performances::{CreatePerformanceRequest, PerformanceList, UpdatePerformanceRequest},
        plays::{CreatePlayRequest, PlayList, UpdatePlayRequest, UploadImageRequest},
        reservations::{CreateReservationRequest, ReservationList, TicketRequest},
        theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    },
    models::{
        Actor, ActorDetail, Genre, GenreDetail, Performance, PerformanceDetail,
        PerformanceListItem, PlayDetail, PlayImage, PlayListItem, PlaySummary, Reservation,
        TakenSeat, TheatreHall, Ticket,
    },
    response::{ApiResponse, Meta},
    routes::{actors, genres, health, params, performances, plays, reservations, theatre_halls},
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
        actors::list_actors,
        actors::get_actor,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        plays::list_plays,
        plays::get_play,
        plays::create_play,
        plays::update_play,
        plays::delete_play,
        plays::upload_image,
        theatre_halls::list_theatre_halls,
        theatre_halls::get_theatre_hall,
        theatre_halls::create_theatre_hall,
        theatre_halls::update_theatre_hall,
        theatre_halls::delete_theatre_hall,
        performances::list_performances,
        performances::get_performance,
        performances::create_performance,
        performances::update_performance,
        performances::delete_performance,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::delete_reservation
    ),
    components(
        schemas(
            Actor,
            ActorDetail,
            Genre,
            GenreDetail,
            PlayListItem,
            PlayDetail,
            PlaySummary,
            PlayImage,
            TheatreHall,
            Performance,
            PerformanceListItem,
            PerformanceDetail,
            TakenSeat,
            Ticket,
            Reservation,
            ActorList,
            GenreList,
            PlayList,
            TheatreHallList,
            PerformanceList,
            ReservationList,
            CreateActorRequest,
            UpdateActorRequest,
            CreateGenreRequest,
            UpdateGenreRequest,
            CreatePlayRequest,
            UpdatePlayRequest,
            UploadImageRequest,
            CreateTheatreHallRequest,
            UpdateTheatreHallRequest,
            CreatePerformanceRequest,
            UpdatePerformanceRequest,
            TicketRequest,
            CreateReservationRequest,
            params::Pagination,
            params::PlayQuery,
            Meta,
            ApiResponse<PlayDetail>,
            ApiResponse<PerformanceDetail>,
            ApiResponse<Reservation>,
            ApiResponse<ReservationList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Actors", description = "Actor catalog"),
        (name = "Genres", description = "Genre catalog"),
        (name = "Plays", description = "Play catalog"),
        (name = "Theatre halls", description = "Theatre halls and their seating"),
        (name = "Performances", description = "Scheduled performances"),
        (name = "Reservations", description = "Seat reservations of the current user"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
