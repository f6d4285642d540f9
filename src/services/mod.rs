pub mod actor_service;
pub mod genre_service;
pub mod performance_service;
pub mod play_service;
pub mod reservation_service;
pub mod theatre_hall_service;
