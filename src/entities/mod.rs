pub mod actor;
pub mod film;
pub mod film_actor;
pub mod user;
