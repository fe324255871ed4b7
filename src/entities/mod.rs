pub mod cinema_type;
pub mod director;
pub mod featurette;
pub mod movie;
pub mod showtime;
