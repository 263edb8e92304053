pub mod seaorm;

pub use seaorm::SeaOrmIntakeRepository;
