pub mod evolve;
pub mod score;
