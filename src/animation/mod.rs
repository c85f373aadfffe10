/// Animation driver contract.
pub mod driver;
/// Scrub-only clip player.
pub mod player;
