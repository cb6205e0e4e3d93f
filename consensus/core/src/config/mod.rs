pub mod bps;
pub mod constants;
pub mod genesis;
pub mod params;
