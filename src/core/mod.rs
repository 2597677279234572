pub mod config;
pub mod constants;
pub mod crs;
pub mod geo;
pub mod quantize;
pub mod view_params;
pub mod viewpoint;
