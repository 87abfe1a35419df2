mod client;
mod models;

pub use client::{MyFlixClient, MyFlixClientBuilder};
