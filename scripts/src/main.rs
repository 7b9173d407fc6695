//! Operator tools: database migrations and local webhook signing.

pub mod action;
pub mod config;
pub mod utils;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    action::AppArgs::parse().run().await
}
