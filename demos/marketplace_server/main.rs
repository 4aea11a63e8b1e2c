//! Marketplace server example
//!
//! Serves the embedded seed dataset (or the one named in the config file):
//!
//! ```text
//! cargo run --example marketplace_server -- [config.yaml]
//! ```
//!
//! Seed accounts all use the password `password`:
//! `user@example.com` (seafarer), `vendor@example.com` (approved vendor),
//! `vendor2@example.com` (pending vendor), `admin@test.com` (admin).

use anyhow::Result;
use coursedeck::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coursedeck=debug,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MarketConfig::from_yaml_file(&path)?,
        None => MarketConfig::default(),
    };

    println!("🚢 Coursedeck marketplace on http://{}", config.server.bind);
    println!("\n  Public:");
    println!("    GET  /courses?search=&filter=&sort=&page=&limit=");
    println!("    GET  /courses/{{id}}");
    println!("    POST /auth/login  /auth/register/seafarer  /auth/register/vendor");
    println!("\n  With `Authorization: Bearer <token>`:");
    println!("    POST /auth/logout");
    println!("    GET  /dashboard  /dashboard/{{page}}");
    println!("    POST /courses/{{id}}/enroll");
    println!("    POST /vendor/courses");
    println!("    POST /admin/vendors/{{id}}/review  /admin/courses/{{id}}/status");
    println!("\n  Example filter: /courses?filter={{\"location~\":\"mumbai\",\"fee<=\":9000}}&sort=fee:asc\n");

    ServerBuilder::new().with_config(config).serve().await
}
