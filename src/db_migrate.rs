use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use slotsync_db::{create_pool, schema::initialize_database};

/// Creates the mentors, slots and bookings tables without starting the server.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    println!("Connecting to database...");
    let db_pool = create_pool(&database_url)
        .await
        .wrap_err("Failed to connect to the database")?;

    initialize_database(&db_pool).await?;
    println!("Schema ready: mentors, slots, bookings");

    db_pool.close().await;
    Ok(())
}
