use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Name of the partial index that allows one confirmed booking per slot.
pub const ONE_CONFIRMED_BOOKING_PER_SLOT: &str = "idx_bookings_one_confirmed_per_slot";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create mentors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mentors (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            skills TEXT[] NOT NULL DEFAULT '{}',
            experience_years INTEGER NOT NULL DEFAULT 0,
            status VARCHAR(16) NOT NULL DEFAULT 'active',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_experience CHECK (experience_years >= 0),
            CONSTRAINT valid_mentor_status CHECK (status IN ('active', 'inactive'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY,
            mentor_id UUID NOT NULL REFERENCES mentors(id),
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            is_booked BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table. slot_id carries no foreign key: a withdrawn
    // slot keeps its booking history.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY,
            student_id VARCHAR(255) NOT NULL,
            mentor_id UUID NOT NULL REFERENCES mentors(id),
            slot_id UUID NOT NULL,
            session_date DATE NOT NULL,
            session_start TIMESTAMP WITH TIME ZONE NOT NULL,
            session_end TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            cancelled_at TIMESTAMP WITH TIME ZONE NULL,
            CONSTRAINT valid_booking_status CHECK (status IN ('confirmed', 'cancelled')),
            CONSTRAINT cancelled_at_matches_status
                CHECK ((status = 'cancelled') = (cancelled_at IS NOT NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_slots_mentor_id ON slots(mentor_id)",
        "CREATE INDEX IF NOT EXISTS idx_slots_start_time ON slots(start_time)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_student_id ON bookings(student_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_mentor_id ON bookings(mentor_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_slot_id ON bookings(slot_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_one_confirmed_per_slot \
         ON bookings(slot_id) WHERE status = 'confirmed'",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
