use crate::models::DbMentor;
use eyre::Result;
use slotsync_core::models::mentor::Mentor;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn insert_mentor(conn: &mut PgConnection, mentor: &Mentor) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO mentors (id, name, email, skills, experience_years, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(mentor.id)
    .bind(&mentor.name)
    .bind(&mentor.email)
    .bind(&mentor.skills)
    .bind(mentor.experience_years)
    .bind(mentor.status.as_str())
    .bind(mentor.created_at)
    .bind(mentor.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_mentor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbMentor>> {
    let mentor = sqlx::query_as::<_, DbMentor>(
        r#"
        SELECT id, name, email, skills, experience_years, status, created_at, updated_at
        FROM mentors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(mentor)
}

pub async fn list_mentors(pool: &Pool<Postgres>, status: Option<&str>) -> Result<Vec<DbMentor>> {
    let mentors = sqlx::query_as::<_, DbMentor>(
        r#"
        SELECT id, name, email, skills, experience_years, status, created_at, updated_at
        FROM mentors
        WHERE ($1::VARCHAR IS NULL OR status = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(mentors)
}
