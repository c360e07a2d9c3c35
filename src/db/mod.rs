pub mod manager;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::AppError;
use crate::prepare::{AreaRow, EmployerRow, VacancyRow};

pub async fn create_pool(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Database names are interpolated into DDL, so only plain identifiers
/// are accepted.
fn validate_db_name(db_name: &str) -> Result<(), AppError> {
    let ok = !db_name.is_empty()
        && db_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ok {
        return Err(AppError::BadRequest(format!(
            "Invalid database name '{db_name}'"
        )));
    }
    Ok(())
}

/// Drop and recreate the target database. Runs against the maintenance
/// database, so `admin_pool` must not be connected to `db_name` itself.
pub async fn recreate_database(admin_pool: &PgPool, db_name: &str) -> Result<(), AppError> {
    validate_db_name(db_name)?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS {db_name} WITH (FORCE)"))
        .execute(admin_pool)
        .await?;
    sqlx::query(&format!("CREATE DATABASE {db_name}"))
        .execute(admin_pool)
        .await?;

    Ok(())
}

/// Create the three-table schema. Vacancies reference both employers and
/// areas, employers reference areas, so creation order matters.
pub async fn create_schema(pool: &PgPool) -> Result<(), AppError> {
    let ddl = [
        "CREATE TABLE areas (
            area_id INTEGER PRIMARY KEY,
            area_name VARCHAR(200)
        )",
        "CREATE TABLE employers (
            employer_id INTEGER PRIMARY KEY,
            employer_name VARCHAR(200) NOT NULL,
            description TEXT,
            site_url VARCHAR(200),
            hh_url VARCHAR(200),
            area_id INTEGER REFERENCES areas(area_id)
        )",
        "CREATE TABLE vacancies (
            vacancy_id INTEGER PRIMARY KEY,
            vacancy_name VARCHAR(200),
            salary INTEGER,
            vacancy_url VARCHAR(200),
            area_id INTEGER REFERENCES areas(area_id),
            employer_id INTEGER REFERENCES employers(employer_id)
        )",
    ];

    for statement in ddl {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

/// Insert normalized rows in FK dependency order: areas, then employers,
/// then vacancies. Not transactional across tables; a mid-load failure
/// leaves whatever was already inserted.
pub async fn insert_rows(
    pool: &PgPool,
    areas: &[AreaRow],
    employers: &[EmployerRow],
    vacancies: &[VacancyRow],
) -> Result<(), AppError> {
    for area in areas {
        sqlx::query("INSERT INTO areas (area_id, area_name) VALUES ($1, $2)")
            .bind(area.area_id)
            .bind(&area.area_name)
            .execute(pool)
            .await?;
    }

    for employer in employers {
        sqlx::query(
            "INSERT INTO employers (employer_id, employer_name, description, site_url, hh_url, area_id) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(employer.employer_id)
        .bind(&employer.employer_name)
        .bind(&employer.description)
        .bind(&employer.site_url)
        .bind(&employer.hh_url)
        .bind(employer.area_id)
        .execute(pool)
        .await?;
    }

    for vacancy in vacancies {
        sqlx::query(
            "INSERT INTO vacancies (vacancy_id, vacancy_name, salary, vacancy_url, area_id, employer_id) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(vacancy.vacancy_id)
        .bind(&vacancy.vacancy_name)
        .bind(vacancy.salary)
        .bind(&vacancy.vacancy_url)
        .bind(vacancy.area_id)
        .bind(vacancy.employer_id)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Whether the target database already holds employer data. Any failure
/// (missing database, missing table, connection refused) reads as "no
/// data yet" and drives first-run behavior.
pub async fn has_data(database_url: &str) -> bool {
    let Ok(pool) = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
    else {
        return false;
    };

    let result: Result<(bool,), _> =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM employers)")
            .fetch_one(&pool)
            .await;

    pool.close().await;
    matches!(result, Ok((true,)))
}
