use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub struct EmployerVacancyCount {
    pub employer_name: String,
    pub vacancy_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct VacancyListing {
    pub employer_name: String,
    pub vacancy_name: Option<String>,
    pub salary: Option<i32>,
    pub vacancy_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct VacancySummary {
    pub vacancy_name: Option<String>,
    pub salary: Option<i32>,
    pub vacancy_url: Option<String>,
}

/// Read-only façade over the loaded vacancy data.
pub struct DbManager {
    pool: PgPool,
}

impl DbManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Vacancy count per employer, busiest employers first.
    pub async fn companies_and_vacancy_counts(
        &self,
    ) -> Result<Vec<EmployerVacancyCount>, AppError> {
        let rows = sqlx::query_as::<_, EmployerVacancyCount>(
            "SELECT employers.employer_name, COUNT(*) AS vacancy_count
             FROM vacancies
             INNER JOIN employers USING (employer_id)
             GROUP BY employer_name
             ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every vacancy with its employer, best-paid first.
    pub async fn all_vacancies(&self) -> Result<Vec<VacancyListing>, AppError> {
        let rows = sqlx::query_as::<_, VacancyListing>(
            "SELECT employers.employer_name, vacancy_name, salary, vacancy_url
             FROM vacancies
             INNER JOIN employers USING (employer_id)
             ORDER BY salary DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Average salary across all vacancies; None when no salaries are loaded.
    pub async fn avg_salary(&self) -> Result<Option<f64>, AppError> {
        let row: (Option<f64>,) = sqlx::query_as("SELECT AVG(salary) FROM vacancies")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Vacancies paying above the global average, best-paid first.
    pub async fn vacancies_above_avg_salary(&self) -> Result<Vec<VacancySummary>, AppError> {
        let rows = sqlx::query_as::<_, VacancySummary>(
            "SELECT vacancy_name, salary, vacancy_url
             FROM vacancies
             WHERE salary > (SELECT AVG(salary) FROM vacancies)
             ORDER BY salary DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match on the vacancy name. A blank
    /// keyword is a validation error, signaled before touching the pool.
    pub async fn vacancies_with_keyword(
        &self,
        keyword: &str,
    ) -> Result<Vec<VacancySummary>, AppError> {
        let keyword = validate_keyword(keyword)?;

        let rows = sqlx::query_as::<_, VacancySummary>(
            "SELECT vacancy_name, salary, vacancy_url
             FROM vacancies
             WHERE vacancy_name ILIKE '%' || $1 || '%'
             ORDER BY salary DESC",
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn validate_keyword(keyword: &str) -> Result<&str, AppError> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "A search keyword must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
