use async_trait::async_trait;
use serde_json::Value;

use crate::collectors::{CollectedData, VacancyCollector};
use crate::error::AppError;

const BASE_URL: &str = "https://api.hh.ru";
const USER_AGENT: &str = "hhscout/0.1 (HH-User-Agent)";
const PAGE_SIZE: u32 = 100;

/// Collector for the HeadHunter public API.
///
/// Walks `/employers/{id}` for employer details and paginates
/// `/vacancies` per employer, filtered to salaried RUR listings.
pub struct HeadHunter {
    client: reqwest::Client,
    base_url: String,
}

impl HeadHunter {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(BASE_URL)
    }

    /// Build a collector against a custom endpoint (used by tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn vacancies_url(&self) -> String {
        format!("{}/vacancies", self.base_url)
    }

    fn employer_url(&self, employer_id: i64) -> String {
        format!("{}/employers/{employer_id}", self.base_url)
    }

    /// Employer IDs must be positive; anything else is skipped outright.
    fn validate_id(employer_id: i64) -> Option<i64> {
        (employer_id > 0).then_some(employer_id)
    }

    /// Existence probe: a non-success status means the ID is unknown.
    async fn employer_exists(&self, employer_id: i64) -> bool {
        let result = self
            .client
            .get(self.employer_url(employer_id))
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Existence check failed for employer {employer_id}: {e}");
                false
            }
        }
    }

    async fn fetch_employer(&self, employer_id: i64) -> Result<Value, AppError> {
        let data = self
            .client
            .get(self.employer_url(employer_id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(data)
    }

    /// One page of the vacancy search: the listing items plus the page
    /// count reported by the API.
    async fn vacancies_page(
        &self,
        employer_id: i64,
        page: i64,
    ) -> Result<(Vec<Value>, i64), AppError> {
        let data: Value = self
            .client
            .get(self.vacancies_url())
            .query(&[
                ("employer_id", employer_id.to_string()),
                ("page", page.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("only_with_salary", "true".to_string()),
                ("currency", "RUR".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let items = data
            .get("items")
            .and_then(|v| v.as_array())
            .cloned()
            .ok_or_else(|| AppError::Internal("Missing 'items' in response".to_string()))?;
        let pages = data
            .get("pages")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| AppError::Internal("Missing 'pages' in response".to_string()))?;

        Ok((items, pages))
    }

    /// Paginate the vacancy search for one employer. A failed page is
    /// logged and ends that employer's walk with whatever accumulated.
    async fn fetch_vacancies(&self, employer_id: i64, out: &mut Vec<Value>) {
        let mut page = 0;
        loop {
            match self.vacancies_page(employer_id, page).await {
                Ok((items, pages)) => {
                    out.extend(items);
                    if page >= pages - 1 {
                        break;
                    }
                    page += 1;
                }
                Err(e) => {
                    tracing::warn!("Vacancy page {page} failed for employer {employer_id}: {e}");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl VacancyCollector for HeadHunter {
    fn name(&self) -> &str {
        "headhunter"
    }

    async fn probe(&self) -> Result<(), AppError> {
        for url in [self.vacancies_url(), format!("{}/employers", self.base_url)] {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }

    async fn collect(&self, employer_ids: &[i64]) -> Result<CollectedData, AppError> {
        let mut data = CollectedData::default();

        // An unreachable API yields empty collections, not a fatal error.
        if let Err(e) = self.probe().await {
            tracing::warn!("API connectivity probe failed: {e}");
            return Ok(data);
        }

        for &raw_id in employer_ids {
            let Some(employer_id) = Self::validate_id(raw_id) else {
                tracing::warn!("Skipping invalid employer ID {raw_id}");
                continue;
            };
            if !self.employer_exists(employer_id).await {
                continue;
            }

            match self.fetch_employer(employer_id).await {
                Ok(employer) => data.employers.push(employer),
                Err(e) => {
                    tracing::warn!("Failed to fetch employer {employer_id}: {e}");
                }
            }

            self.fetch_vacancies(employer_id, &mut data.vacancies).await;
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Bare `/vacancies` and `/employers` respond 200 so the connectivity
    /// probe passes; page mocks override these with a higher priority.
    async fn mount_probe_endpoints(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "pages": 0,
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/employers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }

    fn vacancy(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Vacancy {id}"),
            "salary": {"from": 100000, "to": 140000},
            "alternate_url": format!("https://hh.ru/vacancy/{id}"),
            "area": {"id": "1", "name": "Moscow"},
            "employer": {"id": "7"},
        })
    }

    #[test]
    fn only_positive_ids_pass_validation() {
        assert_eq!(HeadHunter::validate_id(1740), Some(1740));
        assert_eq!(HeadHunter::validate_id(0), None);
        assert_eq!(HeadHunter::validate_id(-3), None);
    }

    #[tokio::test]
    async fn unknown_and_invalid_ids_contribute_nothing() {
        let server = MockServer::start().await;
        mount_probe_endpoints(&server).await;
        Mock::given(method("GET"))
            .and(path("/employers/5"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let collector = HeadHunter::with_base_url(&server.uri()).unwrap();
        let data = collector.collect(&[-3, 0, 5]).await.unwrap();

        assert!(data.employers.is_empty());
        assert!(data.vacancies.is_empty());
    }

    #[tokio::test]
    async fn pagination_walks_until_the_last_page() {
        let server = MockServer::start().await;
        mount_probe_endpoints(&server).await;
        Mock::given(method("GET"))
            .and(path("/employers/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7",
                "name": "Acme",
                "alternate_url": "https://hh.ru/employer/7",
                "area": {"id": "1", "name": "Moscow"},
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("employer_id", "7"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [vacancy("10")],
                "pages": 2,
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("employer_id", "7"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [vacancy("11")],
                "pages": 2,
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        let collector = HeadHunter::with_base_url(&server.uri()).unwrap();
        let data = collector.collect(&[7]).await.unwrap();

        assert_eq!(data.employers.len(), 1);
        assert_eq!(data.vacancies.len(), 2);
    }

    #[tokio::test]
    async fn failed_vacancy_page_keeps_what_was_fetched() {
        let server = MockServer::start().await;
        mount_probe_endpoints(&server).await;
        Mock::given(method("GET"))
            .and(path("/employers/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7",
                "name": "Acme",
                "alternate_url": "https://hh.ru/employer/7",
                "area": {"id": "1", "name": "Moscow"},
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [vacancy("10")],
                "pages": 3,
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .mount(&server)
            .await;

        let collector = HeadHunter::with_base_url(&server.uri()).unwrap();
        let data = collector.collect(&[7]).await.unwrap();

        assert_eq!(data.employers.len(), 1);
        assert_eq!(data.vacancies.len(), 1);
    }

    #[tokio::test]
    async fn unreachable_api_yields_empty_collections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let collector = HeadHunter::with_base_url(&server.uri()).unwrap();
        let data = collector.collect(&[7]).await.unwrap();

        assert!(data.employers.is_empty());
        assert!(data.vacancies.is_empty());
    }

    #[tokio::test]
    async fn probe_fails_when_an_endpoint_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let collector = HeadHunter::with_base_url(&server.uri()).unwrap();
        assert!(collector.probe().await.is_err());
    }
}
