//! Normalization of raw HeadHunter payloads into flat rows matching the
//! areas / employers / vacancies tables. Pure functions, no I/O.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRow {
    pub area_id: i32,
    pub area_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerRow {
    pub employer_id: i32,
    pub employer_name: String,
    pub description: Option<String>,
    pub site_url: Option<String>,
    pub hh_url: String,
    pub area_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyRow {
    pub vacancy_id: i32,
    pub vacancy_name: String,
    pub salary: Option<i32>,
    pub vacancy_url: String,
    pub area_id: i32,
    pub employer_id: i32,
}

/// HH serializes numeric IDs as JSON strings ("1740"); accept either form.
fn as_id(value: Option<&Value>) -> Option<i32> {
    let value = value?;
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        _ => None,
    }
}

fn as_str(value: Option<&Value>) -> Option<String> {
    value.and_then(|v| v.as_str()).map(String::from)
}

/// Collapse a min/max salary range into a single figure: the rounded mean
/// when both bounds are present, the one bound otherwise. Half-way means
/// round to the nearest even figure.
pub fn derive_salary(from: Option<i64>, to: Option<i64>) -> Option<i64> {
    match (from, to) {
        (Some(f), Some(t)) => Some(((f + t) as f64 / 2.0).round_ties_even() as i64),
        (Some(f), None) => Some(f),
        (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}

/// Flatten raw employer payloads into rows for the employers table.
/// Payloads missing required fields are skipped with a warning.
pub fn prepare_employers(employers: &[Value]) -> Vec<EmployerRow> {
    let mut prepared = Vec::new();

    for raw in employers {
        let Some(row) = employer_row(raw) else {
            tracing::warn!("Skipping malformed employer payload: {raw}");
            continue;
        };
        prepared.push(row);
    }

    prepared
}

fn employer_row(raw: &Value) -> Option<EmployerRow> {
    Some(EmployerRow {
        employer_id: as_id(raw.get("id"))?,
        employer_name: as_str(raw.get("name"))?,
        description: as_str(raw.get("description")),
        site_url: as_str(raw.get("site_url")),
        hh_url: as_str(raw.get("alternate_url"))?,
        area_id: as_id(raw.get("area").and_then(|a| a.get("id")))?,
    })
}

/// Flatten raw vacancy payloads into area and vacancy rows, deduplicated
/// by full-row equality in first-seen order.
pub fn prepare_vacancies(vacancies: &[Value]) -> (Vec<AreaRow>, Vec<VacancyRow>) {
    let mut areas: Vec<AreaRow> = Vec::new();
    let mut prepared: Vec<VacancyRow> = Vec::new();

    for raw in vacancies {
        let Some((area, vacancy)) = vacancy_row(raw) else {
            tracing::warn!("Skipping malformed vacancy payload: {raw}");
            continue;
        };

        if !areas.contains(&area) {
            areas.push(area);
        }
        if !prepared.contains(&vacancy) {
            prepared.push(vacancy);
        }
    }

    (areas, prepared)
}

fn vacancy_row(raw: &Value) -> Option<(AreaRow, VacancyRow)> {
    let area = raw.get("area")?;
    let area_row = AreaRow {
        area_id: as_id(area.get("id"))?,
        area_name: as_str(area.get("name"))?,
    };

    let salary = raw.get("salary")?;
    let salary = derive_salary(
        salary.get("from").and_then(|v| v.as_i64()),
        salary.get("to").and_then(|v| v.as_i64()),
    );

    let vacancy = VacancyRow {
        vacancy_id: as_id(raw.get("id"))?,
        vacancy_name: as_str(raw.get("name"))?,
        salary: salary.and_then(|s| i32::try_from(s).ok()),
        vacancy_url: as_str(raw.get("alternate_url"))?,
        area_id: area_row.area_id,
        employer_id: as_id(raw.get("employer").and_then(|e| e.get("id")))?,
    };

    Some((area_row, vacancy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_vacancy(id: &str, name: &str, area_id: &str, salary: Value) -> Value {
        json!({
            "id": id,
            "name": name,
            "salary": salary,
            "alternate_url": format!("https://hh.ru/vacancy/{id}"),
            "area": {"id": area_id, "name": format!("Area {area_id}")},
            "employer": {"id": "1740"},
        })
    }

    #[test]
    fn salary_is_rounded_mean_of_both_bounds() {
        assert_eq!(derive_salary(Some(50000), Some(50000)), Some(50000));
        assert_eq!(derive_salary(Some(40000), Some(56000)), Some(48000));
    }

    #[test]
    fn half_way_salary_means_round_to_even() {
        assert_eq!(derive_salary(Some(2), Some(3)), Some(2));
        assert_eq!(derive_salary(Some(3), Some(4)), Some(4));
        assert_eq!(derive_salary(Some(40001), Some(56000)), Some(48000));
    }

    #[test]
    fn salary_falls_back_to_the_present_bound() {
        assert_eq!(derive_salary(None, Some(50000)), Some(50000));
        assert_eq!(derive_salary(Some(30000), None), Some(30000));
        assert_eq!(derive_salary(None, None), None);
    }

    #[test]
    fn employer_fields_are_flattened() {
        let raw = json!({
            "id": "1740",
            "name": "Yandex",
            "description": "IT company",
            "site_url": "https://yandex.ru",
            "alternate_url": "https://hh.ru/employer/1740",
            "area": {"id": "1", "name": "Moscow"},
        });

        let rows = prepare_employers(&[raw]);
        assert_eq!(
            rows,
            vec![EmployerRow {
                employer_id: 1740,
                employer_name: "Yandex".to_string(),
                description: Some("IT company".to_string()),
                site_url: Some("https://yandex.ru".to_string()),
                hh_url: "https://hh.ru/employer/1740".to_string(),
                area_id: 1,
            }]
        );
    }

    #[test]
    fn malformed_employer_payloads_are_skipped() {
        let missing_name = json!({"id": "1740", "alternate_url": "u", "area": {"id": "1"}});
        assert!(prepare_employers(&[missing_name]).is_empty());
    }

    #[test]
    fn duplicate_areas_and_vacancies_collapse() {
        let raw = raw_vacancy("10", "Rust developer", "1", json!({"from": 100, "to": 200}));
        let (areas, vacancies) = prepare_vacancies(&[raw.clone(), raw]);
        assert_eq!(areas.len(), 1);
        assert_eq!(vacancies.len(), 1);
    }

    #[test]
    fn three_vacancies_two_areas_normalize_fully() {
        let raws = [
            raw_vacancy("10", "Backend developer", "1", json!({"from": 50000, "to": 50000})),
            raw_vacancy("11", "Frontend developer", "1", json!({"from": 40000, "to": 56000})),
            raw_vacancy("12", "QA engineer", "2", json!({"from": null, "to": 50000})),
        ];

        let (areas, vacancies) = prepare_vacancies(&raws);

        assert_eq!(areas.len(), 2);
        assert_eq!(vacancies.len(), 3);
        let salaries: Vec<_> = vacancies.iter().map(|v| v.salary).collect();
        assert_eq!(salaries, vec![Some(50000), Some(48000), Some(50000)]);
        assert!(vacancies.iter().all(|v| v.employer_id == 1740));
    }

    #[test]
    fn missing_salary_object_skips_the_record() {
        let raw = json!({
            "id": "10",
            "name": "No salary",
            "alternate_url": "u",
            "area": {"id": "1", "name": "Moscow"},
            "employer": {"id": "1740"},
        });
        let (areas, vacancies) = prepare_vacancies(&[raw]);
        assert!(areas.is_empty());
        assert!(vacancies.is_empty());
    }
}
