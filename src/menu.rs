//! Console menus and table rendering for the query results.

use comfy_table::{Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use inquire::{CustomType, Select, Text};

use crate::db::manager::{EmployerVacancyCount, VacancyListing, VacancySummary};

/// Listings longer than this offer a top-N cut before rendering.
const LONG_LISTING: usize = 50;

/// Asked when the database already holds data from an earlier fetch.
pub enum InitChoice {
    UseExisting,
    FetchFresh,
}

pub fn initialization_menu(last_date: &str) -> InitChoice {
    if last_date.is_empty() {
        println!("Data from an unknown date is already loaded");
    } else {
        println!("Data from {last_date} is already loaded");
    }

    let options = vec!["Work with the existing data", "Fetch fresh vacancies"];
    match Select::new("What would you like to do?", options).prompt() {
        Ok("Fetch fresh vacancies") => InitChoice::FetchFresh,
        _ => InitChoice::UseExisting,
    }
}

pub enum MenuChoice {
    CompanyCounts,
    AllVacancies,
    AvgSalary,
    AboveAvgSalary,
    KeywordSearch,
    Exit,
}

const MENU_OPTIONS: [&str; 6] = [
    "Employers and their vacancy counts",
    "All vacancies with employer, salary and link",
    "Average salary across all vacancies",
    "Vacancies paying above the average salary",
    "Vacancies whose name contains a keyword",
    "Exit",
];

pub fn main_menu() -> MenuChoice {
    println!();
    let selection = Select::new("Main menu:", MENU_OPTIONS.to_vec())
        .with_page_size(MENU_OPTIONS.len())
        .raw_prompt();

    // A cancelled prompt (Ctrl-C / EOF) reads as Exit.
    match selection.map(|opt| opt.index) {
        Ok(0) => MenuChoice::CompanyCounts,
        Ok(1) => MenuChoice::AllVacancies,
        Ok(2) => MenuChoice::AvgSalary,
        Ok(3) => MenuChoice::AboveAvgSalary,
        Ok(4) => MenuChoice::KeywordSearch,
        _ => MenuChoice::Exit,
    }
}

pub fn prompt_keyword() -> String {
    Text::new("Keyword to search vacancy names for:")
        .prompt()
        .unwrap_or_default()
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers);
    table
}

fn format_salary(salary: Option<i32>) -> String {
    salary.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Long listings offer a top-N cut; returns how many rows to render.
fn listing_limit(total: usize) -> usize {
    if total <= LONG_LISTING {
        return total;
    }

    println!("Total vacancies: {total}");
    let options = vec!["Show the full list", "Show only the top N"];
    match Select::new("How much to display?", options).prompt() {
        Ok("Show only the top N") => CustomType::<usize>::new("How many top entries?")
            .with_error_message("Enter a number")
            .prompt()
            .map(|n| n.clamp(1, total))
            .unwrap_or(total),
        _ => total,
    }
}

pub fn print_company_counts(rows: &[EmployerVacancyCount]) {
    let mut table = new_table(vec!["Employer", "Vacancies"]);
    for row in rows {
        table.add_row(vec![
            row.employer_name.clone(),
            row.vacancy_count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn print_vacancy_listings(rows: &[VacancyListing]) {
    let limit = listing_limit(rows.len());
    let mut table = new_table(vec!["Employer", "Vacancy", "Salary", "Link"]);
    for row in rows.iter().take(limit) {
        table.add_row(vec![
            row.employer_name.clone(),
            opt(&row.vacancy_name),
            format_salary(row.salary),
            opt(&row.vacancy_url),
        ]);
    }
    println!("{table}");
}

pub fn print_vacancy_summaries(rows: &[VacancySummary]) {
    let limit = listing_limit(rows.len());
    let mut table = new_table(vec!["Vacancy", "Salary", "Link"]);
    for row in rows.iter().take(limit) {
        table.add_row(vec![
            opt(&row.vacancy_name),
            format_salary(row.salary),
            opt(&row.vacancy_url),
        ]);
    }
    println!("{table}");
}

pub fn print_avg_salary(avg: Option<f64>) {
    let mut table = new_table(vec!["Metric", "Value"]);
    let value = avg.map_or_else(|| "-".to_string(), |a| (a.round() as i64).to_string());
    table.add_row(vec!["Average salary".to_string(), value]);
    println!("{table}");
}
