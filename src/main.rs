mod collectors;
mod config;
mod db;
mod error;
mod menu;
mod prepare;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::collectors::{HeadHunter, VacancyCollector};
use crate::config::Config;
use crate::db::manager::DbManager;
use crate::error::AppError;
use crate::menu::{InitChoice, MenuChoice};
use crate::state::LastRequestDate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hhscout=info")),
        )
        .init();

    let config = Config::parse();

    let request_date = LastRequestDate::new(config.request_date_path());
    let has_data = db::has_data(&config.db_url()).await;

    let fetch_fresh = if config.refresh || !has_data {
        true
    } else {
        matches!(
            menu::initialization_menu(&request_date.get()),
            InitChoice::FetchFresh
        )
    };

    if fetch_fresh {
        fetch_and_load(&config, &request_date).await?;
    }

    let pool = db::create_pool(&config.db_url()).await?;
    let manager = DbManager::new(pool);
    run_main_menu(&manager).await?;

    Ok(())
}

/// Fetch from the API, normalize, and rebuild the database from scratch.
async fn fetch_and_load(config: &Config, request_date: &LastRequestDate) -> anyhow::Result<()> {
    let employer_ids = state::employer_ids(&config.employer_ids_path())?;
    request_date.save()?;

    println!("\nFetching vacancies...");
    let collector = HeadHunter::new()?;
    let collected = collector.collect(&employer_ids).await?;
    tracing::info!(
        "Collected {} employers and {} raw vacancies",
        collected.employers.len(),
        collected.vacancies.len()
    );

    let employers = prepare::prepare_employers(&collected.employers);
    let (areas, vacancies) = prepare::prepare_vacancies(&collected.vacancies);

    let admin_pool = db::create_pool(&config.admin_url()).await?;
    db::recreate_database(&admin_pool, &config.db_name).await?;
    admin_pool.close().await;

    let pool = db::create_pool(&config.db_url()).await?;
    db::create_schema(&pool).await?;
    db::insert_rows(&pool, &areas, &employers, &vacancies).await?;
    pool.close().await;

    tracing::info!(
        "Loaded {} areas, {} employers, {} vacancies",
        areas.len(),
        employers.len(),
        vacancies.len()
    );

    Ok(())
}

async fn run_main_menu(manager: &DbManager) -> Result<(), AppError> {
    loop {
        match menu::main_menu() {
            MenuChoice::CompanyCounts => {
                let rows = manager.companies_and_vacancy_counts().await?;
                menu::print_company_counts(&rows);
            }
            MenuChoice::AllVacancies => {
                let rows = manager.all_vacancies().await?;
                menu::print_vacancy_listings(&rows);
            }
            MenuChoice::AvgSalary => {
                let avg = manager.avg_salary().await?;
                menu::print_avg_salary(avg);
            }
            MenuChoice::AboveAvgSalary => {
                let rows = manager.vacancies_above_avg_salary().await?;
                menu::print_vacancy_summaries(&rows);
            }
            MenuChoice::KeywordSearch => {
                let keyword = menu::prompt_keyword();
                match manager.vacancies_with_keyword(&keyword).await {
                    Ok(rows) => menu::print_vacancy_summaries(&rows),
                    Err(AppError::BadRequest(msg)) => {
                        println!("{msg}");
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }
            MenuChoice::Exit => {
                println!("\n=====================");
                println!("Bye");
                return Ok(());
            }
        }
    }
}
