use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::listing::{ListingLogic, ListingResponse};
use crate::core::pagination::PageLink;
use crate::core::query::{ListParams, QueryRequest};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::table::{Column, Table};
use crate::utils::time::format_display;

const DESCRIPTION_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        search,
        status,
        sort_field,
        sort_order,
        per_page,
        page,
        json,
    } = cmd
    {
        let params = ListParams {
            search: search.clone(),
            status: status.clone(),
            sort_field: sort_field.clone(),
            sort_order: sort_order.clone(),
            per_page: per_page.clone(),
            page: page.clone(),
        };
        let request = QueryRequest::from_params(&params, cfg.default_per_page);

        let pool = DbPool::new(&cfg.database)?;
        let response = ListingLogic::respond(&pool, &request, &cfg.list_path)?;

        if *json {
            let out = serde_json::to_string_pretty(&response).map_err(|e| AppError::Other(e.to_string()))?;
            println!("{out}");
        } else {
            print_listing(&response);
        }
    }
    Ok(())
}

/// Table of the page, the `Showing` footer and the link bar.
pub fn print_listing(response: &ListingResponse) {
    let page = &response.entries;
    let filters = &response.filters;

    println!(
        "🔎 search={:?} status={} sort={} {} per_page={}",
        filters.search,
        filters.status,
        filters.sort_field.as_str(),
        filters.sort_order.as_str(),
        filters.per_page
    );

    if page.is_empty() {
        println!("\nNo entries found.\n");
    } else {
        let mut table = Table::new(vec![
            Column::new("ID"),
            Column::new("Person"),
            Column::new("Start"),
            Column::new("Finish"),
            Column::new("Duration"),
            Column::new("Status"),
            Column::wrapped("Description", DESCRIPTION_WIDTH),
        ]);

        for e in &page.items {
            table.add_row(vec![
                e.id.to_string(),
                e.person.clone(),
                format_display(e.start_time),
                format_display(e.finish_time),
                e.duration_label(),
                e.status.to_string(),
                e.description.clone(),
            ]);
        }

        println!("\n{}", table.render());
    }

    println!(
        "Showing {}–{} of {} (page {} of {})",
        page.meta.from, page.meta.to, page.meta.total, page.meta.current_page, page.meta.last_page
    );
    println!("{}", link_bar(&page.links));
}

/// `« Previous  1  [2]  3  ...  9  Next »`
pub fn link_bar(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|l| {
            if l.is_current {
                format!("[{}]", l.label)
            } else {
                l.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
