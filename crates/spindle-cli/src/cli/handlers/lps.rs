//! LP catalog command handlers

use spindle_sdk::{Lp, PageQuery};
use tracing::debug;

use crate::cli::commands::SortOrder;
use crate::cli::handlers::build_client;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_info, print_lp_detail, print_lp_table};

/// Handle ls command
#[allow(clippy::too_many_arguments)]
pub async fn handle_ls(
    config: &CliConfig,
    cursor: Option<u64>,
    limit: Option<u64>,
    search: Option<String>,
    order: Option<SortOrder>,
    all: bool,
    json: bool,
) -> Result<()> {
    let client = build_client(config)?;
    let mut query = PageQuery {
        cursor,
        limit,
        search,
        order: order.map(Into::into),
    };

    let mut lps: Vec<Lp> = Vec::new();
    let next_cursor = loop {
        let page = client.list_lps(&query).await?;
        debug!(
            count = page.data.len(),
            has_next = page.has_next,
            "fetched LP page"
        );
        lps.extend(page.data);

        if !all || !page.has_next {
            break page.next_cursor;
        }
        query.cursor = page.next_cursor;
    };

    if json {
        return json_output(&lps);
    }
    if lps.is_empty() {
        print_info("No LPs found");
        return Ok(());
    }
    print_lp_table(&lps);
    if let Some(cursor) = next_cursor {
        print_info(&format!("More results: --cursor {cursor}"));
    }
    Ok(())
}

/// Handle show command
pub async fn handle_show(config: &CliConfig, id: u64, json: bool) -> Result<()> {
    let client = build_client(config)?;
    let lp = client.get_lp(id).await?;

    if json {
        return json_output(&lp);
    }
    print_lp_detail(&lp);
    Ok(())
}
