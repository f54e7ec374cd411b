//! Interactive listing session over stdin.
//!
//! Plain lines are search text and are debounced. Lines starting with `:`
//! are commands and apply at once. A query is started for every change;
//! starting one drops the query still in flight, so only the newest one is
//! rendered.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{bail, Result};
use catalog_core::search::{ClearAction, FilterChange, SortField, SortOrder, SortPreset};
use catalog_core::{FlavorId, Price, WeightId};
use catalog_query::{debounce, BrowseSession, QueryOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::query::{page_json, render_page};
use super::BrowseArgs;
use crate::context::{Context, SharedStore};

const HELP: &[(&str, &str)] = &[
    ("<text>", "search (empty line clears)"),
    (":flavor <id>", "toggle a flavor"),
    (":weight <id>", "toggle a weight"),
    (":category <slug|->", "set or clear the category"),
    (":min <price|->", "set or clear the minimum price"),
    (":max <price|->", "set or clear the maximum price"),
    (":sort <field> [asc|desc]", "sort by createdAt, updatedAt, name or featured"),
    (":preset <name>", "newest, oldest, name-asc, name-desc, price-low, price-high"),
    (":page <n>  :next  :prev", "move between pages"),
    (":limit <n>", "products per page"),
    (":clear [flavor|weight|price]", "clear one filter or all of them"),
    (":url <query>", "load criteria from a storefront URL"),
    (":share", "print the shareable URL"),
    (":quit", "leave"),
];

/// One line of user input.
#[derive(Debug)]
enum Input {
    Search(String),
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Change(FilterChange),
    Page(u32),
    Next,
    Prev,
    Clear(ClearAction),
    Url(String),
    Share,
    Help,
    Quit,
}

type PendingQuery = Pin<Box<dyn Future<Output = QueryOutcome>>>;

enum Step {
    Requery,
    Stay,
    Quit,
}

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let resolver = ctx.resolver()?;
    let mut session = match &args.url {
        Some(query) => BrowseSession::from_url(resolver, query),
        None => {
            let mut session = BrowseSession::new(resolver);
            session.change(FilterChange::PageSize(ctx.config.query.page_size));
            session
        }
    };

    let spinner = ctx.output.spinner("Loading catalog...");
    session.load_reference().await;
    session.refresh().await;
    spinner.finish_and_clear();
    show(ctx, &session);
    print_help(ctx);

    let quiet = Duration::from_millis(args.debounce_ms.unwrap_or(ctx.config.query.debounce_ms));
    let mut inputs = spawn_input(quiet);
    let mut pending: Option<PendingQuery> = None;

    loop {
        tokio::select! {
            input = inputs.recv() => {
                let Some(input) = input else { break };
                let step = match input {
                    Input::Search(text) => {
                        if session.set_search(text) { Step::Requery } else { Step::Stay }
                    }
                    Input::Command(line) => match parse_command(&line) {
                        Ok(command) => execute(ctx, &mut session, command),
                        Err(e) => {
                            ctx.output.warn(&format!("{:#}", e));
                            Step::Stay
                        }
                    },
                };
                match step {
                    Step::Requery => pending = Some(start_query(&mut session)),
                    Step::Stay => {}
                    Step::Quit => return Ok(()),
                }
            }
            outcome = wait_pending(&mut pending), if pending.is_some() => {
                pending = None;
                apply(ctx, &mut session, outcome);
            }
        }
    }

    // input closed; let the last query land
    if let Some(query) = pending.take() {
        let outcome = query.await;
        apply(ctx, &mut session, outcome);
    }

    Ok(())
}

/// Read stdin on a task. Search text goes through the debouncer; commands
/// skip it. The returned channel closes once stdin ends and the last
/// search has settled.
fn spawn_input(quiet: Duration) -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();
    let (search_tx, mut debouncer) = debounce::<String>(quiet);

    let settled_tx = tx.clone();
    tokio::spawn(async move {
        while let Some(text) = debouncer.settled().await {
            if settled_tx.send(Input::Search(text)).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            let sent = match line.strip_prefix(':') {
                Some(command) => tx.send(Input::Command(command.to_string())).is_ok(),
                None => search_tx.push(line.to_string()),
            };
            if !sent {
                break;
            }
        }
    });

    rx
}

fn start_query(session: &mut BrowseSession<SharedStore>) -> PendingQuery {
    let (token, criteria) = session.begin();
    debug!(generation = %token.generation(), "query started");
    let resolver = session.resolver().clone();
    Box::pin(async move { resolver.resolve_with(token, &criteria).await })
}

async fn wait_pending(pending: &mut Option<PendingQuery>) -> QueryOutcome {
    match pending.as_mut() {
        Some(query) => query.await,
        None => std::future::pending().await,
    }
}

fn apply(ctx: &Context, session: &mut BrowseSession<SharedStore>, outcome: QueryOutcome) {
    let generation = outcome.generation();
    if session.apply(outcome) {
        show(ctx, session);
    } else {
        debug!(%generation, "stale outcome dropped");
    }
}

fn show(ctx: &Context, session: &BrowseSession<SharedStore>) {
    let Some(page) = session.result() else {
        return;
    };
    if ctx.output.is_json() {
        ctx.output.json(&page_json(page));
    } else {
        render_page(ctx, page, session.reference());
    }
}

fn print_help(ctx: &Context) {
    ctx.output.header("Commands");
    for (usage, what) in HELP {
        ctx.output.kv(usage, what);
    }
}

fn execute(ctx: &Context, session: &mut BrowseSession<SharedStore>, command: Command) -> Step {
    let changed = match command {
        Command::Change(change) => session.change(change),
        Command::Page(page) => {
            let changed = session.set_page(page);
            if !changed && session.criteria().page != page {
                ctx.output.warn(&format!("Page {} is out of range", page));
            }
            changed
        }
        Command::Next => {
            let next = session.criteria().page.saturating_add(1);
            session.set_page(next)
        }
        Command::Prev => {
            let prev = session.criteria().page.saturating_sub(1);
            session.set_page(prev)
        }
        Command::Clear(action) => session.change(match action {
            ClearAction::All => FilterChange::Clear,
            ClearAction::Flavor => FilterChange::Flavor(None),
            ClearAction::Weight => FilterChange::Weight(None),
            ClearAction::Price => FilterChange::PriceRange {
                min: None,
                max: None,
            },
        }),
        Command::Url(query) => session.sync_from_url(&query),
        Command::Share => {
            println!("{}", session.share_url("/products"));
            false
        }
        Command::Help => {
            print_help(ctx);
            false
        }
        Command::Quit => return Step::Quit,
    };

    if changed {
        Step::Requery
    } else {
        Step::Stay
    }
}

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();
    let arg = rest.first().copied();

    let command = match (name, arg) {
        ("flavor", Some(id)) => Command::Change(FilterChange::ToggleFlavor(FlavorId::new(id))),
        ("weight", Some(id)) => Command::Change(FilterChange::ToggleWeight(WeightId::new(id))),
        ("category", Some("-")) => Command::Change(FilterChange::Category(None)),
        ("category", Some(slug)) => Command::Change(FilterChange::Category(Some(slug.into()))),
        ("min", Some(value)) => Command::Change(FilterChange::MinPrice(optional_price(value)?)),
        ("max", Some(value)) => Command::Change(FilterChange::MaxPrice(optional_price(value)?)),
        ("sort", Some(field)) => {
            let order = match rest.get(1) {
                Some(order) => SortOrder::parse(order)?,
                None => SortOrder::default(),
            };
            Command::Change(FilterChange::Sort(SortField::parse(field)?, order))
        }
        ("preset", Some(name)) => Command::Change(FilterChange::Preset(SortPreset::parse(name)?)),
        ("limit", Some(n)) => Command::Change(FilterChange::PageSize(n.parse()?)),
        ("page", Some(n)) => Command::Page(n.parse()?),
        ("next", None) => Command::Next,
        ("prev", None) => Command::Prev,
        ("clear", None) | ("clear", Some("all")) => Command::Clear(ClearAction::All),
        ("clear", Some("flavor")) => Command::Clear(ClearAction::Flavor),
        ("clear", Some("weight")) => Command::Clear(ClearAction::Weight),
        ("clear", Some("price")) => Command::Clear(ClearAction::Price),
        ("url", Some(_)) => Command::Url(rest.join(" ")),
        ("share", None) => Command::Share,
        ("help", _) | ("?", _) => Command::Help,
        ("quit", _) | ("q", _) => Command::Quit,
        _ => bail!("Unknown command ':{}'. Type :help for the list", line.trim()),
    };

    Ok(command)
}

fn optional_price(value: &str) -> Result<Option<Price>> {
    if value == "-" {
        return Ok(None);
    }
    Ok(Some(Price::parse(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_commands() {
        assert_eq!(
            parse_command("flavor F1").unwrap(),
            Command::Change(FilterChange::ToggleFlavor(FlavorId::new("F1")))
        );
        assert_eq!(
            parse_command("max -").unwrap(),
            Command::Change(FilterChange::MaxPrice(None))
        );
        assert_eq!(
            parse_command("min 500").unwrap(),
            Command::Change(FilterChange::MinPrice(Some(Price::from_units(500))))
        );
        assert_eq!(
            parse_command("sort name asc").unwrap(),
            Command::Change(FilterChange::Sort(SortField::Name, SortOrder::Asc))
        );
        assert_eq!(
            parse_command("clear weight").unwrap(),
            Command::Clear(ClearAction::Weight)
        );
        assert_eq!(parse_command("page 3").unwrap(), Command::Page(3));
        assert_eq!(
            parse_command("url search=whey+protein&page=2").unwrap(),
            Command::Url("search=whey+protein&page=2".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("sort price").is_err());
        assert!(parse_command("min cheap").is_err());
        assert!(parse_command("page two").is_err());
        assert!(parse_command("flavor").is_err());
        assert!(parse_command("dance").is_err());
    }
}
