use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use tally::client::{
    register_client, search_clients, summarize_client, update_client, ClientChanges, NewClient,
};
use tally::config::{config_dir, init_config_dir, load_config, load_items, Config};
use tally::dashboard::{
    compute_metrics, filter_by_status, recent_activity, recent_invoices, status_filter_options,
};
use tally::error::{Result, TallyError};
use tally::format::{format_currency, format_date, relative_time, truncate};
use tally::invoice::{
    cancel_invoice, create_invoice, format_invoice_number, mark_invoice_paid, parse_date,
    parse_line_inputs, send_invoice, update_invoice, Invoice, InvoiceEdit, InvoiceStatus,
    LineItemKind, NewInvoice, MAX_SEQUENCE,
};
use tally::logging::init_logging;
use tally::public::public_invoice;
use tally::store::{FileStore, Repository};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version, about = "Small invoicing system with clients, dashboards and shareable invoices", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.tally)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Register a new client
    AddClient {
        /// Client name
        #[arg(long)]
        name: String,

        /// Billing email address
        #[arg(long)]
        email: String,

        /// Identifier used by other commands (default: derived from the name)
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change a client's details (empty values clear optional fields)
    EditClient {
        /// Client identifier
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List clients with their billing summary
    Clients {
        /// Only show clients whose name, email or company contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List catalog items from items.toml
    Items,

    /// Create a new draft invoice
    New {
        /// Client identifier
        #[arg(short, long)]
        client: String,

        /// Line in the form "item:qty", "section:Title", "discount:Description:amount"
        /// or "custom:Description:qty:unit:price" (can be repeated)
        #[arg(short, long, value_name = "LINE")]
        line: Vec<String>,

        /// Issue date (YYYY-MM-DD, default: today)
        #[arg(long)]
        issue_date: Option<String>,

        /// Due date (YYYY-MM-DD, default: issue date + due_days)
        #[arg(long)]
        due_date: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Send the invoice right after creating it
        #[arg(long)]
        send: bool,
    },

    /// Edit an open invoice
    Edit {
        /// Invoice number or index from 'list' (e.g., 1 or 2025-0001)
        invoice: String,

        /// Replacement lines (replaces all existing lines)
        #[arg(short, long, value_name = "LINE")]
        line: Vec<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<String>,

        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,
    },

    /// List invoices
    List {
        /// Only show invoices with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Number of invoices to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show an invoice with its line items and totals
    Show {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Mark an invoice as sent
    Send {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Record that an invoice was paid
    Pay {
        /// Invoice number or index from 'list'
        invoice: String,

        /// Payment date (default: now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Cancel an invoice
    Cancel {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Print the public link for an invoice
    Share {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Show the invoice shared under a public token
    Public {
        token: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show outstanding money, recent invoices and activity
    Dashboard {
        /// Number of recent invoices and activities to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Show configuration summary and next invoice number
    Status,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    tracing::debug!(config_dir = %cfg_dir.display(), "resolved config directory");

    let now = Utc::now();

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::AddClient {
            name,
            email,
            id,
            company,
            address,
            phone,
            notes,
        } => cmd_add_client(
            &cfg_dir,
            NewClient {
                id,
                name,
                email,
                company,
                address,
                phone,
                notes,
            },
            now,
        ),
        Commands::EditClient {
            id,
            name,
            email,
            company,
            address,
            phone,
            notes,
        } => cmd_edit_client(
            &cfg_dir,
            &id,
            ClientChanges {
                name,
                email,
                company,
                address,
                phone,
                notes,
            },
            now,
        ),
        Commands::Clients { search } => cmd_clients(&cfg_dir, search.as_deref(), now),
        Commands::Items => cmd_items(&cfg_dir),
        Commands::New {
            client,
            line,
            issue_date,
            due_date,
            notes,
            send,
        } => cmd_new(&cfg_dir, client, &line, issue_date, due_date, notes, send, now),
        Commands::Edit {
            invoice,
            line,
            due_date,
            notes,
        } => cmd_edit(&cfg_dir, &invoice, &line, due_date, notes, now),
        Commands::List { status, limit } => cmd_list(&cfg_dir, status, limit, now),
        Commands::Show { invoice } => cmd_show(&cfg_dir, &invoice, now),
        Commands::Send { invoice } => cmd_send(&cfg_dir, &invoice, now),
        Commands::Pay { invoice, date } => cmd_pay(&cfg_dir, &invoice, date, now),
        Commands::Cancel { invoice } => cmd_cancel(&cfg_dir, &invoice, now),
        Commands::Share { invoice } => cmd_share(&cfg_dir, &invoice),
        Commands::Public { token, json } => cmd_public(&cfg_dir, &token, json, now),
        Commands::Dashboard { limit } => cmd_dashboard(&cfg_dir, limit, now),
        Commands::Status => cmd_status(&cfg_dir, now),
    }
}

/// Load config.toml and open the state file
fn open_workspace(cfg_dir: &Path) -> Result<(Config, FileStore)> {
    if !cfg_dir.exists() {
        return Err(TallyError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok((load_config(cfg_dir)?, FileStore::open(cfg_dir)?))
}

/// Invoices in display order, newest first
fn invoices_newest_first(store: &FileStore) -> Result<Vec<Invoice>> {
    let mut invoices = store.list_invoices()?;
    invoices.reverse();
    Ok(invoices)
}

/// Resolve an invoice reference to the actual invoice number.
/// Accepts either an index (1-based) from 'list' or the invoice number.
fn resolve_invoice_number(store: &FileStore, reference: &str) -> Result<String> {
    if let Ok(idx) = reference.parse::<usize>() {
        let invoices = invoices_newest_first(store)?;
        if idx == 0 || idx > invoices.len() {
            return Err(TallyError::InvalidInvoiceIndex(reference.to_string()));
        }
        return Ok(invoices[idx - 1].invoice_number.clone());
    }

    store
        .get_invoice(reference)
        .map(|invoice| invoice.invoice_number)
}

fn client_name(store: &FileStore, client_id: &str) -> String {
    store
        .get_client(client_id)
        .map(|c| c.name)
        .unwrap_or_else(|_| client_id.to_string())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized tally config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your business details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Configure catalog items:     $EDITOR {}/items.toml",
        cfg_dir.display()
    );
    println!("  3. Add a client:                tally add-client --name <name> --email <email>");
    println!();
    println!("Then create your first invoice:");
    println!("  tally new --client <client-id> --line <item>:<quantity>");

    Ok(())
}

fn cmd_add_client(cfg_dir: &Path, new: NewClient, now: DateTime<Utc>) -> Result<()> {
    let (_, mut store) = open_workspace(cfg_dir)?;
    let client = register_client(&mut store, new, now)?;

    println!("Added client {}", client.id);
    println!("  Name:  {}", client.name);
    println!("  Email: {}", client.email);
    Ok(())
}

fn cmd_edit_client(
    cfg_dir: &Path,
    id: &str,
    changes: ClientChanges,
    now: DateTime<Utc>,
) -> Result<()> {
    let (_, mut store) = open_workspace(cfg_dir)?;
    let client = update_client(&mut store, id, changes, now)?;

    println!("Updated client {}", client.id);
    println!("  Name:    {}", client.name);
    println!("  Email:   {}", client.email);
    if let Some(company) = &client.company {
        println!("  Company: {company}");
    }
    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "COMPANY")]
    company: String,
    #[tabled(rename = "BILLED")]
    billed: String,
    #[tabled(rename = "LAST INVOICE")]
    last_invoice: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "UNIT")]
    unit: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DUE")]
    due: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    position: i32,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "WHEN")]
    when: String,
    #[tabled(rename = "EVENT")]
    event: String,
    #[tabled(rename = "DETAILS")]
    details: String,
}

/// List clients, optionally filtered by a search query
fn cmd_clients(cfg_dir: &Path, search: Option<&str>, now: DateTime<Utc>) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let clients = store.list_clients()?;

    if clients.is_empty() {
        println!("No clients yet.");
        println!("Add one with: tally add-client --name <name> --email <email>");
        return Ok(());
    }

    let invoices = store.list_invoices()?;
    let matches = search_clients(&clients, search.unwrap_or(""));
    if matches.is_empty() {
        println!("No clients found matching your search.");
        return Ok(());
    }

    let symbol = &config.invoice.currency_symbol;
    let rows: Vec<ClientRow> = matches
        .iter()
        .map(|client| {
            let summary = summarize_client(&client.id, &invoices, now.date_naive());
            ClientRow {
                id: client.id.clone(),
                name: client.name.clone(),
                email: client.email.clone(),
                company: client.company.clone().unwrap_or_default(),
                billed: format_currency(summary.total_billed, symbol),
                last_invoice: summary
                    .last_invoice_date
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    if search.is_some_and(|q| !q.trim().is_empty()) {
        println!("Showing {} of {} clients", matches.len(), clients.len());
    }

    Ok(())
}

/// List catalog items
fn cmd_items(cfg_dir: &Path) -> Result<()> {
    let (config, _) = open_workspace(cfg_dir)?;
    let items = load_items(cfg_dir)?;

    if items.is_empty() {
        println!("No items configured.");
        println!("Add items to: {}/items.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<ItemRow> = sorted
        .iter()
        .map(|(id, item)| ItemRow {
            id: id.to_string(),
            description: item.description.clone(),
            rate: format_currency(item.rate, &config.invoice.currency_symbol),
            unit: format!("/{}", item.unit),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_new(
    cfg_dir: &Path,
    client_id: String,
    lines: &[String],
    issue_date: Option<String>,
    due_date: Option<String>,
    notes: Option<String>,
    send: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let (config, mut store) = open_workspace(cfg_dir)?;
    let catalog = load_items(cfg_dir)?;

    let new = NewInvoice {
        client_id,
        issue_date: match issue_date {
            Some(s) => parse_date(&s)?,
            None => now.date_naive(),
        },
        due_date: due_date.as_deref().map(parse_date).transpose()?,
        notes,
        line_items: parse_line_inputs(lines, &catalog)?,
    };

    let mut invoice = create_invoice(&mut store, new, &config.invoice, now)?;
    if send {
        invoice = send_invoice(&mut store, &invoice.id, now)?;
    }

    let symbol = &config.invoice.currency_symbol;
    println!("Created {}", invoice.invoice_number);
    println!("  Client: {}", client_name(&store, &invoice.client_id));
    println!("  Total:  {}", format_currency(invoice.totals().total, symbol));
    println!("  Due:    {}", format_date(invoice.due_date));
    println!("  Status: {}", invoice.status(now.date_naive()).label());
    println!("  Link:   {}", config.invoice.share_url(&invoice.token));

    Ok(())
}

fn cmd_edit(
    cfg_dir: &Path,
    invoice_ref: &str,
    lines: &[String],
    due_date: Option<String>,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    let (config, mut store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;

    let line_items = if lines.is_empty() {
        None
    } else {
        Some(parse_line_inputs(lines, &load_items(cfg_dir)?)?)
    };
    let edit = InvoiceEdit {
        line_items,
        due_date: due_date.as_deref().map(parse_date).transpose()?,
        notes,
    };

    let invoice = update_invoice(&mut store, &invoice_number, edit, now)?;

    println!("Updated {}", invoice.invoice_number);
    println!(
        "  Total:  {}",
        format_currency(invoice.totals().total, &config.invoice.currency_symbol)
    );
    println!("  Due:    {}", format_date(invoice.due_date));
    Ok(())
}

/// List invoices with derived status and filter counts
fn cmd_list(
    cfg_dir: &Path,
    status: Option<String>,
    limit: Option<usize>,
    now: DateTime<Utc>,
) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let status = status
        .as_deref()
        .map(str::parse::<InvoiceStatus>)
        .transpose()?;

    let all = invoices_newest_first(&store)?;
    if all.is_empty() {
        println!("No invoices yet.");
        return Ok(());
    }

    let today = now.date_naive();
    let symbol = &config.invoice.currency_symbol;

    // Index numbers refer to the unfiltered list so they work with other commands
    let rows: Vec<InvoiceRow> = all
        .iter()
        .enumerate()
        .filter(|(_, invoice)| status.map_or(true, |s| invoice.status(today) == s))
        .take(limit.unwrap_or(usize::MAX))
        .map(|(idx, invoice)| InvoiceRow {
            index: idx + 1,
            number: invoice.invoice_number.clone(),
            client: truncate(&client_name(&store, &invoice.client_id), 24),
            amount: format_currency(invoice.totals().total, symbol),
            due: format_date(invoice.due_date),
            status: invoice.status(today).as_str().to_uppercase(),
        })
        .collect();

    if rows.is_empty() {
        println!("No invoices match your filter.");
    } else {
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    println!();
    let counts: Vec<String> = status_filter_options(&all, now)
        .iter()
        .map(|o| format!("{} ({})", o.label, o.count))
        .collect();
    println!("{}", counts.join("  "));

    let shown = filter_by_status(&all, status, now);
    let metrics = compute_metrics(&all, now);
    println!(
        "Outstanding: {}  Overdue: {} ({} invoice{})",
        format_currency(metrics.total_outstanding, symbol),
        format_currency(metrics.overdue_amount, symbol),
        metrics.overdue_count,
        if metrics.overdue_count == 1 { "" } else { "s" }
    );
    println!("Total: {} of {} invoices", shown.len(), all.len());
    println!("Use index number with show/edit/send/pay/cancel/share (e.g., 'tally show 1')");

    Ok(())
}

fn print_invoice(invoice: &Invoice, client_label: &str, symbol: &str, today: NaiveDate) {
    let status = invoice.status(today);
    let totals = invoice.totals();

    println!("Invoice #{}", invoice.invoice_number);
    println!("{}", "-".repeat(50));
    println!("Client:   {client_label}");
    println!("Status:   {} ({})", status.label(), status.description());
    println!("Issued:   {}", format_date(invoice.issue_date));
    println!("Due:      {}", format_date(invoice.due_date));
    println!();

    let rows: Vec<LineRow> = invoice
        .sorted_line_items()
        .into_iter()
        .map(|li| match li.kind {
            LineItemKind::Section => LineRow {
                position: li.position,
                description: li.description.to_uppercase(),
                quantity: String::new(),
                unit: String::new(),
                price: String::new(),
                amount: String::new(),
            },
            LineItemKind::Discount => LineRow {
                position: li.position,
                description: format!("Discount: {}", li.description),
                quantity: String::new(),
                unit: String::new(),
                price: String::new(),
                amount: format_currency(li.line_total(), symbol),
            },
            LineItemKind::Item => LineRow {
                position: li.position,
                description: li.description.clone(),
                quantity: li.quantity.unwrap_or_default().normalize().to_string(),
                unit: li.unit_type.map(|u| u.to_string()).unwrap_or_default(),
                price: format_currency(li.unit_price.unwrap_or_default(), symbol),
                amount: format_currency(li.line_total(), symbol),
            },
        })
        .collect();

    if rows.is_empty() {
        println!("No line items.");
    } else {
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    println!();
    println!("Subtotal: {:>16}", format_currency(totals.subtotal, symbol));
    if !totals.total_discount.is_zero() {
        println!("Discount: {:>16}", format_currency(totals.total_discount, symbol));
    }
    println!("Total:    {:>16}", format_currency(totals.total, symbol));

    if let Some(notes) = &invoice.notes {
        println!();
        println!("Notes: {notes}");
    }
}

fn cmd_show(cfg_dir: &Path, invoice_ref: &str, now: DateTime<Utc>) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;
    let invoice = store.get_invoice(&invoice_number)?;

    let client = client_name(&store, &invoice.client_id);
    print_invoice(
        &invoice,
        &client,
        &config.invoice.currency_symbol,
        now.date_naive(),
    );
    println!();
    println!("Link: {}", config.invoice.share_url(&invoice.token));
    Ok(())
}

fn cmd_send(cfg_dir: &Path, invoice_ref: &str, now: DateTime<Utc>) -> Result<()> {
    let (config, mut store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;
    let invoice = send_invoice(&mut store, &invoice_number, now)?;
    let client = store.get_client(&invoice.client_id)?;

    println!("Sent {} to {}", invoice.invoice_number, client.email);
    println!("  Link: {}", config.invoice.share_url(&invoice.token));
    Ok(())
}

fn cmd_pay(
    cfg_dir: &Path,
    invoice_ref: &str,
    date: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    let (config, mut store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;

    let paid_at = match date {
        Some(s) => start_of_day(parse_date(&s)?),
        None => now,
    };
    let invoice = mark_invoice_paid(&mut store, &invoice_number, paid_at, now)?;

    println!(
        "Marked {} as paid ({})",
        invoice.invoice_number,
        format_currency(invoice.totals().total, &config.invoice.currency_symbol)
    );
    Ok(())
}

fn cmd_cancel(cfg_dir: &Path, invoice_ref: &str, now: DateTime<Utc>) -> Result<()> {
    let (_, mut store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;
    let invoice = cancel_invoice(&mut store, &invoice_number, now)?;

    println!("Cancelled {}", invoice.invoice_number);
    Ok(())
}

fn cmd_share(cfg_dir: &Path, invoice_ref: &str) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let invoice_number = resolve_invoice_number(&store, invoice_ref)?;
    let invoice = store.get_invoice(&invoice_number)?;

    println!("{}", config.invoice.share_url(&invoice.token));
    Ok(())
}

/// Render the client-facing view of a shared invoice
fn cmd_public(cfg_dir: &Path, token: &str, json: bool, now: DateTime<Utc>) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let view = public_invoice(&store, token, now.date_naive())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", config.business.name);
    println!("{}", config.business.email);
    println!();

    let client_label = match &view.client.company {
        Some(company) => format!("{} ({company})", view.client.name),
        None => view.client.name.clone(),
    };
    print_invoice(
        &view.invoice,
        &client_label,
        &config.invoice.currency_symbol,
        now.date_naive(),
    );

    println!();
    if view.is_paid {
        println!("This invoice has been paid. Thank you!");
    } else if view.can_pay {
        println!(
            "Amount due: {}",
            format_currency(view.totals.total, &config.invoice.currency_symbol)
        );
    }
    Ok(())
}

fn cmd_dashboard(cfg_dir: &Path, limit: usize, now: DateTime<Utc>) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let clients = store.list_clients()?;
    let invoices = store.list_invoices()?;
    let symbol = &config.invoice.currency_symbol;
    let today = now.date_naive();

    let metrics = compute_metrics(&invoices, now);
    println!("Dashboard");
    println!("{}", "-".repeat(50));
    println!(
        "Outstanding:       {}",
        format_currency(metrics.total_outstanding, symbol)
    );
    println!(
        "Overdue:           {} ({} invoice{})",
        format_currency(metrics.overdue_amount, symbol),
        metrics.overdue_count,
        if metrics.overdue_count == 1 { "" } else { "s" }
    );
    println!(
        "Paid this month:   {}",
        format_currency(metrics.total_paid_this_month, symbol)
    );
    println!(
        "Paid this year:    {}",
        format_currency(metrics.total_paid_ytd, symbol)
    );

    println!();
    println!("Recent invoices:");
    let recent = recent_invoices(&invoices, limit);
    if recent.is_empty() {
        println!("  No invoices yet.");
    }
    for invoice in recent {
        println!(
            "  {}  {:<24} {:>14}  {}",
            invoice.invoice_number,
            truncate(&client_name(&store, &invoice.client_id), 24),
            format_currency(invoice.totals().total, symbol),
            invoice.status(today).label()
        );
    }

    println!();
    println!("Recent activity:");
    let activity = recent_activity(&clients, &invoices, now, limit);
    if activity.is_empty() {
        println!("  Nothing yet.");
        return Ok(());
    }
    let rows: Vec<ActivityRow> = activity
        .iter()
        .map(|a| ActivityRow {
            when: relative_time(a.timestamp, now),
            event: a.kind.label().to_string(),
            details: a.description.clone(),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show configuration summary
fn cmd_status(cfg_dir: &Path, now: DateTime<Utc>) -> Result<()> {
    let (config, store) = open_workspace(cfg_dir)?;
    let clients = store.list_clients()?;
    let invoices = store.list_invoices()?;
    let items = load_items(cfg_dir)?;

    let year = now.year();
    let next_seq = store.current_invoice_sequence(year)? + 1;
    let next_number = if next_seq > MAX_SEQUENCE {
        format!("none left for {year}")
    } else {
        format_invoice_number(year, next_seq)
    };

    println!("Tally Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("State file:       {}", store.path().display());
    println!("Business:         {}", config.business.name);
    println!("Currency:         {}", config.invoice.currency);
    println!("Clients:          {}", clients.len());
    println!("Items:            {}", items.len());
    println!("Invoices:         {}", invoices.len());
    println!("Next invoice:     {}", next_number);

    Ok(())
}
