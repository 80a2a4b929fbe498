//! rowkeeper simulator
//!
//! Builds a synthetic mail-style host document, runs the reconcile driver
//! against a scripted host-churn scenario, and prints the orderings the
//! driver maintains along the way.
//!
//! Usage:
//!   rowkeeper-sim --scenario burst
//!   rowkeeper-sim --scenario swap --direction desc --verbose

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rowkeeper_dom::{Document, NodeId};
use rowkeeper_engine::RowSorter;
use rowkeeper_reconcile::{DriverClient, ReconcileDriver};
use rowkeeper_types::{ReconcilerConfig, SortDirection};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const SUBJECTS: &[&str] = &[
    "🔥 Quarterly report",
    "Item 10: retro notes",
    "Item 2: retro notes",
    "Re: Lunch?",
    "☀️ Morning Digest",
    "Invoice #00123 overdue",
    "team sync",
];

#[derive(Parser, Debug)]
#[command(name = "rowkeeper-sim")]
#[command(about = "Scripted host-churn scenarios against the reconcile driver")]
struct Args {
    /// Churn scenario to run
    #[arg(short, long, value_enum, default_value = "burst")]
    scenario: Scenario,

    /// Direction to enforce (asc/desc)
    #[arg(short, long, default_value = "asc")]
    direction: SortDirection,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Scenario {
    /// Rapid prepends inside the debounce window.
    Burst,
    /// The container is replaced wholesale mid-enforcement.
    Swap,
    /// A row is destroyed and recreated as a fresh element.
    Recreate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let (doc, tbody) = build_mailbox();
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) = ReconcileDriver::new(
        doc.clone(),
        RowSorter::with_defaults(),
        ReconcilerConfig::default(),
    );
    let task = tokio::spawn(driver.run());

    println!("host order:      {:?}", order(&doc, tbody));
    client.sort(args.direction).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("enforced order:  {:?}", order(&doc, tbody));

    let final_tbody = match args.scenario {
        Scenario::Burst => run_burst(&doc, tbody, &client).await?,
        Scenario::Swap => run_swap(&doc, tbody, &client).await?,
        Scenario::Recreate => run_recreate(&doc, tbody, &client).await?,
    };

    tokio::time::sleep(Duration::from_millis(3_000)).await;
    println!("reconciled:      {:?}", order(&doc, final_tbody));

    client.reset().await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("after reset:     {:?}", order(&doc, final_tbody));

    client.shutdown().await?;
    task.await?;
    Ok(())
}

/// Five prepends in quick succession; the driver must coalesce them into a
/// single (delayed) re-sort rather than five.
async fn run_burst(
    doc: &Arc<Mutex<Document>>,
    tbody: NodeId,
    client: &DriverClient,
) -> Result<NodeId> {
    info!("scenario: burst of host prepends");
    for n in 0..5 {
        {
            let mut doc = doc.lock().expect("document lock poisoned");
            let subject = format!("Breaking news {n}");
            let row = make_row(&mut doc, &subject);
            match doc.children(tbody).first().copied() {
                Some(first) => doc.insert_before(tbody, row, first),
                None => doc.append_child(tbody, row),
            };
        }
        client.host_changed().await?;
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    Ok(tbody)
}

/// The host throws the container away and renders a new one, rows moved
/// over in host order.
async fn run_swap(
    doc: &Arc<Mutex<Document>>,
    tbody: NodeId,
    client: &DriverClient,
) -> Result<NodeId> {
    info!("scenario: container swap");
    let new_tbody = {
        let mut doc = doc.lock().expect("document lock poisoned");
        let table = doc.parent(tbody).expect("tbody is attached");
        let new_tbody = doc.create_element("tbody");
        let mut rows: Vec<NodeId> = doc.children(tbody).to_vec();
        rows.reverse();
        for row in rows {
            doc.append_child(new_tbody, row);
        }
        doc.detach(tbody);
        doc.append_child(table, new_tbody);
        new_tbody
    };
    client.host_changed().await?;
    Ok(new_tbody)
}

/// The host destroys one row element and recreates an equivalent one, the
/// way virtual-DOM hosts often do.
async fn run_recreate(
    doc: &Arc<Mutex<Document>>,
    tbody: NodeId,
    client: &DriverClient,
) -> Result<NodeId> {
    info!("scenario: row destroyed and recreated");
    {
        let mut doc = doc.lock().expect("document lock poisoned");
        let victim = doc.children(tbody)[0];
        let subject = doc.text_content(victim).trim().to_string();
        doc.detach(victim);
        let reborn = make_row(&mut doc, &subject);
        doc.append_child(tbody, reborn);
    }
    client.host_changed().await?;
    Ok(tbody)
}

fn build_mailbox() -> (Document, NodeId) {
    let mut doc = Document::new();
    let main = doc.create_element("div");
    doc.set_attr(main, "role", "main");
    doc.append_child(doc.root(), main);
    let table = doc.create_element("table");
    doc.set_attr(table, "role", "grid");
    doc.append_child(main, table);
    let tbody = doc.create_element("tbody");
    doc.append_child(table, tbody);
    for subject in SUBJECTS {
        let row = make_row(&mut doc, subject);
        doc.append_child(tbody, row);
    }
    (doc, tbody)
}

fn make_row(doc: &mut Document, subject: &str) -> NodeId {
    let row = doc.create_element("tr");
    doc.set_attr(row, "class", "zA");
    let region = doc.create_element("div");
    doc.set_attr(region, "class", "y6");
    let span = doc.create_element("span");
    doc.set_attr(span, "class", "bog");
    doc.set_text(span, subject);
    doc.append_child(region, span);
    doc.append_child(row, region);
    row
}

fn order(doc: &Arc<Mutex<Document>>, tbody: NodeId) -> Vec<String> {
    let doc = doc.lock().expect("document lock poisoned");
    doc.children(tbody)
        .iter()
        .map(|&row| doc.text_content(row).trim().to_string())
        .collect()
}
