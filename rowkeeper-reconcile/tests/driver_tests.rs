//! End-to-end driver tests on virtual time: a simulated host churns the
//! document while the driver keeps the enforced order imposed.

use rowkeeper_dom::{Document, NodeId};
use rowkeeper_engine::{LabelFilter, RowSorter};
use rowkeeper_reconcile::ReconcileDriver;
use rowkeeper_types::{ActiveMode, ReconcilerConfig, SortDirection};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn mail_document(subjects: &[&str]) -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new();
    let main = doc.create_element("div");
    doc.set_attr(main, "role", "main");
    doc.append_child(doc.root(), main);
    let table = doc.create_element("table");
    doc.set_attr(table, "role", "grid");
    doc.append_child(main, table);
    let tbody = doc.create_element("tbody");
    doc.append_child(table, tbody);

    let rows = subjects
        .iter()
        .map(|s| add_row(&mut doc, tbody, s))
        .collect();
    (doc, tbody, rows)
}

fn add_row(doc: &mut Document, tbody: NodeId, subject: &str) -> NodeId {
    let row = doc.create_element("tr");
    doc.set_attr(row, "class", "zA");
    doc.set_attr(row, "aria-label", subject);
    doc.append_child(tbody, row);
    row
}

fn subjects(doc: &Document, tbody: NodeId) -> Vec<String> {
    doc.children(tbody)
        .iter()
        .map(|&row| doc.attr(row, "aria-label").unwrap_or("").to_string())
        .collect()
}

async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn user_sort_orders_the_list() {
    let (doc, tbody, _) = mail_document(&["charlie", "alpha", "bravo"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(50).await;

    assert_eq!(
        subjects(&doc.lock().unwrap(), tbody),
        ["alpha", "bravo", "charlie"]
    );
    assert_eq!(client.mode(), ActiveMode::Ascending);

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn host_churn_is_reconciled_after_the_debounce() {
    let (doc, tbody, _) = mail_document(&["charlie", "alpha", "bravo"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(500).await;

    // Host prepends a new row out of order.
    {
        let mut doc = doc.lock().unwrap();
        let row = add_row(&mut doc, tbody, "aardvark");
        let first = doc.children(tbody)[0];
        doc.insert_before(tbody, row, first);
    }
    client.host_changed().await.unwrap();

    // Inside the debounce window nothing has moved yet.
    settle(100).await;
    assert_eq!(subjects(&doc.lock().unwrap(), tbody)[0], "aardvark");

    // Past the debounce the order is re-imposed.
    settle(1_000).await;
    assert_eq!(
        subjects(&doc.lock().unwrap(), tbody),
        ["aardvark", "alpha", "bravo", "charlie"]
    );

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn engine_writes_do_not_feed_back() {
    let (doc, tbody, _) = mail_document(&["delta", "bravo", "alpha", "charlie"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(50).await;
    let after_sort = subjects(&doc.lock().unwrap(), tbody);

    // Let every timer the engine's own writes could possibly have armed
    // play out; the order must not churn further and the journal must be
    // empty (each pass drained its own records).
    settle(30_000).await;
    assert_eq!(subjects(&doc.lock().unwrap(), tbody), after_sort);
    assert!(doc.lock().unwrap().take_mutations().is_empty());

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reset_restores_pristine_order_and_disables_enforcement() {
    let (doc, tbody, _) = mail_document(&["charlie", "alpha", "bravo"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Descending).await.unwrap();
    settle(50).await;
    client.reset().await.unwrap();
    settle(50).await;

    assert_eq!(
        subjects(&doc.lock().unwrap(), tbody),
        ["charlie", "alpha", "bravo"]
    );
    assert_eq!(client.mode(), ActiveMode::None);

    // With enforcement off, host churn stays as the host left it.
    {
        let mut doc = doc.lock().unwrap();
        let first = doc.children(tbody)[0];
        doc.append_child(tbody, first);
    }
    client.host_changed().await.unwrap();
    settle(5_000).await;
    assert_eq!(
        subjects(&doc.lock().unwrap(), tbody),
        ["alpha", "bravo", "charlie"]
    );

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn container_swap_is_rewatched_and_reapplied() {
    let (doc, old_tbody, rows) = mail_document(&["charlie", "alpha", "bravo"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(500).await;

    // Host replaces the tbody wholesale, moving the rows over unsorted.
    let new_tbody = {
        let mut doc = doc.lock().unwrap();
        let table = doc.parent(old_tbody).unwrap();
        let new_tbody = doc.create_element("tbody");
        for &row in &[rows[0], rows[2], rows[1]] {
            doc.append_child(new_tbody, row);
        }
        doc.detach(old_tbody);
        doc.append_child(table, new_tbody);
        new_tbody
    };
    client.host_changed().await.unwrap();

    // Identity poll + settle delay later, the mode is enforced on the new
    // container and its rows are retagged from the swap-time order.
    settle(3_000).await;
    assert_eq!(
        subjects(&doc.lock().unwrap(), new_tbody),
        ["alpha", "bravo", "charlie"]
    );

    // Reset restores the retagged baseline: the order the rows had in the
    // new container when it was first observed, not the pre-swap order.
    client.reset().await.unwrap();
    settle(50).await;
    assert_eq!(
        subjects(&doc.lock().unwrap(), new_tbody),
        ["charlie", "bravo", "alpha"]
    );

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn sweep_self_heals_silent_reorders() {
    let (doc, tbody, rows) = mail_document(&["alpha", "bravo", "charlie"]);
    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(500).await;

    // Host reorders without us being told (no host_changed call): the
    // journal fills but nothing delivers it. Only the sweep can notice.
    {
        let mut doc = doc.lock().unwrap();
        doc.append_child(tbody, rows[0]);
        doc.take_mutations();
    }
    settle(10_000).await;
    assert_eq!(
        subjects(&doc.lock().unwrap(), tbody),
        ["alpha", "bravo", "charlie"]
    );

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn foregrounding_restores_order() {
    let (doc, tbody, rows) = mail_document(&["alpha", "bravo"]);
    let doc = Arc::new(Mutex::new(doc));
    // Sweep pushed far out so only the visibility hook can heal.
    let config = ReconcilerConfig {
        sweep_interval_ms: 600_000,
        ..ReconcilerConfig::default()
    };
    let (driver, client) = ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), config);
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(500).await;
    client.visibility(false).await.unwrap();

    {
        let mut doc = doc.lock().unwrap();
        doc.append_child(tbody, rows[0]);
        doc.take_mutations();
    }
    client.visibility(true).await.unwrap();
    settle(200).await;
    assert_eq!(subjects(&doc.lock().unwrap(), tbody), ["alpha", "bravo"]);

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn list_rendered_late_is_discovered() {
    let doc = Arc::new(Mutex::new(Document::new()));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let task = tokio::spawn(driver.run());

    // Sorting before the host rendered anything is a harmless no-op.
    client.sort(SortDirection::Ascending).await.unwrap();
    settle(2_000).await;

    // Host renders the list late; discovery (or the identity poll) finds it
    // and the still-active mode is imposed.
    let tbody = {
        let mut doc = doc.lock().unwrap();
        let main = doc.create_element("div");
        doc.set_attr(main, "role", "main");
        let root = doc.root();
        doc.append_child(root, main);
        let table = doc.create_element("table");
        doc.set_attr(table, "role", "grid");
        doc.append_child(main, table);
        let tbody = doc.create_element("tbody");
        doc.append_child(table, tbody);
        add_row(&mut doc, tbody, "bravo");
        add_row(&mut doc, tbody, "alpha");
        doc.take_mutations();
        tbody
    };
    client.host_changed().await.unwrap();
    settle(5_000).await;

    assert_eq!(subjects(&doc.lock().unwrap(), tbody), ["alpha", "bravo"]);

    client.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn partition_is_reapplied_with_the_sort() {
    let (mut doc, tbody, rows) = mail_document(&["bravo", "alpha"]);
    // Annotate the first row with a label chip.
    let region = doc.create_element("div");
    doc.set_attr(region, "class", "ar as");
    let chip = doc.create_element("div");
    doc.set_attr(chip, "class", "at");
    doc.set_attr(chip, "title", "Newsletters");
    doc.append_child(region, chip);
    doc.append_child(rows[0], region);

    let mut filter = LabelFilter::with_defaults();
    filter.hide("Newsletters");

    let doc = Arc::new(Mutex::new(doc));
    let (driver, client) =
        ReconcileDriver::new(doc.clone(), RowSorter::with_defaults(), ReconcilerConfig::default());
    let driver = driver.with_filter(filter);
    let task = tokio::spawn(driver.run());

    client.sort(SortDirection::Ascending).await.unwrap();
    settle(50).await;

    let doc_guard = doc.lock().unwrap();
    assert!(!doc_guard.is_visible(rows[0]));
    assert!(doc_guard.is_visible(rows[1]));
    // Hidden rows are not part of the visible ordering.
    assert_eq!(doc_guard.children(tbody).len(), 2);
    drop(doc_guard);

    client.shutdown().await.unwrap();
    task.await.unwrap();
}
