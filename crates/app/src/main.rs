use std::time::Instant;

use ledger::Ledger;

mod error;
mod export;
mod load;
mod settings;
mod summary;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "treasury_report={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let started = Instant::now();

    tracing::info!(path = %settings.input.products.display(), "loading products");
    let products = load::products(csv::Reader::from_path(&settings.input.products)?);
    tracing::info!(path = %settings.input.movements.display(), "loading movements");
    let movements = load::movements(csv::Reader::from_path(&settings.input.movements)?);

    tracing::info!(
        movements = movements.dropped,
        products = products.dropped,
        "records removed during cleaning"
    );

    let ledger = Ledger::builder()
        .products(products.records)
        .movements(movements.records)
        .build()?;

    let report = ledger.report(&settings.report);
    let output = settings.output.dir.join(format!(
        "treasury_report_{}",
        chrono::Local::now().format("%Y-%m-%d")
    ));
    export::write_report(&output, &report)?;

    println!("{}", summary::render(&report.summary(), &output));
    tracing::info!(elapsed = ?started.elapsed(), "report completed");

    Ok(())
}
