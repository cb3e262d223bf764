//! CSV ingestion and boundary cleaning.
//!
//! The ledger rejects invalid records outright, so rows are cleaned here
//! first: duplicated ids keep the first occurrence, rows missing a critical
//! field are dropped, text is trimmed and codes are normalized. Every dropped
//! row is logged.

use std::{collections::HashSet, io};

use chrono::{NaiveDate, NaiveDateTime};
use ledger::{Currency, Money, Movement, OperationType, Product, ProductId};
use serde::{Deserialize, de::DeserializeOwned};

/// Records accepted from a CSV source and the number of rows left out.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

#[derive(Debug, Deserialize)]
struct MovementRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    id_movimiento: Option<u64>,
    fecha: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    producto_id: Option<u32>,
    tipo_operacion: Option<String>,
    monto: Option<String>,
    moneda: Option<String>,
    contraparte: Option<String>,
    descripcion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    producto_id: Option<u32>,
    nombre_producto: Option<String>,
}

pub fn movements<R: io::Read>(mut reader: csv::Reader<R>) -> Loaded<Movement> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut dropped = 0;

    for (line, row) in rows::<_, MovementRow>(&mut reader) {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!(?line, "unreadable movement row: {err}");
                dropped += 1;
                continue;
            }
        };
        if let Some(id) = row.id_movimiento
            && !seen.insert(id)
        {
            tracing::debug!(id, "duplicated movement id");
            dropped += 1;
            continue;
        }
        match movement_from_row(row) {
            Ok(movement) => records.push(movement),
            Err(reason) => {
                tracing::warn!(?line, "dropping movement: {reason}");
                dropped += 1;
            }
        }
    }

    tracing::info!(accepted = records.len(), dropped, "movements loaded");
    Loaded { records, dropped }
}

pub fn products<R: io::Read>(mut reader: csv::Reader<R>) -> Loaded<Product> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut dropped = 0;

    for (line, row) in rows::<_, ProductRow>(&mut reader) {
        let product = row
            .map_err(|err| err.to_string())
            .and_then(|row| {
                let id = row.producto_id.ok_or("missing producto_id")?;
                Product::new(ProductId(id), row.nombre_producto.as_deref().unwrap_or(""))
                    .map_err(|err| err.to_string())
            });
        match product {
            Ok(product) if seen.insert(product.id) => records.push(product),
            Ok(product) => {
                tracing::debug!(id = %product.id, "duplicated product id");
                dropped += 1;
            }
            Err(reason) => {
                tracing::warn!(?line, "dropping product: {reason}");
                dropped += 1;
            }
        }
    }

    tracing::info!(accepted = records.len(), dropped, "products loaded");
    Loaded { records, dropped }
}

/// Deserializes each record together with the line it starts on. Quoted
/// fields may span lines, so the line is read from the record position.
fn rows<R, T>(reader: &mut csv::Reader<R>) -> impl Iterator<Item = (Option<u64>, csv::Result<T>)>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let headers = reader.headers().ok().cloned();
    reader.records().map(move |record| match record {
        Ok(record) => (
            record.position().map(csv::Position::line),
            record.deserialize(headers.as_ref()),
        ),
        Err(err) => (err.position().map(csv::Position::line), Err(err)),
    })
}

fn movement_from_row(row: MovementRow) -> Result<Movement, String> {
    let id = row.id_movimiento.ok_or("missing id_movimiento")?;
    let date = required(row.fecha.as_deref(), "fecha").and_then(parse_date)?;
    let operation = OperationType::try_from(required(row.tipo_operacion.as_deref(), "tipo_operacion")?)
        .map_err(|err| err.to_string())?;
    let amount: Money = required(row.monto.as_deref(), "monto")?
        .parse()
        .map_err(|err: ledger::LedgerError| err.to_string())?;
    let currency = Currency::try_from(required(row.moneda.as_deref(), "moneda")?)
        .map_err(|err| err.to_string())?;

    let mut movement =
        Movement::new(id, date, operation, amount, currency).map_err(|err| err.to_string())?;
    if let Some(product_id) = row.producto_id {
        movement = movement.with_product(ProductId(product_id));
    }
    if let Some(counterparty) = row.contraparte.as_deref() {
        movement = movement.with_counterparty(counterparty);
    }
    if let Some(description) = row.descripcion.as_deref() {
        movement = movement.with_description(description);
    }
    Ok(movement)
}

fn required<'a>(value: Option<&'a str>, column: &str) -> Result<&'a str, String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing {column}"))
}

/// Accepts plain dates and the `date time` form spreadsheet tools write.
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| format!("invalid fecha: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVEMENTS: &str = "\
id_movimiento,fecha,producto_id,tipo_operacion,monto,moneda,contraparte,descripcion
1,2024-01-02,2,ingreso,1500000.50,PEN,BCP,Overnight - BCP
2,2024-01-02,4, Egreso ,20000,usd , Citibank ,
1,2024-01-03,2,egreso,10,PEN,BCP,duplicate
3,,2,ingreso,10,PEN,BCP,no date
4,2024-01-04,2,transfer,10,PEN,BCP,bad op
5,2024-01-04,,ingreso,abc,PEN,BCP,bad amount
6,2024-01-05 00:00:00,,egreso,7.5,USD,,
7,2024-01-05,1,ingreso,-3,PEN,BBVA,negative
";

    const PRODUCTS: &str = "\
producto_id,nombre_producto
1,Depósito a Plazo
2,Overnight
2,Overnight again
x,Broken
3,
";

    #[test]
    fn movements_are_cleaned() {
        let loaded = movements(csv::Reader::from_reader(MOVEMENTS.as_bytes()));
        let ids: Vec<u64> = loaded.records.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 6]);
        assert_eq!(loaded.dropped, 5);

        let first = &loaded.records[0];
        assert_eq!(first.amount, Money::new(150_000_050));
        assert_eq!(first.operation, OperationType::Inflow);
        assert_eq!(first.product_id, Some(ProductId(2)));

        let second = &loaded.records[1];
        assert_eq!(second.operation, OperationType::Outflow);
        assert_eq!(second.currency, Currency::Usd);
        assert_eq!(second.counterparty.as_deref(), Some("Citibank"));
        assert_eq!(second.description, None);

        let last = &loaded.records[2];
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(last.product_id, None);
        assert_eq!(last.counterparty, None);
    }

    #[test]
    fn products_keep_first_valid_row() {
        let loaded = products(csv::Reader::from_reader(PRODUCTS.as_bytes()));
        let names: Vec<&str> = loaded.records.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Depósito a Plazo", "Overnight"]);
        assert_eq!(loaded.dropped, 3);
    }

    #[test]
    fn row_lines_account_for_multiline_fields() {
        let data = "\
id_movimiento,fecha,producto_id,tipo_operacion,monto,moneda,contraparte,descripcion
1,2024-01-02,2,ingreso,10,PEN,BCP,\"first line
second line\"
2,2024-01-03,2,egreso,10,PEN,BCP,plain
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let lines: Vec<Option<u64>> = rows::<_, MovementRow>(&mut reader)
            .map(|(line, row)| {
                assert!(row.is_ok());
                line
            })
            .collect();
        assert_eq!(lines, vec![Some(2), Some(4)]);

        let loaded = movements(csv::Reader::from_reader(data.as_bytes()));
        assert_eq!(
            loaded.records[0].description.as_deref(),
            Some("first line\nsecond line")
        );
    }

    #[test]
    fn empty_file_loads_nothing() {
        let loaded = movements(csv::Reader::from_reader(
            "id_movimiento,fecha,producto_id,tipo_operacion,monto,moneda,contraparte,descripcion\n"
                .as_bytes(),
        ));
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.dropped, 0);
    }
}
