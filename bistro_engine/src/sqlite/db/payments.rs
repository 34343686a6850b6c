use chrono::Utc;
use log::trace;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{NewPayment, Payment};

/// Inserts a payment record, returning its id. This is not atomic on its own; embed it in a transaction alongside the
/// cart clean-up.
pub async fn insert_payment(payment: &NewPayment, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let date = payment.date.unwrap_or_else(Utc::now);
    let result = sqlx::query(
        r#"
            INSERT INTO payments (email, price, transaction_id, cart_ids, menu_item_ids, status, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7);
        "#,
    )
    .bind(&payment.email)
    .bind(payment.price)
    .bind(&payment.transaction_id)
    .bind(Json(&payment.cart_ids))
    .bind(Json(&payment.menu_item_ids))
    .bind(&payment.status)
    .bind(date)
    .execute(conn)
    .await?;
    let id = result.last_insert_rowid();
    trace!("💰️ Payment {} stored with id {id}", payment.transaction_id);
    Ok(id)
}

pub async fn fetch_payments_for_email(email: &str, conn: &mut SqliteConnection) -> Result<Vec<Payment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payments WHERE email = $1 ORDER BY date DESC, id DESC").bind(email).fetch_all(conn).await
}

/// The number of payments and the sum of their prices.
pub async fn payment_totals(conn: &mut SqliteConnection) -> Result<(i64, f64), sqlx::Error> {
    let totals: (i64, f64) =
        sqlx::query_as("SELECT COUNT(*), CAST(COALESCE(SUM(price), 0) AS REAL) FROM payments").fetch_one(conn).await?;
    Ok(totals)
}
