use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{CartItem, NewCartItem},
    traits::{CartApiError, DeleteResult},
};

pub async fn fetch_cart_for_user(email: &str, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, CartApiError> {
    let items =
        sqlx::query_as("SELECT * FROM cart_items WHERE user_email = $1 ORDER BY id").bind(email).fetch_all(conn).await?;
    Ok(items)
}

pub async fn insert_cart_item(
    item: NewCartItem,
    owner: &str,
    conn: &mut SqliteConnection,
) -> Result<CartItem, CartApiError> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO cart_items (user_email, menu_item_id, name, image, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(owner)
    .bind(item.menu_item_id)
    .bind(item.name)
    .bind(item.image)
    .bind(item.price)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn delete_cart_item(id: i64, owner: &str, conn: &mut SqliteConnection) -> Result<DeleteResult, CartApiError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_email = $2")
        .bind(id)
        .bind(owner)
        .execute(conn)
        .await?;
    Ok(DeleteResult::new(result.rows_affected()))
}

/// Deletes the cart items with the given ids that belong to `owner`. Returns the number of rows deleted.
pub async fn delete_cart_items_for_owner(
    ids: &[i64],
    owner: &str,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM cart_items WHERE user_email = ");
    builder.push_bind(owner).push(" AND id IN (");
    let mut id_list = builder.separated(", ");
    for id in ids {
        id_list.push_bind(*id);
    }
    builder.push(")");
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}
