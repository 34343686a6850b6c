use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem, Review},
    traits::{DeleteResult, MenuApiError, UpdateResult},
};

pub async fn fetch_menu(conn: &mut SqliteConnection) -> Result<Vec<MenuItem>, MenuApiError> {
    let items = sqlx::query_as("SELECT * FROM menu_items ORDER BY id").fetch_all(conn).await?;
    Ok(items)
}

pub async fn fetch_menu_item(id: i64, conn: &mut SqliteConnection) -> Result<Option<MenuItem>, MenuApiError> {
    let item = sqlx::query_as("SELECT * FROM menu_items WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(item)
}

pub async fn fetch_menu_items_for_admin(
    admin_email: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<MenuItem>, MenuApiError> {
    let items = sqlx::query_as("SELECT * FROM menu_items WHERE admin_email = $1 ORDER BY id")
        .bind(admin_email)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn insert_menu_item(
    item: NewMenuItem,
    admin_email: &str,
    conn: &mut SqliteConnection,
) -> Result<MenuItem, MenuApiError> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO menu_items (name, category, price, recipe, image, admin_email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(item.name)
    .bind(item.category)
    .bind(item.price)
    .bind(item.recipe)
    .bind(item.image)
    .bind(admin_email)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

/// Applies the non-empty fields of `update` to the menu item. An empty update does not touch the database.
pub async fn update_menu_item(
    id: i64,
    update: MenuItemUpdate,
    conn: &mut SqliteConnection,
) -> Result<UpdateResult, MenuApiError> {
    if update.is_empty() {
        return Ok(UpdateResult::new(0, 0));
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE menu_items SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ").push_bind_unseparated(name);
    }
    if let Some(category) = update.category {
        set_clause.push("category = ").push_bind_unseparated(category);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ").push_bind_unseparated(price);
    }
    if let Some(recipe) = update.recipe {
        set_clause.push("recipe = ").push_bind_unseparated(recipe);
    }
    builder.push(" WHERE id = ").push_bind(id);
    let result = builder.build().execute(conn).await?;
    let n = result.rows_affected();
    debug!("🍽️ Update of menu item #{id} affected {n} rows");
    Ok(UpdateResult::new(n, n))
}

pub async fn delete_menu_item(id: i64, conn: &mut SqliteConnection) -> Result<DeleteResult, MenuApiError> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1").bind(id).execute(conn).await?;
    Ok(DeleteResult::new(result.rows_affected()))
}

pub async fn count_menu_items(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items").fetch_one(conn).await?;
    Ok(count)
}

pub async fn fetch_reviews(conn: &mut SqliteConnection) -> Result<Vec<Review>, MenuApiError> {
    let reviews = sqlx::query_as("SELECT * FROM reviews ORDER BY id").fetch_all(conn).await?;
    Ok(reviews)
}
