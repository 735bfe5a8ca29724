//! Category business logic - the groups vouchers are listed under.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Lists all categories ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by exact name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category, trimming whitespace from the name.
///
/// # Errors
/// Returns an error if the name is blank or already taken.
pub async fn create_category(db: &DatabaseConnection, name: String) -> Result<category::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }

    if get_category_by_name(db, &name).await?.is_some() {
        return Err(Error::validation(format!(
            "A category named '{name}' already exists"
        )));
    }

    category::ActiveModel {
        name: Set(name),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Deletes a category. Vouchers in it become uncategorised.
///
/// # Errors
/// Returns [`Error::CategoryNotFound`] if the category does not exist.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let category = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;

    category.delete(db).await?;
    Ok(())
}
