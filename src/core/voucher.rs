//! Voucher business logic - the catalog users browse and redeem from.
//!
//! This module provides catalog browsing and search for users plus the
//! unguarded create/update/delete primitives. Admin authorization for those
//! primitives lives in [`crate::core::admin`]; start-up seeding calls them directly.

use crate::{
    config::store::StoreConfig,
    core::category,
    entities::{Voucher, voucher},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*, sea_query::LikeExpr};

/// Fields for a new voucher.
#[derive(Debug, Clone, Default)]
pub struct NewVoucher {
    /// Unique title
    pub title: String,
    /// Catalog description
    pub description: String,
    /// Cost per unit in points
    pub points: i64,
    /// Category to list under
    pub category_id: Option<i64>,
    /// Displayed inventory
    pub stock: i64,
    /// Create hidden
    pub is_hidden: bool,
    /// Image URL
    pub image: Option<String>,
}

/// Partial update of a voucher; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct VoucherChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<i64>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<i64>>,
    pub stock: Option<i64>,
    pub is_hidden: Option<bool>,
    pub image: Option<Option<String>>,
}

/// Catalog search filters. Empty filters match every visible voucher.
#[derive(Debug, Clone, Default)]
pub struct VoucherQuery {
    /// Case-insensitive match against title or description
    pub text: Option<String>,
    /// Restrict to one category
    pub category_id: Option<i64>,
    /// Only vouchers costing at most this many points
    pub max_points: Option<i64>,
}

/// Retrieves all visible vouchers ordered alphabetically by title.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_visible_vouchers(db: &DatabaseConnection) -> Result<Vec<voucher::Model>> {
    search_vouchers(db, &VoucherQuery::default()).await
}

/// Retrieves every voucher including hidden ones, for the admin console.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_all_vouchers(db: &DatabaseConnection) -> Result<Vec<voucher::Model>> {
    Voucher::find()
        .order_by_asc(voucher::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// `LIKE` pattern matching `text` anywhere, with `%` and `_` taken literally.
fn contains_pattern(text: &str) -> LikeExpr {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Searches visible vouchers.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_vouchers(
    db: &DatabaseConnection,
    query: &VoucherQuery,
) -> Result<Vec<voucher::Model>> {
    let mut condition = Condition::all().add(voucher::Column::IsHidden.eq(false));

    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(voucher::Column::Title.like(contains_pattern(text)))
                .add(voucher::Column::Description.like(contains_pattern(text))),
        );
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(voucher::Column::CategoryId.eq(category_id));
    }
    if let Some(max_points) = query.max_points {
        condition = condition.add(voucher::Column::Points.lte(max_points));
    }

    Voucher::find()
        .filter(condition)
        .order_by_asc(voucher::Column::Title)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a voucher by ID, hidden or not.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_voucher_by_id<C>(db: &C, voucher_id: i64) -> Result<Option<voucher::Model>>
where
    C: ConnectionTrait,
{
    Voucher::find_by_id(voucher_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a voucher by exact title, hidden or not.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_voucher_by_title(
    db: &DatabaseConnection,
    title: &str,
) -> Result<Option<voucher::Model>> {
    Voucher::find()
        .filter(voucher::Column::Title.eq(title.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a voucher a user may act on: it must exist and not be hidden.
///
/// # Errors
/// [`Error::VoucherNotFound`] or [`Error::VoucherUnavailable`].
pub async fn get_available_voucher<C>(db: &C, voucher_id: i64) -> Result<voucher::Model>
where
    C: ConnectionTrait,
{
    let voucher = get_voucher_by_id(db, voucher_id)
        .await?
        .ok_or_else(|| Error::VoucherNotFound {
            id: voucher_id.to_string(),
        })?;

    if voucher.is_hidden {
        return Err(Error::VoucherUnavailable { id: voucher_id });
    }

    Ok(voucher)
}

fn validate_fields(title: &str, points: i64, stock: i64) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("Voucher title cannot be empty"));
    }
    if points < 0 {
        return Err(Error::validation("Voucher points cannot be negative"));
    }
    if stock < 0 {
        return Err(Error::validation("Voucher stock cannot be negative"));
    }
    Ok(())
}

async fn ensure_category_exists(db: &DatabaseConnection, category_id: Option<i64>) -> Result<()> {
    if let Some(id) = category_id {
        if category::get_category_by_id(db, id).await?.is_none() {
            return Err(Error::CategoryNotFound {
                name: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Creates a voucher after validating its fields.
///
/// # Errors
/// Returns an error if:
/// - the title is blank, or points/stock are negative
/// - the category does not exist
/// - the title is already used
pub async fn create_voucher(db: &DatabaseConnection, new: NewVoucher) -> Result<voucher::Model> {
    validate_fields(&new.title, new.points, new.stock)?;
    ensure_category_exists(db, new.category_id).await?;

    let title = new.title.trim().to_string();
    if get_voucher_by_title(db, &title).await?.is_some() {
        return Err(Error::validation(format!(
            "A voucher titled '{title}' already exists"
        )));
    }

    let now = chrono::Utc::now().naive_utc();
    voucher::ActiveModel {
        title: Set(title),
        description: Set(new.description),
        points: Set(new.points),
        category_id: Set(new.category_id),
        stock: Set(new.stock),
        is_hidden: Set(new.is_hidden),
        image: Set(new.image),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Applies `changes` to an existing voucher.
///
/// # Errors
/// Returns an error if the voucher does not exist, the resulting fields are
/// invalid, the new title is taken, or the new category does not exist.
pub async fn update_voucher(
    db: &DatabaseConnection,
    voucher_id: i64,
    changes: VoucherChanges,
) -> Result<voucher::Model> {
    let current = get_voucher_by_id(db, voucher_id)
        .await?
        .ok_or_else(|| Error::VoucherNotFound {
            id: voucher_id.to_string(),
        })?;

    let title = changes
        .title
        .map_or_else(|| current.title.clone(), |t| t.trim().to_string());
    let points = changes.points.unwrap_or(current.points);
    let stock = changes.stock.unwrap_or(current.stock);
    validate_fields(&title, points, stock)?;

    if title != current.title {
        if let Some(existing) = get_voucher_by_title(db, &title).await? {
            if existing.id != current.id {
                return Err(Error::validation(format!(
                    "A voucher titled '{title}' already exists"
                )));
            }
        }
    }

    if let Some(category_id) = changes.category_id {
        ensure_category_exists(db, category_id).await?;
    }

    let mut active: voucher::ActiveModel = current.into();
    active.title = Set(title);
    active.points = Set(points);
    active.stock = Set(stock);
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(category_id) = changes.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(is_hidden) = changes.is_hidden {
        active.is_hidden = Set(is_hidden);
    }
    if let Some(image) = changes.image {
        active.image = Set(image);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    active.update(db).await.map_err(Into::into)
}

/// Deletes a voucher. Cart and wishlist rows referencing it go with it;
/// redemption history keeps its title snapshot.
///
/// # Errors
/// Returns [`Error::VoucherNotFound`] if the voucher does not exist.
pub async fn delete_voucher(db: &DatabaseConnection, voucher_id: i64) -> Result<()> {
    let voucher = get_voucher_by_id(db, voucher_id)
        .await?
        .ok_or_else(|| Error::VoucherNotFound {
            id: voucher_id.to_string(),
        })?;

    voucher.delete(db).await?;
    Ok(())
}

/// Creates configured categories and vouchers that are not in the store yet.
///
/// Existing rows are left alone, so admin edits survive restarts.
///
/// # Errors
/// Returns an error if a configured voucher is invalid or names an unknown category.
pub async fn seed_catalog(db: &DatabaseConnection, config: &StoreConfig) -> Result<usize> {
    let mut created = 0;

    for category_config in &config.categories {
        if category::get_category_by_name(db, &category_config.name)
            .await?
            .is_none()
        {
            category::create_category(db, category_config.name.clone()).await?;
            created += 1;
        }
    }

    for voucher_config in &config.vouchers {
        if get_voucher_by_title(db, &voucher_config.title).await?.is_some() {
            continue;
        }

        let category_id = match &voucher_config.category {
            Some(name) => Some(
                category::get_category_by_name(db, name)
                    .await?
                    .ok_or_else(|| Error::CategoryNotFound { name: name.clone() })?
                    .id,
            ),
            None => None,
        };

        create_voucher(
            db,
            NewVoucher {
                title: voucher_config.title.clone(),
                description: voucher_config.description.clone(),
                points: voucher_config.points,
                category_id,
                stock: voucher_config.stock,
                is_hidden: voucher_config.is_hidden,
                image: voucher_config.image.clone(),
            },
        )
        .await?;
        created += 1;
    }

    tracing::info!(created, "Catalog seeding finished");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::store::{CategoryConfig, VoucherConfig};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_voucher_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let blank = create_voucher(
            &db,
            NewVoucher {
                title: "  ".to_string(),
                points: 10,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(blank, Err(Error::Validation { .. })));

        let negative = create_voucher(
            &db,
            NewVoucher {
                title: "Coffee".to_string(),
                points: -1,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(negative, Err(Error::Validation { .. })));

        let negative_stock = create_voucher(
            &db,
            NewVoucher {
                title: "Coffee".to_string(),
                points: 1,
                stock: -5,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(negative_stock, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_voucher_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_voucher(
            &db,
            NewVoucher {
                title: "Coffee".to_string(),
                points: 100,
                category_id: Some(42),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::CategoryNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_vouchers_not_listed() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_voucher(&db, "Visible", 100).await?;
        let hidden = create_test_voucher(&db, "Secret", 100).await?;
        update_voucher(
            &db,
            hidden.id,
            VoucherChanges {
                is_hidden: Some(true),
                ..Default::default()
            },
        )
        .await?;

        let visible = list_visible_vouchers(&db).await?;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Visible");
        assert_eq!(list_all_vouchers(&db).await?.len(), 2);

        let unavailable = get_available_voucher(&db, hidden.id).await;
        assert!(matches!(unavailable, Err(Error::VoucherUnavailable { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_search_vouchers_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let dining = crate::core::category::create_category(&db, "Dining".to_string()).await?;
        create_categorised_voucher(&db, "Coffee for Two", 200, dining.id).await?;
        create_categorised_voucher(&db, "Dinner Buffet", 900, dining.id).await?;
        create_test_voucher(&db, "Movie Ticket", 300).await?;

        let by_text = search_vouchers(
            &db,
            &VoucherQuery {
                text: Some("coffee".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].title, "Coffee for Two");

        let by_category = search_vouchers(
            &db,
            &VoucherQuery {
                category_id: Some(dining.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_category.len(), 2);

        let affordable = search_vouchers(
            &db,
            &VoucherQuery {
                max_points: Some(300),
                ..Default::default()
            },
        )
        .await?;
        let titles: Vec<&str> = affordable.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Coffee for Two", "Movie Ticket"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_voucher(&db, "100% Cashback", 500).await?;
        create_test_voucher(&db, "1000 Bonus Miles", 800).await?;
        create_test_voucher(&db, "Gift_Card", 300).await?;
        create_test_voucher(&db, "Gift Card Deluxe", 600).await?;

        let percent = search_vouchers(
            &db,
            &VoucherQuery {
                text: Some("100%".to_string()),
                ..Default::default()
            },
        )
        .await?;
        let titles: Vec<&str> = percent.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["100% Cashback"]);

        let underscore = search_vouchers(
            &db,
            &VoucherQuery {
                text: Some("t_C".to_string()),
                ..Default::default()
            },
        )
        .await?;
        let titles: Vec<&str> = underscore.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Gift_Card"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_voucher_rejects_taken_title() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_voucher(&db, "Coffee", 100).await?;
        let tea = create_test_voucher(&db, "Tea", 80).await?;

        let result = update_voucher(
            &db,
            tea.id,
            VoucherChanges {
                title: Some(" Coffee ".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Keeping its own title is not a clash
        let same = update_voucher(
            &db,
            tea.id,
            VoucherChanges {
                title: Some("Tea".to_string()),
                points: Some(90),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(same.points, 90);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_voucher_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let voucher = create_test_voucher(&db, "Coffee", 100).await?;

        let updated = update_voucher(
            &db,
            voucher.id,
            VoucherChanges {
                points: Some(150),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.points, 150);
        assert_eq!(updated.title, "Coffee");
        assert!(updated.updated_at >= voucher.updated_at);

        let invalid = update_voucher(
            &db,
            voucher.id,
            VoucherChanges {
                points: Some(-3),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(invalid, Err(Error::Validation { .. })));

        let missing = update_voucher(&db, 999, VoucherChanges::default()).await;
        assert!(matches!(missing, Err(Error::VoucherNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_voucher() -> Result<()> {
        let db = setup_test_db().await?;
        let voucher = create_test_voucher(&db, "Coffee", 100).await?;

        delete_voucher(&db, voucher.id).await?;
        assert!(get_voucher_by_id(&db, voucher.id).await?.is_none());

        let again = delete_voucher(&db, voucher.id).await;
        assert!(matches!(again, Err(Error::VoucherNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config = StoreConfig {
            categories: vec![CategoryConfig {
                name: "Dining".to_string(),
            }],
            vouchers: vec![VoucherConfig {
                title: "Coffee for Two".to_string(),
                description: "Two regular coffees".to_string(),
                points: 200,
                category: Some("Dining".to_string()),
                stock: 20,
                is_hidden: false,
                image: None,
            }],
            ..Default::default()
        };

        assert_eq!(seed_catalog(&db, &config).await?, 2);
        assert_eq!(seed_catalog(&db, &config).await?, 0);

        let coffee = get_voucher_by_title(&db, "Coffee for Two").await?.unwrap();
        assert!(coffee.category_id.is_some());
        assert_eq!(coffee.stock, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let config = StoreConfig {
            vouchers: vec![VoucherConfig {
                title: "Orphan".to_string(),
                description: String::new(),
                points: 10,
                category: Some("Nowhere".to_string()),
                stock: 0,
                is_hidden: false,
                image: None,
            }],
            ..Default::default()
        };

        let result = seed_catalog(&db, &config).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { .. })));

        Ok(())
    }
}
