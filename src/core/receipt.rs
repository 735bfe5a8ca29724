//! Receipt generation - turns a ledger row into a downloadable document.

use crate::{
    core::{profile, redemption, session::Session},
    entities::{profile as profile_entity, redemption as redemption_entity},
    errors::{Error, Result},
};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use sea_orm::DatabaseConnection;

const RULE: &str = "----------------------------------------";

// A5 portrait, Courier so the labels line up
const PAGE_WIDTH_MM: f32 = 148.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 15.0;
const FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.5;

/// A rendered receipt ready to be sent as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Suggested attachment name
    pub file_name: String,
    /// Text lines printed on the page, top to bottom
    pub lines: Vec<String>,
    /// The PDF document
    pub pdf: Vec<u8>,
}

/// The text of a receipt, one entry per printed line.
#[must_use]
pub fn receipt_lines(
    record: &redemption_entity::Model,
    customer: &profile_entity::Model,
) -> Vec<String> {
    let unit_points = if record.quantity > 0 {
        record.points_used / i64::from(record.quantity)
    } else {
        record.points_used
    };
    let name = customer
        .display_name
        .as_deref()
        .unwrap_or(customer.user_id.as_str());

    let mut lines = vec![
        "OPTIMA BANK".to_string(),
        "Voucher Redemption Receipt".to_string(),
        RULE.to_string(),
        format!("Receipt no.:  {:06}", record.id),
        format!(
            "Date:         {}",
            record.redeemed_at.format("%Y-%m-%d %H:%M UTC")
        ),
        format!("Customer:     {name}"),
    ];
    if let Some(email) = &customer.email {
        lines.push(format!("Email:        {email}"));
    }
    lines.extend([
        RULE.to_string(),
        format!("Voucher:      {}", record.voucher_title),
        format!("Quantity:     {}", record.quantity),
        format!("Unit points:  {unit_points}"),
        format!("Total points: {}", record.points_used),
        RULE.to_string(),
        "Thank you for banking with Optima.".to_string(),
    ]);
    lines
}

/// Renders the receipt for one redemption as a single-page PDF.
///
/// # Errors
/// [`Error::ReceiptRender`] if the PDF cannot be produced.
pub fn render_receipt(
    record: &redemption_entity::Model,
    customer: &profile_entity::Model,
) -> Result<Receipt> {
    let lines = receipt_lines(record, customer);
    let title = format!("Optima Bank receipt {:06}", record.id);

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Receipt",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| Error::ReceiptRender {
            reason: e.to_string(),
        })?;

    let canvas = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    for line in &lines {
        canvas.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    let pdf = doc.save_to_bytes().map_err(|e| Error::ReceiptRender {
        reason: e.to_string(),
    })?;

    Ok(Receipt {
        file_name: format!("optima-receipt-{:06}.pdf", record.id),
        lines,
        pdf,
    })
}

/// Loads one of the signed-in user's redemptions and renders its receipt.
///
/// # Errors
/// [`Error::RedemptionNotFound`] if the redemption is not the caller's, or
/// [`Error::ProfileNotFound`] if the caller has no profile.
pub async fn receipt_for(
    db: &DatabaseConnection,
    session: &Session,
    redemption_id: i64,
) -> Result<Receipt> {
    let record = redemption::get_redemption(db, session, redemption_id).await?;
    let customer = profile::get_profile(db, &record.user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: record.user_id.clone(),
        })?;

    render_receipt(&record, &customer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::redemption::{RedeemRequest, redeem};
    use crate::test_utils::*;
    use chrono::TimeZone;

    fn sample_record() -> redemption_entity::Model {
        redemption_entity::Model {
            id: 42,
            user_id: "u1".to_string(),
            voucher_id: 7,
            voucher_title: "Coffee for Two".to_string(),
            points_used: 600,
            quantity: 3,
            redeemed_at: chrono::Utc
                .with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
                .single()
                .unwrap_or_default(),
        }
    }

    fn sample_profile() -> profile_entity::Model {
        profile_entity::Model {
            id: 1,
            user_id: "u1".to_string(),
            email: Some("ada@optima.test".to_string()),
            display_name: Some("Ada".to_string()),
            total_points: 0,
            is_admin: false,
            created_at: chrono::Utc::now(),
        }
    }

    fn has_line(lines: &[String], expected: &str) -> bool {
        lines.iter().any(|line| line == expected)
    }

    #[test]
    fn test_receipt_lines_contents() {
        let lines = receipt_lines(&sample_record(), &sample_profile());

        assert!(has_line(&lines, "Receipt no.:  000042"));
        assert!(has_line(&lines, "Date:         2026-03-14 09:30 UTC"));
        assert!(has_line(&lines, "Customer:     Ada"));
        assert!(has_line(&lines, "Email:        ada@optima.test"));
        assert!(has_line(&lines, "Voucher:      Coffee for Two"));
        assert!(has_line(&lines, "Unit points:  200"));
        assert!(has_line(&lines, "Total points: 600"));
    }

    #[test]
    fn test_receipt_lines_fall_back_to_user_id() {
        let mut customer = sample_profile();
        customer.display_name = None;
        customer.email = None;

        let lines = receipt_lines(&sample_record(), &customer);
        assert!(has_line(&lines, "Customer:     u1"));
        assert!(!lines.iter().any(|line| line.starts_with("Email:")));
    }

    #[test]
    fn test_render_receipt_is_a_pdf() -> Result<()> {
        let receipt = render_receipt(&sample_record(), &sample_profile())?;

        assert_eq!(receipt.file_name, "optima-receipt-000042.pdf");
        assert!(receipt.pdf.starts_with(b"%PDF"));
        assert!(receipt.lines.iter().any(|line| line.contains("Coffee for Two")));
        Ok(())
    }

    #[tokio::test]
    async fn test_receipt_for_own_redemption_only() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        create_test_profile(&db, "u1", 500).await?;
        let outcome = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100),
            &crate::config::store::RedemptionPolicy::default(),
        )
        .await?;

        let receipt = receipt_for(&db, &session_for("u1"), outcome.record.id).await?;
        assert!(receipt.pdf.starts_with(b"%PDF"));
        assert!(has_line(&receipt.lines, "Voucher:      Test Voucher"));

        let other = receipt_for(&db, &session_for("u2"), outcome.record.id).await;
        assert!(matches!(other, Err(Error::RedemptionNotFound { .. })));

        Ok(())
    }
}
