use thiserror::Error;
use url::Url;

use crate::database::models::Design;

/// Template used when no message template row is stored.
pub const DEFAULT_TEMPLATE: &str =
    "Hi! I am interested in the following designs:\n\n{designs}\n\nPlease share details.";

/// Placeholder substituted with the formatted design list.
const DESIGNS_PLACEHOLDER: &str = "{designs}";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("No WhatsApp contact number is configured")]
    MissingNumber,
}

/// Build a WhatsApp deep link for a set of designs.
///
/// Purely a formatting operation: the stored (or caller-supplied) template
/// has its `{designs}` placeholder replaced with one numbered line per
/// design, and the result is percent-encoded into a wa.me URL.
pub fn build_share_link(
    number: &str,
    template: &str,
    designs: &[Design],
) -> Result<String, ShareError> {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ShareError::MissingNumber);
    }

    let message = render_message(template, designs);

    let mut link = Url::parse("https://wa.me/").map_err(|_| ShareError::MissingNumber)?;
    link.set_path(&digits);
    link.query_pairs_mut().append_pair("text", &message);
    Ok(link.to_string())
}

/// Substitute the design list into the template. Templates without the
/// placeholder get the list appended.
pub fn render_message(template: &str, designs: &[Design]) -> String {
    let listing = designs
        .iter()
        .enumerate()
        .map(|(i, d)| format_line(i + 1, d))
        .collect::<Vec<_>>()
        .join("\n");

    if template.contains(DESIGNS_PLACEHOLDER) {
        template.replace(DESIGNS_PLACEHOLDER, &listing)
    } else {
        format!("{}\n\n{}", template, listing)
    }
}

fn format_line(position: usize, design: &Design) -> String {
    let mut line = format!("{}. {}", position, design.title);
    if let Some(number) = &design.design_number {
        line.push_str(&format!(" ({})", number));
    }
    if let Some(price) = &design.price_range {
        line.push_str(&format!(" - {}", price));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn design(title: &str, number: Option<&str>, price: Option<&str>) -> Design {
        Design {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description_short: None,
            description_long: None,
            description_plain: None,
            category: "sarees".to_string(),
            style: None,
            colour: None,
            fabric: None,
            occasion: None,
            designer_name: None,
            collection_name: None,
            season: None,
            price_range: price.map(|s| s.to_string()),
            sizes_available: None,
            tags: None,
            design_number: number.map(|s| s.to_string()),
            status: "active".to_string(),
            featured: false,
            view_count: 0,
            like_count: 0,
            object_key: "designs/x.jpg".to_string(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn renders_numbered_lines_into_template() {
        let designs = vec![
            design("Silk Saree", Some("SAR-101"), Some("5000-8000")),
            design("Bridal Lehenga", None, None),
        ];
        let message = render_message(DEFAULT_TEMPLATE, &designs);
        assert!(message.contains("1. Silk Saree (SAR-101) - 5000-8000"));
        assert!(message.contains("2. Bridal Lehenga"));
        assert!(!message.contains(DESIGNS_PLACEHOLDER));
    }

    #[test]
    fn template_without_placeholder_gets_listing_appended() {
        let designs = vec![design("Silk Saree", None, None)];
        let message = render_message("Check these out", &designs);
        assert!(message.starts_with("Check these out"));
        assert!(message.contains("1. Silk Saree"));
    }

    #[test]
    fn link_encodes_message_and_strips_number_formatting() {
        let designs = vec![design("Silk Saree", Some("SAR-101"), None)];
        let link = build_share_link("+91 98765-43210", DEFAULT_TEMPLATE, &designs).unwrap();
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(!link.contains(' '));
    }

    #[test]
    fn rejects_number_without_digits() {
        assert!(matches!(
            build_share_link("n/a", DEFAULT_TEMPLATE, &[]),
            Err(ShareError::MissingNumber)
        ));
    }
}
